//! Provisioning failures, classified by what the caller can do about them.

use std::fmt;
use std::io;

/// Which toolchain invocation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Link,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Compile => f.write_str("compiler"),
            Stage::Link => f.write_str("linker"),
        }
    }
}

/// A provisioning attempt that did not reach a loaded entry point.
///
/// The toolchain variants, the open variant, and the two symbol variants are
/// deliberately distinct: they call for fixing the source, fixing the build
/// environment, fixing the naming, and fixing the artifact contents
/// respectively.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The compiler or linker process could not be started at all.
    #[error("failed to run the {stage}: {source}")]
    Spawn {
        stage: Stage,
        #[source]
        source: io::Error,
    },

    /// The compiler or linker exited with a non-zero status.
    #[error("{stage} failed with status {status}\n{output}")]
    ToolchainFailure {
        stage: Stage,
        status: i32,
        /// Combined stdout and stderr, empty when capture was disabled.
        output: String,
    },

    /// The compiler or linker was terminated without a clean exit
    /// (killed by a signal rather than exiting).
    #[error("{stage} terminated abnormally\n{output}")]
    ToolchainAborted { stage: Stage, output: String },

    /// The built (or supplied) artifact could not be opened into the
    /// process. Carries the platform loader's reason string.
    #[error("error opening language library: {0}")]
    ArtifactOpen(String),

    /// The dynamic loader's lookup of the entry-point symbol failed.
    #[error("error resolving `{symbol}`: {reason}")]
    SymbolResolution { symbol: String, reason: String },

    /// Lookup succeeded but the symbol's address is null.
    #[error("`{symbol}` resolved to a null address")]
    SymbolNotFound { symbol: String },
}
