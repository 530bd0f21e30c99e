#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Dynamic language provisioning: native source in, callable symbol out.
//!
//! [`provision`] turns a C source file (or an already-built shared library)
//! into a resolved entry point inside the running process, in two stages:
//!
//! - **build** — invoke the system C compiler and linker as child
//!   processes, capturing their output; skipped with
//!   [`BuildOptions::skip_build`];
//! - **load** — open the shared library and resolve the entry-point symbol
//!   named by [`entry_symbol_name`].
//!
//! The call is synchronous and blocking for its whole duration (child
//! processes, library open); offloading it to a worker thread is the
//! caller's concern. Provisioning distinct logical names concurrently is
//! safe; two concurrent calls for the *same* name race, and which library
//! ends up backing the name is undefined — serialize per name if that
//! matters.
//!
//! Loaded libraries are registered process-wide and never unloaded (see
//! [`registry`]).

use std::ffi::c_void;
use std::path::Path;

use libloading::Library;

pub mod error;
pub mod registry;
mod toolchain;


pub use error::{ProvisionError, Stage};
pub use registry::{ModuleHandle, loaded};

/// Prefix of every entry-point symbol. The full name is this prefix plus
/// the logical name, verbatim and case-sensitive; existing artifacts depend
/// on the exact bytes.
pub const LANGUAGE_SYMBOL_PREFIX: &str = "ts_language_";

/// Options for [`provision`].
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Treat the source path as an already-built shared library.
    pub skip_build: bool,
    /// Extra include directory passed to the compile stage.
    pub header_dir: Option<std::path::PathBuf>,
    /// Retain toolchain stdout/stderr in error payloads.
    pub capture_output: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            skip_build: false,
            header_dir: None,
            capture_output: true,
        }
    }
}

/// The entry-point symbol name for a logical language name.
pub fn entry_symbol_name(name: &str) -> String {
    format!("{LANGUAGE_SYMBOL_PREFIX}{name}")
}

/// Build (unless skipped) and load a language library, resolving its entry
/// point.
///
/// Single-shot: there is no retry loop inside; a caller that wants a retry
/// re-invokes the whole pipeline. On success the library is kept loaded for
/// the rest of the process (never unloaded) and the returned handle is a
/// non-owning view of the resolved symbol.
pub fn provision(
    source_path: &Path,
    name: &str,
    options: &BuildOptions,
) -> Result<ModuleHandle, ProvisionError> {
    let artifact = if options.skip_build {
        source_path.to_path_buf()
    } else {
        toolchain::build_library(source_path, options)?
    };

    // SAFETY: opening a shared library runs its initializers; we only load
    // artifacts the caller asked for, the same trust boundary as the
    // toolchain invocation above.
    let library = unsafe { Library::new(&artifact) }
        .map_err(|err| ProvisionError::ArtifactOpen(err.to_string()))?;

    let symbol = entry_symbol_name(name);
    // SAFETY: the symbol is treated as an opaque address and never called
    // here; type-correct invocation is the consumer's responsibility.
    let address = unsafe {
        let resolved = library.get::<*mut c_void>(symbol.as_bytes()).map_err(|err| {
            ProvisionError::SymbolResolution {
                symbol: symbol.clone(),
                reason: err.to_string(),
            }
        })?;
        *resolved as usize
    };
    if address == 0 {
        return Err(ProvisionError::SymbolNotFound { symbol });
    }

    Ok(registry::register(name, library, address))
}
