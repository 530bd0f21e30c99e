//! The external build stage: C source to shared library.
//!
//! Both invocations run as child processes with their output captured; the
//! calling thread blocks until each exits. Once a child is spawned there is
//! no cancellation path; a caller needing a deadline must wrap the whole
//! provisioning call.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::BuildOptions;
use crate::error::{ProvisionError, Stage};

/// Compile `source` to an object file and link it into a shared library,
/// both placed next to the source (`<src>.o`, `<src>.so`). Returns the
/// library path.
pub(crate) fn build_library(
    source: &Path,
    options: &BuildOptions,
) -> Result<PathBuf, ProvisionError> {
    let object = appended(source, ".o");
    let library = appended(source, ".so");

    let mut compile = Command::new("cc");
    compile.args(["-x", "c", "-fPIC"]);
    if let Some(dir) = &options.header_dir {
        compile.arg("-I").arg(dir);
    }
    compile.arg("-c").arg(source).arg("-o").arg(&object);
    run_stage(Stage::Compile, compile, options.capture_output)?;

    let mut link = Command::new("cc");
    link.arg("-shared").arg(&object).arg("-o").arg(&library);
    run_stage(Stage::Link, link, options.capture_output)?;

    Ok(library)
}

/// Run one toolchain stage to completion and classify its exit.
///
/// A non-zero exit and an abnormal termination are different outcomes: the
/// first means the input was bad, the second means the tool itself died.
fn run_stage(stage: Stage, mut command: Command, capture: bool) -> Result<(), ProvisionError> {
    let output = command
        .output()
        .map_err(|source| ProvisionError::Spawn { stage, source })?;
    if output.status.success() {
        return Ok(());
    }

    let combined = if capture {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        text
    } else {
        String::new()
    };

    match output.status.code() {
        Some(status) => Err(ProvisionError::ToolchainFailure {
            stage,
            status,
            output: combined,
        }),
        None => Err(ProvisionError::ToolchainAborted {
            stage,
            output: combined,
        }),
    }
}

/// `path` with `suffix` appended to the full file name.
fn appended(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
