// src/packages/pisi.rs

//! Pisi package extraction through the external `unpisi` tool

use crate::error::{Error, Result};
use crate::process;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Helper that unpacks a Pisi package into the current directory
pub const UNPISI: &str = "unpisi";

/// Directory below the extraction directory holding the package files
pub const INSTALL_DIR: &str = "install";

/// Unpack a Pisi package into `dest`
///
/// `unpisi` writes the package metadata next to an `install/` directory
/// holding the file system image, so the package root is `dest/install`.
pub fn extract_pisi(path: &Path, dest: &Path) -> Result<()> {
    let package = path
        .canonicalize()
        .map_err(|e| Error::IoError(format!("cannot resolve {}: {e}", path.display())))?;
    debug!("Running {} on {}", UNPISI, package.display());

    let mut command = Command::new(UNPISI);
    command.arg(&package).current_dir(dest);
    process::run_tool(command, process::DEFAULT_TIMEOUT)
}
