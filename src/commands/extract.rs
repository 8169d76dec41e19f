// src/commands/extract.rs

//! Unpack a package archive

use anyhow::{Context, Result};
use app_install::packages;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn cmd_extract(package: &str, directory: &str) -> Result<()> {
    let package = Path::new(package);
    let directory = Path::new(directory);

    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;

    info!("Extracting {} to {}", package.display(), directory.display());
    let format = packages::extract_package(package, directory)
        .with_context(|| format!("Failed to extract {}", package.display()))?;

    println!(
        "Extracted {} ({:?}) to {}",
        package.display(),
        format,
        directory.display()
    );
    Ok(())
}
