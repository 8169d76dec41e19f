// src/commands/generate.rs

//! Add one desktop file of an unpacked package to the database

use anyhow::{Context, Result, bail};
use app_install::db::{Database, paths};
use app_install::desktop::{self, GenerateRequest};
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn cmd_generate(
    database: Option<&str>,
    root: &str,
    desktop_file: &str,
    package: &str,
    icondir: &str,
    repo: &str,
) -> Result<()> {
    if !Path::new(root).is_dir() {
        bail!("Root directory {} does not exist", root);
    }
    if !Path::new(icondir).is_dir() {
        bail!("Icon directory {} does not exist", icondir);
    }

    let db_path = paths::database_path(database);
    debug!("database={}, root={}", db_path.display(), root);

    let mut db = Database::open(&db_path, false).context("Failed to open")?;
    let request = GenerateRequest {
        root: PathBuf::from(root),
        desktop_file: desktop_file.to_string(),
        package: package.to_string(),
        repo: repo.to_string(),
        icondir: PathBuf::from(icondir),
    };
    let application_id = desktop::generate(&mut db, &request)
        .with_context(|| format!("Failed to generate data for {}", desktop_file))?;
    db.close(false).context("Failed to close")?;

    println!("Added {} from package {}", application_id, package);
    Ok(())
}
