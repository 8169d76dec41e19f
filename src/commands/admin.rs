// src/commands/admin.rs

//! Database administration commands: create, upgrade, refresh-installed

use anyhow::{Context, Result};
use app_install::db::{Database, paths};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Create an empty application database
pub fn cmd_create(database: Option<&str>, force: bool) -> Result<()> {
    let db_path = paths::database_path(database);

    if force && db_path.exists() {
        info!("Removing existing database {}", db_path.display());
        fs::remove_file(&db_path)
            .with_context(|| format!("Failed to remove {}", db_path.display()))?;
    }
    fs::create_dir_all(paths::db_dir(&db_path))?;

    let db = Database::open(&db_path, false).context("Failed to open")?;
    db.create().context("Failed to create")?;
    db.close(false).context("Failed to close")?;

    println!("Database created at: {}", db_path.display());
    Ok(())
}

/// Upgrade a database to the current schema
pub fn cmd_upgrade(database: Option<&str>) -> Result<()> {
    let db_path = paths::database_path(database);
    let db = Database::open(&db_path, false).context("Failed to open")?;
    let applied = db.upgrade().context("Failed to upgrade")?;
    let version = db.schema_version()?;
    db.close(false).context("Failed to close")?;

    if applied == 0 {
        println!("Database is up to date (schema version {})", version);
    } else {
        println!(
            "Applied {} migration(s), schema version is now {}",
            applied, version
        );
    }
    Ok(())
}

/// Mark every application with a desktop file in `applications_dir` as installed
pub fn cmd_refresh_installed(database: Option<&str>, applications_dir: &str) -> Result<()> {
    let db_path = paths::database_path(database);
    let db = Database::open(&db_path, false).context("Failed to open")?;

    db.set_installed(None, false)
        .context("Failed to reset installed state")?;

    let dir = Path::new(applications_dir);
    let entries = fs::read_dir(dir).with_context(|| {
        format!("Failed to list applications directory {}", dir.display())
    })?;

    let mut installed = 0;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(application_id) = file_name
            .to_str()
            .and_then(|name| name.strip_suffix(".desktop"))
            .filter(|id| !id.is_empty())
        else {
            continue;
        };
        debug!("filename={}, {}", entry.path().display(), application_id);

        match db.set_installed(Some(application_id), true) {
            Ok(_) => installed += 1,
            Err(e) => warn!(
                "Failed to set installed attribute on {}, possibly the entry does not exist: {}",
                application_id, e
            ),
        }
    }

    db.close(false).context("Failed to close")?;
    println!("{} installed applications marked", installed);
    Ok(())
}
