// src/commands/remove.rs

//! Remove applications from the database

use anyhow::{Context, Result, bail};
use app_install::db::{Database, paths};
use std::path::Path;

/// Remove the applications of a repository and/or package, with their icons
pub fn cmd_remove(
    database: Option<&str>,
    icondir: Option<&str>,
    repo: Option<&str>,
    package: Option<&str>,
) -> Result<()> {
    if repo.is_none() && package.is_none() {
        bail!("Please specify --repo or --package");
    }

    let db_path = paths::database_path(database);
    let mut db = Database::open(&db_path, true).context("Failed to open")?;
    db.set_icon_path(icondir.map(Path::new));

    if let Some(repo) = repo {
        let removed = db.remove_by_repo(repo).context("Failed to remove")?;
        println!("Removed {} applications from repo {}", removed, repo);
    }

    if let Some(package) = package {
        let removed = db.remove_by_name(package).context("Failed to remove")?;
        println!("Removed {} applications from package {}", removed, package);
    }

    db.close(true).context("Failed to close")?;
    Ok(())
}
