// src/commands/add.rs

//! Merge applications from another database

use anyhow::{Context, Result, bail};
use app_install::db::{Database, paths};
use std::path::Path;
use tracing::{debug, warn};

/// Copy the applications of a repository and/or package from `source_database`
///
/// Nothing is copied for a repository or package the database already has
/// entries for.
pub fn cmd_add(
    database: Option<&str>,
    source_database: &str,
    icondir: Option<&str>,
    source_icondir: Option<&str>,
    repo: Option<&str>,
    package: Option<&str>,
) -> Result<()> {
    if repo.is_none() && package.is_none() {
        bail!("Please specify --repo or --package");
    }

    let db_path = paths::database_path(database);
    debug!(
        "database={}, source_database={}, repo={:?}, icondir={:?}",
        db_path.display(),
        source_database,
        repo,
        icondir
    );

    let mut db = Database::open(&db_path, true).context("Failed to open")?;
    db.set_icon_path(icondir.map(Path::new));
    let source = Path::new(source_database);
    let source_icons = source_icondir.map(Path::new);

    if let Some(repo) = repo {
        let existing = db.count_by_repo(repo).context("Failed to query by repo")?;
        if existing > 0 {
            warn!("There are already {} entries for repo {}", existing, repo);
        } else {
            let added = db
                .import_by_repo(source, source_icons, repo)
                .context("Failed to add")?;
            println!("Added {} applications from repo {}", added, repo);
        }
    }

    if let Some(package) = package {
        let existing = db.count_by_name(package).context("Failed to query by name")?;
        if existing > 0 {
            warn!("There are already {} entries for name {}", existing, package);
        } else {
            let added = db
                .import_by_name(source, source_icons, package)
                .context("Failed to add")?;
            println!("Added {} applications from package {}", added, package);
        }
    }

    db.close(false).context("Failed to close")?;
    Ok(())
}
