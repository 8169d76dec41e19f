// src/db/paths.rs
//! Default locations for the application database and icon tree

use std::path::{Path, PathBuf};

/// System-wide application database
pub const DEFAULT_DATABASE: &str = "/var/lib/app-install/desktop.db";

/// Directory holding installed desktop files
pub const DEFAULT_APPLICATIONS_DIR: &str = "/usr/share/applications";

/// Environment variable overriding [`DEFAULT_DATABASE`]
pub const DATABASE_ENV: &str = "APP_INSTALL_DB";

/// Get the database path, honoring `APP_INSTALL_DB` when no path was given
pub fn database_path(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(path),
        None => std::env::var(DATABASE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE)),
    }
}

/// Get the directory containing the database
pub fn db_dir(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .unwrap_or(Path::new("/var/lib/app-install"))
        .to_path_buf()
}
