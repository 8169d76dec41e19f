// src/db/schema.rs

//! Database schema definitions and migrations
//!
//! Version 1 holds the `applications` and `translations` tables exactly as the
//! first generation of tools wrote them. Later versions only add columns and
//! indexes, so a cache written by an old tool can be upgraded in place.

use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize the schema version tracking table
fn init_schema_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

/// Check whether a table exists in the main database
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Get the current schema version from the database
///
/// A database that has the application tables but no version ledger was
/// written by an older tool and counts as version 1.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let has_ledger = table_exists(conn, "schema_version")?;
    init_schema_version(conn)?;

    let version: i32 = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);

    if version == 0 && !has_ledger && table_exists(conn, "applications")? {
        debug!("Found unversioned application tables, assuming schema version 1");
        set_schema_version(conn, 1)?;
        return Ok(1);
    }

    Ok(version)
}

/// Set the schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Apply all pending migrations to bring the database up to date
///
/// Returns the number of migrations applied.
pub fn migrate(conn: &Connection) -> Result<i32> {
    let current_version = get_schema_version(conn)?;
    debug!("Current schema version: {}", current_version);

    if current_version >= SCHEMA_VERSION {
        debug!("Schema is up to date");
        return Ok(0);
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        info!("Applying migration to version {}", version);
        apply_migration(conn, version)?;
        set_schema_version(conn, version)?;
    }

    Ok(SCHEMA_VERSION - current_version)
}

/// Apply a specific migration version
fn apply_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        2 => migrate_v2(conn),
        _ => Err(Error::DatabaseError(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Initial schema - Version 1
fn migrate_v1(conn: &Connection) -> Result<()> {
    debug!("Creating schema version 1");

    conn.execute_batch(
        "
        CREATE TABLE applications (
            application_id TEXT PRIMARY KEY,
            package_name TEXT,
            categories TEXT,
            repo_id TEXT,
            icon_name TEXT,
            application_name TEXT,
            application_summary TEXT
        );

        CREATE TABLE translations (
            application_id TEXT,
            application_name TEXT,
            application_summary TEXT,
            locale TEXT
        );
        ",
    )?;

    Ok(())
}

/// Version 2 - ratings, screenshots and installed state
fn migrate_v2(conn: &Connection) -> Result<()> {
    debug!("Migrating to schema version 2");

    conn.execute_batch(
        "
        ALTER TABLE applications ADD COLUMN rating INTEGER DEFAULT 0;
        ALTER TABLE applications ADD COLUMN screenshot_url TEXT;
        ALTER TABLE applications ADD COLUMN installed INTEGER DEFAULT 0;

        CREATE INDEX IF NOT EXISTS idx_applications_repo ON applications(repo_id);
        CREATE INDEX IF NOT EXISTS idx_applications_package ON applications(package_name);
        CREATE INDEX IF NOT EXISTS idx_translations_app ON translations(application_id);
        ",
    )?;

    Ok(())
}
