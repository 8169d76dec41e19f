// src/cli/mod.rs
//! CLI definitions for app-install
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! Database maintenance:
//! - `create` / `upgrade` - Set up or migrate a database
//! - `refresh-installed` - Mark applications installed on this system
//! - `add` / `remove` - Merge or drop a repository's applications
//! - `query` - Search applications by id or name
//!
//! Repository tooling:
//! - `generate` - Add one desktop file of an unpacked package
//! - `extract` - Unpack a package archive
//! - `build` - Build the database and icon archive for a whole repository

use app_install::db::paths;
use clap::{Parser, Subcommand};

mod build;
mod query;

pub use build::BuildCommands;
pub use query::QueryCommands;

#[derive(Parser)]
#[command(name = "app-install")]
#[command(author = "app-install Contributors")]
#[command(version)]
#[command(about = "Desktop application metadata cache for package repositories", long_about = None)]
pub struct Cli {
    /// Show extra debugging information
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty application database
    Create {
        /// Database file (default: $APP_INSTALL_DB or /var/lib/app-install/desktop.db)
        #[arg(short, long)]
        database: Option<String>,

        /// Remove an existing database first
        #[arg(short, long)]
        force: bool,
    },

    /// Upgrade a database to the current schema
    Upgrade {
        /// Database file
        #[arg(short, long)]
        database: Option<String>,
    },

    /// Mark the applications installed on this system
    RefreshInstalled {
        /// Database file
        #[arg(short, long)]
        database: Option<String>,

        /// Directory holding the installed desktop files
        #[arg(long, default_value = paths::DEFAULT_APPLICATIONS_DIR)]
        local_application_root: String,
    },

    /// Copy applications from another database
    Add {
        /// Database file
        #[arg(short, long)]
        database: Option<String>,

        /// Database to copy applications from
        #[arg(long)]
        source_database: String,

        /// Icon directory of the database
        #[arg(short, long)]
        icondir: Option<String>,

        /// Icon directory of the source database
        #[arg(long)]
        source_icondir: Option<String>,

        /// Copy the applications of this repository
        #[arg(short, long, required_unless_present = "package")]
        repo: Option<String>,

        /// Copy the applications of this package
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Remove applications from the database
    Remove {
        /// Database file
        #[arg(short, long)]
        database: Option<String>,

        /// Icon directory to remove icons from
        #[arg(short, long)]
        icondir: Option<String>,

        /// Remove the applications of this repository
        #[arg(short, long, required_unless_present = "package")]
        repo: Option<String>,

        /// Remove the applications of this package
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Search the database
    Query {
        #[command(subcommand)]
        command: QueryCommands,

        /// Database file
        #[arg(short, long, global = true)]
        database: Option<String>,

        /// Locale for translated names (default: from LC_ALL, LC_MESSAGES or LANG)
        #[arg(long, global = true)]
        locale: Option<String>,

        /// Print results as JSON
        #[arg(long, global = true)]
        json: bool,
    },

    /// Add one desktop file of an unpacked package to the database
    Generate {
        /// Database file
        #[arg(short, long)]
        database: Option<String>,

        /// Root directory of the package data
        #[arg(short, long, default_value = "/")]
        root: String,

        /// Desktop file name, or absolute path inside the root
        #[arg(short = 'f', long)]
        desktopfile: String,

        /// Name of the package
        #[arg(short, long)]
        package: String,

        /// Icon directory
        #[arg(short, long)]
        icondir: String,

        /// Name of the remote repository
        #[arg(short = 'n', long)]
        repo: String,
    },

    /// Unpack a package archive (RPM, tarball or Pisi)
    Extract {
        /// Package file
        #[arg(short, long)]
        package: String,

        /// Directory to unpack into
        #[arg(short, long)]
        directory: String,
    },

    /// Build the database and icon archive for a whole repository
    #[command(subcommand)]
    Build(BuildCommands),
}
