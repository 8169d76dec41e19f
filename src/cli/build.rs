// src/cli/build.rs
//! Build commands: one per repository backend

use app_install::repository::{pisi, repo_config};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum BuildCommands {
    /// Build from a yum repository
    Yum {
        /// Repository id, e.g. fedora
        #[arg(short, long)]
        repo: String,

        /// Output directory
        #[arg(short, long)]
        dist: String,

        /// Repository base URL or local path (default: from the .repo files)
        #[arg(long)]
        baseurl: Option<String>,

        /// Directory holding .repo files
        #[arg(long, default_value = repo_config::DEFAULT_REPOS_DIR)]
        repos_dir: String,

        /// Value of $releasever (default: VERSION_ID from /etc/os-release)
        #[arg(long)]
        releasever: Option<String>,

        /// Also write the database as SQL statements
        #[arg(long)]
        sql: bool,
    },

    /// Build from a pisi repository
    Pisi {
        /// Repository name
        #[arg(short, long)]
        repo: String,

        /// Output directory
        #[arg(short, long)]
        dist: String,

        /// Location of pisi-index.xml (default: the index pisi keeps, packages via `pisi fetch`)
        #[arg(long)]
        index: Option<String>,

        /// Directory of the installed-package database
        #[arg(long, default_value = pisi::DEFAULT_INSTALLED_DIR)]
        installed_dir: String,

        /// Also write the database as SQL statements
        #[arg(long)]
        sql: bool,
    },
}
