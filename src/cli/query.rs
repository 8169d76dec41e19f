// src/cli/query.rs
//! Query commands: search applications by id or name

use clap::Subcommand;

#[derive(Subcommand)]
pub enum QueryCommands {
    /// Search application ids
    Id {
        /// Text the id contains
        term: String,
    },

    /// Search application names, including translated names
    Name {
        /// Text the name contains
        term: String,
    },
}
