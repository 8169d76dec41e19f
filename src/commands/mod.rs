// src/commands/mod.rs
//! Command handlers for the app-install CLI

mod add;
mod admin;
mod build;
mod extract;
mod generate;
mod query;
mod remove;

pub use add::cmd_add;
pub use admin::{cmd_create, cmd_refresh_installed, cmd_upgrade};
pub use build::{cmd_build_pisi, cmd_build_yum};
pub use extract::cmd_extract;
pub use generate::cmd_generate;
pub use query::{QueryField, cmd_query};
pub use remove::cmd_remove;
