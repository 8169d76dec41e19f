// src/repository/mod.rs

//! Package repositories the cache is built from
//!
//! This module provides:
//! - The [`PackageSource`] trait the builder works against
//! - Yum repositories (`.repo` configuration, `repodata/` metadata)
//! - Pisi repositories (`pisi-index.xml`, installed file lists)
//! - An HTTP client that also reads local mirrors

mod client;
mod repodata;
mod source;

pub mod pisi;
pub mod repo_config;
pub mod yum;

pub use client::{RepositoryClient, join_location, local_path};
pub use pisi::PisiSource;
pub use repodata::{PrimaryPackage, parse_filelists_desktop, parse_primary, parse_repomd};
pub use source::{PackageSource, SourcePackage, is_desktop_file};
pub use yum::YumSource;
