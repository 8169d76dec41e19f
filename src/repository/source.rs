// src/repository/source.rs

//! Package sources the repository builder draws from

use crate::error::Result;
use crate::packages;
use std::path::{Path, PathBuf};

/// Directory holding desktop files, without the leading slash
pub const APPLICATIONS_DIR: &str = "usr/share/applications/";

/// Whether a packaged file is a desktop file in the applications directory
///
/// Accepts both absolute (`/usr/share/...`) and root-relative paths.
pub fn is_desktop_file(path: &str) -> bool {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.starts_with(APPLICATIONS_DIR) && path.ends_with(".desktop")
}

/// A package that ships at least one desktop file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePackage {
    pub name: String,
    pub license: Option<String>,
    /// Archive file name, used as the package cache key
    pub filename: String,
    /// Expected archive size in bytes
    pub size: u64,
    /// Desktop files, as listed by the source
    pub desktop_files: Vec<String>,
    /// URL or path the archive is downloaded from
    pub location: String,
}

/// A repository whose packages can be listed, fetched and unpacked
pub trait PackageSource {
    /// Repository id, recorded as `repo_id` of every application
    fn name(&self) -> &str;

    /// Packages shipping desktop files
    fn packages(&self) -> Result<Vec<SourcePackage>>;

    /// Download `pkg` to `dest`
    fn fetch(&self, pkg: &SourcePackage, dest: &Path) -> Result<()>;

    /// Unpack a downloaded archive into `root`
    fn extract(&self, archive: &Path, root: &Path) -> Result<()> {
        packages::extract_package(archive, root)?;
        Ok(())
    }

    /// Directory of the unpacked package file system below `root`
    fn content_root(&self, root: &Path) -> PathBuf {
        root.to_path_buf()
    }

    /// Desktop file argument passed to the generator for a listed desktop file
    fn desktop_file_arg(&self, path: &str) -> String;

    /// Whether licenses containing spaces are parenthesized in the summary
    fn parenthesize_licenses(&self) -> bool {
        false
    }
}
