// src/builder/mod.rs

//! Repository builder
//!
//! Turns a whole repository into a distributable cache:
//!
//! 1. list the packages shipping desktop files
//! 2. download each one into `<dist>/cache` unless a copy of the right size is there
//! 3. unpack it into `<dist>/root` and generate rows for every desktop file
//! 4. pack `<dist>/icons` into `<dist>/<repo>-icons.tar.gz`
//!
//! The result is `<dist>/<repo>.db` plus the icon archive.

use crate::db::Database;
use crate::desktop::{self, GenerateRequest};
use crate::error::{Error, Result};
use crate::repository::PackageSource;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the icon tree inside the dist directory and the archive
const ICONS_DIR: &str = "icons";

/// Options for a repository build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Output directory
    pub dist: PathBuf,
    /// Also write `<dist>/<repo>.sql`
    pub sql: bool,
}

impl BuildOptions {
    pub fn new(dist: impl Into<PathBuf>) -> Self {
        Self {
            dist: dist.into(),
            sql: false,
        }
    }

    pub fn database_path(&self, repo: &str) -> PathBuf {
        self.dist.join(format!("{repo}.db"))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dist.join("cache")
    }

    pub fn root_dir(&self) -> PathBuf {
        self.dist.join("root")
    }

    pub fn icon_dir(&self) -> PathBuf {
        self.dist.join(ICONS_DIR)
    }
}

/// What a build produced
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Packages that shipped desktop files
    pub packages: usize,
    /// Applications added to the database
    pub applications: usize,
    /// Packages skipped because they could not be fetched or unpacked
    pub failed_packages: Vec<String>,
    /// Desktop files that could not be turned into rows
    pub failed_desktop_files: Vec<String>,
    /// Combined license string
    pub license: String,
    pub database: PathBuf,
    pub icon_archive: PathBuf,
    pub sql: Option<PathBuf>,
}

/// Whether `path` is a cached download of exactly `size` bytes
pub fn is_cached(path: &Path, size: u64) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() == size)
        .unwrap_or(false)
}

/// Combine package licenses into one string
///
/// Each distinct license appears once, in first-seen order, joined with
/// `" and "`. With `parenthesize`, licenses containing a space are wrapped
/// in parentheses so the combination stays unambiguous.
pub fn license_summary(licenses: &[String], parenthesize: bool) -> String {
    let mut unique: Vec<&str> = Vec::new();
    for license in licenses {
        if !unique.contains(&license.as_str()) {
            unique.push(license);
        }
    }

    unique
        .into_iter()
        .map(|license| {
            if parenthesize && license.contains(' ') {
                format!("({license})")
            } else {
                license.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Pack `<dist>/icons` into `<dist>/<repo>-icons.tar.gz`
///
/// Archive members are named `icons/<size>/<file>`.
pub fn create_icon_archive(dist: &Path, repo: &str) -> Result<PathBuf> {
    let archive_path = dist.join(format!("{repo}-icons.tar.gz"));
    let icon_dir = dist.join(ICONS_DIR);

    let file = File::create(&archive_path).map_err(|e| {
        Error::IoError(format!("cannot create {}: {e}", archive_path.display()))
    })?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(ICONS_DIR, &icon_dir)?;
    let mut writer = builder.into_inner()?.finish()?;
    writer.flush()?;

    info!("Created icon archive {}", archive_path.display());
    Ok(archive_path)
}

fn remove_dir_if_exists(path: &Path) {
    if path.exists()
        && let Err(e) = fs::remove_dir_all(path)
    {
        warn!("cannot remove {}: {}", path.display(), e);
    }
}

/// Build the cache for every package of `source`
///
/// Failing to create the database or to list packages aborts the build. A
/// package that cannot be fetched or unpacked is skipped, as is a desktop
/// file that cannot be turned into rows.
pub fn build_repository(source: &dyn PackageSource, options: &BuildOptions) -> Result<BuildReport> {
    let repo = source.name().to_string();
    let dist = &options.dist;
    fs::create_dir_all(dist)?;

    let db_path = options.database_path(&repo);
    if db_path.exists() {
        debug!("removing existing database {}", db_path.display());
        fs::remove_file(&db_path)?;
    }
    info!("Creating database {}", db_path.display());
    let mut db = Database::open(&db_path, false)?;
    db.create()
        .map_err(|e| Error::DatabaseError(format!("cannot create database {}: {e}", db_path.display())))?;

    let cache_dir = options.cache_dir();
    let icon_dir = options.icon_dir();
    let root_dir = options.root_dir();
    fs::create_dir_all(&cache_dir)?;
    fs::create_dir_all(&icon_dir)?;

    let packages = source.packages()?;
    info!("{} packages in {} ship desktop files", packages.len(), repo);

    let mut report = BuildReport {
        database: db_path.clone(),
        ..Default::default()
    };
    let mut licenses: Vec<String> = Vec::new();

    for pkg in &packages {
        info!("Package name: {}", pkg.name);
        report.packages += 1;
        if let Some(license) = &pkg.license {
            licenses.push(license.clone());
        }

        let archive = cache_dir.join(&pkg.filename);
        if is_cached(&archive, pkg.size) {
            info!("{} already downloaded", pkg.filename);
        } else if let Err(e) = source.fetch(pkg, &archive) {
            warn!("cannot download {}: {}", pkg.name, e);
            report.failed_packages.push(pkg.name.clone());
            continue;
        }

        remove_dir_if_exists(&root_dir);
        fs::create_dir_all(&root_dir)?;
        info!("Extracting {}", archive.display());
        if let Err(e) = source.extract(&archive, &root_dir) {
            warn!("cannot extract package {}: {}", pkg.filename, e);
            report.failed_packages.push(pkg.name.clone());
            remove_dir_if_exists(&root_dir);
            continue;
        }

        let content_root = source.content_root(&root_dir);
        for desktop_file in &pkg.desktop_files {
            info!("Generating data for {}", desktop_file);
            let request = GenerateRequest {
                root: content_root.clone(),
                desktop_file: source.desktop_file_arg(desktop_file),
                package: pkg.name.clone(),
                repo: repo.clone(),
                icondir: icon_dir.clone(),
            };
            match desktop::generate(&mut db, &request) {
                Ok(id) => {
                    debug!("added {}", id);
                    report.applications += 1;
                }
                Err(e) => {
                    warn!("failed to generate data for {}: {}", desktop_file, e);
                    report.failed_desktop_files.push(desktop_file.clone());
                }
            }
        }

        // Per package, so the unpacked trees never pile up
        debug!("removing temporary files");
        remove_dir_if_exists(&root_dir);
    }

    report.license = license_summary(&licenses, source.parenthesize_licenses());
    info!("license = {}", report.license);

    if options.sql {
        let sql_path = dist.join(format!("{repo}.sql"));
        let mut writer = BufWriter::new(File::create(&sql_path)?);
        db.dump_sql(&mut writer)?;
        writer.flush()?;
        info!("Wrote {}", sql_path.display());
        report.sql = Some(sql_path);
    }
    db.close(true)?;

    report.icon_archive = create_icon_archive(dist, &repo)?;

    debug!("removing any remaining temporary files");
    remove_dir_if_exists(&icon_dir);

    Ok(report)
}
