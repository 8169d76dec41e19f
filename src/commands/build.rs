// src/commands/build.rs

//! Build the database and icon archive for a whole repository

use anyhow::{Context, Result, bail};
use app_install::builder::{self, BuildOptions, BuildReport};
use app_install::repository::pisi::missing_local_index;
use app_install::repository::{PackageSource, PisiSource, YumSource};
use std::path::Path;
use tracing::info;

/// Build from a yum repository
pub fn cmd_build_yum(
    repo: &str,
    dist: &str,
    baseurl: Option<&str>,
    repos_dir: &str,
    releasever: Option<&str>,
    sql: bool,
) -> Result<()> {
    let source = match baseurl {
        Some(baseurl) => YumSource::new(repo, baseurl)?,
        None => YumSource::from_config(repo, Path::new(repos_dir), releasever)
            .with_context(|| format!("Failed to configure repository {}", repo))?,
    };
    info!("Using {} at {}", repo, source.baseurl());
    run_build(&source, dist, sql)
}

/// Build from a pisi repository
pub fn cmd_build_pisi(
    repo: &str,
    dist: &str,
    index: Option<&str>,
    installed_dir: &str,
    sql: bool,
) -> Result<()> {
    if let Some(index) = index
        && missing_local_index(index)
    {
        bail!("Index {} does not exist", index);
    }

    let source = PisiSource::new(repo, index)?.with_installed_dir(Path::new(installed_dir));
    run_build(&source, dist, sql)
}

fn run_build(source: &dyn PackageSource, dist: &str, sql: bool) -> Result<()> {
    let mut options = BuildOptions::new(dist);
    options.sql = sql;

    let report = builder::build_repository(source, &options)
        .with_context(|| format!("Failed to build {}", source.name()))?;
    print_report(source.name(), &report);
    Ok(())
}

fn print_report(repo: &str, report: &BuildReport) {
    println!("Built {}:", repo);
    println!("  Packages: {}", report.packages);
    println!("  Applications: {}", report.applications);
    println!("  Database: {}", report.database.display());
    println!("  Icons: {}", report.icon_archive.display());
    if let Some(sql) = &report.sql {
        println!("  SQL: {}", sql.display());
    }

    if !report.failed_packages.is_empty() {
        println!("  Failed packages ({}):", report.failed_packages.len());
        for name in &report.failed_packages {
            println!("    {}", name);
        }
    }
    if !report.failed_desktop_files.is_empty() {
        println!(
            "  Failed desktop files ({}):",
            report.failed_desktop_files.len()
        );
        for path in &report.failed_desktop_files {
            println!("    {}", path);
        }
    }

    println!("license = {}", report.license);
}
