// src/desktop/generate.rs

//! Translate one desktop file of an unpacked package into cache rows

use super::{DesktopEntry, application_id_from_path};
use crate::db::Database;
use crate::db::models::{Application, Translation};
use crate::error::{Error, Result};
use crate::icons;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding desktop files, relative to a package root
const APPLICATIONS_DIR: &str = "usr/share/applications";

/// Inputs of one generate run
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Root of the unpacked package
    pub root: PathBuf,
    /// Desktop file name, or absolute path inside `root`
    pub desktop_file: String,
    pub package: String,
    pub repo: String,
    /// Icon tree receiving the application's icons
    pub icondir: PathBuf,
}

/// Locate a desktop file inside a package root
///
/// Relative names are looked up in `usr/share/applications`; absolute names
/// are taken relative to the root.
pub fn resolve_desktop_file(root: &Path, desktop_file: &str) -> PathBuf {
    match desktop_file.strip_prefix('/') {
        Some(inside) => root.join(inside),
        None => root.join(APPLICATIONS_DIR).join(desktop_file),
    }
}

/// Add the application described by one desktop file to `db`
///
/// Writes the application row and one translation row per locale having a
/// localized name or comment, then copies the icon from the package's
/// hicolor theme into the icon tree. Returns the application id.
pub fn generate(db: &mut Database, request: &GenerateRequest) -> Result<String> {
    if !request.root.is_dir() {
        return Err(Error::NotFoundError(format!(
            "root directory {}",
            request.root.display()
        )));
    }

    icons::ensure_icon_dirs(&request.icondir)?;

    let filename = resolve_desktop_file(&request.root, &request.desktop_file);
    debug!("filename: {}", filename.display());

    let application_id = application_id_from_path(&filename).ok_or_else(|| {
        Error::ParseError(format!("no application id in {}", filename.display()))
    })?;
    let entry = DesktopEntry::from_path(&filename)?;

    let mut app = Application::new(
        application_id.clone(),
        request.package.clone(),
        request.repo.clone(),
    );
    app.categories = entry.categories().map(String::from);
    app.icon_name = entry.icon().map(String::from);
    app.application_name = entry.name().map(String::from);
    app.application_summary = entry.comment().map(String::from);

    debug!(
        "application_id={}, name={:?}, comment={:?}, icon={:?}, categories={:?}",
        app.application_id,
        app.application_name,
        app.application_summary,
        app.icon_name,
        app.categories
    );

    let translations: Vec<Translation> = entry
        .locales()
        .into_iter()
        .filter_map(|locale| {
            let name = entry.value("Name", Some(locale));
            let comment = entry.value("Comment", Some(locale));
            if name.is_none() && comment.is_none() {
                return None;
            }
            Some(Translation::new(
                application_id.clone(),
                name.map(String::from),
                comment.map(String::from),
                locale.to_string(),
            ))
        })
        .collect();

    db.transaction(|tx| {
        app.insert(tx)?;
        for translation in &translations {
            translation.insert(tx)?;
        }
        Ok(())
    })?;

    if let Some(icon) = &app.icon_name {
        let copied = icons::copy_theme_icons(&request.root, &request.icondir, icon);
        debug!("copied {} icons for {}", copied, icon);
    }

    Ok(application_id)
}
