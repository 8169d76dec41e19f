// src/icons.rs

//! Icon tree handling
//!
//! An icon tree is a directory with one sub-directory per size in
//! [`ICON_SIZES`]. Raster sizes hold `<icon>.png`, `scalable` holds
//! `<icon>.svg`. The generator fills the tree from the hicolor theme of an
//! unpacked package; remove and import keep it in step with the database.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Icon sizes kept in an icon tree
pub const ICON_SIZES: &[&str] = &["22x22", "24x24", "32x32", "48x48", "scalable"];

/// Location of the hicolor theme inside a package root
const HICOLOR_DIR: &str = "usr/share/icons/hicolor";

/// File name of `icon` for the given size directory
pub fn icon_file_name(size: &str, icon: &str) -> String {
    if size == "scalable" {
        format!("{icon}.svg")
    } else {
        format!("{icon}.png")
    }
}

/// Whether `icon` is a bare theme name that stays inside a size directory
pub fn is_plain_icon_name(icon: &str) -> bool {
    !icon.is_empty() && icon != "." && icon != ".." && !icon.contains(['/', '\\', '\0'])
}

/// Create the icon directory and all size sub-directories
///
/// Failing to create the top-level directory is an error; a size directory
/// that cannot be created is only logged.
pub fn ensure_icon_dirs(directory: &Path) -> Result<()> {
    if !directory.is_dir() {
        fs::create_dir_all(directory)?;
    }

    for size in ICON_SIZES {
        let path = directory.join(size);
        if !path.is_dir() {
            debug!("creating {}", path.display());
            if let Err(e) = fs::create_dir(&path) {
                warn!("cannot create {}: {}", path.display(), e);
            }
        }
    }
    Ok(())
}

/// Path of an icon in the hicolor theme below `root`
pub fn theme_icon_path(root: &Path, size: &str, icon: &str) -> PathBuf {
    root.join(HICOLOR_DIR)
        .join(size)
        .join("apps")
        .join(icon_file_name(size, icon))
}

/// Copy every available size of `icon` from the hicolor theme in `root`
///
/// Returns the number of files copied. Copy failures are logged and skipped.
pub fn copy_theme_icons(root: &Path, directory: &Path, icon: &str) -> usize {
    if !is_plain_icon_name(icon) {
        warn!("refusing icon name {:?}", icon);
        return 0;
    }
    let mut copied = 0;
    for size in ICON_SIZES {
        let source = theme_icon_path(root, size, icon);
        if !source.exists() {
            debug!("does not exist: {}, so not copying", source.display());
            continue;
        }
        let dest = directory.join(size).join(icon_file_name(size, icon));
        if copy_icon(&source, &dest) {
            copied += 1;
        }
    }
    copied
}

/// Copy every available size of `icon` from one icon tree to another
pub fn copy_tree_icons(source_dir: &Path, directory: &Path, icon: &str) -> usize {
    if !is_plain_icon_name(icon) {
        warn!("refusing icon name {:?}", icon);
        return 0;
    }
    let mut copied = 0;
    for size in ICON_SIZES {
        let file_name = icon_file_name(size, icon);
        let source = source_dir.join(size).join(&file_name);
        if !source.exists() {
            continue;
        }
        if copy_icon(&source, &directory.join(size).join(&file_name)) {
            copied += 1;
        }
    }
    copied
}

/// Delete every size of `icon` from an icon tree
///
/// Returns the number of files removed. Deletion failures are logged.
pub fn remove_icons(directory: &Path, icon: &str) -> usize {
    if !is_plain_icon_name(icon) {
        warn!("refusing icon name {:?}", icon);
        return 0;
    }
    let mut removed = 0;
    for size in ICON_SIZES {
        let path = directory.join(size).join(icon_file_name(size, icon));
        if !path.exists() {
            continue;
        }
        debug!("removing file {}", path.display());
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("cannot delete {}: {}", path.display(), e),
        }
    }
    removed
}

fn copy_icon(source: &Path, dest: &Path) -> bool {
    debug!("copying file {} to {}", source.display(), dest.display());
    if let Some(parent) = dest.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("cannot create {}: {}", parent.display(), e);
            return false;
        }
    }
    match fs::copy(source, dest) {
        Ok(_) => true,
        Err(e) => {
            warn!("cannot copy {}: {}", dest.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_theme_icon(root: &Path, size: &str, icon: &str) {
        let path = theme_icon_path(root, size, icon);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, size.as_bytes()).unwrap();
    }

    #[test]
    fn test_icon_file_name() {
        assert_eq!(icon_file_name("48x48", "gedit"), "gedit.png");
        assert_eq!(icon_file_name("scalable", "gedit"), "gedit.svg");
    }

    #[test]
    fn test_ensure_icon_dirs() {
        let temp = TempDir::new().unwrap();
        let icons = temp.path().join("icons");

        ensure_icon_dirs(&icons).unwrap();
        for size in ICON_SIZES {
            assert!(icons.join(size).is_dir());
        }

        // Idempotent
        ensure_icon_dirs(&icons).unwrap();
    }

    #[test]
    fn test_copy_and_remove_theme_icons() {
        let root = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_theme_icon(root.path(), "48x48", "gedit");
        write_theme_icon(root.path(), "scalable", "gedit");

        ensure_icon_dirs(out.path()).unwrap();
        assert_eq!(copy_theme_icons(root.path(), out.path(), "gedit"), 2);
        assert!(out.path().join("48x48/gedit.png").exists());
        assert!(out.path().join("scalable/gedit.svg").exists());
        assert!(!out.path().join("22x22/gedit.png").exists());

        assert_eq!(remove_icons(out.path(), "gedit"), 2);
        assert!(!out.path().join("48x48/gedit.png").exists());
        assert_eq!(remove_icons(out.path(), "gedit"), 0);
    }

    #[test]
    fn test_plain_icon_names() {
        assert!(is_plain_icon_name("accessories-text-editor"));
        assert!(is_plain_icon_name("org.gnome.gedit"));
        assert!(!is_plain_icon_name(""));
        assert!(!is_plain_icon_name(".."));
        assert!(!is_plain_icon_name("../../../etc/cron.d/job"));
        assert!(!is_plain_icon_name("apps/gedit"));
    }

    #[test]
    fn test_icon_names_with_separators_stay_in_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        let icons = temp.path().join("out/icons");
        ensure_icon_dirs(&icons).unwrap();

        // Files the traversal names would reach from the size directories
        fs::create_dir_all(root.join(HICOLOR_DIR).join("48x48/apps")).unwrap();
        fs::write(root.join("usr/share/icons/escaped.png"), b"png").unwrap();
        let victim = icons.join("48x48/../../victim.png");
        fs::write(&victim, b"keep").unwrap();

        assert_eq!(copy_theme_icons(&root, &icons, "../../../escaped"), 0);
        assert!(!temp.path().join("escaped.png").exists());
        assert_eq!(remove_icons(&icons, "../../victim"), 0);
        assert!(victim.exists());
        assert_eq!(copy_tree_icons(&icons, &root, "../victim"), 0);
    }

    #[test]
    fn test_copy_tree_icons_creates_size_dirs() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("32x32")).unwrap();
        fs::write(source.path().join("32x32/totem.png"), b"png").unwrap();

        assert_eq!(copy_tree_icons(source.path(), dest.path(), "totem"), 1);
        assert_eq!(
            fs::read(dest.path().join("32x32/totem.png")).unwrap(),
            b"png"
        );
    }
}
