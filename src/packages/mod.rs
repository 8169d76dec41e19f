// src/packages/mod.rs

//! Package archive extraction
//!
//! The repository builder only needs the files of a package, never its
//! metadata or scripts. [`extract_package`] detects the archive format and
//! unpacks everything below a directory.

pub mod archive;
pub mod cpio;
pub mod pisi;
pub mod rpm;

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Package formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormatType {
    Rpm,
    Tarball,
    Pisi,
}

/// Counts of what an extraction wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files: usize,
    pub directories: usize,
    pub symlinks: usize,
}

/// Detect package format from file extension and magic bytes
pub fn detect_format(path: &Path) -> Result<PackageFormatType> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    // First try file extension
    if name.ends_with(".rpm") {
        return Ok(PackageFormatType::Rpm);
    } else if name.ends_with(".pisi") {
        return Ok(PackageFormatType::Pisi);
    } else if [".tar", ".tar.gz", ".tgz", ".tar.xz", ".txz", ".tar.zst"]
        .iter()
        .any(|ext| name.ends_with(ext))
    {
        return Ok(PackageFormatType::Tarball);
    }

    // Fallback to magic bytes detection
    let mut file = File::open(path)?;
    let mut magic = [0u8; 512];
    let read = file.read(&mut magic)?;
    let magic = &magic[..read];

    if magic.starts_with(&[0xED, 0xAB, 0xEE, 0xDB]) {
        return Ok(PackageFormatType::Rpm);
    }
    // Pisi packages are zip files
    if magic.starts_with(b"PK\x03\x04") {
        return Ok(PackageFormatType::Pisi);
    }
    if magic.starts_with(&[0x1F, 0x8B])
        || magic.starts_with(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00])
        || magic.starts_with(&[0x28, 0xB5, 0x2F, 0xFD])
        || (magic.len() >= 262 && &magic[257..262] == b"ustar")
    {
        return Ok(PackageFormatType::Tarball);
    }

    Err(Error::UnsupportedFormat(format!(
        "unable to detect package format for {}",
        path.display()
    )))
}

/// Join an archive member name onto `dest`, refusing names that escape it
pub fn safe_join(dest: &Path, name: &str) -> Result<PathBuf> {
    let mut path = dest.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => return Err(Error::PathTraversal(name.to_string())),
        }
    }
    Ok(path)
}

/// Fail unless the directory that will hold `target` resolves inside `root`
///
/// `root` must be canonical. Directories that do not exist yet are judged by
/// their closest existing ancestor, so a symlink unpacked earlier cannot
/// redirect later members outside the tree.
pub fn ensure_inside(root: &Path, target: &Path) -> Result<()> {
    if target == root {
        return Ok(());
    }
    let mut ancestor = target.parent();
    while let Some(dir) = ancestor {
        if dir.symlink_metadata().is_ok() {
            return match dir.canonicalize() {
                Ok(resolved) if resolved.starts_with(root) => Ok(()),
                _ => Err(Error::PathTraversal(target.display().to_string())),
            };
        }
        ancestor = dir.parent();
    }
    Err(Error::PathTraversal(target.display().to_string()))
}

/// Unpack a package archive into `dest`, creating it if needed
pub fn extract_package(path: &Path, dest: &Path) -> Result<PackageFormatType> {
    if !path.is_file() {
        return Err(Error::NotFoundError(format!("package {}", path.display())));
    }
    std::fs::create_dir_all(dest)?;

    let format = detect_format(path)?;
    debug!("Detected package format: {:?}", format);

    let stats = match format {
        PackageFormatType::Rpm => Some(rpm::extract_rpm(path, dest)?),
        PackageFormatType::Tarball => Some(archive::extract_tarball(path, dest)?),
        PackageFormatType::Pisi => {
            pisi::extract_pisi(path, dest)?;
            None
        }
    };

    match stats {
        Some(stats) => info!(
            "Extracted {} into {} ({} files, {} directories, {} symlinks)",
            path.display(),
            dest.display(),
            stats.files,
            stats.directories,
            stats.symlinks
        ),
        None => info!("Extracted {} into {}", path.display(), dest.display()),
    }
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            detect_format(Path::new("gedit-2.26.0-1.fc11.x86_64.rpm")).unwrap(),
            PackageFormatType::Rpm
        );
        assert_eq!(
            detect_format(Path::new("gedit-2.26.0-1-1.pisi")).unwrap(),
            PackageFormatType::Pisi
        );
        assert_eq!(
            detect_format(Path::new("gedit.tar.xz")).unwrap(),
            PackageFormatType::Tarball
        );
    }

    #[test]
    fn test_detect_by_magic() {
        let temp = TempDir::new().unwrap();

        let rpm = temp.path().join("package-a");
        std::fs::write(&rpm, [0xED, 0xAB, 0xEE, 0xDB, 3, 0]).unwrap();
        assert_eq!(detect_format(&rpm).unwrap(), PackageFormatType::Rpm);

        let zip = temp.path().join("package-b");
        std::fs::write(&zip, b"PK\x03\x04rest").unwrap();
        assert_eq!(detect_format(&zip).unwrap(), PackageFormatType::Pisi);

        let junk = temp.path().join("package-c");
        std::fs::write(&junk, b"hello").unwrap();
        assert!(matches!(
            detect_format(&junk),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_safe_join() {
        let dest = Path::new("/tmp/root");
        assert_eq!(
            safe_join(dest, "./usr/share/applications/gedit.desktop").unwrap(),
            PathBuf::from("/tmp/root/usr/share/applications/gedit.desktop")
        );
        assert_eq!(
            safe_join(dest, "/etc/gedit.conf").unwrap(),
            PathBuf::from("/tmp/root/etc/gedit.conf")
        );
        assert_eq!(safe_join(dest, ".").unwrap(), PathBuf::from("/tmp/root"));
        assert!(matches!(
            safe_join(dest, "./usr/../../etc/passwd"),
            Err(Error::PathTraversal(_))
        ));
    }

    #[test]
    fn test_ensure_inside_follows_symlinks() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        let outside = temp.path().join("outside");
        std::fs::create_dir_all(root.join("usr/lib")).unwrap();
        std::fs::create_dir_all(&outside).unwrap();
        let root = root.canonicalize().unwrap();

        std::os::unix::fs::symlink("usr/lib", root.join("lib")).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("escape")).unwrap();

        assert!(ensure_inside(&root, &root).is_ok());
        assert!(ensure_inside(&root, &root.join("usr/share/new/file")).is_ok());
        assert!(ensure_inside(&root, &root.join("lib/libfoo.so")).is_ok());
        assert!(matches!(
            ensure_inside(&root, &root.join("escape/file")),
            Err(Error::PathTraversal(_))
        ));
        assert!(matches!(
            ensure_inside(&root, &root.join("escape/deeper/file")),
            Err(Error::PathTraversal(_))
        ));
    }

    #[test]
    fn test_extract_missing_package() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            extract_package(&temp.path().join("nope.rpm"), temp.path()),
            Err(Error::NotFoundError(_))
        ));
    }
}
