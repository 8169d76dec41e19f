// src/packages/archive.rs

//! Tarball extraction (plain, gzip, xz or zstd compressed)

use super::ExtractStats;
use crate::compression::{self, CompressionFormat};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tar::Archive;
use tracing::debug;

/// Detect the compression of a tarball from its magic bytes, then its name
fn detect_compression(path: &Path) -> Result<CompressionFormat> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 6];
    let read = file.read(&mut magic)?;
    let format = CompressionFormat::from_magic_bytes(&magic[..read]);
    if format != CompressionFormat::None {
        return Ok(format);
    }
    Ok(CompressionFormat::from_extension(&path.to_string_lossy()))
}

/// Open a tarball, wrapping it in the matching decoder
fn open_archive(path: &Path) -> Result<Archive<Box<dyn Read>>> {
    let format = detect_compression(path)?;
    debug!("Tarball {} compression: {}", path.display(), format);
    let file = BufReader::new(File::open(path)?);
    let reader = compression::create_decoder(file, format)?;
    Ok(Archive::new(reader))
}

/// Unpack a tarball below `dest`
///
/// Members whose path would land outside `dest` are refused.
pub fn extract_tarball(path: &Path, dest: &Path) -> Result<ExtractStats> {
    debug!("Extracting tarball: {}", path.display());
    let mut archive = open_archive(path)?;
    archive.set_preserve_permissions(false);
    let mut stats = ExtractStats::default();

    for entry in archive
        .entries()
        .map_err(|e| Error::ParseError(format!("Failed to read archive: {e}")))?
    {
        let mut entry =
            entry.map_err(|e| Error::ParseError(format!("Failed to read entry: {e}")))?;
        let entry_path = entry
            .path()
            .map_err(|e| Error::ParseError(format!("Failed to get entry path: {e}")))?
            .to_string_lossy()
            .to_string();
        let kind = entry.header().entry_type();

        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| Error::IoError(format!("Failed to unpack {entry_path}: {e}")))?;
        if !unpacked {
            return Err(Error::PathTraversal(entry_path));
        }

        if kind.is_dir() {
            stats.directories += 1;
        } else if kind.is_symlink() {
            stats.symlinks += 1;
        } else if kind.is_file() {
            stats.files += 1;
        }
    }

    debug!(
        "Extracted {} files, {} directories, {} symlinks from tarball",
        stats.files, stats.directories, stats.symlinks
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::TempDir;

    fn write_tarball(path: &Path, members: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_gzip_tarball() {
        let temp = TempDir::new().unwrap();
        let tarball = temp.path().join("gedit.tar.gz");
        write_tarball(
            &tarball,
            &[
                ("usr/share/applications/gedit.desktop", b"[Desktop Entry]\n"),
                ("usr/share/icons/hicolor/48x48/apps/gedit.png", b"png"),
            ],
        );

        let dest = temp.path().join("root");
        std::fs::create_dir(&dest).unwrap();
        let stats = extract_tarball(&tarball, &dest).unwrap();
        assert_eq!(stats.files, 2);
        assert!(dest.join("usr/share/applications/gedit.desktop").exists());
    }
}
