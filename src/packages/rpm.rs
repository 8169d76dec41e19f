// src/packages/rpm.rs

//! RPM payload extraction

use super::cpio::CpioReader;
use super::{ExtractStats, ensure_inside, safe_join};
use crate::compression::{self, CompressionFormat};
use crate::error::{Error, Result};
use rpm::Package;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Unpack the payload of an RPM below `dest`
pub fn extract_rpm(path: &Path, dest: &Path) -> Result<ExtractStats> {
    debug!("Extracting RPM payload: {}", path.display());

    let file = File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open RPM file: {e}")))?;
    let mut buf_reader = BufReader::new(file);
    let pkg = Package::parse(&mut buf_reader)
        .map_err(|e| Error::ParseError(format!("Failed to parse RPM: {e}")))?;

    if let Ok(name) = pkg.metadata.get_name() {
        debug!("RPM package name: {}", name);
    }

    let payload = &pkg.content;
    if payload.is_empty() {
        debug!("RPM has empty payload");
        return Ok(ExtractStats::default());
    }

    let format = CompressionFormat::from_magic_bytes(payload);
    debug!("Detected payload compression: {}", format);
    let decoder = compression::create_decoder(payload.as_slice(), format)?;

    fs::create_dir_all(dest)?;
    let root = dest.canonicalize()?;

    let mut cpio = CpioReader::new(decoder);
    let mut stats = ExtractStats::default();
    // Hard-linked members waiting for the member that carries their data
    let mut pending_links: HashMap<u32, Vec<PathBuf>> = HashMap::new();

    while let Some((entry, content)) = cpio
        .next_entry()
        .map_err(|e| Error::ParseError(format!("CPIO error: {e}")))?
    {
        let target = safe_join(&root, &entry.name)?;

        if entry.is_dir() {
            ensure_inside(&root, &target)?;
            fs::create_dir_all(&target)?;
            stats.directories += 1;
        } else if entry.is_symlink() {
            let link = String::from_utf8_lossy(&content).to_string();
            prepare_target(&root, &target)?;
            std::os::unix::fs::symlink(&link, &target)?;
            stats.symlinks += 1;
        } else if entry.is_deferred_link() {
            pending_links.entry(entry.ino).or_default().push(target);
        } else if entry.is_file() {
            write_file(&root, &target, &content, entry.permissions())?;
            stats.files += 1;
            for alias in pending_links.remove(&entry.ino).unwrap_or_default() {
                write_file(&root, &alias, &content, entry.permissions())?;
                stats.files += 1;
            }
        } else {
            debug!("skipping special file {}", entry.name);
        }
    }

    for aliases in pending_links.into_values() {
        for alias in aliases {
            warn!("hard link {} has no data, leaving it empty", alias.display());
            write_file(&root, &alias, &[], 0o644)?;
            stats.files += 1;
        }
    }

    debug!(
        "Extracted {} files, {} directories, {} symlinks from RPM",
        stats.files, stats.directories, stats.symlinks
    );
    Ok(stats)
}

/// Make room for a new member at `target`
///
/// The parent must resolve inside `root`. An existing entry is removed so
/// writes never follow a symlink left by an earlier member.
fn prepare_target(root: &Path, target: &Path) -> Result<()> {
    ensure_inside(root, target)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    ensure_inside(root, target)?;
    if target.symlink_metadata().is_ok() {
        fs::remove_file(target)?;
    }
    Ok(())
}

fn write_file(root: &Path, path: &Path, content: &[u8], mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    prepare_target(root, path)?;
    fs::write(path, content)?;
    // Keep files readable and writable by the builder so cleanup never fails
    fs::set_permissions(path, fs::Permissions::from_mode(mode | 0o600))?;
    Ok(())
}
