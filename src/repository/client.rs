// src/repository/client.rs

//! Client for repository metadata and package downloads
//!
//! Locations are either HTTP(S) URLs, fetched with reqwest, or local
//! paths (plain or `file://`), read straight from disk. Local locations make
//! it possible to build from a mirror on the same machine.

use crate::compression::decompress_auto;
use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for HTTP requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Local file system path of a location, if it is not a remote URL
pub fn local_path(location: &str) -> Option<PathBuf> {
    if let Some(path) = location.strip_prefix("file://") {
        return Some(PathBuf::from(path));
    }
    if location.contains("://") {
        None
    } else {
        Some(PathBuf::from(location))
    }
}

/// Join a relative location onto a base URL or directory
pub fn join_location(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Stream an HTTP response to a file, updating the progress bar
fn stream_response_to_file(
    mut response: reqwest::blocking::Response,
    file: &mut File,
    progress_bar: &ProgressBar,
) -> Result<u64> {
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;
        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;
        downloaded += bytes_read as u64;
        progress_bar.set_position(downloaded);
    }

    Ok(downloaded)
}

fn download_bar(total_size: u64, display_name: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_size);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(display_name.to_string());
    pb
}

/// HTTP client wrapper that also understands local locations
pub struct RepositoryClient {
    client: Client,
}

impl RepositoryClient {
    /// Create a new repository client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("app-install/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }
        Ok(response)
    }

    /// Fetch a location into memory
    pub fn fetch_bytes(&self, location: &str) -> Result<Vec<u8>> {
        if let Some(path) = local_path(location) {
            debug!("Reading {}", path.display());
            return fs::read(&path)
                .map_err(|e| Error::DownloadError(format!("Failed to read {}: {e}", path.display())));
        }

        debug!("Fetching {}", location);
        let bytes = self
            .get(location)?
            .bytes()
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Fetch a location and decompress it if it is gzip, xz or zstd data
    pub fn fetch_and_decompress(&self, location: &str) -> Result<Vec<u8>> {
        let bytes = self.fetch_bytes(location)?;
        let decompressed = decompress_auto(&bytes).map_err(|e| {
            Error::ParseError(format!("Failed to decompress data from {location}: {e}"))
        })?;
        debug!(
            "Decompressed {} bytes -> {} bytes",
            bytes.len(),
            decompressed.len()
        );
        Ok(decompressed)
    }

    /// Fetch and decompress a location as a UTF-8 string
    pub fn fetch_string(&self, location: &str) -> Result<String> {
        let bytes = self.fetch_and_decompress(location)?;
        String::from_utf8(bytes).map_err(|e| {
            Error::ParseError(format!("Invalid UTF-8 in data from {location}: {e}"))
        })
    }

    /// Download a location to `dest_path`
    ///
    /// Data is written to a temporary file next to the destination and
    /// renamed into place once complete. Returns the number of bytes written.
    pub fn download_file(&self, location: &str, dest_path: &Path, display_name: &str) -> Result<u64> {
        info!("Downloading {} to {}", location, dest_path.display());

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!("Failed to create directory {}: {e}", parent.display()))
            })?;
        }

        let temp_path = dest_path.with_extension("part");

        let written = match local_path(location) {
            Some(path) => fs::copy(&path, &temp_path).map_err(|e| {
                Error::DownloadError(format!("Failed to copy {}: {e}", path.display()))
            })?,
            None => {
                let response = self.get(location)?;
                let total_size = response.content_length().unwrap_or(0);
                let mut file = File::create(&temp_path).map_err(|e| {
                    Error::IoError(format!("Failed to create file {}: {e}", temp_path.display()))
                })?;

                let pb = download_bar(total_size, display_name);
                let result = stream_response_to_file(response, &mut file, &pb);
                match &result {
                    Ok(_) => pb.finish_with_message(format!("{display_name} [done]")),
                    Err(_) => pb.abandon_with_message(format!("{display_name} [failed]")),
                }
                match result {
                    Ok(written) => written,
                    Err(e) => {
                        let _ = fs::remove_file(&temp_path);
                        return Err(e);
                    }
                }
            }
        };

        fs::rename(&temp_path, dest_path).map_err(|e| {
            Error::IoError(format!(
                "Failed to move {} to {}: {e}",
                temp_path.display(),
                dest_path.display()
            ))
        })?;

        debug!("Downloaded {} bytes", written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_path() {
        assert_eq!(
            local_path("file:///srv/mirror/fedora"),
            Some(PathBuf::from("/srv/mirror/fedora"))
        );
        assert_eq!(local_path("/srv/mirror"), Some(PathBuf::from("/srv/mirror")));
        assert_eq!(local_path("https://example.com/fedora"), None);
    }

    #[test]
    fn test_join_location() {
        assert_eq!(
            join_location("http://example.com/os/", "/repodata/repomd.xml"),
            "http://example.com/os/repodata/repomd.xml"
        );
        assert_eq!(join_location("/srv/os", "Packages/a.rpm"), "/srv/os/Packages/a.rpm");
    }

    #[test]
    fn test_local_download_and_fetch() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("gedit.rpm");
        fs::write(&source, b"package bytes").unwrap();

        let client = RepositoryClient::new().unwrap();
        let dest = temp.path().join("cache/gedit.rpm");
        let location = format!("file://{}", source.display());

        assert_eq!(client.download_file(&location, &dest, "gedit").unwrap(), 13);
        assert_eq!(fs::read(&dest).unwrap(), b"package bytes");
        assert!(!dest.with_extension("part").exists());

        assert_eq!(client.fetch_string(&location).unwrap(), "package bytes");
    }

    #[test]
    fn test_local_fetch_missing() {
        let client = RepositoryClient::new().unwrap();
        assert!(matches!(
            client.fetch_bytes("/nonexistent/repomd.xml"),
            Err(Error::DownloadError(_))
        ));
    }
}
