// src/repository/pisi.rs

//! Pisi repositories
//!
//! Packages come from `pisi-index.xml`. The index carries no file lists, so
//! desktop files are taken from the installed-package database: only
//! packages installed on the build host can contribute applications.

use super::client::{RepositoryClient, join_location, local_path};
use super::source::{PackageSource, SourcePackage, is_desktop_file};
use crate::error::{Error, Result};
use crate::packages::pisi::INSTALL_DIR;
use crate::process;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Installed-package database of pisi
pub const DEFAULT_INSTALLED_DIR: &str = "/var/lib/pisi/package";

/// Directory pisi keeps repository indexes in
pub const DEFAULT_INDEX_DIR: &str = "/var/lib/pisi/index";

/// One package of `pisi-index.xml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexPackage {
    pub name: String,
    pub licenses: Vec<String>,
    pub package_uri: String,
    pub package_size: u64,
    /// Version of the newest history entry
    pub version: Option<String>,
    /// Release of the newest history entry
    pub release: Option<String>,
}

/// Parse the packages of a pisi index
pub fn parse_index(xml: &str) -> Result<Vec<IndexPackage>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut packages = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<IndexPackage> = None;
    let mut in_first_update = false;
    let mut seen_update = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                // Packages sit directly below the document element
                if name == b"Package" && stack.len() == 1 {
                    current = Some(IndexPackage::default());
                    seen_update = false;
                } else if name == b"Update" && current.is_some() && !seen_update {
                    seen_update = true;
                    in_first_update = true;
                    if let Some(pkg) = current.as_mut() {
                        pkg.release = e
                            .try_get_attribute("release")?
                            .map(|a| a.unescape_value().map(|v| v.to_string()))
                            .transpose()?;
                    }
                }
                stack.push(name);
            }
            Event::Text(t) => {
                let Some(pkg) = current.as_mut() else {
                    continue;
                };
                let text = t.unescape()?.to_string();
                // Element path below <Package>
                let path: Vec<&[u8]> = stack.iter().skip(2).map(Vec::as_slice).collect();
                match path.as_slice() {
                    [b"Name"] => pkg.name = text,
                    [b"License"] => pkg.licenses.push(text),
                    [b"PackageURI"] => pkg.package_uri = text,
                    [b"PackageSize"] => {
                        pkg.package_size = text.parse().map_err(|_| {
                            Error::ParseError(format!("invalid PackageSize '{text}'"))
                        })?;
                    }
                    [b"History", b"Update", b"Version"] if in_first_update => {
                        pkg.version = Some(text)
                    }
                    _ => {}
                }
            }
            Event::End(e) => {
                stack.pop();
                match e.local_name().as_ref() {
                    b"Update" => in_first_update = false,
                    b"Package" if stack.len() == 1 => {
                        if let Some(pkg) = current.take() {
                            packages.push(pkg);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(packages)
}

/// Parse the `<Path>` entries of an installed package's `files.xml`
pub fn parse_files_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut paths = Vec::new();
    let mut in_path = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => in_path = e.local_name().as_ref() == b"Path",
            Event::Text(t) if in_path => paths.push(t.unescape()?.to_string()),
            Event::End(_) => in_path = false,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paths)
}

/// A pisi repository
pub struct PisiSource {
    repo: String,
    index: String,
    /// Where package files live; `None` defers downloads to `pisi fetch`
    package_base: Option<String>,
    installed_dir: PathBuf,
    client: RepositoryClient,
}

impl PisiSource {
    /// Use repository `repo`
    ///
    /// With an explicit index location, packages are downloaded from the
    /// directory holding the index. Without one, the index pisi keeps for the
    /// repository is read and packages are fetched with `pisi fetch`.
    pub fn new(repo: &str, index: Option<&str>) -> Result<Self> {
        let (index, package_base) = match index {
            Some(index) => {
                let base = index
                    .rsplit_once('/')
                    .map(|(base, _)| base.to_string())
                    .unwrap_or_else(|| ".".to_string());
                (index.to_string(), Some(base))
            }
            None => {
                let index = Path::new(DEFAULT_INDEX_DIR)
                    .join(repo)
                    .join("pisi-index.xml");
                (index.to_string_lossy().to_string(), None)
            }
        };

        Ok(Self {
            repo: repo.to_string(),
            index,
            package_base,
            installed_dir: PathBuf::from(DEFAULT_INSTALLED_DIR),
            client: RepositoryClient::new()?,
        })
    }

    /// Read installed file lists from `dir` instead of the system database
    pub fn with_installed_dir(mut self, dir: &Path) -> Self {
        self.installed_dir = dir.to_path_buf();
        self
    }

    /// Files of an installed package, or `None` when it is not installed
    fn installed_files(&self, pkg: &IndexPackage) -> Result<Option<Vec<String>>> {
        let Some(dir) = self.installed_package_dir(pkg) else {
            return Ok(None);
        };
        let files_xml = dir.join("files.xml");
        let text = fs::read_to_string(&files_xml)
            .map_err(|e| Error::IoError(format!("cannot read {}: {e}", files_xml.display())))?;
        Ok(Some(parse_files_xml(&text)?))
    }

    fn installed_package_dir(&self, pkg: &IndexPackage) -> Option<PathBuf> {
        if let (Some(version), Some(release)) = (&pkg.version, &pkg.release) {
            let exact = self
                .installed_dir
                .join(format!("{}-{}-{}", pkg.name, version, release));
            if exact.is_dir() {
                return Some(exact);
            }
        }

        // Another version may be installed; its directory is <name>-<digit>...
        let prefix = format!("{}-", pkg.name);
        fs::read_dir(&self.installed_dir)
            .ok()?
            .flatten()
            .map(|entry| entry.path())
            .find(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.strip_prefix(&prefix))
                    .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
                    && path.join("files.xml").is_file()
            })
    }
}

impl PackageSource for PisiSource {
    fn name(&self) -> &str {
        &self.repo
    }

    fn packages(&self) -> Result<Vec<SourcePackage>> {
        info!("Reading package index {}", self.index);
        let index = parse_index(&self.client.fetch_string(&self.index)?)?;

        let mut packages = Vec::new();
        for pkg in index {
            let files = match self.installed_files(&pkg) {
                Ok(Some(files)) => files,
                Ok(None) => {
                    debug!("package {} is not installed, passing", pkg.name);
                    continue;
                }
                Err(e) => {
                    warn!("cannot get file list of {}: {}", pkg.name, e);
                    continue;
                }
            };

            let desktop_files: Vec<String> =
                files.into_iter().filter(|f| is_desktop_file(f)).collect();
            if desktop_files.is_empty() {
                continue;
            }

            let location = match &self.package_base {
                Some(base) => join_location(base, &pkg.package_uri),
                None => pkg.package_uri.clone(),
            };
            let license = if pkg.licenses.is_empty() {
                None
            } else {
                Some(pkg.licenses.join(" and "))
            };

            let filename = pkg
                .package_uri
                .rsplit('/')
                .next()
                .unwrap_or(&pkg.package_uri)
                .to_string();

            packages.push(SourcePackage {
                name: pkg.name,
                license,
                filename,
                size: pkg.package_size,
                desktop_files,
                location,
            });
        }

        debug!("{} packages ship desktop files", packages.len());
        Ok(packages)
    }

    fn fetch(&self, pkg: &SourcePackage, dest: &Path) -> Result<()> {
        if self.package_base.is_some() {
            self.client.download_file(&pkg.location, dest, &pkg.name)?;
            return Ok(());
        }

        let output_dir = dest
            .parent()
            .ok_or_else(|| Error::InitError(format!("no directory for {}", dest.display())))?;
        let mut command = Command::new("pisi");
        command
            .arg("fetch")
            .arg(&pkg.name)
            .arg("--output-dir")
            .arg(output_dir);
        process::run_tool(command, process::DEFAULT_TIMEOUT)?;

        if !dest.is_file() {
            return Err(Error::DownloadError(format!(
                "pisi fetch did not produce {}",
                dest.display()
            )));
        }
        Ok(())
    }

    fn content_root(&self, root: &Path) -> PathBuf {
        root.join(INSTALL_DIR)
    }

    fn desktop_file_arg(&self, path: &str) -> String {
        format!("/{}", path.trim_start_matches('/'))
    }
}

/// Whether a location names a local index file that does not exist
pub fn missing_local_index(location: &str) -> bool {
    local_path(location).is_some_and(|path| !path.exists())
}
