// src/repository/yum.rs

//! Yum (RPM) repositories

use super::client::{RepositoryClient, join_location};
use super::repo_config::{self, basearch, substitute_vars};
use super::repodata::{self, REPOMD_PATH};
use super::source::{APPLICATIONS_DIR, PackageSource, SourcePackage};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// A yum repository read from its `repodata/` metadata
pub struct YumSource {
    repo: String,
    baseurl: String,
    client: RepositoryClient,
}

impl YumSource {
    /// Use repository `repo` at `baseurl`
    pub fn new(repo: &str, baseurl: &str) -> Result<Self> {
        Ok(Self {
            repo: repo.to_string(),
            baseurl: baseurl.to_string(),
            client: RepositoryClient::new()?,
        })
    }

    /// Look up the base URL of `repo` in the `.repo` files of `repos_dir`
    pub fn from_config(repo: &str, repos_dir: &Path, releasever: Option<&str>) -> Result<Self> {
        let config = repo_config::find_repo(repos_dir, repo)?;
        let baseurl = config.baseurl.ok_or_else(|| {
            Error::InitError(format!(
                "repository {repo} has no baseurl (mirror lists are not supported), use --baseurl"
            ))
        })?;

        let releasever = releasever
            .map(String::from)
            .or_else(repo_config::default_releasever);
        let baseurl = substitute_vars(&baseurl, releasever.as_deref(), basearch());
        if baseurl.contains('$') {
            return Err(Error::InitError(format!(
                "unresolved variable in baseurl {baseurl}, use --releasever or --baseurl"
            )));
        }

        Self::new(repo, &baseurl)
    }

    /// Base URL of the repository
    pub fn baseurl(&self) -> &str {
        &self.baseurl
    }

    fn metadata_location(&self, repomd: &str, data_type: &str) -> Result<String> {
        let href = repodata::parse_repomd(repomd, data_type)?;
        Ok(join_location(&self.baseurl, &href))
    }
}

impl PackageSource for YumSource {
    fn name(&self) -> &str {
        &self.repo
    }

    fn packages(&self) -> Result<Vec<SourcePackage>> {
        let repomd = self
            .client
            .fetch_string(&join_location(&self.baseurl, REPOMD_PATH))?;

        let primary_url = self.metadata_location(&repomd, "primary")?;
        let filelists_url = self.metadata_location(&repomd, "filelists")?;

        info!("Fetching package list from {}", primary_url);
        let primary = repodata::parse_primary(&self.client.fetch_string(&primary_url)?)?;
        info!("Fetching file lists from {}", filelists_url);
        let mut desktop_files =
            repodata::parse_filelists_desktop(&self.client.fetch_string(&filelists_url)?)?;

        let mut packages: Vec<SourcePackage> = primary
            .into_iter()
            .filter(|pkg| pkg.arch != "src")
            .filter_map(|pkg| {
                let mut files = desktop_files.remove(&pkg.pkgid)?;
                files.sort();
                let filename = pkg
                    .location
                    .rsplit('/')
                    .next()
                    .unwrap_or(&pkg.location)
                    .to_string();
                Some(SourcePackage {
                    name: pkg.name,
                    license: pkg.license,
                    filename,
                    size: pkg.size,
                    desktop_files: files,
                    location: join_location(&self.baseurl, &pkg.location),
                })
            })
            .collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name).then(a.filename.cmp(&b.filename)));

        debug!("{} packages ship desktop files", packages.len());
        Ok(packages)
    }

    fn fetch(&self, pkg: &SourcePackage, dest: &Path) -> Result<()> {
        self.client.download_file(&pkg.location, dest, &pkg.name)?;
        Ok(())
    }

    fn desktop_file_arg(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        path.strip_prefix(APPLICATIONS_DIR).unwrap_or(path).to_string()
    }

    fn parenthesize_licenses(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_desktop_file_arg() {
        let source = YumSource::new("fedora", "/srv/fedora").unwrap();
        assert_eq!(
            source.desktop_file_arg("/usr/share/applications/gedit.desktop"),
            "gedit.desktop"
        );
        assert_eq!(
            source.desktop_file_arg("/usr/share/applications/kde4/dolphin.desktop"),
            "kde4/dolphin.desktop"
        );
    }

    #[test]
    fn test_from_config_without_baseurl() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("fedora.repo"),
            "[fedora]\nmetalink=https://example.org/metalink\n",
        )
        .unwrap();
        assert!(matches!(
            YumSource::from_config("fedora", dir.path(), Some("11")),
            Err(Error::InitError(_))
        ));
    }

    #[test]
    fn test_from_config_substitutes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("fedora.repo"),
            "[fedora]\nbaseurl=http://example.org/$releasever/os/\n",
        )
        .unwrap();
        let source = YumSource::from_config("fedora", dir.path(), Some("11")).unwrap();
        assert_eq!(source.baseurl(), "http://example.org/11/os/");
    }
}
