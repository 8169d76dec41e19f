// src/repository/repo_config.rs

//! Yum `.repo` configuration files
//!
//! Each `[id]` section describes one repository. Only `baseurl` is used to
//! locate metadata; mirror lists and metalinks are not resolved.

use crate::desktop::KeyFile;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Directory holding the system's yum repository definitions
pub const DEFAULT_REPOS_DIR: &str = "/etc/yum.repos.d";

/// One repository section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub id: String,
    pub name: Option<String>,
    pub baseurl: Option<String>,
    pub mirrorlist: Option<String>,
    pub enabled: bool,
}

/// Parse the sections of one `.repo` file
pub fn parse_repo_file(text: &str) -> Vec<RepoConfig> {
    let keyfile = KeyFile::parse(text);
    keyfile
        .group_names()
        .filter_map(|id| {
            let entries = keyfile.group(id)?;
            let value = |key: &str| {
                entries
                    .iter()
                    .find(|e| e.key.trim() == key && e.locale.is_none())
                    .map(|e| e.value.trim().to_string())
            };
            Some(RepoConfig {
                id: id.to_string(),
                name: value("name"),
                // Several URLs may be listed; the first one is used
                baseurl: value("baseurl")
                    .and_then(|urls| urls.split_whitespace().next().map(String::from)),
                mirrorlist: value("mirrorlist").or_else(|| value("metalink")),
                enabled: value("enabled").is_none_or(|v| v != "0"),
            })
        })
        .collect()
}

/// Find repository `id` among the `.repo` files of `dir`
pub fn find_repo(dir: &Path, id: &str) -> Result<RepoConfig> {
    let pattern = dir.join("*.repo");
    let pattern = pattern.to_string_lossy();
    let paths = glob::glob(&pattern)
        .map_err(|e| Error::InitError(format!("invalid pattern {pattern}: {e}")))?;

    for path in paths.flatten() {
        debug!("reading {}", path.display());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!("cannot read {}: {}", path.display(), e);
                continue;
            }
        };
        if let Some(repo) = parse_repo_file(&text).into_iter().find(|r| r.id == id) {
            if !repo.enabled {
                warn!("repository {} is disabled in {}", id, path.display());
            }
            return Ok(repo);
        }
    }

    Err(Error::NotFoundError(format!(
        "repository {} in {}",
        id,
        dir.display()
    )))
}

/// Yum's name for the machine architecture
pub fn basearch() -> &'static str {
    match std::env::consts::ARCH {
        "x86" => "i386",
        "powerpc" => "ppc",
        "powerpc64" => "ppc64",
        other => other,
    }
}

/// Release version from `/etc/os-release`
pub fn default_releasever() -> Option<String> {
    let text = fs::read_to_string("/etc/os-release").ok()?;
    text.lines()
        .find_map(|line| line.strip_prefix("VERSION_ID="))
        .map(|v| v.trim_matches('"').to_string())
}

/// Expand `$releasever` and `$basearch` in a repository URL
pub fn substitute_vars(url: &str, releasever: Option<&str>, basearch: &str) -> String {
    let url = url.replace("$basearch", basearch);
    match releasever {
        Some(release) => url.replace("$releasever", release),
        None => url,
    }
}
