// src/desktop/mod.rs

//! Desktop entry files
//!
//! Desktop files use the freedesktop key-file syntax: `[Group]` headers
//! followed by `Key=Value` or `Key[locale]=Value` lines. Only the
//! `[Desktop Entry]` group describes the application; other groups (actions
//! and the like) are parsed but ignored by the generator.

mod generate;

pub use generate::{GenerateRequest, generate, resolve_desktop_file};

use crate::error::{Error, Result};
use crate::icons;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Group holding the application description
pub const DESKTOP_ENTRY_GROUP: &str = "Desktop Entry";

/// One `Key[locale]=Value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub key: String,
    pub locale: Option<String>,
    pub value: String,
}

/// A parsed key file, groups in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFile {
    groups: Vec<(String, Vec<KeyEntry>)>,
}

impl KeyFile {
    /// Parse key-file text
    ///
    /// Blank lines and `#` comments are skipped. The value is everything after
    /// the first `=`, so values may themselves contain `=` or brackets.
    /// Lines that are neither headers nor assignments are skipped.
    pub fn parse(text: &str) -> Self {
        let mut groups: Vec<(String, Vec<KeyEntry>)> = Vec::new();

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                groups.push((name.to_string(), Vec::new()));
                continue;
            }

            let Some((lhs, value)) = line.split_once('=') else {
                debug!("line {}: not an assignment, skipping", lineno + 1);
                continue;
            };
            let Some((_, entries)) = groups.last_mut() else {
                debug!("line {}: assignment outside any group, skipping", lineno + 1);
                continue;
            };

            let lhs = lhs.trim_end();
            let (key, locale) = match lhs.split_once('[') {
                Some((key, rest)) => match rest.strip_suffix(']') {
                    Some(locale) if !locale.is_empty() => (key, Some(locale.to_string())),
                    _ => {
                        debug!("line {}: malformed locale in '{}'", lineno + 1, lhs);
                        continue;
                    }
                },
                None => (lhs, None),
            };

            entries.push(KeyEntry {
                key: key.to_string(),
                locale,
                value: unescape(value.trim_start()),
            });
        }

        Self { groups }
    }

    /// Names of all groups, in file order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Entries of the first group called `name`
    pub fn group(&self, name: &str) -> Option<&[KeyEntry]> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, entries)| entries.as_slice())
    }
}

/// Expand the `\s`, `\n`, `\t`, `\r` and `\\` escapes of key-file strings
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// The `[Desktop Entry]` group of a desktop file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    entries: Vec<KeyEntry>,
}

impl DesktopEntry {
    /// Parse desktop file text
    pub fn parse(text: &str) -> Result<Self> {
        let keyfile = KeyFile::parse(text);
        let entries = keyfile.group(DESKTOP_ENTRY_GROUP).ok_or_else(|| {
            Error::ParseError(format!("no [{DESKTOP_ENTRY_GROUP}] group"))
        })?;
        Ok(Self {
            entries: entries.to_vec(),
        })
    }

    /// Read and parse a desktop file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::IoError(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text)
            .map_err(|e| Error::ParseError(format!("{}: {e}", path.display())))
    }

    /// Value of `key` for exactly `locale` (`None` is the untranslated value)
    pub fn value(&self, key: &str, locale: Option<&str>) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key && e.locale.as_deref() == locale)
            .map(|e| e.value.as_str())
    }

    /// Every locale used by any key, in first-seen order
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = Vec::new();
        for locale in self.entries.iter().filter_map(|e| e.locale.as_deref()) {
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        locales
    }

    pub fn name(&self) -> Option<&str> {
        self.value("Name", None)
    }

    pub fn comment(&self) -> Option<&str> {
        self.value("Comment", None)
    }

    pub fn categories(&self) -> Option<&str> {
        self.value("Categories", None)
    }

    /// Themed icon name
    ///
    /// Paths and names ending in `.png` cannot be looked up in an icon theme
    /// and yield `None`.
    pub fn icon(&self) -> Option<&str> {
        self.value("Icon", None)
            .filter(|icon| icons::is_plain_icon_name(icon) && !icon.ends_with(".png"))
    }
}

/// Application id of a desktop file: its basename up to the last `.`
pub fn application_id_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let id = match file_name.rfind('.') {
        Some(pos) => &file_name[..pos],
        None => file_name,
    };
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
