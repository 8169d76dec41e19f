// src/repository/repodata.rs

//! Parsers for yum repository metadata
//!
//! - `repodata/repomd.xml` names the other metadata files
//! - `primary.xml` describes every package (name, arch, size, license, location)
//! - `filelists.xml` lists the files of every package, keyed by package id

use super::source::is_desktop_file;
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Location of `repomd.xml` relative to the repository base URL
pub const REPOMD_PATH: &str = "repodata/repomd.xml";

/// One package entry of `primary.xml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryPackage {
    pub pkgid: String,
    pub name: String,
    pub arch: String,
    pub license: Option<String>,
    /// Location relative to the repository base URL
    pub location: String,
    /// Size of the package file in bytes
    pub size: u64,
}

fn attribute(e: &BytesStart, name: &str) -> Result<Option<String>> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.to_string())),
        None => Ok(None),
    }
}

/// Find the location of one metadata file (`primary`, `filelists`, ...) in `repomd.xml`
pub fn parse_repomd(xml: &str, data_type: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut in_wanted = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"data" => {
                    in_wanted = attribute(&e, "type")?.as_deref() == Some(data_type);
                }
                b"location" if in_wanted => {
                    return attribute(&e, "href")?.ok_or_else(|| {
                        Error::ParseError(format!("{data_type} location has no href"))
                    });
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"data" => in_wanted = false,
            Event::Eof => break,
            _ => {}
        }
    }

    Err(Error::NotFoundError(format!("{data_type} metadata in repomd.xml")))
}

/// Parse every package of `primary.xml`
pub fn parse_primary(xml: &str) -> Result<Vec<PrimaryPackage>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut packages = Vec::new();
    let mut current: Option<PrimaryPackage> = None;
    let mut element: Vec<u8> = Vec::new();
    let mut pkgid_checksum = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"package" {
                    current = Some(PrimaryPackage::default());
                } else if let Some(pkg) = current.as_mut() {
                    primary_attributes(&e, pkg)?;
                    pkgid_checksum = name == b"checksum"
                        && attribute(&e, "pkgid")?.as_deref() == Some("YES");
                }
                element = name;
            }
            Event::Empty(e) => {
                if let Some(pkg) = current.as_mut() {
                    primary_attributes(&e, pkg)?;
                }
            }
            Event::Text(t) => {
                if let Some(pkg) = current.as_mut() {
                    let text = t.unescape()?.to_string();
                    match element.as_slice() {
                        b"name" => pkg.name = text,
                        b"arch" => pkg.arch = text,
                        b"license" => pkg.license = Some(text),
                        b"checksum" if pkgid_checksum => pkg.pkgid = text,
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"package" {
                    if let Some(pkg) = current.take() {
                        packages.push(pkg);
                    }
                }
                element.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(packages)
}

fn primary_attributes(e: &BytesStart, pkg: &mut PrimaryPackage) -> Result<()> {
    match e.local_name().as_ref() {
        b"location" => {
            if let Some(href) = attribute(e, "href")? {
                pkg.location = href;
            }
        }
        b"size" => {
            if let Some(size) = attribute(e, "package")? {
                pkg.size = size
                    .parse()
                    .map_err(|_| Error::ParseError(format!("invalid package size '{size}'")))?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parse `filelists.xml`, keeping only desktop files
///
/// Returns package id to desktop file paths. Packages shipping no desktop
/// file are left out.
pub fn parse_filelists_desktop(xml: &str) -> Result<HashMap<String, Vec<String>>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut files: HashMap<String, Vec<String>> = HashMap::new();
    let mut pkgid: Option<String> = None;
    let mut in_file = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"package" => pkgid = attribute(&e, "pkgid")?,
                b"file" => in_file = true,
                _ => {}
            },
            Event::Text(t) if in_file => {
                let path = t.unescape()?;
                if let Some(id) = &pkgid {
                    if is_desktop_file(&path) {
                        files.entry(id.clone()).or_default().push(path.to_string());
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"package" => pkgid = None,
                b"file" => in_file = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(files)
}
