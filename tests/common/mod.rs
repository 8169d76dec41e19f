// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use app_install::db::Database;
use app_install::db::models::{Application, Translation};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const GEDIT_DESKTOP: &str = "[Desktop Entry]
Name=gedit
Name[de]=gedit Texteditor
Comment=Edit text files
Comment[de]=Textdateien bearbeiten
Icon=accessories-text-editor
Categories=GNOME;GTK;Utility;TextEditor;
Exec=gedit %U
";

pub const GIMP_DESKTOP: &str = "[Desktop Entry]
Name=GNU Image Manipulation Program
Name[fr]=Programme de manipulation d'images GNU
Comment=Create images and edit photographs
Icon=gimp
Categories=Graphics;2DGraphics;
";

/// Create an empty database in a temporary directory.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_database() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("desktop.db");
    let db = Database::open(&db_path, false).unwrap();
    db.create().unwrap();
    db.close(false).unwrap();
    (temp_dir, db_path)
}

/// Create a database holding gedit (fedora) and gimp (updates) with translations.
pub fn setup_populated_database() -> (TempDir, PathBuf) {
    let (temp_dir, db_path) = setup_database();
    let mut db = Database::open(&db_path, false).unwrap();

    db.transaction(|tx| {
        let mut gedit = Application::new(
            "gedit".to_string(),
            "gedit".to_string(),
            "fedora".to_string(),
        );
        gedit.application_name = Some("gedit".to_string());
        gedit.application_summary = Some("Edit text files".to_string());
        gedit.icon_name = Some("accessories-text-editor".to_string());
        gedit.categories = Some("GNOME;GTK;Utility;TextEditor;".to_string());
        gedit.insert(tx)?;

        Translation::new(
            "gedit".to_string(),
            Some("gedit Texteditor".to_string()),
            Some("Textdateien bearbeiten".to_string()),
            "de".to_string(),
        )
        .insert(tx)?;

        let mut gimp = Application::new(
            "gimp".to_string(),
            "gimp".to_string(),
            "updates".to_string(),
        );
        gimp.application_name = Some("GNU Image Manipulation Program".to_string());
        gimp.icon_name = Some("gimp".to_string());
        gimp.insert(tx)?;

        Translation::new(
            "gimp".to_string(),
            Some("Programme de manipulation d'images GNU".to_string()),
            None,
            "fr".to_string(),
        )
        .insert(tx)?;
        Ok(())
    })
    .unwrap();

    db.close(false).unwrap();
    (temp_dir, db_path)
}

/// Write a package file system with one desktop file and hicolor icons.
pub fn write_package_root(root: &Path, desktop_name: &str, desktop: &str, icon: &str) {
    let applications = root.join("usr/share/applications");
    fs::create_dir_all(&applications).unwrap();
    fs::write(applications.join(desktop_name), desktop).unwrap();

    for size in ["24x24", "48x48"] {
        let dir = root.join("usr/share/icons/hicolor").join(size).join("apps");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{icon}.png")), b"\x89PNG").unwrap();
    }
    let scalable = root.join("usr/share/icons/hicolor/scalable/apps");
    fs::create_dir_all(&scalable).unwrap();
    fs::write(scalable.join(format!("{icon}.svg")), b"<svg/>").unwrap();
}

/// Pack a directory into a gzip-compressed tarball.
pub fn tar_gz(dir: &Path) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", dir).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

/// A package published in a test yum repository
pub struct RepoPackage<'a> {
    pub name: &'a str,
    pub license: &'a str,
    pub desktop_name: &'a str,
    pub desktop: &'a str,
    pub icon: &'a str,
}

/// How packages in a test yum repository are stored
#[derive(Clone, Copy)]
pub enum PackageFile {
    TarGz,
    Rpm(rpm::CompressionType),
}

/// Build an RPM holding every file below `root` at the same path.
pub fn rpm_from_dir(
    root: &Path,
    name: &str,
    license: &str,
    compression: rpm::CompressionType,
) -> Vec<u8> {
    fn collect(dir: &Path, files: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                collect(&path, files);
            } else {
                files.push(path);
            }
        }
    }

    let mut files = Vec::new();
    collect(root, &mut files);

    let mut builder = rpm::PackageBuilder::new(name, "1.0", license, "x86_64", name)
        .compression(compression);
    for file in files {
        let dest = format!("/{}", file.strip_prefix(root).unwrap().display());
        let options = rpm::FileOptions::new(dest).mode(rpm::FileMode::regular(0o644));
        builder = builder.with_file(&file, options).unwrap();
    }

    let mut bytes = Vec::new();
    builder.build().unwrap().write(&mut bytes).unwrap();
    bytes
}

/// Write a yum repository on disk whose packages are gzip tarballs.
///
/// Every package ships one desktop file. Metadata is left uncompressed.
pub fn write_yum_repo(repo_dir: &Path, packages: &[RepoPackage]) {
    write_yum_repo_as(repo_dir, packages, PackageFile::TarGz);
}

/// Write a yum repository on disk storing packages as `format`.
pub fn write_yum_repo_as(repo_dir: &Path, packages: &[RepoPackage], format: PackageFile) {
    let repodata = repo_dir.join("repodata");
    let package_dir = repo_dir.join("Packages");
    fs::create_dir_all(&repodata).unwrap();
    fs::create_dir_all(&package_dir).unwrap();

    let mut primary = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" xmlns:rpm="http://linux.duke.edu/metadata/rpm">
"#,
    );
    let mut filelists = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<filelists xmlns="http://linux.duke.edu/metadata/filelists">
"#,
    );

    for (i, pkg) in packages.iter().enumerate() {
        let pkgid = format!("{:064x}", i + 1);
        let staging = tempfile::tempdir().unwrap();
        write_package_root(staging.path(), pkg.desktop_name, pkg.desktop, pkg.icon);
        let (filename, archive) = match format {
            PackageFile::TarGz => (format!("{}-1.0.tar.gz", pkg.name), tar_gz(staging.path())),
            PackageFile::Rpm(compression) => (
                format!("{}-1.0-1.x86_64.rpm", pkg.name),
                rpm_from_dir(staging.path(), pkg.name, pkg.license, compression),
            ),
        };
        fs::write(package_dir.join(&filename), &archive).unwrap();

        primary.push_str(&format!(
            r#"<package type="rpm">
  <name>{name}</name>
  <arch>x86_64</arch>
  <checksum type="sha256" pkgid="YES">{pkgid}</checksum>
  <size package="{size}" installed="0" archive="0"/>
  <location href="Packages/{filename}"/>
  <format><rpm:license>{license}</rpm:license></format>
</package>
"#,
            name = pkg.name,
            size = archive.len(),
            license = pkg.license,
        ));
        filelists.push_str(&format!(
            r#"<package pkgid="{pkgid}" name="{name}" arch="x86_64">
  <file>/usr/bin/{name}</file>
  <file>/usr/share/applications/{desktop}</file>
</package>
"#,
            name = pkg.name,
            desktop = pkg.desktop_name,
        ));
    }
    primary.push_str("</metadata>\n");
    filelists.push_str("</filelists>\n");

    fs::write(repodata.join("primary.xml"), primary).unwrap();
    fs::write(repodata.join("filelists.xml"), filelists).unwrap();
    fs::write(
        repodata.join("repomd.xml"),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<repomd xmlns="http://linux.duke.edu/metadata/repo">
  <data type="primary"><location href="repodata/primary.xml"/></data>
  <data type="filelists"><location href="repodata/filelists.xml"/></data>
</repomd>
"#,
    )
    .unwrap();
}
