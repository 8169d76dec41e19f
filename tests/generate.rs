// tests/generate.rs

//! Integration tests for the desktop file generator and package extraction.

mod common;

use app_install::db::Database;
use app_install::db::models::{Application, Translation};
use app_install::desktop::{self, GenerateRequest};
use app_install::packages::{self, PackageFormatType};
use common::{GEDIT_DESKTOP, setup_database, tar_gz, write_package_root};
use std::fs;

#[test]
fn test_generate_from_unpacked_tarball() {
    let (temp, db_path) = setup_database();

    let staging = temp.path().join("staging");
    write_package_root(&staging, "gedit.desktop", GEDIT_DESKTOP, "accessories-text-editor");
    let archive = temp.path().join("gedit-2.26.0.tar.gz");
    fs::write(&archive, tar_gz(&staging)).unwrap();

    let root = temp.path().join("root");
    let format = packages::extract_package(&archive, &root).unwrap();
    assert_eq!(format, PackageFormatType::Tarball);
    assert!(root.join("usr/share/applications/gedit.desktop").is_file());

    let icondir = temp.path().join("icons");
    let mut db = Database::open(&db_path, false).unwrap();
    let request = GenerateRequest {
        root: root.clone(),
        desktop_file: "gedit.desktop".to_string(),
        package: "gedit".to_string(),
        repo: "fedora".to_string(),
        icondir: icondir.clone(),
    };
    let id = desktop::generate(&mut db, &request).unwrap();
    assert_eq!(id, "gedit");

    let apps = Application::list_all(db.conn()).unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].application_name.as_deref(), Some("gedit"));
    assert_eq!(apps[0].application_summary.as_deref(), Some("Edit text files"));
    assert_eq!(
        apps[0].categories.as_deref(),
        Some("GNOME;GTK;Utility;TextEditor;")
    );
    assert_eq!(apps[0].repo_id, "fedora");

    let translations = Translation::find_by_application(db.conn(), "gedit").unwrap();
    assert_eq!(translations.len(), 1);
    assert_eq!(translations[0].locale, "de");
    assert_eq!(
        translations[0].application_name.as_deref(),
        Some("gedit Texteditor")
    );

    assert!(icondir.join("48x48/accessories-text-editor.png").is_file());
    assert!(icondir.join("24x24/accessories-text-editor.png").is_file());
    assert!(icondir.join("scalable/accessories-text-editor.svg").is_file());
    // Sizes the package does not ship stay empty
    assert!(!icondir.join("22x22/accessories-text-editor.png").exists());

    let results = db.search_by_name("Texteditor", Some("de")).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_generate_twice_fails() {
    let (temp, db_path) = setup_database();
    let root = temp.path().join("root");
    write_package_root(&root, "gedit.desktop", GEDIT_DESKTOP, "accessories-text-editor");

    let mut db = Database::open(&db_path, false).unwrap();
    let request = GenerateRequest {
        root,
        desktop_file: "gedit.desktop".to_string(),
        package: "gedit".to_string(),
        repo: "fedora".to_string(),
        icondir: temp.path().join("icons"),
    };
    desktop::generate(&mut db, &request).unwrap();
    assert!(desktop::generate(&mut db, &request).is_err());

    // The failed insert left no stray translations behind
    assert_eq!(
        Translation::find_by_application(db.conn(), "gedit")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_generate_without_desktop_entry_group() {
    let (temp, db_path) = setup_database();
    let root = temp.path().join("root");
    write_package_root(&root, "broken.desktop", "[Other]\nName=Broken\n", "broken");

    let mut db = Database::open(&db_path, false).unwrap();
    let request = GenerateRequest {
        root,
        desktop_file: "broken.desktop".to_string(),
        package: "broken".to_string(),
        repo: "fedora".to_string(),
        icondir: temp.path().join("icons"),
    };
    assert!(desktop::generate(&mut db, &request).is_err());
    assert_eq!(db.count_by_repo("fedora").unwrap(), 0);
}

#[test]
fn test_extract_refuses_unknown_format() {
    let temp = tempfile::tempdir().unwrap();
    let package = temp.path().join("notes.txt");
    fs::write(&package, "just some text").unwrap();
    assert!(packages::extract_package(&package, &temp.path().join("out")).is_err());
}

#[test]
fn test_generate_ignores_icon_path_outside_tree() {
    let (temp, db_path) = setup_database();
    let root = temp.path().join("root");
    let desktop = GEDIT_DESKTOP.replace(
        "Icon=accessories-text-editor",
        "Icon=../../../escaped",
    );
    write_package_root(&root, "gedit.desktop", &desktop, "accessories-text-editor");
    // What a traversal from the 48x48 theme directory would pick up
    fs::write(root.join("usr/share/icons/escaped.png"), b"png").unwrap();

    let icondir = temp.path().join("out/icons");
    let mut db = Database::open(&db_path, false).unwrap();
    let request = GenerateRequest {
        root,
        desktop_file: "gedit.desktop".to_string(),
        package: "gedit".to_string(),
        repo: "fedora".to_string(),
        icondir,
    };
    desktop::generate(&mut db, &request).unwrap();

    let apps = Application::list_all(db.conn()).unwrap();
    assert_eq!(apps[0].icon_name, None);
    assert!(!temp.path().join("escaped.png").exists());
    assert!(!temp.path().join("out/escaped.png").exists());
}
