// tests/database.rs

//! Integration tests for database maintenance: create, add, remove, query.

mod common;

use app_install::Error;
use app_install::db::Database;
use app_install::db::models::{Application, Translation};
use common::{setup_database, setup_populated_database};
use rusqlite::Connection;
use std::fs;

#[test]
fn test_create_twice_fails() {
    let (_temp, db_path) = setup_database();
    let db = Database::open(&db_path, false).unwrap();
    assert!(db.is_created().unwrap());
    assert!(matches!(db.create(), Err(Error::DatabaseError(_))));
}

#[test]
fn test_upgrade_version_one_database() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("old.db");
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE applications (application_id TEXT PRIMARY KEY, package_name TEXT,
                 categories TEXT, repo_id TEXT, icon_name TEXT, application_name TEXT,
                 application_summary TEXT);
             CREATE TABLE translations (application_id TEXT, application_name TEXT,
                 application_summary TEXT, locale TEXT);
             INSERT INTO applications VALUES ('gedit', 'gedit', NULL, 'fedora', NULL, 'gedit', NULL);",
        )
        .unwrap();
    }

    let db = Database::open(&db_path, false).unwrap();
    assert!(db.upgrade().unwrap() > 0);
    assert_eq!(db.upgrade().unwrap(), 0);

    let results = db.search_by_id("gedit", None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].rating, 0);
    assert!(!results[0].installed);
}

#[test]
fn test_upgrade_requires_created_database() {
    let temp = tempfile::tempdir().unwrap();
    let db = Database::open(temp.path().join("empty.db"), false).unwrap();
    assert!(db.upgrade().is_err());
}

#[test]
fn test_count_and_remove_by_repo() {
    let (_temp, db_path) = setup_populated_database();
    let mut db = Database::open(&db_path, false).unwrap();

    assert_eq!(db.count_by_repo("fedora").unwrap(), 1);
    assert_eq!(db.count_by_repo("updates").unwrap(), 1);
    assert_eq!(db.count_by_repo("rawhide").unwrap(), 0);

    assert_eq!(db.remove_by_repo("fedora").unwrap(), 1);
    assert_eq!(db.count_by_repo("fedora").unwrap(), 0);
    assert!(
        Translation::find_by_application(db.conn(), "gedit")
            .unwrap()
            .is_empty()
    );
    // Other repositories are untouched
    assert_eq!(
        Translation::find_by_application(db.conn(), "gimp")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_remove_by_name_deletes_icons() {
    let (temp, db_path) = setup_populated_database();
    let icondir = temp.path().join("icons");
    app_install::icons::ensure_icon_dirs(&icondir).unwrap();
    fs::write(icondir.join("48x48/gimp.png"), b"png").unwrap();
    fs::write(icondir.join("scalable/gimp.svg"), b"svg").unwrap();
    fs::write(icondir.join("48x48/accessories-text-editor.png"), b"png").unwrap();

    let mut db = Database::open(&db_path, false).unwrap();
    db.set_icon_path(Some(&icondir));
    assert_eq!(db.remove_by_name("gimp").unwrap(), 1);

    assert!(!icondir.join("48x48/gimp.png").exists());
    assert!(!icondir.join("scalable/gimp.svg").exists());
    assert!(icondir.join("48x48/accessories-text-editor.png").exists());
}

#[test]
fn test_failed_remove_keeps_icons() {
    let (temp, db_path) = setup_populated_database();
    let icondir = temp.path().join("icons");
    app_install::icons::ensure_icon_dirs(&icondir).unwrap();
    fs::write(icondir.join("48x48/gimp.png"), b"png").unwrap();

    // Break the schema so deleting translations fails
    Connection::open(&db_path)
        .unwrap()
        .execute_batch("DROP TABLE translations;")
        .unwrap();

    let mut db = Database::open(&db_path, false).unwrap();
    db.set_icon_path(Some(&icondir));
    assert!(db.remove_by_name("gimp").is_err());

    assert_eq!(db.count_by_name("gimp").unwrap(), 1);
    assert!(icondir.join("48x48/gimp.png").exists());
}

#[test]
fn test_import_by_repo_with_icons() {
    let (source_temp, source_path) = setup_populated_database();
    let source_icons = source_temp.path().join("icons");
    app_install::icons::ensure_icon_dirs(&source_icons).unwrap();
    fs::write(source_icons.join("48x48/accessories-text-editor.png"), b"png").unwrap();

    let (target_temp, target_path) = setup_database();
    let target_icons = target_temp.path().join("icons");

    let mut db = Database::open(&target_path, false).unwrap();
    db.set_icon_path(Some(&target_icons));
    let imported = db
        .import_by_repo(&source_path, Some(&source_icons), "fedora")
        .unwrap();

    assert_eq!(imported, 1);
    assert_eq!(db.count_by_repo("fedora").unwrap(), 1);
    assert_eq!(db.count_by_repo("updates").unwrap(), 0);
    assert_eq!(
        Translation::find_by_application(db.conn(), "gedit")
            .unwrap()
            .len(),
        1
    );
    assert!(target_icons.join("48x48/accessories-text-editor.png").exists());

    // The source stays attached only for the copy
    let imported = db.import_by_name(&source_path, None, "gimp").unwrap();
    assert_eq!(imported, 1);
}

#[test]
fn test_import_missing_source() {
    let (temp, db_path) = setup_database();
    let mut db = Database::open(&db_path, false).unwrap();
    let result = db.import_by_repo(&temp.path().join("missing.db"), None, "fedora");
    assert!(matches!(result, Err(Error::NotFoundError(_))));
}

#[test]
fn test_search_by_name_localized() {
    let (_temp, db_path) = setup_populated_database();
    let db = Database::open(&db_path, false).unwrap();

    let results = db.search_by_name("Texteditor", Some("de_DE.UTF-8")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].application_id, "gedit");
    assert_eq!(results[0].application_name.as_deref(), Some("gedit Texteditor"));
    assert_eq!(
        results[0].application_summary.as_deref(),
        Some("Textdateien bearbeiten")
    );

    // Without a matching locale the untranslated values are returned
    let results = db.search_by_name("gedit", Some("C")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].application_name.as_deref(), Some("gedit"));

    // Translated fields without a translation fall back per column
    let results = db.search_by_id("gimp", Some("fr_FR")).unwrap();
    assert_eq!(
        results[0].application_name.as_deref(),
        Some("Programme de manipulation d'images GNU")
    );
    assert_eq!(results[0].application_summary, None);
}

#[test]
fn test_search_term_is_literal() {
    let (_temp, db_path) = setup_populated_database();
    let db = Database::open(&db_path, false).unwrap();
    assert!(db.search_by_id("%", None).unwrap().is_empty());
    assert!(db.search_by_id("g_dit", None).unwrap().is_empty());
    assert_eq!(db.search_by_id("g", None).unwrap().len(), 2);
}

#[test]
fn test_set_installed() {
    let (_temp, db_path) = setup_populated_database();
    let db = Database::open(&db_path, false).unwrap();

    assert_eq!(db.set_installed(Some("gedit"), true).unwrap(), 1);
    assert!(db.search_by_id("gedit", None).unwrap()[0].installed);

    assert!(matches!(
        db.set_installed(Some("missing"), true),
        Err(Error::NotFoundError(_))
    ));

    assert_eq!(db.set_installed(None, false).unwrap(), 2);
    assert!(!db.search_by_id("gedit", None).unwrap()[0].installed);
}

#[test]
fn test_dump_sql_loads_into_new_database() {
    let (_temp, db_path) = setup_populated_database();
    let db = Database::open(&db_path, false).unwrap();
    let mut sql = Vec::new();
    db.dump_sql(&mut sql).unwrap();
    let sql = String::from_utf8(sql).unwrap();
    assert!(sql.contains("d''images"));

    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&sql).unwrap();
    let apps = Application::list_all(&conn).unwrap();
    assert_eq!(apps.len(), 2);
    assert_eq!(Translation::list_all(&conn).unwrap().len(), 2);
}
