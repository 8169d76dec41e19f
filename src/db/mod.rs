// src/db/mod.rs

//! Application cache database
//!
//! [`Database`] owns the SQLite connection together with the icon tree that
//! belongs to it. Removing or importing applications keeps both in step:
//! icons are deleted or copied alongside the rows that reference them.

pub mod models;
pub mod paths;
pub mod schema;

use crate::error::{Error, Result};
use crate::icons;
use models::{AppResult, Application, SearchField, Selector, Translation};
use rusqlite::{Connection, Transaction};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Columns shared by every schema version of the applications table
const APPLICATION_COLUMNS: &str = "application_id, package_name, categories, repo_id, \
                                   icon_name, application_name, application_summary";

/// Columns of the translations table
const TRANSLATION_COLUMNS: &str = "application_id, application_name, application_summary, locale";

/// An open application cache
pub struct Database {
    conn: Connection,
    path: PathBuf,
    icon_path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) the database file at `path`
    ///
    /// With `synchronous` false, SQLite no longer waits for data to reach the
    /// disk. Bulk writers such as the repository builder use this.
    pub fn open(path: impl AsRef<Path>, synchronous: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("trying to open database '{}'", path.display());

        let conn = Connection::open(&path).map_err(|e| {
            Error::DatabaseError(format!("can't open database {}: {e}", path.display()))
        })?;

        if !synchronous {
            debug!("disabling sync");
            conn.pragma_update(None, "synchronous", "OFF")?;
        }

        Ok(Self {
            conn,
            path,
            icon_path: None,
        })
    }

    /// Open an in-memory database, mostly useful for tests
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
            icon_path: None,
        })
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Set the icon tree used when removing and importing applications
    pub fn set_icon_path(&mut self, icon_path: Option<&Path>) {
        if let Some(dir) = icon_path
            && !dir.is_dir()
        {
            warn!("icon path {} does not exist", dir.display());
        }
        self.icon_path = icon_path.map(Path::to_path_buf);
    }

    /// Icon tree currently in use
    pub fn icon_path(&self) -> Option<&Path> {
        self.icon_path.as_deref()
    }

    /// Whether the application tables have been created
    pub fn is_created(&self) -> Result<bool> {
        schema::table_exists(&self.conn, "applications")
    }

    /// Current schema version
    pub fn schema_version(&self) -> Result<i32> {
        schema::get_schema_version(&self.conn)
    }

    /// Create the tables at the latest schema version
    pub fn create(&self) -> Result<()> {
        if self.is_created()? {
            return Err(Error::DatabaseError(format!(
                "tables already exist in {}",
                self.path.display()
            )));
        }
        schema::migrate(&self.conn)?;
        info!("Created database {}", self.path.display());
        Ok(())
    }

    /// Bring an existing database up to the latest schema version
    ///
    /// Returns the number of migrations applied.
    pub fn upgrade(&self) -> Result<i32> {
        if !self.is_created()? {
            return Err(Error::DatabaseError(format!(
                "{} has not been created",
                self.path.display()
            )));
        }
        schema::migrate(&self.conn)
    }

    /// Close the database, optionally compacting it first
    pub fn close(self, vacuum: bool) -> Result<()> {
        if vacuum {
            debug!("vacuuming {}", self.path.display());
            self.conn.execute_batch("VACUUM")?;
        }
        self.conn.close().map_err(|(_, e)| Error::Database(e))
    }

    /// Run `f` inside a transaction, committing when it succeeds
    pub fn transaction<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction) -> Result<T>,
    {
        let tx = self.conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Add one application row
    pub fn add_application(&self, app: &Application) -> Result<()> {
        app.insert(&self.conn)
    }

    /// Add one translation row
    pub fn add_translation(&self, translation: &Translation) -> Result<()> {
        translation.insert(&self.conn)
    }

    /// Number of applications from `repo`
    pub fn count_by_repo(&self, repo: &str) -> Result<u32> {
        Application::count(&self.conn, Selector::Repo, repo)
    }

    /// Number of applications shipped by `package`
    pub fn count_by_name(&self, package: &str) -> Result<u32> {
        Application::count(&self.conn, Selector::Package, package)
    }

    /// Remove every application from `repo`, with its translations and icons
    pub fn remove_by_repo(&mut self, repo: &str) -> Result<usize> {
        self.remove_by(Selector::Repo, repo)
    }

    /// Remove every application shipped by `package`, with its translations and icons
    pub fn remove_by_name(&mut self, package: &str) -> Result<usize> {
        self.remove_by(Selector::Package, package)
    }

    fn remove_by(&mut self, selector: Selector, value: &str) -> Result<usize> {
        let (removed, icon_names) = self.transaction(|tx| {
            let icon_names: Vec<String> = Application::find_by(tx, selector, value)?
                .into_iter()
                .filter_map(|app| app.icon_name)
                .collect();
            let translations = Translation::delete_for(tx, selector, value)?;
            debug!("removed {} translations", translations);
            Ok((Application::delete_by(tx, selector, value)?, icon_names))
        })?;

        // Only touch the icon tree once the rows are really gone
        if let Some(icon_path) = &self.icon_path {
            for icon in &icon_names {
                icons::remove_icons(icon_path, icon);
            }
        }

        info!("Removed {} applications for {} {}", removed, selector.label(), value);
        Ok(removed)
    }

    /// Copy every application from `repo` out of another database
    ///
    /// Icons are copied from `source_icondir` into this database's icon path.
    pub fn import_by_repo(
        &mut self,
        source: &Path,
        source_icondir: Option<&Path>,
        repo: &str,
    ) -> Result<u32> {
        self.import_by(source, source_icondir, Selector::Repo, repo)
    }

    /// Copy every application shipped by `package` out of another database
    pub fn import_by_name(
        &mut self,
        source: &Path,
        source_icondir: Option<&Path>,
        package: &str,
    ) -> Result<u32> {
        self.import_by(source, source_icondir, Selector::Package, package)
    }

    fn import_by(
        &mut self,
        source: &Path,
        source_icondir: Option<&Path>,
        selector: Selector,
        value: &str,
    ) -> Result<u32> {
        if !source.is_file() {
            return Err(Error::NotFoundError(format!(
                "source database {}",
                source.display()
            )));
        }

        let source_str = source.to_string_lossy().to_string();
        self.conn
            .execute("ATTACH DATABASE ?1 AS source", [&source_str])?;

        let column = selector.column();
        let imported = self.transaction(|tx| {
            let apps = tx.execute(
                &format!(
                    "INSERT INTO main.applications ({APPLICATION_COLUMNS})
                     SELECT {APPLICATION_COLUMNS} FROM source.applications WHERE {column} = ?1"
                ),
                [value],
            )?;
            let translations = tx.execute(
                &format!(
                    "INSERT INTO main.translations ({TRANSLATION_COLUMNS})
                     SELECT {TRANSLATION_COLUMNS} FROM source.translations
                     WHERE application_id IN (
                         SELECT application_id FROM source.applications WHERE {column} = ?1)"
                ),
                [value],
            )?;
            debug!("imported {} applications, {} translations", apps, translations);
            Ok(apps as u32)
        });

        // Detach even when the copy failed so the handle stays usable
        let detached = self.conn.execute("DETACH DATABASE source", []);
        let imported = imported?;
        detached?;

        if let (Some(from), Some(to)) = (source_icondir, self.icon_path.clone()) {
            icons::ensure_icon_dirs(&to)?;
            for app in Application::find_by(&self.conn, selector, value)? {
                if let Some(icon) = &app.icon_name {
                    icons::copy_tree_icons(from, &to, icon);
                }
            }
        }

        info!(
            "Imported {} applications for {} {}",
            imported,
            selector.label(),
            value
        );
        Ok(imported)
    }

    /// Search application ids containing `term`
    pub fn search_by_id(&self, term: &str, locale: Option<&str>) -> Result<Vec<AppResult>> {
        models::search(&self.conn, SearchField::Id, term, locale)
    }

    /// Search application names, untranslated or localized, containing `term`
    pub fn search_by_name(&self, term: &str, locale: Option<&str>) -> Result<Vec<AppResult>> {
        models::search(&self.conn, SearchField::Name, term, locale)
    }

    /// Set the installed flag of one application, or of all when `id` is `None`
    pub fn set_installed(&self, id: Option<&str>, installed: bool) -> Result<usize> {
        let changed = Application::set_installed(&self.conn, id, installed)?;
        if let Some(id) = id
            && changed == 0
        {
            return Err(Error::NotFoundError(format!("application {id}")));
        }
        Ok(changed)
    }

    /// Write the database content as SQL statements
    pub fn dump_sql<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "BEGIN TRANSACTION;")?;
        writeln!(
            writer,
            "CREATE TABLE IF NOT EXISTS applications (application_id TEXT PRIMARY KEY, \
             package_name TEXT, categories TEXT, repo_id TEXT, icon_name TEXT, \
             application_name TEXT, application_summary TEXT);"
        )?;
        writeln!(
            writer,
            "CREATE TABLE IF NOT EXISTS translations (application_id TEXT, \
             application_name TEXT, application_summary TEXT, locale TEXT);"
        )?;

        for app in Application::list_all(&self.conn)? {
            writeln!(
                writer,
                "INSERT INTO applications ({APPLICATION_COLUMNS}) VALUES ({}, {}, {}, {}, {}, {}, {});",
                sql_literal(Some(&app.application_id)),
                sql_literal(Some(&app.package_name)),
                sql_literal(app.categories.as_deref()),
                sql_literal(Some(&app.repo_id)),
                sql_literal(app.icon_name.as_deref()),
                sql_literal(app.application_name.as_deref()),
                sql_literal(app.application_summary.as_deref()),
            )?;
        }

        for t in Translation::list_all(&self.conn)? {
            writeln!(
                writer,
                "INSERT INTO translations ({TRANSLATION_COLUMNS}) VALUES ({}, {}, {}, {});",
                sql_literal(Some(&t.application_id)),
                sql_literal(t.application_name.as_deref()),
                sql_literal(t.application_summary.as_deref()),
                sql_literal(Some(&t.locale)),
            )?;
        }

        writeln!(writer, "COMMIT;")?;
        Ok(())
    }
}

/// Quote a value as an SQL string literal
fn sql_literal(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{}'", v.replace('\'', "''")),
        None => "NULL".to_string(),
    }
}
