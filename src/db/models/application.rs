// src/db/models/application.rs

//! Application model - one row per desktop file

use crate::error::Result;
use rusqlite::{Connection, Row, params};

/// Which column a bulk operation selects applications by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// `repo_id`
    Repo,
    /// `package_name`
    Package,
}

impl Selector {
    /// Column name in the `applications` table
    pub fn column(&self) -> &'static str {
        match self {
            Self::Repo => "repo_id",
            Self::Package => "package_name",
        }
    }

    /// Human-readable name for log messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Package => "name",
        }
    }
}

/// An application entry in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub application_id: String,
    pub package_name: String,
    pub categories: Option<String>,
    pub repo_id: String,
    pub icon_name: Option<String>,
    pub application_name: Option<String>,
    pub application_summary: Option<String>,
}

impl Application {
    /// Create a new Application with only the identifying fields set
    pub fn new(application_id: String, package_name: String, repo_id: String) -> Self {
        Self {
            application_id,
            package_name,
            categories: None,
            repo_id,
            icon_name: None,
            application_name: None,
            application_summary: None,
        }
    }

    /// Insert this application into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO applications (application_id, package_name, categories, repo_id,
                                       icon_name, application_name, application_summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &self.application_id,
                &self.package_name,
                &self.categories,
                &self.repo_id,
                &self.icon_name,
                &self.application_name,
                &self.application_summary,
            ],
        )?;
        Ok(())
    }

    /// Count applications matching a repo or package name
    pub fn count(conn: &Connection, selector: Selector, value: &str) -> Result<u32> {
        let sql = format!(
            "SELECT COUNT(*) FROM applications WHERE {} = ?1",
            selector.column()
        );
        let count: u32 = conn.query_row(&sql, [value], |row| row.get(0))?;
        Ok(count)
    }

    /// List applications matching a repo or package name
    pub fn find_by(conn: &Connection, selector: Selector, value: &str) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT application_id, package_name, categories, repo_id, icon_name,
                    application_name, application_summary
             FROM applications WHERE {} = ?1 ORDER BY application_id",
            selector.column()
        );
        let mut stmt = conn.prepare(&sql)?;
        let apps = stmt
            .query_map([value], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(apps)
    }

    /// List every application
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT application_id, package_name, categories, repo_id, icon_name,
                    application_name, application_summary
             FROM applications ORDER BY application_id",
        )?;
        let apps = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(apps)
    }

    /// Delete applications matching a repo or package name
    ///
    /// Returns the number of rows deleted.
    pub fn delete_by(conn: &Connection, selector: Selector, value: &str) -> Result<usize> {
        let sql = format!("DELETE FROM applications WHERE {} = ?1", selector.column());
        Ok(conn.execute(&sql, [value])?)
    }

    /// Set the installed flag of one application, or of all when `id` is `None`
    ///
    /// Returns the number of rows updated.
    pub fn set_installed(conn: &Connection, id: Option<&str>, installed: bool) -> Result<usize> {
        let changed = match id {
            Some(id) => conn.execute(
                "UPDATE applications SET installed = ?1 WHERE application_id = ?2",
                params![installed as i32, id],
            )?,
            None => conn.execute(
                "UPDATE applications SET installed = ?1",
                params![installed as i32],
            )?,
        };
        Ok(changed)
    }

    /// Convert a database row to an Application
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            application_id: row.get(0)?,
            package_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            categories: row.get(2)?,
            repo_id: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            icon_name: row.get(4)?,
            application_name: row.get(5)?,
            application_summary: row.get(6)?,
        })
    }
}
