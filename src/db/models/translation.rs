// src/db/models/translation.rs

//! Translation model - localized name and summary of an application

use super::application::Selector;
use crate::error::Result;
use rusqlite::{Connection, Row, params};

/// A localized name/summary pair for one application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub application_id: String,
    pub application_name: Option<String>,
    pub application_summary: Option<String>,
    pub locale: String,
}

impl Translation {
    /// Create a new Translation
    pub fn new(
        application_id: String,
        application_name: Option<String>,
        application_summary: Option<String>,
        locale: String,
    ) -> Self {
        Self {
            application_id,
            application_name,
            application_summary,
            locale,
        }
    }

    /// Insert this translation into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO translations (application_id, application_name, application_summary, locale)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                &self.application_id,
                &self.application_name,
                &self.application_summary,
                &self.locale,
            ],
        )?;
        Ok(())
    }

    /// List translations of one application
    pub fn find_by_application(conn: &Connection, application_id: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT application_id, application_name, application_summary, locale
             FROM translations WHERE application_id = ?1 ORDER BY locale",
        )?;
        let rows = stmt
            .query_map([application_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// List every translation
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT application_id, application_name, application_summary, locale
             FROM translations ORDER BY application_id, locale",
        )?;
        let rows = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Delete the translations of every application matching a repo or package
    ///
    /// Must run before the applications themselves are deleted, as the
    /// translations table only carries the application id.
    pub fn delete_for(conn: &Connection, selector: Selector, value: &str) -> Result<usize> {
        let sql = format!(
            "DELETE FROM translations WHERE application_id IN (
                SELECT application_id FROM applications WHERE {} = ?1)",
            selector.column()
        );
        Ok(conn.execute(&sql, [value])?)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            application_id: row.get(0)?,
            application_name: row.get(1)?,
            application_summary: row.get(2)?,
            locale: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        })
    }
}
