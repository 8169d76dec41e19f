// src/db/models/search.rs

//! Search results, localized for the caller's locale

use crate::error::Result;
use rusqlite::{Connection, Row, params};
use serde::Serialize;

/// A search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppResult {
    pub application_id: String,
    pub application_name: Option<String>,
    pub application_summary: Option<String>,
    pub package_name: Option<String>,
    pub categories: Option<String>,
    pub repo_id: Option<String>,
    pub icon_name: Option<String>,
    pub rating: i64,
    pub screenshot_url: Option<String>,
    pub installed: bool,
}

/// What the search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Application id
    Id,
    /// Untranslated or localized application name
    Name,
}

/// Reduce a POSIX locale to the forms stored in desktop files
///
/// `de_DE.UTF-8@euro` yields `("de_DE", "de")`; `C`/`POSIX` yield nothing.
pub fn locale_candidates(locale: &str) -> Option<(String, String)> {
    let base = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    let language = base.split('_').next().unwrap_or(base).to_string();
    Some((base.to_string(), language))
}

/// Escape `%`, `_` and `\` so the term is matched literally by LIKE
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Search the cache, returning results localized for `locale`
pub fn search(
    conn: &Connection,
    field: SearchField,
    term: &str,
    locale: Option<&str>,
) -> Result<Vec<AppResult>> {
    let (full, language) = locale
        .and_then(locale_candidates)
        .unwrap_or_default();

    let filter = match field {
        SearchField::Id => "a.application_id LIKE ?1 ESCAPE '\\'",
        SearchField::Name => {
            "(a.application_name LIKE ?1 ESCAPE '\\'
              OR tf.application_name LIKE ?1 ESCAPE '\\'
              OR tl.application_name LIKE ?1 ESCAPE '\\')"
        }
    };

    let sql = format!(
        "SELECT a.application_id,
                COALESCE(tf.application_name, tl.application_name, a.application_name),
                COALESCE(tf.application_summary, tl.application_summary, a.application_summary),
                a.package_name, a.categories, a.repo_id, a.icon_name,
                a.rating, a.screenshot_url, a.installed
         FROM applications a
         LEFT JOIN translations tf ON tf.application_id = a.application_id AND tf.locale = ?2
         LEFT JOIN translations tl ON tl.application_id = a.application_id AND tl.locale = ?3
         WHERE {filter}
         GROUP BY a.application_id
         ORDER BY a.application_id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let results = stmt
        .query_map(params![like_pattern(term), full, language], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(results)
}

fn from_row(row: &Row) -> rusqlite::Result<AppResult> {
    Ok(AppResult {
        application_id: row.get(0)?,
        application_name: row.get(1)?,
        application_summary: row.get(2)?,
        package_name: row.get(3)?,
        categories: row.get(4)?,
        repo_id: row.get(5)?,
        icon_name: row.get(6)?,
        rating: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
        screenshot_url: row.get(8)?,
        installed: row.get::<_, Option<i64>>(9)?.unwrap_or(0) != 0,
    })
}
