// src/commands/query.rs

//! Search commands

use anyhow::{Context, Result};
use app_install::db::models::AppResult;
use app_install::db::{Database, paths};
use tracing::debug;

/// Environment variables consulted for the message locale, in order
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Which column a query matches
#[derive(Debug, Clone, Copy)]
pub enum QueryField {
    Id,
    Name,
}

/// Locale of the calling environment
fn environment_locale() -> Option<String> {
    LOCALE_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}

/// Search the database and print the results
pub fn cmd_query(
    database: Option<&str>,
    field: QueryField,
    term: &str,
    locale: Option<&str>,
    json: bool,
) -> Result<()> {
    let db_path = paths::database_path(database);
    let db = Database::open(&db_path, false).context("Failed to open")?;

    let locale = locale.map(String::from).or_else(environment_locale);
    debug!("query {:?} '{}' with locale {:?}", field, term, locale);

    let results = match field {
        QueryField::Id => db.search_by_id(term, locale.as_deref()),
        QueryField::Name => db.search_by_name(term, locale.as_deref()),
    }
    .context("Failed to search")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(term, &results);
    }
    Ok(())
}

fn print_results(term: &str, results: &[AppResult]) {
    if results.is_empty() {
        println!("No results found");
        return;
    }

    println!("Results for '{}':", term);
    for (i, app) in results.iter().enumerate() {
        println!("{:3}: {}", i + 1, app.application_id);
        print_field("Application Name", app.application_name.as_deref());
        print_field("Application Summary", app.application_summary.as_deref());
        print_field("Package Name", app.package_name.as_deref());
        print_field("Categories", app.categories.as_deref());
        print_field("Repository ID", app.repo_id.as_deref());
        print_field("Icon Name", app.icon_name.as_deref());
        println!("     Rating: {}", app.rating);
        print_field("Screenshot", app.screenshot_url.as_deref());
        println!(
            "     Installed: {}",
            if app.installed { "TRUE" } else { "FALSE" }
        );
    }
}

fn print_field(label: &str, value: Option<&str>) {
    println!("     {}: {}", label, value.unwrap_or(""));
}
