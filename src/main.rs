// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{BuildCommands, Cli, Commands, QueryCommands};
use commands::QueryField;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Create { database, force } => commands::cmd_create(database.as_deref(), force),

        Commands::Upgrade { database } => commands::cmd_upgrade(database.as_deref()),

        Commands::RefreshInstalled {
            database,
            local_application_root,
        } => commands::cmd_refresh_installed(database.as_deref(), &local_application_root),

        Commands::Add {
            database,
            source_database,
            icondir,
            source_icondir,
            repo,
            package,
        } => commands::cmd_add(
            database.as_deref(),
            &source_database,
            icondir.as_deref(),
            source_icondir.as_deref(),
            repo.as_deref(),
            package.as_deref(),
        ),

        Commands::Remove {
            database,
            icondir,
            repo,
            package,
        } => commands::cmd_remove(
            database.as_deref(),
            icondir.as_deref(),
            repo.as_deref(),
            package.as_deref(),
        ),

        Commands::Query {
            command,
            database,
            locale,
            json,
        } => {
            let (field, term) = match command {
                QueryCommands::Id { term } => (QueryField::Id, term),
                QueryCommands::Name { term } => (QueryField::Name, term),
            };
            commands::cmd_query(database.as_deref(), field, &term, locale.as_deref(), json)
        }

        Commands::Generate {
            database,
            root,
            desktopfile,
            package,
            icondir,
            repo,
        } => commands::cmd_generate(
            database.as_deref(),
            &root,
            &desktopfile,
            &package,
            &icondir,
            &repo,
        ),

        Commands::Extract { package, directory } => commands::cmd_extract(&package, &directory),

        Commands::Build(build_cmd) => match build_cmd {
            BuildCommands::Yum {
                repo,
                dist,
                baseurl,
                repos_dir,
                releasever,
                sql,
            } => commands::cmd_build_yum(
                &repo,
                &dist,
                baseurl.as_deref(),
                &repos_dir,
                releasever.as_deref(),
                sql,
            ),
            BuildCommands::Pisi {
                repo,
                dist,
                index,
                installed_dir,
                sql,
            } => commands::cmd_build_pisi(&repo, &dist, index.as_deref(), &installed_dir, sql),
        },
    }
}
