// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, db_path_for};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { repo, db_path }) => commands::cmd_init(&db_path_for(&repo, db_path)),
        Some(Commands::Sync {
            repo,
            config,
            db_path,
            from_file,
            dry_run,
        }) => {
            let db_path = db_path_for(&repo, db_path);
            commands::cmd_sync(&repo, &config, &db_path, from_file, dry_run)
        }
        Some(Commands::List {
            repo,
            db_path,
            category,
        }) => commands::cmd_list(&db_path_for(&repo, db_path), &category),
        Some(Commands::Repos { config }) => commands::cmd_repos(&config),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
