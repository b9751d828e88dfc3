// src/cli.rs
//! CLI definitions for gs-elpa
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gs_elpa::config::DEFAULT_CONFIG_PATH;

/// Directory holding one package database per repository
pub const DEFAULT_DB_DIR: &str = "/var/lib/gs-elpa";

#[derive(Parser)]
#[command(name = "gs-elpa")]
#[command(version)]
#[command(about = "Transcode ELPA archive indexes into a package database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the package database of a repository
    Init {
        /// Repository name
        repo: String,

        /// Path to the database file (default: /var/lib/gs-elpa/<repo>.db)
        #[arg(short, long)]
        db_path: Option<String>,
    },

    /// Synchronize a repository's archive index into its database
    Sync {
        /// Repository name
        repo: String,

        /// Path to the backend configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Path to the database file (default: /var/lib/gs-elpa/<repo>.db)
        #[arg(short, long)]
        db_path: Option<String>,

        /// Read archive-contents from a local file instead of the network
        #[arg(long, value_name = "PATH")]
        from_file: Option<PathBuf>,

        /// Show the records that would be stored without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// List packages stored for a repository
    List {
        /// Repository name
        repo: String,

        /// Path to the database file (default: /var/lib/gs-elpa/<repo>.db)
        #[arg(short, long)]
        db_path: Option<String>,

        /// Category to list
        #[arg(long, default_value = gs_elpa::db::CATEGORY)]
        category: String,
    },

    /// List configured repositories
    Repos {
        /// Path to the backend configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

/// Database path for `repo`, honoring an explicit override
pub fn db_path_for(repo: &str, db_path: Option<String>) -> String {
    db_path.unwrap_or_else(|| format!("{DEFAULT_DB_DIR}/{repo}.db"))
}
