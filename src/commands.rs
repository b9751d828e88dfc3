// src/commands.rs
//! Command handlers for the gs-elpa CLI

use anyhow::Result;
use gs_elpa::config::BackendConfig;
use gs_elpa::db::{self, CATEGORY, MemoryPackageDb};
use gs_elpa::repository::{self, FeedSource};
use std::path::{Path, PathBuf};
use tracing::info;

/// Create the package database
pub fn cmd_init(db_path: &str) -> Result<()> {
    info!("Initializing package database at: {}", db_path);
    db::init(db_path)?;
    println!("Database initialized successfully at: {}", db_path);
    Ok(())
}

/// Synchronize one repository
pub fn cmd_sync(
    repo: &str,
    config_path: &Path,
    db_path: &str,
    from_file: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let backend = BackendConfig::load(config_path)?;
    let source = from_file.map_or(FeedSource::Remote, FeedSource::File);

    if dry_run {
        let mut package_db = MemoryPackageDb::new();
        let stats = repository::sync_repository(&mut package_db, &backend, repo, &source)?;
        for record in package_db.packages() {
            println!("{}", record.package);
            let deps = &record.properties.dependencies;
            if !deps.is_empty() {
                println!("\t{}", deps);
            }
        }
        println!("[DRY RUN] {}: {}", repo, stats);
        return Ok(());
    }

    let mut conn = db::open(db_path)?;
    let stats = repository::sync_repository_sqlite(&mut conn, &backend, repo, &source)?;
    println!("Synchronized {}: {}", repo, stats);
    Ok(())
}

/// List stored packages of a category
pub fn cmd_list(db_path: &str, category: &str) -> Result<()> {
    let conn = db::open(db_path)?;
    let packages = db::sqlite::list_packages(&conn, category)?;

    if packages.is_empty() {
        println!("No packages in {}", category);
        return Ok(());
    }

    for stored in &packages {
        let description = stored.property("description").unwrap_or_default();
        if description.is_empty() {
            println!("{}", stored.package);
        } else {
            println!("{}  {}", stored.package, description);
        }
    }

    if category == CATEGORY
        && let Some(common) = db::sqlite::common_data(&conn, category)?
    {
        println!("\n{} packages from {}", packages.len(), common.repo_uri);
    } else {
        println!("\n{} packages", packages.len());
    }
    Ok(())
}

/// List configured repositories
pub fn cmd_repos(config_path: &Path) -> Result<()> {
    let backend = BackendConfig::load(config_path)?;
    if backend.repositories.is_empty() {
        println!("No repositories configured in {}", config_path.display());
        return Ok(());
    }

    println!("Repositories:");
    for (name, repo) in &backend.repositories {
        println!("  {}", name);
        println!("      {}", repo.repo_uri);
        if !repo.exclude.is_empty() {
            println!("      exclude: {}", repo.exclude.join(", "));
        }
    }
    Ok(())
}
