// src/db/mod.rs

//! Package database
//!
//! The transcoder only needs three operations from a database, captured by
//! [`PackageDb`]. Two implementations are provided: [`MemoryPackageDb`] for
//! dry runs and tests, and [`SqlitePackageDb`] for persistent storage.

pub mod memory;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryPackageDb;
pub use models::{
    CATEGORY, CommonData, Dependency, DependencyList, Package, PackageProperties, PackageRecord,
};
pub use sqlite::SqlitePackageDb;

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::info;

/// Storage collaborator used by the transcoder
pub trait PackageDb {
    /// Register a category; registering an existing category is a no-op
    fn add_category(&mut self, category: &str) -> Result<()>;

    /// Set the metadata shared by all packages in `category`
    fn set_common_data(&mut self, category: &str, data: &CommonData) -> Result<()>;

    /// Store a package with its properties
    fn add_package(&mut self, package: &Package, properties: &PackageProperties) -> Result<()>;
}

/// Create a new database file with the current schema
pub fn init(db_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(db_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::InitError(format!(
                "Failed to create database directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let conn = Connection::open(db_path)?;
    schema::migrate(&conn)?;
    info!("Initialized package database at {}", db_path);
    Ok(())
}

/// Open an existing database
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        return Err(Error::NotFoundError(format!(
            "Database not found at {db_path}; run `gs-elpa init` first"
        )));
    }

    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::migrate(&conn)?;
    Ok(conn)
}

/// Run `f` inside a transaction, committing only if it succeeds
pub fn transaction<F, T>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let result = f(&tx)?;
    tx.commit()?;
    Ok(result)
}
