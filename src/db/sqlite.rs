// src/db/sqlite.rs

//! SQLite-backed package database

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::{Map, Value};

use super::{CommonData, Package, PackageDb, PackageProperties};
use crate::error::{Error, Result};

/// [`PackageDb`] writing to an open SQLite connection
///
/// Accepts any connection, including a `rusqlite::Transaction` through
/// deref, so a whole sync can be committed or discarded at once.
pub struct SqlitePackageDb<'c> {
    conn: &'c Connection,
}

impl<'c> SqlitePackageDb<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Remove every package of `category`, keeping the category itself
    pub fn clear_packages(&self, category: &str) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM packages WHERE category = ?1", [category])?;
        Ok(removed)
    }
}

impl PackageDb for SqlitePackageDb<'_> {
    fn add_category(&mut self, category: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
            [category],
        )?;
        Ok(())
    }

    fn set_common_data(&mut self, category: &str, data: &CommonData) -> Result<()> {
        let json = serde_json::to_string(data)?;
        self.conn.execute(
            "INSERT INTO common_data (category, data, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(category) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
            params![category, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn add_package(&mut self, package: &Package, properties: &PackageProperties) -> Result<()> {
        let json = serde_json::to_string(&properties.to_map())?;
        self.conn.execute(
            "INSERT INTO packages (category, name, version, properties, synced_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(category, name, version) DO UPDATE
             SET properties = excluded.properties, synced_at = excluded.synced_at",
            params![
                &package.category,
                &package.name,
                &package.version,
                json,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

/// A package row read back from the database
#[derive(Debug, Clone)]
pub struct StoredPackage {
    pub package: Package,
    pub properties: Map<String, Value>,
    pub synced_at: String,
}

impl StoredPackage {
    /// Property as a string, if present and textual
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Dependency atoms in stored order
    pub fn dependencies(&self) -> Vec<String> {
        self.properties
            .get("dependencies")
            .and_then(Value::as_array)
            .map(|deps| {
                deps.iter()
                    .filter_map(|d| d.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn from_row(row: &Row) -> rusqlite::Result<(Package, String, String)> {
        Ok((
            Package::new(
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ),
            row.get(3)?,
            row.get(4)?,
        ))
    }

    fn decode((package, properties, synced_at): (Package, String, String)) -> Result<Self> {
        let properties = match serde_json::from_str::<Value>(&properties)? {
            Value::Object(map) => map,
            other => {
                return Err(Error::ParseError(format!(
                    "Stored properties for {package} are not an object: {other}"
                )));
            }
        };
        Ok(Self {
            package,
            properties,
            synced_at,
        })
    }
}

/// List all packages of `category`, ordered by name then version
pub fn list_packages(conn: &Connection, category: &str) -> Result<Vec<StoredPackage>> {
    let mut stmt = conn.prepare(
        "SELECT category, name, version, properties, synced_at
         FROM packages WHERE category = ?1 ORDER BY name, version",
    )?;

    let rows = stmt
        .query_map([category], StoredPackage::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(StoredPackage::decode).collect()
}

/// Find every stored version of `name` in `category`
pub fn find_package(conn: &Connection, category: &str, name: &str) -> Result<Vec<StoredPackage>> {
    let mut stmt = conn.prepare(
        "SELECT category, name, version, properties, synced_at
         FROM packages WHERE category = ?1 AND name = ?2 ORDER BY version",
    )?;

    let rows = stmt
        .query_map([category, name], StoredPackage::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(StoredPackage::decode).collect()
}

/// Read the common data of `category`
pub fn common_data(conn: &Connection, category: &str) -> Result<Option<CommonData>> {
    let json: Option<String> = conn
        .query_row(
            "SELECT data FROM common_data WHERE category = ?1",
            [category],
            |row| row.get(0),
        )
        .optional()?;

    match json {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}
