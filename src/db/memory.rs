// src/db/memory.rs

//! In-memory package database

use std::collections::BTreeMap;

use super::{CommonData, Package, PackageDb, PackageProperties, PackageRecord};
use crate::error::{Error, Result};

/// Package database held entirely in memory
///
/// Packages are kept in insertion order. Used for dry runs and as the
/// reference implementation of [`PackageDb`] in tests.
#[derive(Debug, Default)]
pub struct MemoryPackageDb {
    categories: Vec<String>,
    common_data: BTreeMap<String, CommonData>,
    packages: Vec<PackageRecord>,
}

impl MemoryPackageDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn common_data(&self, category: &str) -> Option<&CommonData> {
        self.common_data.get(category)
    }

    /// All stored records in insertion order
    pub fn packages(&self) -> &[PackageRecord] {
        &self.packages
    }

    /// Find the record for `name` in `category`
    pub fn find(&self, category: &str, name: &str) -> Option<&PackageRecord> {
        self.packages
            .iter()
            .find(|r| r.package.category == category && r.package.name == name)
    }

    fn require_category(&self, category: &str) -> Result<()> {
        if self.categories.iter().any(|c| c == category) {
            Ok(())
        } else {
            Err(Error::NotFoundError(format!(
                "Category '{category}' has not been added"
            )))
        }
    }
}

impl PackageDb for MemoryPackageDb {
    fn add_category(&mut self, category: &str) -> Result<()> {
        if !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_string());
        }
        Ok(())
    }

    fn set_common_data(&mut self, category: &str, data: &CommonData) -> Result<()> {
        self.require_category(category)?;
        self.common_data.insert(category.to_string(), data.clone());
        Ok(())
    }

    fn add_package(&mut self, package: &Package, properties: &PackageProperties) -> Result<()> {
        self.require_category(&package.category)?;
        let record = PackageRecord {
            package: package.clone(),
            properties: properties.clone(),
        };
        match self.packages.iter_mut().find(|r| r.package == *package) {
            Some(existing) => *existing = record,
            None => self.packages.push(record),
        }
        Ok(())
    }
}
