// src/db/models.rs

//! Package database entities
//!
//! These are the values handed to a [`PackageDb`](super::PackageDb): the
//! package identity, its property mapping, and the per-category common data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

use crate::config::Maintainer;

/// Category every ELPA package is placed in
pub const CATEGORY: &str = "app-emacs";

/// Metadata classes every generated package inherits
pub const ECLASSES: [&str; 2] = ["g-sorcery", "gs-elpa"];

/// Identity of one package version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Package {
    pub category: String,
    pub name: String,
    pub version: String,
}

impl Package {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}-{}", self.category, self.name, self.version)
    }
}

/// Reference to a package another package depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub category: String,
    pub package: String,
}

impl Dependency {
    pub fn new(category: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            package: package.into(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.package)
    }
}

/// Ordered dependency list; duplicates are kept
///
/// Renders one atom per line, tab-indented after the first, which is the
/// layout ebuild `DEPEND` blocks use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyList(Vec<Dependency>);

impl DependencyList {
    /// Separator between rendered atoms
    pub const SEPARATOR: &'static str = "\n\t";

    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, dependency: Dependency) {
        self.0.push(dependency);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Dependency] {
        &self.0
    }
}

impl From<Vec<Dependency>> for DependencyList {
    fn from(deps: Vec<Dependency>) -> Self {
        Self(deps)
    }
}

impl FromIterator<Dependency> for DependencyList {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DependencyList {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for DependencyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dep) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(Self::SEPARATOR)?;
            }
            write!(f, "{dep}")?;
        }
        Ok(())
    }
}

/// Properties stored alongside a package
///
/// The description and the dependency list are each held once. The
/// `longdescription`, `depend` and `rdepend` keys are produced from the same
/// values when the mapping is built, so they cannot diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageProperties {
    /// Name exactly as it appears in the feed
    pub realname: String,
    pub source_type: String,
    pub description: String,
    pub dependencies: DependencyList,
}

impl PackageProperties {
    pub fn longdescription(&self) -> &str {
        &self.description
    }

    pub fn depend(&self) -> &DependencyList {
        &self.dependencies
    }

    pub fn rdepend(&self) -> &DependencyList {
        &self.dependencies
    }

    /// Full key/value mapping handed to the database
    pub fn to_map(&self) -> Map<String, Value> {
        let deps: Vec<String> = self.dependencies.iter().map(ToString::to_string).collect();
        let mut map = Map::new();
        map.insert("source_type".into(), json!(self.source_type));
        map.insert("description".into(), json!(self.description));
        map.insert("longdescription".into(), json!(self.description));
        map.insert("dependencies".into(), json!(deps));
        map.insert("depend".into(), json!(deps));
        map.insert("rdepend".into(), json!(deps));
        map.insert("realname".into(), json!(self.realname));
        map
    }
}

/// One normalized package ready for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub package: Package,
    pub properties: PackageProperties,
}

/// Metadata shared by every package of a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonData {
    pub eclasses: Vec<String>,
    pub maintainer: Vec<Maintainer>,
    pub homepage: String,
    pub repo_uri: String,
}

impl CommonData {
    /// Common data for a repository rooted at `repo_uri`
    pub fn for_repository(repo_uri: &str, maintainer: &[Maintainer]) -> Self {
        Self {
            eclasses: ECLASSES.iter().map(|s| s.to_string()).collect(),
            maintainer: maintainer.to_vec(),
            homepage: repo_uri.to_string(),
            repo_uri: repo_uri.to_string(),
        }
    }
}
