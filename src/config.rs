// src/config.rs

//! Backend and repository configuration
//!
//! Configuration comes from one JSON file (by default
//! `/etc/g-sorcery/gs-elpa.json`) holding backend-wide settings and a table
//! of repositories:
//!
//! ```json
//! {
//!   "exclude": ["gnus"],
//!   "repositories": {
//!     "gnu-elpa": { "repo_uri": "https://elpa.gnu.org/packages/" },
//!     "melpa-stable": {
//!       "repo_uri": "https://stable.melpa.org/packages/",
//!       "exclude": ["org"]
//!     }
//!   }
//! }
//! ```
//!
//! Lookups that may be answered by either level go through [`ConfigLayers`],
//! an ordered list of sources where the first match wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Default location of the backend configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/g-sorcery/gs-elpa.json";

/// List name for package exclusions
pub const EXCLUDE: &str = "exclude";

/// List name for dependency names the resolver must drop
pub const IGNORE_DEPENDENCIES: &str = "ignore_dependencies";

/// Maintainer contact placed in each category's common data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    pub email: String,
    pub name: String,
}

fn default_maintainers() -> Vec<Maintainer> {
    vec![Maintainer {
        email: "gentoo@houseofsuns.org".to_string(),
        name: "Markus Walter".to_string(),
    }]
}

/// Backend-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Packages never emitted from any repository
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Dependency names dropped from every record
    #[serde(default)]
    pub ignore_dependencies: Vec<String>,

    /// Maintainers listed in the common data
    #[serde(default = "default_maintainers")]
    pub maintainer: Vec<Maintainer>,

    /// Known repositories by name
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryConfig>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            ignore_dependencies: Vec::new(),
            maintainer: default_maintainers(),
            repositories: BTreeMap::new(),
        }
    }
}

impl BackendConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::ConfigError(format!("Invalid backend config: {e}")))
    }

    /// Load the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Look up a repository by name
    pub fn repository(&self, name: &str) -> Result<&RepositoryConfig> {
        self.repositories
            .get(name)
            .ok_or_else(|| Error::NotFoundError(format!("Repository '{name}' is not configured")))
    }
}

/// Repository-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Base URI of the ELPA archive
    pub repo_uri: String,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub ignore_dependencies: Vec<String>,
}

impl RepositoryConfig {
    pub fn new(repo_uri: impl Into<String>) -> Self {
        Self {
            repo_uri: repo_uri.into(),
            exclude: Vec::new(),
            ignore_dependencies: Vec::new(),
        }
    }
}

/// A configuration object that can answer named list lookups
pub trait ConfigSource {
    /// Return the list called `name`, or `None` if this source has no such list
    fn list(&self, name: &str) -> Option<&[String]>;
}

impl ConfigSource for BackendConfig {
    fn list(&self, name: &str) -> Option<&[String]> {
        match name {
            EXCLUDE => Some(&self.exclude),
            IGNORE_DEPENDENCIES => Some(&self.ignore_dependencies),
            _ => None,
        }
    }
}

impl ConfigSource for RepositoryConfig {
    fn list(&self, name: &str) -> Option<&[String]> {
        match name {
            EXCLUDE => Some(&self.exclude),
            IGNORE_DEPENDENCIES => Some(&self.ignore_dependencies),
            _ => None,
        }
    }
}

/// Ordered configuration sources, highest priority first
#[derive(Default)]
pub struct ConfigLayers<'a> {
    layers: Vec<&'a dyn ConfigSource>,
}

impl<'a> ConfigLayers<'a> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Repository layer first, then the backend layer
    pub fn for_repository(backend: &'a BackendConfig, repo: &'a RepositoryConfig) -> Self {
        Self::new().with(repo).with(backend)
    }

    /// Append a lower-priority source
    pub fn with(mut self, source: &'a dyn ConfigSource) -> Self {
        self.layers.push(source);
        self
    }

    /// Check whether `value` appears in the list `name` of any layer
    ///
    /// Layers are consulted in order and the first one containing the value
    /// answers. A value absent from every layer is not contained.
    pub fn contains(&self, name: &str, value: &str) -> bool {
        self.layers
            .iter()
            .filter_map(|layer| layer.list(name))
            .any(|list| list.iter().any(|item| item == value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "exclude": ["gnus"],
        "repositories": {
            "gnu-elpa": { "repo_uri": "https://elpa.gnu.org/packages/" },
            "melpa-stable": {
                "repo_uri": "https://stable.melpa.org/packages/",
                "exclude": ["org"],
                "ignore_dependencies": ["emacs"]
            }
        }
    }"#;

    #[test]
    fn test_parse_backend_config() {
        let config = BackendConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.exclude, vec!["gnus"]);
        assert_eq!(config.repositories.len(), 2);
        assert_eq!(
            config.repository("melpa-stable").unwrap().repo_uri,
            "https://stable.melpa.org/packages/"
        );
        // maintainer falls back to the built-in entry
        assert_eq!(config.maintainer, default_maintainers());
    }

    #[test]
    fn test_unknown_repository() {
        let config = BackendConfig::from_json(SAMPLE).unwrap();
        assert!(matches!(
            config.repository("marmalade"),
            Err(Error::NotFoundError(_))
        ));
    }

    #[test]
    fn test_repo_uri_is_required() {
        let err = BackendConfig::from_json(r#"{"repositories": {"x": {}}}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_layers_check_every_source() {
        let config = BackendConfig::from_json(SAMPLE).unwrap();
        let repo = config.repository("melpa-stable").unwrap();
        let layers = ConfigLayers::for_repository(&config, repo);

        assert!(layers.contains(EXCLUDE, "org"));
        assert!(layers.contains(EXCLUDE, "gnus"));
        assert!(!layers.contains(EXCLUDE, "magit"));
        assert!(layers.contains(IGNORE_DEPENDENCIES, "emacs"));
    }

    #[test]
    fn test_layers_match_exactly() {
        let config = BackendConfig::from_json(SAMPLE).unwrap();
        let repo = config.repository("gnu-elpa").unwrap();
        let layers = ConfigLayers::for_repository(&config, repo);

        assert!(!layers.contains(EXCLUDE, "Gnus"));
        assert!(!layers.contains(EXCLUDE, "gnus "));
        assert!(!layers.contains("unknown-list", "gnus"));
    }

    #[test]
    fn test_empty_layers_contain_nothing() {
        assert!(!ConfigLayers::new().contains(EXCLUDE, "anything"));
    }
}
