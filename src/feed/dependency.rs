// src/feed/dependency.rs

//! Dependency name resolution
//!
//! Archive dependencies are bare package names (the version element is not
//! read), and every one of them refers to another package of the same
//! archive, so resolution is a fixed mapping into [`CATEGORY`]. The
//! configuration can veto names through its `ignore_dependencies` lists.

use crate::config::{ConfigLayers, IGNORE_DEPENDENCIES};
use crate::db::{CATEGORY, Dependency};

/// Map a dependency name to a package reference
///
/// Returns `None` for an empty name or one listed in any layer's
/// `ignore_dependencies`.
pub fn resolve_dependency(name: &str, layers: &ConfigLayers<'_>) -> Option<Dependency> {
    if name.is_empty() || layers.contains(IGNORE_DEPENDENCIES, name) {
        return None;
    }
    Some(Dependency::new(CATEGORY, name))
}
