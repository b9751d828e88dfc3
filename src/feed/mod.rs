// src/feed/mod.rs

//! ELPA archive transcoding
//!
//! An ELPA archive publishes its index as a single S-expression file,
//! `archive-contents`:
//!
//! ```text
//! (1
//!  (ace-window . [(0 10 0) ((avy (0 5 0))) "Quickly switch windows." single
//!                 ((:url . "https://github.com/abo-abo/ace-window"))])
//!  ...)
//! ```
//!
//! The leading integer is the format version; each following element is one
//! package. [`FeedTranscoder`] checks the format, normalizes each entry into
//! a [`PackageRecord`](crate::db::PackageRecord) and hands the records to a
//! [`PackageDb`](crate::db::PackageDb). A bad format marker is the only
//! fatal condition. Individual entries that cannot be used are skipped.

mod dependency;
mod emit;
mod normalize;
mod raw;
mod validate;

pub use dependency::resolve_dependency;
pub use normalize::{DropReason, EntryOutcome, is_allowed_char, parse_version, sanitize_description};
pub use raw::RawDependencies;
pub use validate::{FORMAT_VERSION, format_error, validate};

use std::collections::HashMap;
use std::fmt;

use crate::config::{BackendConfig, ConfigLayers, Maintainer, RepositoryConfig};
use crate::db::{CommonData, Dependency};
use crate::sexp::Sexp;

/// Logical name of the archive index file
pub const ARCHIVE_CONTENTS: &str = "archive-contents";

/// Parsed files of one repository, keyed by logical name
pub type FeedData = HashMap<String, Sexp>;

/// Converts one repository's feed into package records
pub struct FeedTranscoder<'a> {
    layers: ConfigLayers<'a>,
    repo_uri: &'a str,
    maintainer: &'a [Maintainer],
}

impl<'a> FeedTranscoder<'a> {
    pub fn new(backend: &'a BackendConfig, repo: &'a RepositoryConfig) -> Self {
        Self {
            layers: ConfigLayers::for_repository(backend, repo),
            repo_uri: &repo.repo_uri,
            maintainer: &backend.maintainer,
        }
    }

    pub fn repo_uri(&self) -> &str {
        self.repo_uri
    }

    pub(crate) fn layers(&self) -> &ConfigLayers<'a> {
        &self.layers
    }

    /// Common data for the repository's category
    pub fn common_data(&self) -> CommonData {
        CommonData::for_repository(self.repo_uri, self.maintainer)
    }

    /// Resolve a dependency name against this repository's configuration
    pub fn resolve_dependency(&self, name: &str) -> Option<Dependency> {
        resolve_dependency(name, &self.layers)
    }
}

/// Counters for one transcoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Records handed to the database
    pub added: usize,
    /// Entries named in an exclude list
    pub excluded: usize,
    /// Entries dropped as unusable
    pub skipped: usize,
    /// Individual dependency items left out of accepted records
    pub dependencies_dropped: usize,
}

impl SyncStats {
    /// Number of entries seen
    pub fn total(&self) -> usize {
        self.added + self.excluded + self.skipped
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} excluded, {} skipped",
            self.added, self.excluded, self.skipped
        )?;
        if self.dependencies_dropped > 0 {
            write!(f, " ({} dependencies dropped)", self.dependencies_dropped)?;
        }
        Ok(())
    }
}
