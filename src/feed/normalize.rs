// src/feed/normalize.rs

//! Per-entry normalization
//!
//! Turns one raw archive entry into a [`PackageRecord`], or explains why the
//! entry was left out. No outcome here is an error: the worst case for an
//! entry is that it is skipped.

use std::fmt;

use tracing::trace;

use super::FeedTranscoder;
use super::raw::{RawDependencies, dependency_name, entry_info, entry_name};
use crate::config::EXCLUDE;
use crate::db::{CATEGORY, DependencyList, Package, PackageProperties, PackageRecord};
use crate::sexp::Sexp;

/// Whether `c` may appear in a stored description
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '+' | '_' | '-' | ' ' | '.' | '(' | ')' | '[' | ']' | '{' | '}' | ','
        )
}

/// Remove every character outside the allowed set, keeping order
pub fn sanitize_description(text: &str) -> String {
    text.chars().filter(|c| is_allowed_char(*c)).collect()
}

/// Why an entry produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Not a `(name . info)` pair with enough info fields
    MalformedEntry,
    /// Version is not a sequence of integers
    MalformedVersion,
    EmptyVersion,
    /// At least one version component is negative
    NegativeVersion,
    MalformedDescription,
    MalformedSourceType,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::MalformedEntry => "malformed entry",
            DropReason::MalformedVersion => "version is not a list of integers",
            DropReason::EmptyVersion => "empty version",
            DropReason::NegativeVersion => "negative version component",
            DropReason::MalformedDescription => "description is not text",
            DropReason::MalformedSourceType => "source type is not text",
        };
        f.write_str(text)
    }
}

/// Result of normalizing one entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Accepted {
        record: PackageRecord,
        /// Dependency items that did not resolve
        dropped_dependencies: usize,
    },
    /// Name listed in an `exclude` list
    Excluded(String),
    Dropped {
        name: Option<String>,
        reason: DropReason,
    },
}

impl EntryOutcome {
    pub fn into_record(self) -> Option<PackageRecord> {
        match self {
            EntryOutcome::Accepted { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Dot-joined display version from a sequence of non-negative integers
pub fn parse_version(node: &Sexp) -> Result<String, DropReason> {
    let items = node.as_items().ok_or(DropReason::MalformedVersion)?;
    let components = items
        .iter()
        .map(Sexp::as_integer_text)
        .collect::<Option<Vec<_>>>()
        .ok_or(DropReason::MalformedVersion)?;

    if components.is_empty() {
        return Err(DropReason::EmptyVersion);
    }
    if components.iter().any(|n| n.starts_with('-')) {
        return Err(DropReason::NegativeVersion);
    }

    Ok(components.join("."))
}

fn description_text(node: &Sexp) -> Result<String, DropReason> {
    if node.is_nil() {
        return Ok(String::new());
    }
    node.as_text()
        .map(|text| sanitize_description(&text))
        .ok_or(DropReason::MalformedDescription)
}

impl FeedTranscoder<'_> {
    /// Normalize one entry into a record, or `None` if it is skipped
    pub fn normalize(&self, entry: &Sexp) -> Option<PackageRecord> {
        self.classify(entry).into_record()
    }

    /// Normalize one entry, keeping the reason when it is skipped
    pub fn classify(&self, entry: &Sexp) -> EntryOutcome {
        let Some(realname) = entry_name(entry) else {
            return EntryOutcome::Dropped {
                name: None,
                reason: DropReason::MalformedEntry,
            };
        };
        let realname = realname.into_owned();

        if self.layers().contains(EXCLUDE, &realname) {
            return EntryOutcome::Excluded(realname);
        }

        let dropped = |reason| EntryOutcome::Dropped {
            name: Some(realname.clone()),
            reason,
        };

        let Some(info) = entry_info(entry) else {
            return dropped(DropReason::MalformedEntry);
        };

        let version = match parse_version(info.version) {
            Ok(version) => version,
            Err(reason) => return dropped(reason),
        };

        let description = match description_text(info.description) {
            Ok(description) => description,
            Err(reason) => return dropped(reason),
        };

        let Some(source_type) = info.source_type.as_text() else {
            return dropped(DropReason::MalformedSourceType);
        };

        let (dependencies, dropped_dependencies) =
            self.extract_dependencies(&realname, RawDependencies::from_sexp(info.dependencies));

        let record = PackageRecord {
            package: Package::new(CATEGORY, realname.as_str(), version),
            properties: PackageProperties {
                source_type: source_type.into_owned(),
                description,
                dependencies,
                realname,
            },
        };

        EntryOutcome::Accepted {
            record,
            dropped_dependencies,
        }
    }

    /// Resolve the dependency slot, counting items that were skipped
    fn extract_dependencies(&self, realname: &str, raw: RawDependencies<'_>) -> (DependencyList, usize) {
        let items = match raw {
            RawDependencies::Pairs(items) => items,
            RawDependencies::Text(text) => {
                trace!("{}: dependency slot holds text {:?}", realname, text);
                return (DependencyList::new(), 0);
            }
            RawDependencies::Malformed => {
                trace!("{}: unusable dependency slot", realname);
                return (DependencyList::new(), 0);
            }
        };

        let mut dependencies = DependencyList::new();
        let mut skipped = 0;
        for item in items {
            match dependency_name(item).and_then(|name| self.resolve_dependency(&name)) {
                Some(dep) => dependencies.push(dep),
                None => {
                    trace!("{}: skipping dependency {}", realname, item);
                    skipped += 1;
                }
            }
        }
        (dependencies, skipped)
    }
}
