// src/feed/validate.rs

//! Top-level archive format check

use crate::error::{Error, Result};
use crate::sexp::Sexp;

/// The only archive-contents format version understood
pub const FORMAT_VERSION: i64 = 1;

/// The fatal error for an unusable feed from `repo_uri`
pub fn format_error(repo_uri: &str) -> Error {
    Error::SyncError(format!(
        "sync failed: {repo_uri} bad archive contents format"
    ))
}

/// Check the format marker and return the entries that follow it
///
/// The feed must be a list whose first element is the integer
/// [`FORMAT_VERSION`]. Entries are returned untouched and in order.
pub fn validate<'f>(feed: &'f Sexp, repo_uri: &str) -> Result<&'f [Sexp]> {
    match feed {
        Sexp::List(items) if items.first() == Some(&Sexp::Int(FORMAT_VERSION)) => Ok(&items[1..]),
        _ => Err(format_error(repo_uri)),
    }
}
