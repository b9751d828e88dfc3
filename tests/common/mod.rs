// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use gs_elpa::config::{BackendConfig, RepositoryConfig};
use gs_elpa::db::{self, MemoryPackageDb};
use gs_elpa::feed::{ARCHIVE_CONTENTS, FeedData, FeedTranscoder};
use gs_elpa::{Result, SyncStats, sexp};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

pub const GNU_ELPA: &str = "https://elpa.gnu.org/packages/";

/// Backend config with a single `gnu` repository
pub fn backend_config() -> BackendConfig {
    BackendConfig::from_json(&format!(
        r#"{{"repositories": {{"gnu": {{"repo_uri": "{GNU_ELPA}"}}}}}}"#
    ))
    .unwrap()
}

/// Wrap feed text into the data map a transcoder consumes
pub fn feed_data(text: &str) -> FeedData {
    let mut data = FeedData::new();
    data.insert(ARCHIVE_CONTENTS.to_string(), sexp::parse(text).unwrap());
    data
}

/// Transcode `text` into a fresh in-memory database
pub fn transcode(
    backend: &BackendConfig,
    repo: &RepositoryConfig,
    text: &str,
) -> (Result<SyncStats>, MemoryPackageDb) {
    let mut package_db = MemoryPackageDb::new();
    let result = FeedTranscoder::new(backend, repo).process_data(&mut package_db, &feed_data(text));
    (result, package_db)
}

/// Transcode with default configuration
pub fn transcode_default(text: &str) -> (Result<SyncStats>, MemoryPackageDb) {
    transcode(&BackendConfig::default(), &RepositoryConfig::new(GNU_ELPA), text)
}

/// Create an initialized database file.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_test_db() -> (TempDir, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("gnu.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    (temp_dir, db_path)
}

/// Write feed text to a temporary archive-contents file
pub fn feed_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}
