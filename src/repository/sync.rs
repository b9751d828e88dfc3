// src/repository/sync.rs

//! Repository synchronization
//!
//! Loads a repository's archive index (from the network or a local copy) and
//! runs it through the transcoder into a package database.

use crate::config::{BackendConfig, RepositoryConfig};
use crate::db::{self, CATEGORY, PackageDb, SqlitePackageDb};
use crate::error::{Error, Result};
use crate::feed::{FeedData, FeedTranscoder, SyncStats};
use rusqlite::Connection;
use std::path::PathBuf;
use tracing::{debug, info};

use super::client::{RepositoryClient, download_uris, load_data};

/// Where the archive index is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Fetch from the repository's base URI
    Remote,
    /// Read a local copy of `archive-contents`
    File(PathBuf),
}

/// Load the parsed repository files from `source`
pub fn load_feed(repo: &RepositoryConfig, source: &FeedSource) -> Result<FeedData> {
    match source {
        FeedSource::Remote => RepositoryClient::new()?.load_repository(repo),
        FeedSource::File(path) => {
            let uris = download_uris(repo)?;
            load_data(&uris, |uri| {
                debug!("Reading {} from {}", uri, path.display());
                std::fs::read_to_string(path).map_err(|e| {
                    Error::IoError(format!("Failed to read {}: {e}", path.display()))
                })
            })
        }
    }
}

/// Synchronize repository `repo_name` into `db`
///
/// Unknown repository names fail with `NotFoundError` before anything is
/// loaded.
pub fn sync_repository<D: PackageDb + ?Sized>(
    db: &mut D,
    backend: &BackendConfig,
    repo_name: &str,
    source: &FeedSource,
) -> Result<SyncStats> {
    let repo = backend.repository(repo_name)?;
    let data = load_feed(repo, source)?;
    transcode(db, backend, repo_name, repo, &data)
}

/// Synchronize repository `repo_name` into an SQLite database
///
/// The previous packages of the category are replaced inside a single
/// transaction, so a failed sync leaves the database as it was.
pub fn sync_repository_sqlite(
    conn: &mut Connection,
    backend: &BackendConfig,
    repo_name: &str,
    source: &FeedSource,
) -> Result<SyncStats> {
    let repo = backend.repository(repo_name)?;
    let data = load_feed(repo, source)?;

    db::transaction(conn, |tx| {
        let mut package_db = SqlitePackageDb::new(tx);
        let removed = package_db.clear_packages(CATEGORY)?;
        debug!("Cleared {} previously synced packages", removed);
        transcode(&mut package_db, backend, repo_name, repo, &data)
    })
}

fn transcode<D: PackageDb + ?Sized>(
    db: &mut D,
    backend: &BackendConfig,
    repo_name: &str,
    repo: &RepositoryConfig,
    data: &FeedData,
) -> Result<SyncStats> {
    info!("Synchronizing repository: {}", repo_name);
    let stats = FeedTranscoder::new(backend, repo).process_data(db, data)?;
    info!("Repository {} synchronized: {}", repo_name, stats);
    Ok(stats)
}
