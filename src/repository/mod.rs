// src/repository/mod.rs

//! Repository retrieval and synchronization
//!
//! This module provides functionality for:
//! - Building the download list of an ELPA archive
//! - Fetching archive files over HTTP with retries
//! - Running a full sync into a package database

mod client;
mod sync;

pub use client::{DownloadUri, ParseFn, RepositoryClient, download_uris, load_data, parse_sexp};
pub use sync::{FeedSource, load_feed, sync_repository, sync_repository_sqlite};
