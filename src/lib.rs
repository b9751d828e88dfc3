// src/lib.rs

//! gs-elpa: ELPA archive transcoder
//!
//! Reads the `archive-contents` index published by an Emacs Lisp Package
//! Archive and turns every usable entry into a package record in the
//! `app-emacs` category of a package database.
//!
//! # Architecture
//!
//! - `sexp`: reader for the S-expression text of the index
//! - `feed`: format check, per-entry normalization and record emission
//! - `db`: the database collaborator (in memory or SQLite)
//! - `repository`: retrieval and sync orchestration
//! - `config`: backend and repository configuration layers

pub mod config;
pub mod db;
mod error;
pub mod feed;
pub mod repository;
pub mod sexp;

pub use config::{BackendConfig, ConfigLayers, ConfigSource, RepositoryConfig};
pub use db::{PackageDb, PackageRecord};
pub use error::{Error, Result};
pub use feed::{FeedData, FeedTranscoder, SyncStats};
