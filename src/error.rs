// src/error.rs

//! Error types for gs-elpa
//!
//! A sync either fails as a whole (`SyncError`) or succeeds with whatever
//! entries survived normalization. Per-entry anomalies never surface here.

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can escape the library
#[derive(Error, Debug)]
pub enum Error {
    /// The feed cannot be used at all (wrong or missing format marker)
    #[error("{0}")]
    SyncError(String),

    /// Malformed S-expression text
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Remote retrieval failed
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    IoError(String),

    /// A component could not be set up
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Requested item does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<crate::sexp::SexpError> for Error {
    fn from(err: crate::sexp::SexpError) -> Self {
        Error::ParseError(err.to_string())
    }
}
