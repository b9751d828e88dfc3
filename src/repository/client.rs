// src/repository/client.rs

//! HTTP client for ELPA archives
//!
//! Provides a wrapper around reqwest with retry support, and the list of
//! files a repository sync has to fetch.

use crate::config::RepositoryConfig;
use crate::error::{Error, Result};
use crate::feed::{ARCHIVE_CONTENTS, FeedData};
use crate::sexp::{self, Sexp};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum attempts for a failed fetch
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Parser turning fetched text into a parsed file
pub type ParseFn = fn(&str) -> Result<Sexp>;

/// A file to fetch for a repository
#[derive(Debug, Clone)]
pub struct DownloadUri {
    /// Logical name the parsed file is stored under
    pub name: String,
    pub uri: Url,
    pub parser: ParseFn,
}

/// Parse archive text as a single S-expression
pub fn parse_sexp(text: &str) -> Result<Sexp> {
    Ok(sexp::parse(text)?)
}

/// Files to fetch for `repo`
///
/// The archive index lives at `archive-contents` relative to the base URI,
/// resolved with URL join rules (a base without a trailing slash loses its
/// last path segment).
pub fn download_uris(repo: &RepositoryConfig) -> Result<Vec<DownloadUri>> {
    let base = Url::parse(&repo.repo_uri)?;
    Ok(vec![DownloadUri {
        name: ARCHIVE_CONTENTS.to_string(),
        uri: base.join(ARCHIVE_CONTENTS)?,
        parser: parse_sexp,
    }])
}

/// Fetch and parse every file in `uris`
///
/// `fetch` returns the text at a URI; a fetch or parse failure aborts the
/// load.
pub fn load_data<F>(uris: &[DownloadUri], mut fetch: F) -> Result<FeedData>
where
    F: FnMut(&Url) -> Result<String>,
{
    let mut data = FeedData::new();
    for download in uris {
        let text = fetch(&download.uri)?;
        debug!("Parsing {} ({} bytes)", download.name, text.len());
        let parsed = (download.parser)(&text).map_err(|e| match e {
            Error::ParseError(msg) => Error::ParseError(format!("{}: {msg}", download.uri)),
            other => other,
        })?;
        data.insert(download.name.clone(), parsed);
    }
    Ok(data)
}

/// HTTP client wrapper with retry support
pub struct RepositoryClient {
    client: Client,
    max_retries: u32,
}

impl RepositoryClient {
    /// Create a new repository client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Fetch a URL as text with retry support
    ///
    /// Connection failures are retried; an HTTP error status is returned
    /// immediately.
    pub fn fetch_text(&self, url: &Url) -> Result<String> {
        info!("Fetching {}", url);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url.as_str()).send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        return Err(Error::DownloadError(format!(
                            "HTTP {} from {}",
                            response.status(),
                            url
                        )));
                    }

                    return response.text().map_err(|e| {
                        Error::DownloadError(format!("Failed to read response from {url}: {e}"))
                    });
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::DownloadError(format!(
                            "Failed to fetch {url} after {attempt} attempts: {e}"
                        )));
                    }
                    warn!("Fetch attempt {} for {} failed: {}, retrying...", attempt, url, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }

    /// Fetch and parse every file of `repo`
    pub fn load_repository(&self, repo: &RepositoryConfig) -> Result<FeedData> {
        let uris = download_uris(repo)?;
        load_data(&uris, |url| self.fetch_text(url))
    }
}
