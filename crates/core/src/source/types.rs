//! Types shared by all source adapters.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A result as scraped from a website, before normalization.
///
/// Every field is optional and textual: websites disagree on what they
/// report and how they format it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTorrentResult {
    pub title: Option<String>,
    /// Direct .torrent download URL.
    pub torrent_url: Option<String>,
    pub magnet_uri: Option<String>,
    /// Page on the website that links to the torrent file.
    pub details_url: Option<String>,
    pub size: Option<String>,
    pub seeders: Option<String>,
    pub leechers: Option<String>,
    pub upload_date: Option<String>,
}

/// Errors from a single source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Unsupported reference: {0}")]
    UnsupportedReference(String),

    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`SourceError`] attributed to the source that produced it.
#[derive(Debug, Error)]
#[error("{source_name}: {error}")]
pub struct SourceFailure {
    pub source_name: String,
    #[source]
    pub error: SourceError,
}

impl SourceFailure {
    pub fn new(source_name: impl Into<String>, error: SourceError) -> Self {
        Self {
            source_name: source_name.into(),
            error,
        }
    }
}

/// A torrent-indexing website.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable name used for routing and error attribution.
    fn name(&self) -> &str;

    /// Search the website.
    async fn lookup(&self, query: &str) -> Result<Vec<RawTorrentResult>, SourceError>;

    /// Fetch the torrent file behind `reference` (a details page, a .torrent
    /// URL or a magnet URI) and return where it was written.
    async fn download(&self, reference: &str) -> Result<PathBuf, SourceError>;
}
