//! Mock source for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::source::{RawTorrentResult, Source, SourceError};

/// Mock implementation of the Source trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable raw results
/// - Track lookups and downloads for assertions
/// - Simulate failures and slow responses
///
/// # Example
///
/// ```rust,ignore
/// let source = Arc::new(
///     MockSource::new("archive").with_results(vec![fixtures::raw_result("Ubuntu", "50")]),
/// );
///
/// let results = source.lookup("ubuntu").await?;
/// assert_eq!(results.len(), 1);
/// assert_eq!(source.recorded_lookups().await, vec!["ubuntu".to_string()]);
/// ```
#[derive(Debug)]
pub struct MockSource {
    name: String,
    /// Results returned by every lookup.
    results: Arc<RwLock<Vec<RawTorrentResult>>>,
    /// Recorded lookup queries.
    lookups: Arc<RwLock<Vec<String>>>,
    /// Recorded download references.
    downloads: Arc<RwLock<Vec<String>>>,
    /// If set, every lookup fails with this message.
    lookup_failure: Arc<RwLock<Option<String>>>,
    /// If set, every download fails with this message.
    download_failure: Arc<RwLock<Option<String>>>,
    /// Path returned by successful downloads.
    download_path: PathBuf,
    /// Simulated response time for lookups.
    delay: Option<Duration>,
}

impl MockSource {
    /// Create a mock source with no results.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            results: Arc::new(RwLock::new(Vec::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            downloads: Arc::new(RwLock::new(Vec::new())),
            lookup_failure: Arc::new(RwLock::new(None)),
            download_failure: Arc::new(RwLock::new(None)),
            download_path: std::env::temp_dir().join(format!("{}.torrent", name)),
            delay: None,
        }
    }

    /// Return `results` from every lookup.
    pub fn with_results(mut self, results: Vec<RawTorrentResult>) -> Self {
        self.results = Arc::new(RwLock::new(results));
        self
    }

    /// Report `path` from every successful download.
    pub fn with_download_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_path = path.into();
        self
    }

    /// Wait `delay` before answering lookups.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every lookup fail.
    pub fn fail_lookups(mut self, message: &str) -> Self {
        self.lookup_failure = Arc::new(RwLock::new(Some(message.to_string())));
        self
    }

    /// Make every download fail.
    pub fn fail_downloads(mut self, message: &str) -> Self {
        self.download_failure = Arc::new(RwLock::new(Some(message.to_string())));
        self
    }

    /// Make subsequent lookups fail, or succeed again with `None`.
    pub async fn set_lookup_failure(&self, message: Option<&str>) {
        *self.lookup_failure.write().await = message.map(String::from);
    }

    /// Get recorded lookup queries.
    pub async fn recorded_lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }

    /// Get recorded download references.
    pub async fn recorded_downloads(&self) -> Vec<String> {
        self.downloads.read().await.clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, query: &str) -> Result<Vec<RawTorrentResult>, SourceError> {
        self.lookups.write().await.push(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.lookup_failure.read().await.clone() {
            return Err(SourceError::ApiError(message));
        }

        Ok(self.results.read().await.clone())
    }

    async fn download(&self, reference: &str) -> Result<PathBuf, SourceError> {
        self.downloads.write().await.push(reference.to_string());

        if let Some(message) = self.download_failure.read().await.clone() {
            return Err(SourceError::ApiError(message));
        }

        Ok(self.download_path.clone())
    }
}
