//! archive.org source implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use regex_lite::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SourceConfig;

use super::{RawTorrentResult, Source, SourceError};

static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid file name pattern"));

/// archive.org search backend.
///
/// Lookups go through the advanced search JSON API. Results only carry a
/// details page; the torrent file is derived from the item identifier when
/// downloading.
pub struct ArchiveSource {
    name: String,
    client: Client,
    base_url: String,
    max_results: u32,
    download_dir: PathBuf,
    timeout: Duration,
}

impl ArchiveSource {
    /// Create a new ArchiveSource writing torrent files to `download_dir`.
    pub fn new(
        config: &SourceConfig,
        download_dir: PathBuf,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("torrengo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                SourceError::ConnectionFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self::with_client(config, download_dir, timeout, client))
    }

    fn with_client(
        config: &SourceConfig,
        download_dir: PathBuf,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            name: config.name.clone(),
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
            download_dir,
            timeout,
        }
    }

    /// Build the advanced search URL for a query.
    fn build_search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/advancedsearch.php?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        for field in ["identifier", "title", "item_size", "publicdate"] {
            url.push_str(&format!("&fl%5B%5D={}", field));
        }
        url.push_str(&format!("&rows={}&page=1&output=json", self.max_results));
        url
    }

    fn details_url(&self, identifier: &str) -> String {
        format!("{}/details/{}", self.base_url, identifier)
    }

    fn archive_torrent_url(&self, identifier: &str) -> String {
        format!(
            "{}/download/{}/{}_archive.torrent",
            self.base_url,
            urlencoding::encode(identifier),
            urlencoding::encode(identifier)
        )
    }

    /// Work out which URL to fetch for a reference, and the file stem to
    /// save it under.
    fn resolve_reference(&self, reference: &str) -> Result<(String, String), SourceError> {
        let reference = reference.trim();

        if reference.starts_with("magnet:") {
            return Err(SourceError::UnsupportedReference(format!(
                "{} cannot download magnet links",
                self.name
            )));
        }

        if let Some((_, rest)) = reference.split_once("/details/") {
            let identifier = rest
                .split(['/', '?', '#'])
                .next()
                .unwrap_or_default();
            if identifier.is_empty() {
                return Err(SourceError::UnsupportedReference(reference.to_string()));
            }
            return Ok((
                self.archive_torrent_url(identifier),
                identifier.to_string(),
            ));
        }

        let is_http = reference.starts_with("http://") || reference.starts_with("https://");
        let path = reference.split(['?', '#']).next().unwrap_or_default();
        if is_http && path.ends_with(".torrent") {
            let stem = path
                .rsplit('/')
                .next()
                .and_then(|file| file.strip_suffix(".torrent"))
                .unwrap_or_default();
            return Ok((reference.to_string(), stem.to_string()));
        }

        Err(SourceError::UnsupportedReference(reference.to_string()))
    }

    fn map_request_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout {
                timeout: self.timeout,
            }
        } else if e.is_connect() {
            SourceError::ConnectionFailed(e.to_string())
        } else {
            SourceError::ApiError(e.to_string())
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(response)
    }

    fn to_raw_result(&self, doc: ArchiveDoc) -> RawTorrentResult {
        RawTorrentResult {
            title: doc.title.as_ref().and_then(first_string),
            torrent_url: None,
            magnet_uri: None,
            details_url: Some(self.details_url(&doc.identifier)),
            size: doc.item_size.map(format_size),
            seeders: None,
            leechers: None,
            upload_date: doc.publicdate.as_deref().map(format_upload_date),
        }
    }
}

#[async_trait]
impl Source for ArchiveSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, query: &str) -> Result<Vec<RawTorrentResult>, SourceError> {
        let url = self.build_search_url(query);
        debug!(source = %self.name, query = %query, "Searching archive.org");

        let response: AdvancedSearchResponse = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::ParseError(e.to_string()))?;

        debug!(
            source = %self.name,
            results = response.response.docs.len(),
            "archive.org search complete"
        );

        Ok(response
            .response
            .docs
            .into_iter()
            .map(|doc| self.to_raw_result(doc))
            .collect())
    }

    async fn download(&self, reference: &str) -> Result<PathBuf, SourceError> {
        let (url, stem) = self.resolve_reference(reference)?;
        debug!(source = %self.name, url = %url, "Downloading torrent file");

        let bytes = self
            .get(&url)
            .await?
            .bytes()
            .await
            .map_err(|e| self.map_request_error(e))?;

        tokio::fs::create_dir_all(&self.download_dir).await?;
        let path = self
            .download_dir
            .join(format!("{}.torrent", sanitize_file_stem(&stem)));
        tokio::fs::write(&path, &bytes).await?;

        info!(
            source = %self.name,
            path = %path.display(),
            bytes = bytes.len(),
            "Torrent file saved"
        );
        Ok(path)
    }
}

/// Replace characters that are unsafe in file names.
fn sanitize_file_stem(stem: &str) -> String {
    let cleaned = UNSAFE_FILE_CHARS.replace_all(stem, "_");
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "torrent".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Human readable size label (1024-based).
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// archive.org dates are ISO 8601; only the day is worth showing.
fn format_upload_date(date_str: &str) -> String {
    DateTime::parse_from_rfc3339(date_str)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(date_str.get(..10).unwrap_or(date_str), "%Y-%m-%d"))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| date_str.to_string())
}

/// Titles are usually strings, occasionally arrays of strings.
fn first_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(first_string),
        _ => None,
    }
}

// archive.org advanced search response types
#[derive(Debug, Deserialize)]
struct AdvancedSearchResponse {
    response: AdvancedSearchBody,
}

#[derive(Debug, Deserialize)]
struct AdvancedSearchBody {
    #[serde(default)]
    docs: Vec<ArchiveDoc>,
}

#[derive(Debug, Deserialize)]
struct ArchiveDoc {
    identifier: String,
    #[serde(default)]
    title: Option<serde_json::Value>,
    #[serde(default)]
    item_size: Option<u64>,
    #[serde(default)]
    publicdate: Option<String>,
}
