//! Types for the search pipeline.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::config::ALL_SOURCES;
use crate::source::{SourceError, SourceFailure};

/// A search result in canonical form, whatever website it came from.
///
/// Built by [`normalize`](super::normalize) and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Torrent {
    pub(crate) file_ref: Option<String>,
    pub(crate) descriptor_ref: Option<String>,
    pub(crate) name: String,
    pub(crate) size: String,
    pub(crate) seeders: u32,
    pub(crate) leechers: u32,
    pub(crate) upload_date: String,
    pub(crate) source: String,
}

impl Torrent {
    /// Direct .torrent URL or magnet URI.
    pub fn file_ref(&self) -> Option<&str> {
        self.file_ref.as_deref()
    }

    /// Page that links to the torrent file.
    pub fn descriptor_ref(&self) -> Option<&str> {
        self.descriptor_ref.as_deref()
    }

    /// What to hand to the source when downloading. The descriptor page is
    /// preferred since some websites only expose the file through it.
    pub fn download_ref(&self) -> &str {
        self.descriptor_ref
            .as_deref()
            .or(self.file_ref.as_deref())
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn seeders(&self) -> u32 {
        self.seeders
    }

    pub fn leechers(&self) -> u32 {
        self.leechers
    }

    pub fn upload_date(&self) -> &str {
        &self.upload_date
    }

    /// Name of the source that produced this torrent.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Which sources a search goes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// Every configured source.
    All,
    Named(String),
}

impl TargetSource {
    /// Parse a `-w` value. `"all"` selects every source.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "" => Err(ValidationError::EmptySource),
            ALL_SOURCES => Ok(TargetSource::All),
            name => Ok(TargetSource::Named(name.to_string())),
        }
    }
}

impl fmt::Display for TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSource::All => f.write_str(ALL_SOURCES),
            TargetSource::Named(name) => f.write_str(name),
        }
    }
}

/// Invalid user input, caught before anything is searched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("user input should not be empty")]
    EmptyQuery,

    #[error("source name should not be empty")]
    EmptySource,
}

/// A validated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    query: String,
    target: TargetSource,
}

impl SearchRequest {
    /// Trim `query` and reject it if nothing is left.
    pub fn new(query: &str, target: TargetSource) -> Result<Self, ValidationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        Ok(Self {
            query: query.to_string(),
            target,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn target(&self) -> &TargetSource {
        &self.target
    }
}

/// Merged results of one search.
#[derive(Debug)]
pub struct SearchResult {
    /// Results grouped by source, in source configuration order.
    pub torrents: Vec<Torrent>,
    /// Sources that failed while others answered.
    pub source_errors: Vec<SourceFailure>,
    /// How long the search took in milliseconds.
    pub duration_ms: u64,
}

/// Errors that end a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Unknown source: {name} (available: {available})")]
    UnknownSource { name: String, available: String },

    #[error("No sources configured")]
    NoSources,

    #[error("Search on {source_name} failed: {error}")]
    Source {
        source_name: String,
        #[source]
        error: SourceError,
    },

    #[error("All sources failed: {}", format_failures(.0))]
    AllSourcesFailed(Vec<SourceFailure>),
}

fn format_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
