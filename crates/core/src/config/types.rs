use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sentinel source name meaning "every configured source".
pub const ALL_SOURCES: &str = "all";

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            download: DownloadConfig::default(),
            client: ClientConfig::default(),
            sources: default_sources(),
        }
    }
}

impl Config {
    /// Sources that are switched on, in configuration order.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }
}

/// Search behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Source used when `-w` is not given ("all" or a source name).
    #[serde(default = "default_source")]
    pub default_source: String,
    /// Deadline for a single source lookup.
    #[serde(default = "default_source_timeout")]
    pub source_timeout_secs: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            source_timeout_secs: default_source_timeout(),
        }
    }
}

fn default_source() -> String {
    ALL_SOURCES.to_string()
}

fn default_source_timeout() -> u32 {
    30
}

/// Where downloaded torrent files go
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_dir")]
    pub dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    std::env::temp_dir()
}

/// External torrent client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Executable invoked with the torrent file path as its only argument.
    #[serde(default = "default_client_command")]
    pub command: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            command: default_client_command(),
        }
    }
}

fn default_client_command() -> String {
    "deluge".to_string()
}

/// Available source backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceBackend {
    Archive,
    // Future: ThePirateBay, Torrent9
}

/// A single torrent-indexing website
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Name used by `-w` and in error messages.
    pub name: String,
    pub backend: SourceBackend,
    /// Base URL of the website (e.g., "https://archive.org")
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum results requested from the website per lookup.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_max_results() -> u32 {
    50
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig {
        name: "archive".to_string(),
        backend: SourceBackend::Archive,
        url: "https://archive.org".to_string(),
        enabled: true,
        max_results: default_max_results(),
    }]
}
