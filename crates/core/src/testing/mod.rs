//! Testing utilities and mock implementations.
//!
//! Mocks for the [`Source`](crate::source::Source) and
//! [`Launcher`](crate::launcher::Launcher) traits let the whole pipeline run
//! without network access or a torrent client.
//!
//! # Example
//!
//! ```rust,ignore
//! use torrengo_core::testing::{fixtures, MockLauncher, MockSource};
//!
//! let source = Arc::new(
//!     MockSource::new("archive")
//!         .with_results(vec![fixtures::raw_result("Ubuntu", "50")])
//!         .with_download_path("/tmp/ubuntu.torrent"),
//! );
//! let launcher = Arc::new(MockLauncher::new("deluge"));
//! ```

mod mock_launcher;
mod mock_source;

pub use mock_launcher::MockLauncher;
pub use mock_source::MockSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::search::Torrent;
    use crate::source::RawTorrentResult;

    /// A torrent known through a details page on `source`.
    pub fn torrent(name: &str, seeders: u32, source: &str) -> Torrent {
        Torrent {
            file_ref: None,
            descriptor_ref: Some(format!("https://{}.example/details/{}", source, name)),
            name: name.to_string(),
            size: "1.0 GB".to_string(),
            seeders,
            leechers: seeders / 2,
            upload_date: "2024-01-01".to_string(),
            source: source.to_string(),
        }
    }

    /// A torrent known only by its magnet link.
    pub fn magnet_torrent(name: &str, info_hash: &str, source: &str) -> Torrent {
        Torrent {
            file_ref: Some(format!("magnet:?xt=urn:btih:{}", info_hash)),
            descriptor_ref: None,
            name: name.to_string(),
            size: String::new(),
            seeders: 0,
            leechers: 0,
            upload_date: String::new(),
            source: source.to_string(),
        }
    }

    /// A raw result with a details page and the given seeder text.
    pub fn raw_result(title: &str, seeders: &str) -> RawTorrentResult {
        RawTorrentResult {
            title: Some(title.to_string()),
            details_url: Some(format!(
                "https://example.com/details/{}",
                title.replace(' ', "-")
            )),
            seeders: Some(seeders.to_string()),
            leechers: Some("0".to_string()),
            size: Some("700 MB".to_string()),
            upload_date: Some("2024-01-01".to_string()),
            ..Default::default()
        }
    }
}
