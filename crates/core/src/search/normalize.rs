//! Mapping of raw source results into [`Torrent`]s.

use thiserror::Error;

use crate::source::RawTorrentResult;

use super::Torrent;

/// A raw result that cannot become a [`Torrent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// Neither a torrent/magnet link nor a details page: nothing to download.
    #[error("result \"{title}\" has no torrent, magnet or details reference")]
    MissingReference { title: String },

    #[error("result has no source name")]
    MissingSource,
}

/// Convert a raw result from `source_name` into a [`Torrent`].
///
/// Missing or malformed display fields become empty strings or zero counts.
pub fn normalize(raw: RawTorrentResult, source_name: &str) -> Result<Torrent, NormalizeError> {
    let source = source_name.trim();
    if source.is_empty() {
        return Err(NormalizeError::MissingSource);
    }

    let name = text(raw.title).unwrap_or_default();
    let file_ref = text(raw.torrent_url).or_else(|| text(raw.magnet_uri));
    let descriptor_ref = text(raw.details_url);

    if file_ref.is_none() && descriptor_ref.is_none() {
        return Err(NormalizeError::MissingReference { title: name });
    }

    Ok(Torrent {
        file_ref,
        descriptor_ref,
        name,
        size: text(raw.size).unwrap_or_default(),
        seeders: parse_count(raw.seeders.as_deref()),
        leechers: parse_count(raw.leechers.as_deref()),
        upload_date: text(raw.upload_date).unwrap_or_default(),
        source: source.to_string(),
    })
}

/// Trimmed text, with blank strings treated as absent.
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a scraped peer count such as "1,024" or " 12 ". Anything else is 0.
fn parse_count(value: Option<&str>) -> u32 {
    value
        .map(|s| {
            s.chars()
                .filter(|c| !matches!(c, ',' | '.' | '_') && !c.is_whitespace())
                .collect::<String>()
        })
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_details() -> RawTorrentResult {
        RawTorrentResult {
            title: Some("Ubuntu 22.04".to_string()),
            details_url: Some("https://archive.org/details/ubuntu".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_descriptor_only() {
        let torrent = normalize(raw_with_details(), "archive").unwrap();
        assert_eq!(torrent.name(), "Ubuntu 22.04");
        assert_eq!(
            torrent.descriptor_ref(),
            Some("https://archive.org/details/ubuntu")
        );
        assert_eq!(torrent.file_ref(), None);
        assert_eq!(torrent.seeders(), 0);
        assert_eq!(torrent.size(), "");
        assert_eq!(torrent.source(), "archive");
    }

    #[test]
    fn test_normalize_prefers_torrent_url_over_magnet() {
        let raw = RawTorrentResult {
            torrent_url: Some("https://example.com/a.torrent".to_string()),
            magnet_uri: Some("magnet:?xt=urn:btih:abc".to_string()),
            ..Default::default()
        };
        let torrent = normalize(raw, "example").unwrap();
        assert_eq!(torrent.file_ref(), Some("https://example.com/a.torrent"));
    }

    #[test]
    fn test_normalize_falls_back_to_magnet() {
        let raw = RawTorrentResult {
            torrent_url: Some("   ".to_string()),
            magnet_uri: Some("magnet:?xt=urn:btih:abc".to_string()),
            ..Default::default()
        };
        let torrent = normalize(raw, "example").unwrap();
        assert_eq!(torrent.file_ref(), Some("magnet:?xt=urn:btih:abc"));
    }

    #[test]
    fn test_normalize_without_any_reference_fails() {
        let raw = RawTorrentResult {
            title: Some("Orphan".to_string()),
            details_url: Some("".to_string()),
            seeders: Some("10".to_string()),
            ..Default::default()
        };
        let err = normalize(raw, "archive").unwrap_err();
        assert_eq!(
            err,
            NormalizeError::MissingReference {
                title: "Orphan".to_string()
            }
        );
    }

    #[test]
    fn test_normalize_without_source_fails() {
        let err = normalize(raw_with_details(), "  ").unwrap_err();
        assert_eq!(err, NormalizeError::MissingSource);
    }

    #[test]
    fn test_normalize_parses_counts() {
        let raw = RawTorrentResult {
            seeders: Some(" 1,204 ".to_string()),
            leechers: Some("37".to_string()),
            ..raw_with_details()
        };
        let torrent = normalize(raw, "archive").unwrap();
        assert_eq!(torrent.seeders(), 1204);
        assert_eq!(torrent.leechers(), 37);
    }

    #[test]
    fn test_normalize_malformed_counts_become_zero() {
        let raw = RawTorrentResult {
            seeders: Some("n/a".to_string()),
            leechers: Some("-3".to_string()),
            ..raw_with_details()
        };
        let torrent = normalize(raw, "archive").unwrap();
        assert_eq!(torrent.seeders(), 0);
        assert_eq!(torrent.leechers(), 0);
    }

    #[test]
    fn test_normalize_keeps_display_fields() {
        let raw = RawTorrentResult {
            size: Some("1.4 GB".to_string()),
            upload_date: Some("2022-04-21".to_string()),
            ..raw_with_details()
        };
        let torrent = normalize(raw, "archive").unwrap();
        assert_eq!(torrent.size(), "1.4 GB");
        assert_eq!(torrent.upload_date(), "2022-04-21");
    }
}
