//! Ordering of merged results.

use super::Torrent;

/// Sort by seeders, most first.
///
/// The sort is stable: torrents with equal seeder counts keep their relative
/// order, so the same results always get the same indexes. Nothing is
/// dropped or merged.
pub fn rank(mut torrents: Vec<Torrent>) -> Vec<Torrent> {
    torrents.sort_by(|a, b| b.seeders.cmp(&a.seeders));
    torrents
}
