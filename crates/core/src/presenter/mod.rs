//! Display of ranked results.

mod table;

pub use table::TablePresenter;

use std::io::{self, Write};

use crate::search::Torrent;

/// Renders ranked torrents. The position in `torrents` is the index the
/// user selects.
pub trait Presenter: Send + Sync {
    fn render(&self, torrents: &[Torrent], out: &mut dyn Write) -> io::Result<()>;
}
