//! Torrent-indexing website adapters.
//!
//! Every website is a [`Source`]: it can look up a query and download the
//! torrent file behind one of its results. Sources are collected in a
//! [`SourceRegistry`] so the search pipeline never has to know which
//! websites exist.

mod archive;
mod registry;
mod types;

pub use archive::ArchiveSource;
pub use registry::{RegistryError, SourceRegistry};
pub use types::*;
