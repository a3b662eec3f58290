//! Download of the selected torrent and hand-off to the client.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::launcher::{LaunchError, Launcher};
use crate::search::Torrent;
use crate::source::{SourceError, SourceRegistry};

/// A torrent file that was downloaded and opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub path: PathBuf,
    pub client: String,
}

/// Errors after a torrent was selected.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// Nothing was written to disk.
    #[error("Could not download torrent from {source_name}: {error}")]
    Download {
        source_name: String,
        #[source]
        error: SourceError,
    },

    /// The torrent file exists at `path`; only opening it failed.
    #[error(
        "Torrent file was downloaded to {} but could not be opened in {}, you need to open it manually: {}",
        .path.display(),
        .client,
        .error
    )]
    Launch {
        path: PathBuf,
        client: String,
        #[source]
        error: LaunchError,
    },
}

/// Downloads through the source that produced a torrent, then launches the
/// client on the resulting file.
pub struct Sequencer {
    registry: SourceRegistry,
    launcher: Arc<dyn Launcher>,
}

impl Sequencer {
    pub fn new(registry: SourceRegistry, launcher: Arc<dyn Launcher>) -> Self {
        Self { registry, launcher }
    }

    /// Download `torrent` and open it. Progress messages go to `out`.
    pub async fn execute<W: Write + ?Sized>(
        &self,
        torrent: &Torrent,
        out: &mut W,
    ) -> Result<LaunchOutcome, SequenceError> {
        let source_name = torrent.source();
        let source = self
            .registry
            .get(source_name)
            .ok_or_else(|| SequenceError::Download {
                source_name: source_name.to_string(),
                error: SourceError::NotFound(source_name.to_string()),
            })?;

        let path = source
            .download(torrent.download_ref())
            .await
            .map_err(|error| SequenceError::Download {
                source_name: source_name.to_string(),
                error,
            })?;

        info!(source = %source_name, path = %path.display(), "Torrent downloaded");
        report(out, &format!("Here is your torrent file: {}", path.display()));
        report(out, "Opening torrent in client...");

        let client = self.launcher.name().to_string();
        match self.launcher.launch(&path).await {
            Ok(()) => Ok(LaunchOutcome { path, client }),
            Err(error) => Err(SequenceError::Launch {
                path,
                client,
                error,
            }),
        }
    }
}

/// Progress output is best effort: the download already happened.
fn report<W: Write + ?Sized>(out: &mut W, message: &str) {
    if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
        warn!(error = %e, "Failed to write progress message");
    }
}
