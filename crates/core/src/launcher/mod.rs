//! Hand-off of a downloaded torrent file to a local torrent client.

mod command;

pub use command::CommandLauncher;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from starting the torrent client.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{command} not found")]
    NotFound { command: String },

    #[error("Failed to start {command}: {error}")]
    Spawn {
        command: String,
        #[source]
        error: std::io::Error,
    },

    #[error("{command} exited with code: {code:?}")]
    ExitStatus { command: String, code: Option<i32> },
}

/// Something that opens torrent files.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Name of the client, for messages.
    fn name(&self) -> &str;

    /// Open `path` in the client. Success means the client accepted it.
    async fn launch(&self, path: &Path) -> Result<(), LaunchError>;
}
