//! Launcher backed by an external executable.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ClientConfig;

use super::{LaunchError, Launcher};

/// Runs `<command> <torrent file>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    command: String,
}

impl CommandLauncher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.command.trim())
    }
}

#[async_trait]
impl Launcher for CommandLauncher {
    fn name(&self) -> &str {
        &self.command
    }

    async fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        info!(command = %self.command, path = %path.display(), "Opening torrent in client");

        let status = Command::new(&self.command)
            .arg(path)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LaunchError::NotFound {
                        command: self.command.clone(),
                    }
                } else {
                    LaunchError::Spawn {
                        command: self.command.clone(),
                        error: e,
                    }
                }
            })?;

        if !status.success() {
            return Err(LaunchError::ExitStatus {
                command: self.command.clone(),
                code: status.code(),
            });
        }

        debug!(command = %self.command, "Client exited successfully");
        Ok(())
    }
}
