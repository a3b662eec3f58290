//! Mock torrent client launcher for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::launcher::{LaunchError, Launcher};

/// Mock implementation of the Launcher trait.
///
/// Records every launched path and can simulate a client that exits with
/// an error.
#[derive(Debug)]
pub struct MockLauncher {
    name: String,
    launches: Arc<RwLock<Vec<PathBuf>>>,
    exit_code: Option<i32>,
}

impl MockLauncher {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            launches: Arc::new(RwLock::new(Vec::new())),
            exit_code: None,
        }
    }

    /// Simulate a client that exits with `code`.
    pub fn fail_with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Get the paths passed to `launch`.
    pub async fn recorded_launches(&self) -> Vec<PathBuf> {
        self.launches.read().await.clone()
    }
}

#[async_trait]
impl Launcher for MockLauncher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        self.launches.write().await.push(path.to_path_buf());

        match self.exit_code {
            Some(code) => Err(LaunchError::ExitStatus {
                command: self.name.clone(),
                code: Some(code),
            }),
            None => Ok(()),
        }
    }
}
