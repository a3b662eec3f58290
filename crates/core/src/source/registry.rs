//! Name-keyed collection of configured sources.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::config::{Config, SourceBackend};

use super::{ArchiveSource, Source, SourceError};

/// Errors raised while assembling the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate source name: {0}")]
    DuplicateName(String),

    #[error("Failed to create source {name}: {error}")]
    Build {
        name: String,
        #[source]
        error: SourceError,
    },
}

/// Sources in configuration order.
///
/// Order matters: merged search results are grouped by source in the order
/// sources were registered.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn Source>>,
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.names())
            .finish()
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one adapter per enabled source in `config`.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let timeout = Duration::from_secs(config.search.source_timeout_secs as u64);
        let mut registry = Self::new();

        for source_config in config.enabled_sources() {
            let source: Arc<dyn Source> = match source_config.backend {
                SourceBackend::Archive => {
                    info!(
                        source = %source_config.name,
                        url = %source_config.url,
                        "Initializing archive.org source"
                    );
                    let source = ArchiveSource::new(
                        source_config,
                        config.download.dir.clone(),
                        timeout,
                    )
                    .map_err(|error| RegistryError::Build {
                        name: source_config.name.clone(),
                        error,
                    })?;
                    Arc::new(source)
                }
            };
            registry.register(source)?;
        }

        Ok(registry)
    }

    /// Add a source. Names must be unique.
    pub fn register(&mut self, source: Arc<dyn Source>) -> Result<(), RegistryError> {
        if self.get(source.name()).is_some() {
            return Err(RegistryError::DuplicateName(source.name().to_string()));
        }
        self.sources.push(source);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Source>> {
        self.sources.iter().find(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
