use std::collections::HashSet;

use super::{types::Config, ConfigError, ALL_SOURCES};

/// Validate configuration
/// Currently validates:
/// - Source timeout is not 0
/// - Client command is set
/// - At least one source is enabled, names are unique and non-empty
/// - The default source is "all" or an enabled source
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.search.source_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.source_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.client.command.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "client.command cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for source in &config.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "sources.name cannot be empty".to_string(),
            ));
        }
        if source.name == ALL_SOURCES {
            return Err(ConfigError::ValidationError(format!(
                "\"{}\" is reserved and cannot name a source",
                ALL_SOURCES
            )));
        }
        if !seen.insert(source.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate source name: {}",
                source.name
            )));
        }
    }

    if config.enabled_sources().next().is_none() {
        return Err(ConfigError::ValidationError(
            "at least one source must be enabled".to_string(),
        ));
    }

    let default_source = config.search.default_source.as_str();
    if default_source != ALL_SOURCES
        && !config.enabled_sources().any(|s| s.name == default_source)
    {
        return Err(ConfigError::ValidationError(format!(
            "search.default_source \"{}\" is not an enabled source",
            default_source
        )));
    }

    Ok(())
}
