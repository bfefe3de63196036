use tracing::warn;

use super::{types::Config, ConfigError};

/// Validate configuration
///
/// Rejects:
/// - server port 0
/// - an empty output directory
/// - any stage timeout of 0
///
/// An empty catalog key is accepted, every lookup will then fail with 401.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.output.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "output.dir cannot be empty".to_string(),
        ));
    }

    if let Some((name, _)) = config.timeouts.all().iter().find(|(_, secs)| *secs == 0) {
        return Err(ConfigError::ValidationError(format!(
            "timeouts.{} cannot be 0",
            name
        )));
    }

    if config.catalog.api_key.is_empty() {
        warn!("catalog.api_key is empty, catalog lookups will be rejected");
    }

    Ok(())
}
