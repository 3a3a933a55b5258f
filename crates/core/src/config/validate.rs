use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Operator id is set (not 0)
/// - Server port is not 0
/// - Wizard timeouts and search limits are not 0
/// - Extractor markers are not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.operator.id == 0 {
        return Err(ConfigError::ValidationError(
            "operator.id must be set".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.wizard.idle_timeout_secs == 0 || config.wizard.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "wizard timeouts cannot be 0".to_string(),
        ));
    }

    if config.search.max_results == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_results cannot be 0".to_string(),
        ));
    }

    if let Some(name) = config.extractor.first_empty_marker() {
        return Err(ConfigError::ValidationError(format!(
            "extractor.{} cannot be empty",
            name
        )));
    }

    Ok(())
}
