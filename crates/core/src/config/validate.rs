use super::{Config, ConfigError};

/// Validate a loaded configuration before any component is built from it.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.query.bench.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "query.bench must not be empty".to_string(),
        ));
    }

    if config.query.appeal_type.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "query.appeal_type must not be empty".to_string(),
        ));
    }

    if config.query.from > config.query.to {
        return Err(ConfigError::ValidationError(format!(
            "query.from ({}) is after query.to ({})",
            config.query.from, config.query.to
        )));
    }

    if config.portal.user_agents.is_empty() {
        return Err(ConfigError::ValidationError(
            "portal.user_agents must contain at least one entry".to_string(),
        ));
    }

    if config.portal.fetch_max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "portal.fetch_max_attempts must be at least 1".to_string(),
        ));
    }

    if config.ocr.upscale == 0 {
        return Err(ConfigError::ValidationError(
            "ocr.upscale must be at least 1".to_string(),
        ));
    }

    if config.ocr.whitelist.is_empty() {
        return Err(ConfigError::ValidationError(
            "ocr.whitelist must not be empty".to_string(),
        ));
    }

    if config.orchestrator.max_retries == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.max_retries must be at least 1".to_string(),
        ));
    }

    Ok(())
}
