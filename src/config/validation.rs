//! Configuration validation module
//!
//! This module provides validation functions for engine configuration
//! to ensure all required settings are properly configured.

use url::Url;

use super::Settings;
use crate::utils::errors::{ProctorRoomError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_provider_config(&settings.provider)?;
    validate_admission_config(&settings.admission)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ProctorRoomError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(ProctorRoomError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ProctorRoomError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate video room provider configuration
fn validate_provider_config(config: &super::ProviderConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(ProctorRoomError::Config(
            "Provider base URL is required".to_string()
        ));
    }

    Url::parse(&config.base_url)?;

    if config.api_secret.is_empty() {
        return Err(ProctorRoomError::Config(
            "Provider API secret is required to sign join tokens".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(ProctorRoomError::Config(
            "Provider timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate admission flow configuration
fn validate_admission_config(config: &super::AdmissionConfig) -> Result<()> {
    if config.token_ttl_seconds == 0 {
        return Err(ProctorRoomError::Config(
            "Join token TTL must be greater than 0".to_string()
        ));
    }

    if config.provider_timeout_seconds == 0 {
        return Err(ProctorRoomError::Config(
            "Provider call timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ProctorRoomError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ProctorRoomError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.provider.api_secret = "secret".to_string();
        settings
    }

    #[test]
    fn test_default_settings_with_secret_validate() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_api_secret_rejected() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut settings = valid_settings();
        settings.provider.base_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "loud".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_connection_bounds_checked() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());
    }
}
