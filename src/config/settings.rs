//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main engine configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub admission: AdmissionConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Video room provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL of the video room service API
    pub base_url: String,
    pub api_key: String,
    /// Shared secret used to sign participant join tokens
    pub api_secret: String,
    pub timeout_seconds: u64,
}

/// Admission flow configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdmissionConfig {
    /// Lifetime of a minted join token
    pub token_ttl_seconds: u64,
    /// Upper bound on a provider call made while a capacity slot is held
    pub provider_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("PROCTORROOM"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ProctorRoomError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/proctorroom".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            provider: ProviderConfig {
                base_url: "https://video.example.com".to_string(),
                api_key: String::new(),
                api_secret: String::new(),
                timeout_seconds: 5,
            },
            admission: AdmissionConfig {
                token_ttl_seconds: 3600,
                provider_timeout_seconds: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/proctorroom".to_string(),
            },
        }
    }
}
