//! # Configuration Management
//!
//! Environment-driven configuration for apiscope. The analysis engine itself
//! takes no configuration; its policy thresholds are fixed constants.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::{Error, Result};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Service name attached to startup logs
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Default log level when `RUST_LOG` is unset
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,

    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { service_name: crate::APP_NAME.to_string(), log_level: "info".to_string(), json_logs: false }
    }
}

fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level")
            .with_message("Log level must be one of trace, debug, info, warn, error".into()))
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::config(format!("Invalid boolean for {}: '{}'", name, other))),
    }
}

impl ObservabilityConfig {
    /// Create configuration from environment variables
    ///
    /// - `APISCOPE_SERVICE_NAME`
    /// - `APISCOPE_LOG_LEVEL`
    /// - `APISCOPE_LOG_JSON`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            service_name: std::env::var("APISCOPE_SERVICE_NAME")
                .unwrap_or(defaults.service_name),
            log_level: std::env::var("APISCOPE_LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: match std::env::var("APISCOPE_LOG_JSON") {
                Ok(raw) => parse_bool("APISCOPE_LOG_JSON", &raw)?,
                Err(_) => defaults.json_logs,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)
    }

    /// Raise the level to debug (CLI `--verbose`)
    pub fn verbose(mut self) -> Self {
        self.log_level = "debug".to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.service_name, "apiscope");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = ObservabilityConfig { log_level: "chatty".to_string(), ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn test_empty_service_name_rejected() {
        let config = ObservabilityConfig { service_name: String::new(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("APISCOPE_LOG_LEVEL", "debug");
        env::set_var("APISCOPE_LOG_JSON", "true");

        let config = ObservabilityConfig::from_env().unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);

        env::remove_var("APISCOPE_LOG_LEVEL");
        env::remove_var("APISCOPE_LOG_JSON");
    }

    #[test]
    fn test_verbose() {
        assert_eq!(ObservabilityConfig::default().verbose().log_level, "debug");
    }
}
