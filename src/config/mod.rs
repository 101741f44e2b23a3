//! # Configuration Management
//!
//! Environment-driven configuration for meshcheck. Values are read from
//! `MESHCHECK_*` variables, filled with defaults, and validated with the
//! `validator` crate before use.

use lazy_static::lazy_static;
use regex::Regex;
use validator::{Validate, ValidationError};

use crate::errors::{MeshCheckError, Result};

lazy_static! {
    /// RFC 1123 label, which is what Kubernetes requires of namespace names
    static ref NAMESPACE_REGEX: Regex = Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$")
        .expect("NAMESPACE_REGEX should be a valid regex pattern");
}

const OUTPUT_FORMATS: &[&str] = &["json", "yaml", "table"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    /// Namespace checked when none is given on the command line
    #[validate(custom(function = "validate_namespace"))]
    pub namespace: String,

    /// Default output format for reports
    #[validate(custom(function = "validate_output_format"))]
    pub output: String,

    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            output: "table".to_string(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            namespace: std::env::var("MESHCHECK_NAMESPACE").unwrap_or(defaults.namespace),
            output: std::env::var("MESHCHECK_OUTPUT")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.output),
            observability: ObservabilityConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(MeshCheckError::from)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Validate)]
pub struct ObservabilityConfig {
    /// Default log level when `RUST_LOG` is not set
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let json_logging = match std::env::var("MESHCHECK_LOG_JSON") {
            Ok(value) => value.parse::<bool>().map_err(|e| {
                MeshCheckError::config(format!("Invalid MESHCHECK_LOG_JSON value '{}': {}", value, e))
            })?,
            Err(_) => defaults.json_logging,
        };

        Ok(Self {
            log_level: std::env::var("MESHCHECK_LOG_LEVEL")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.log_level),
            json_logging,
        })
    }
}

/// Validate Kubernetes namespace names
pub fn validate_namespace(namespace: &str) -> std::result::Result<(), ValidationError> {
    if !NAMESPACE_REGEX.is_match(namespace) {
        return Err(ValidationError::new("invalid_namespace")
            .with_message("Namespace must be a lowercase RFC 1123 label".into()));
    }
    Ok(())
}

fn validate_output_format(output: &str) -> std::result::Result<(), ValidationError> {
    if !OUTPUT_FORMATS.contains(&output) {
        return Err(ValidationError::new("invalid_output_format")
            .with_message("Output must be one of json, yaml, table".into()));
    }
    Ok(())
}

fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    if !LOG_LEVELS.contains(&level) {
        return Err(ValidationError::new("invalid_log_level")
            .with_message("Log level must be one of trace, debug, info, warn, error".into()));
    }
    Ok(())
}
