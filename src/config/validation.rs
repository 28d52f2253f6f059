//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, connection cap > 0)
//! - Check that addresses and log levels parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ChatConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ChatConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Check a parsed configuration for values that would make the server unusable.
pub fn validate_config(config: &ChatConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let non_zero = [
        ("listener.max_connections", config.listener.max_connections),
        ("limits.max_line_length", config.limits.max_line_length),
        ("limits.max_headers", config.limits.max_headers),
        ("limits.max_body_size", config.limits.max_body_size),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(obs.metrics_address.clone()));
    }
    if !LOG_LEVELS.contains(&obs.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(obs.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ChatConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ChatConfig::default();
        config.listener.max_connections = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "not-an-addr".into();
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::Zero { field: "listener.max_connections" },
                ValidationError::MetricsAddress("not-an-addr".into()),
                ValidationError::LogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn metrics_address_ignored_when_disabled() {
        let mut config = ChatConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());
    }
}
