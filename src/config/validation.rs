//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check configured headers parse as HTTP header names and values
//! - Validate value ranges (`max_params > 0`, known log levels)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use http::header::{HeaderName, HeaderValue};

use crate::config::schema::ClientConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (i, header) in config.request.default_headers.iter().enumerate() {
        if HeaderName::from_bytes(header.name.as_bytes()).is_err() {
            errors.push(ValidationError::new(
                format!("request.default_headers[{}].name", i),
                format!("'{}' is not a valid header name", header.name),
            ));
        }
        if HeaderValue::from_str(&header.value).is_err() {
            errors.push(ValidationError::new(
                format!("request.default_headers[{}].value", i),
                "not a valid header value",
            ));
        }
    }

    if let Some(agent) = &config.request.user_agent {
        if HeaderValue::from_str(agent).is_err() {
            errors.push(ValidationError::new(
                "request.user_agent",
                "not a valid header value",
            ));
        }
    }

    if config.query.max_params == 0 {
        errors.push(ValidationError::new(
            "query.max_params",
            "must be greater than 0",
        ));
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
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
    use crate::config::schema::HeaderEntry;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.request.default_headers.push(HeaderEntry {
            name: "bad header".into(),
            value: "line\nbreak".into(),
        });
        config.request.user_agent = Some("agent\r\n".into());
        config.query.max_params = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors[0].field, "request.default_headers[0].name");
        assert!(errors.iter().any(|e| e.field == "query.max_params"));
        assert!(errors[4].to_string().contains("loud"));
    }
}
