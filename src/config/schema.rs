//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for request construction.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::request::{CookieEncoder, QueryOptions};

/// Root configuration for building outbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Defaults applied to every created request.
    pub request: RequestConfig,

    /// Cookie encoding settings.
    pub cookies: CookieConfig,

    /// Query string decoding settings.
    pub query: QueryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Per-request defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RequestConfig {
    /// Headers added to every request, in order (name, value).
    pub default_headers: Vec<HeaderEntry>,

    /// Value of the `User-Agent` header, if any.
    pub user_agent: Option<String>,

    /// Stamp every request with a fresh `x-request-id`.
    pub request_id: bool,
}

/// A configured header.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

/// Cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CookieConfig {
    /// `lax` (default) or `strict`.
    pub encoder: CookieEncoder,
}

/// Query decoding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of decoded pairs.
    pub max_params: usize,

    /// Treat `;` as a pair separator.
    pub semicolon_is_separator: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let options = QueryOptions::default();
        Self {
            max_params: options.max_params,
            semicolon_is_separator: options.semicolon_is_separator,
        }
    }
}

impl From<&QueryConfig> for QueryOptions {
    fn from(config: &QueryConfig) -> Self {
        QueryOptions {
            max_params: config.max_params,
            semicolon_is_separator: config.semicolon_is_separator,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert!(config.request.default_headers.is_empty());
        assert!(!config.request.request_id);
        assert_eq!(config.cookies.encoder, CookieEncoder::Lax);
        assert_eq!(config.query.max_params, 1024);
        assert!(config.query.semicolon_is_separator);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            [cookies]
            encoder = "strict"

            [query]
            max_params = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.cookies.encoder, CookieEncoder::Strict);
        assert_eq!(config.query.max_params, 16);
        assert!(config.query.semicolon_is_separator);
        assert_eq!(QueryOptions::from(&config.query).max_params, 16);
    }
}
