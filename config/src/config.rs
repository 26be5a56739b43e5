//! Configuration structures for the notebook persistence stack.
//!
//! All structures use `serde` with field-level defaults and `validator`
//! for input validation, so a partially specified TOML file or
//! environment still yields a fully populated, checked configuration.

use errors::ConfigError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct Config {
    /// Object-store backend configuration.
    #[serde(default)]
    #[validate(nested)]
    pub store: ObjectStoreConfig,
}

/// Object-store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ObjectStoreConfig {
    /// Bucket/container holding every notebook object.
    #[validate(length(min = 1, max = 255))]
    pub bucket: String,

    /// Text encoding of stored note documents. Only UTF-8 is decoded
    /// by this stack; anything else is rejected up front rather than
    /// silently mis-decoded.
    #[serde(default = "default_encoding")]
    #[validate(custom(function = "validate_encoding"))]
    pub encoding: String,

    /// Store region, when the backend wants one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Endpoint override for S3-compatible stores (e.g. MinIO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Path-style addressing, required by most S3-compatible stores.
    #[serde(default)]
    pub force_path_style: bool,

    /// Read buffer hint for streaming object reads.
    #[serde(default = "default_read_buffer_bytes")]
    #[validate(range(min = 4096, max = 67108864))]
    pub read_buffer_bytes: usize,

    /// Retry policy handed to the store client. No retries happen
    /// above the client.
    #[serde(default)]
    #[validate(nested)]
    pub retry: RetryConfig,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            bucket: "carnet-notebooks".to_string(),
            encoding: default_encoding(),
            region: None,
            endpoint: None,
            force_path_style: false,
            read_buffer_bytes: default_read_buffer_bytes(),
            retry: RetryConfig::default(),
        }
    }
}

/// Store-client retry policy.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RetryConfig {
    /// Initial backoff delay in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    #[validate(range(min = 1, max = 60000))]
    pub initial_delay_ms: u64,

    /// Maximum attempts per store call, including the first.
    #[serde(default = "default_max_attempts")]
    #[validate(range(min = 1, max = 100))]
    pub max_attempts: u32,

    /// Total budget for one call across all attempts, in milliseconds.
    #[serde(default = "default_total_budget_ms")]
    #[validate(range(min = 100, max = 600000))]
    pub total_budget_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_attempts: default_max_attempts(),
            total_budget_ms: default_total_budget_ms(),
        }
    }
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_read_buffer_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_initial_delay_ms() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    10
}

fn default_total_budget_ms() -> u64 {
    15_000
}

fn validate_encoding(value: &str) -> Result<(), validator::ValidationError> {
    if value.eq_ignore_ascii_case("utf-8") || value.eq_ignore_ascii_case("utf8") {
        Ok(())
    } else {
        Err(validator::ValidationError::new("unsupported encoding"))
    }
}

/// Validate a configuration, mapping validator output into the typed
/// configuration error.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    config.validate().map_err(|e| ConfigError::Invalid {
        field: e
            .field_errors()
            .keys()
            .next()
            .map_or_else(|| "config".to_string(), ToString::to_string),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.store.encoding, "utf-8");
        assert_eq!(config.store.retry.initial_delay_ms, 10);
        assert_eq!(config.store.retry.max_attempts, 10);
        assert_eq!(config.store.retry.total_budget_ms, 15_000);
        assert_eq!(config.store.read_buffer_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn empty_bucket_is_rejected() {
        let mut config = Config::default();
        config.store.bucket = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn non_utf8_encoding_is_rejected() {
        let mut config = Config::default();
        config.store.encoding = "latin-1".to_string();
        assert!(validate(&config).is_err());

        config.store.encoding = "UTF-8".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn zero_retry_attempts_is_rejected() {
        let mut config = Config::default();
        config.store.retry.max_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[store]\nbucket = \"zep-notes\"\n").unwrap();
        assert_eq!(config.store.bucket, "zep-notes");
        assert_eq!(config.store.retry.max_attempts, 10);
        assert!(!config.store.force_path_style);
    }
}
