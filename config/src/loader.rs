//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor
//! app principles. All variables share the `NB_` prefix.

use crate::config::{Config, ObjectStoreConfig, RetryConfig};
use errors::ConfigError;
use std::env;

/// Load configuration from environment variables.
///
/// Environment variables override struct defaults; unset variables
/// leave the default in place.
///
/// ## Environment Variables
/// - `NB_BUCKET`: bucket/container name (default: "carnet-notebooks")
/// - `NB_ENCODING`: stored-text encoding (default: "utf-8")
/// - `NB_STORE_REGION`: store region (optional)
/// - `NB_STORE_ENDPOINT`: endpoint override for S3-compatible stores
///   (optional)
/// - `NB_STORE_FORCE_PATH_STYLE`: path-style addressing (true/false,
///   default: false)
/// - `NB_READ_BUFFER_BYTES`: streaming read buffer hint (default:
///   2097152)
/// - `NB_RETRY_INITIAL_DELAY_MS`: initial retry backoff (default: 10)
/// - `NB_RETRY_MAX_ATTEMPTS`: attempts per call (default: 10)
/// - `NB_RETRY_TOTAL_BUDGET_MS`: per-call retry budget (default: 15000)
pub fn load_from_env() -> Result<Config, ConfigError> {
    Ok(Config {
        store: load_store_from_env()?,
    })
}

fn load_store_from_env() -> Result<ObjectStoreConfig, ConfigError> {
    let defaults = ObjectStoreConfig::default();
    Ok(ObjectStoreConfig {
        bucket: env::var("NB_BUCKET").unwrap_or(defaults.bucket),
        encoding: env::var("NB_ENCODING").unwrap_or(defaults.encoding),
        region: env::var("NB_STORE_REGION").ok(),
        endpoint: env::var("NB_STORE_ENDPOINT").ok(),
        force_path_style: parse_env("NB_STORE_FORCE_PATH_STYLE")?
            .unwrap_or(defaults.force_path_style),
        read_buffer_bytes: parse_env("NB_READ_BUFFER_BYTES")?
            .unwrap_or(defaults.read_buffer_bytes),
        retry: load_retry_from_env()?,
    })
}

fn load_retry_from_env() -> Result<RetryConfig, ConfigError> {
    let defaults = RetryConfig::default();
    Ok(RetryConfig {
        initial_delay_ms: parse_env("NB_RETRY_INITIAL_DELAY_MS")?
            .unwrap_or(defaults.initial_delay_ms),
        max_attempts: parse_env("NB_RETRY_MAX_ATTEMPTS")?.unwrap_or(defaults.max_attempts),
        total_budget_ms: parse_env("NB_RETRY_TOTAL_BUDGET_MS")?
            .unwrap_or(defaults.total_budget_ms),
    })
}

/// Parses an environment variable when set; a set-but-unparseable
/// value is an error rather than a silent fallback to the default.
fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map(Some).map_err(|e| ConfigError::Env {
            name: name.to_string(),
            reason: format!("{e}"),
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_nb_env() {
        for (key, _) in env::vars() {
            if key.starts_with("NB_") {
                unsafe { env::remove_var(&key) };
            }
        }
    }

    #[test]
    #[serial]
    fn env_defaults_match_struct_defaults() {
        clear_nb_env();
        let config = load_from_env().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn env_overrides_take_effect() {
        clear_nb_env();
        unsafe {
            env::set_var("NB_BUCKET", "integration-bucket");
            env::set_var("NB_STORE_ENDPOINT", "http://localhost:9000");
            env::set_var("NB_STORE_FORCE_PATH_STYLE", "true");
            env::set_var("NB_RETRY_MAX_ATTEMPTS", "3");
        }

        let config = load_from_env().unwrap();
        assert_eq!(config.store.bucket, "integration-bucket");
        assert_eq!(
            config.store.endpoint.as_deref(),
            Some("http://localhost:9000")
        );
        assert!(config.store.force_path_style);
        assert_eq!(config.store.retry.max_attempts, 3);

        clear_nb_env();
    }

    #[test]
    #[serial]
    fn unparseable_env_value_is_an_error() {
        clear_nb_env();
        unsafe { env::set_var("NB_RETRY_MAX_ATTEMPTS", "many") };

        let result = load_from_env();
        assert!(matches!(
            result,
            Err(ConfigError::Env { ref name, .. }) if name == "NB_RETRY_MAX_ATTEMPTS"
        ));

        clear_nb_env();
    }
}
