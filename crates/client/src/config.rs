//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `BOOKLEND_API_BASE_URL` - Lending API root (default: the hosted library API)
//! - `BOOKLEND_STORE_PATH` - JSON file backing the persistent store (default: `.booklend/storage.json`)
//! - `BOOKLEND_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `BOOKLEND_CACHE_TTL_SECS` - Catalog cache time-to-live (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Hosted lending API used when no base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://be-library-api-xh3x6c5iiq-et.a.run.app/api";

const DEFAULT_STORE_PATH: &str = ".booklend/storage.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Lending API configuration
    pub api: ApiConfig,
    /// File backing the persistent key-value store
    pub store_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Lending API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API root; always ends with `/` so relative paths join under it
    pub base_url: Url,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// How long catalog reads stay cached
    pub cache_ttl: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig {
            base_url: parse_base_url(
                "BOOKLEND_API_BASE_URL",
                &get_env_or_default("BOOKLEND_API_BASE_URL", DEFAULT_API_BASE_URL),
            )?,
            timeout: get_secs_or_default("BOOKLEND_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            cache_ttl: get_secs_or_default("BOOKLEND_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
        };

        Ok(Self {
            api,
            store_path: PathBuf::from(get_env_or_default("BOOKLEND_STORE_PATH", DEFAULT_STORE_PATH)),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ApiConfig {
    /// API configuration for `base_url` with default timeout and cache TTL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a whole number of seconds from the environment.
fn get_secs_or_default(key: &str, default: u64) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(Duration::from_secs(default)), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse an http(s) base URL and make sure it ends with a slash.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("TEST", "https://library.test/api").unwrap();
        assert_eq!(url.as_str(), "https://library.test/api/");
        assert_eq!(
            url.join("books/3").unwrap().as_str(),
            "https://library.test/api/books/3"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("TEST", "http://localhost:8080/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        let err = parse_base_url("TEST", "ftp://library.test").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TEST"));
        assert!(parse_base_url("TEST", "not a url").is_err());
    }

    #[test]
    fn test_api_config_new() {
        let config = ApiConfig::new("http://127.0.0.1:9000").unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }
}
