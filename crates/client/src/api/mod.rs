//! Lending API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; every response is wrapped in the envelope
//!   `{ success, message, data }`
//! - The API is the source of truth; nothing but the catalog is cached
//! - Catalog reads (book detail, categories, authors) are cached in memory
//!   via `moka` for the configured TTL
//!
//! # Resource groups
//!
//! - [`catalog`](LibraryClient::list_books) - books, authors, categories
//! - reviews - book reviews and review submission
//! - loans - loan creation and the signed-in user's loans
//! - account - login, registration, profile
//!
//! # Example
//!
//! ```rust,ignore
//! use booklend_client::api::LibraryClient;
//!
//! let client = LibraryClient::new(&config.api)?;
//! let page = client.list_books(BookQuery::default()).await?;
//! let auth = client.login(&email, &password).await?;
//! client.create_loan(&auth.token, page.books[0].id, LoanDuration::FiveDays).await?;
//! ```

mod account;
mod cache;
mod catalog;
mod loans;
mod reviews;
pub mod types;

pub use types::*;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::auth::AuthToken;
use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the lending API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `success: false` or an error status and an envelope.
    #[error("API rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The API answered with an error status and no envelope.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The API-provided message, when there is a non-empty one.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Whether the API reported the caller as unauthenticated.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Rejected { status: 401, .. } | Self::Status { status: 401, .. }
        )
    }
}

/// Raw response envelope shared by every endpoint.
///
/// A body without `success` counts as unsuccessful.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

// =============================================================================
// LibraryClient
// =============================================================================

/// Client for the lending REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and catalog cache.
#[derive(Clone)]
pub struct LibraryClient {
    inner: Arc<LibraryClientInner>,
}

struct LibraryClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl LibraryClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("booklend/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(LibraryClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// API root all paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build a request for `path` relative to the API root.
    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&AuthToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let builder = self.inner.client.request(method, url);

        Ok(match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    /// Send a request and unwrap the response envelope into `T`.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let data = parse_envelope(status, &body)?;
        Ok(serde_json::from_value(data)?)
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        let hit = self.inner.cache.get(key).await;
        if hit.is_some() {
            debug!(?key, "Cache hit");
        }
        hit
    }

    async fn remember(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }
}

/// Interpret a response body as an envelope and return its `data`.
///
/// Missing `data` on a successful envelope decodes as JSON `null`.
fn parse_envelope(status: StatusCode, body: &str) -> Result<Value, ApiError> {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            return Err(ApiError::Parse(e));
        }
        Err(_) => {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
    };

    if !envelope.success || !status.is_success() {
        let message = envelope.message.unwrap_or_default();
        debug!(status = %status, message = %message, "API rejected request");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    Ok(envelope.data.unwrap_or(Value::Null))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_returns_data() {
        let data = parse_envelope(
            StatusCode::OK,
            r#"{"success":true,"message":"ok","data":{"books":[]}}"#,
        )
        .unwrap();
        assert_eq!(data, serde_json::json!({"books": []}));
    }

    #[test]
    fn test_parse_envelope_missing_data_is_null() {
        let data = parse_envelope(StatusCode::CREATED, r#"{"success":true,"message":"Created"}"#)
            .unwrap();
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn test_parse_envelope_unsuccessful_envelope() {
        let err = parse_envelope(
            StatusCode::OK,
            r#"{"success":false,"message":"book unavailable","data":null}"#,
        )
        .unwrap_err();
        assert_eq!(err.api_message(), Some("book unavailable"));
    }

    #[test]
    fn test_parse_envelope_error_status_with_envelope() {
        let err = parse_envelope(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"message":"Invalid token"}"#,
        )
        .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.api_message(), Some("Invalid token"));
    }

    #[test]
    fn test_parse_envelope_error_status_without_envelope() {
        let err = parse_envelope(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 502, .. }));
        assert_eq!(err.api_message(), None);
    }

    #[test]
    fn test_parse_envelope_bare_message_body() {
        let err = parse_envelope(StatusCode::FORBIDDEN, r#"{"message":"Forbidden"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 403, .. }));
        assert_eq!(err.api_message(), Some("Forbidden"));
    }

    #[test]
    fn test_parse_envelope_garbage_on_success_is_parse_error() {
        let err = parse_envelope(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_blank_message_is_not_an_api_message() {
        let err = ApiError::Rejected {
            status: 400,
            message: "  ".to_string(),
        };
        assert_eq!(err.api_message(), None);
    }

    #[test]
    fn test_request_urls_resolve_under_base() {
        let client = LibraryClient::new(&ApiConfig::new("https://library.test/api").unwrap())
            .unwrap();
        let request = client
            .request(Method::GET, "reviews/book/4", None)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://library.test/api/reviews/book/4");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_request_with_token_sets_bearer_header() {
        let client = LibraryClient::new(&ApiConfig::new("https://library.test/api").unwrap())
            .unwrap();
        let token = AuthToken::new("abc123");
        let request = client
            .request(Method::POST, "loans", Some(&token))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap().to_str().unwrap(),
            "Bearer abc123"
        );
    }
}
