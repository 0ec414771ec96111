//! Unified error handling with Sentry integration.
//!
//! Every module has its own error enum; [`ClientError`] wraps them for front
//! ends. Internal failures are never shown verbatim: use
//! [`ClientError::user_message`] for anything printed to the user.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::{CheckoutError, CheckoutRejected};
use crate::config::ConfigError;
use crate::forms::ValidationError;
use crate::session::AuthError;
use crate::storage::StorageError;

/// Client-level error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Lending API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No usable session.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout preconditions failed.
    #[error("Checkout rejected: {0}")]
    Checkout(#[from] CheckoutRejected),

    /// Form input was invalid.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<CheckoutError> for ClientError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Rejected(rejected) => Self::Checkout(rejected),
            CheckoutError::Storage(storage) => Self::Storage(storage),
        }
    }
}

impl ClientError {
    /// Message safe to show to the user.
    ///
    /// Storage and transport failures are reported to Sentry and replaced
    /// with generic text; everything else is already user-facing.
    #[must_use]
    pub fn user_message(&self) -> String {
        if matches!(self, Self::Storage(_) | Self::Api(ApiError::Parse(_) | ApiError::Url(_))) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Client error"
            );
        }

        // Don't expose internal error details to users
        match self {
            Self::Storage(_) => "Could not save local data".to_string(),
            Self::Api(err) => match err {
                ApiError::Http(_) => "Could not reach the library service".to_string(),
                ApiError::Rejected { .. } | ApiError::Status { .. } if err.is_unauthorized() => {
                    "Your session has expired, please login again".to_string()
                }
                _ => err.api_message().map_or_else(
                    || "The library service returned an unexpected response".to_string(),
                    str::to_owned,
                ),
            },
            Self::Config(err) => err.to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Validation(err) => err.to_string(),
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Set the Sentry user context.
///
/// Call this after a successful login to associate errors with the user.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a user action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added book to cart", Some(&[("book_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Checkout(CheckoutRejected::NoSelection);
        assert_eq!(err.to_string(), "Checkout rejected: No selected books to borrow");
    }

    #[test]
    fn test_user_message_passes_api_message() {
        let err = ClientError::Api(ApiError::Rejected {
            status: 400,
            message: "Email already registered".to_string(),
        });
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = ClientError::Storage(StorageError::Io {
            path: "/secret/storage.json".to_string(),
            source: std::io::Error::other("disk full"),
        });
        assert_eq!(err.user_message(), "Could not save local data");

        let err = ClientError::Api(ApiError::Status {
            status: 502,
            body: "<html>stack trace</html>".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "The library service returned an unexpected response"
        );
    }

    #[test]
    fn test_user_message_unauthorized() {
        let err = ClientError::Api(ApiError::Rejected {
            status: 401,
            message: "jwt expired".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "Your session has expired, please login again"
        );
    }

    #[test]
    fn test_checkout_error_conversion() {
        let err: ClientError = CheckoutError::Rejected(CheckoutRejected::NoSelection).into();
        assert!(matches!(err, ClientError::Checkout(CheckoutRejected::NoSelection)));
    }
}
