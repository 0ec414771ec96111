//! Persisted authentication record and identity resolution.
//!
//! After a successful login the API's `{ token, user }` payload is stored
//! verbatim under [`AUTH_KEY`]. Everything that needs to know who is signed
//! in (cart scoping, bearer tokens) reads it back from the store.

use core::fmt;

use booklend_core::{Email, IdentityNamespace, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{AUTH_KEY, KeyValueStore, StorageError};

/// Bearer token issued by the lending API.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// The signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Authentication record kept under [`AUTH_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAuth {
    pub token: AuthToken,
    pub user: AuthUser,
}

impl StoredAuth {
    /// Cart namespace for this user.
    ///
    /// Falls back to the guest namespace if the stored email is unusable.
    #[must_use]
    pub fn identity(&self) -> IdentityNamespace {
        match Email::parse(&self.user.email) {
            Ok(email) => IdentityNamespace::User(email),
            Err(e) => {
                warn!(error = %e, "Stored user email is invalid, using guest namespace");
                IdentityNamespace::Guest
            }
        }
    }
}

/// Read the authentication record.
///
/// Returns `None` when nothing is stored, the record does not decode, or the
/// token is blank.
pub fn load_auth<S: KeyValueStore>(store: &S) -> Option<StoredAuth> {
    let raw = store.get(AUTH_KEY)?;
    match serde_json::from_str::<StoredAuth>(&raw) {
        Ok(auth) if !auth.token.is_empty() => Some(auth),
        Ok(_) => {
            debug!("Stored auth record has an empty token");
            None
        }
        Err(e) => {
            debug!(error = %e, "Stored auth record is malformed");
            None
        }
    }
}

/// Persist the authentication record, replacing any previous one.
///
/// # Errors
///
/// Returns an error if the store write fails.
pub fn save_auth<S: KeyValueStore>(store: &S, auth: &StoredAuth) -> Result<(), StorageError> {
    store.set(AUTH_KEY, &serde_json::to_string(auth)?)
}

/// Remove the authentication record.
///
/// # Errors
///
/// Returns an error if the store write fails.
pub fn clear_auth<S: KeyValueStore>(store: &S) -> Result<(), StorageError> {
    store.remove(AUTH_KEY)
}

/// Resolve whose cart is active: the signed-in user's email, else guest.
pub fn resolve_identity<S: KeyValueStore>(store: &S) -> IdentityNamespace {
    load_auth(store).map_or(IdentityNamespace::Guest, |auth| auth.identity())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    pub(crate) fn sample_auth(email: &str) -> StoredAuth {
        StoredAuth {
            token: AuthToken::new("tok-123"),
            user: AuthUser {
                id: UserId::new(1),
                name: "Ann Reader".to_string(),
                email: email.to_string(),
                role: "USER".to_string(),
                phone: None,
            },
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", sample_auth("ann@library.test"));
        assert!(!debug.contains("tok-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_save_load_clear() {
        let store = MemoryStore::new();
        assert!(load_auth(&store).is_none());

        let auth = sample_auth("ann@library.test");
        save_auth(&store, &auth).unwrap();
        assert_eq!(load_auth(&store), Some(auth));

        clear_auth(&store).unwrap();
        assert!(load_auth(&store).is_none());
    }

    #[test]
    fn test_stored_shape() {
        let store = MemoryStore::new();
        save_auth(&store, &sample_auth("ann@library.test")).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&store.get(AUTH_KEY).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "token": "tok-123",
                "user": {"id": 1, "name": "Ann Reader", "email": "ann@library.test", "role": "USER"}
            })
        );
    }

    #[test]
    fn test_resolve_identity() {
        let store = MemoryStore::new();
        assert_eq!(resolve_identity(&store), IdentityNamespace::Guest);

        save_auth(&store, &sample_auth("ann@library.test")).unwrap();
        assert_eq!(resolve_identity(&store).cart_key(), "cart:ann@library.test");
    }

    #[test]
    fn test_malformed_or_tokenless_record_is_guest() {
        let store = MemoryStore::new();

        store.set(AUTH_KEY, "{not json").unwrap();
        assert_eq!(resolve_identity(&store), IdentityNamespace::Guest);

        store
            .set(
                AUTH_KEY,
                r#"{"token":"","user":{"id":1,"name":"A","email":"a@b.c","role":"USER"}}"#,
            )
            .unwrap();
        assert_eq!(resolve_identity(&store), IdentityNamespace::Guest);
    }

    #[test]
    fn test_invalid_email_falls_back_to_guest() {
        let auth = sample_auth("not-an-email");
        assert!(auth.identity().is_guest());
    }
}
