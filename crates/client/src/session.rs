//! Session state container and the login/logout flows that drive it.
//!
//! [`SessionState`] holds what front ends render from: the credentials of the
//! signed-in user and a little UI state. It only changes through
//! [`SessionAction`]s applied by [`reduce`], and is rebuilt from the
//! persisted authentication record with [`SessionState::hydrate`].

use booklend_core::{CategoryId, IdentityNamespace};
use thiserror::Error;
use tracing::{info, instrument};

use crate::api::LibraryClient;
use crate::auth::{AuthToken, AuthUser, StoredAuth, clear_auth, load_auth, save_auth};
use crate::error::{self, ClientError, add_breadcrumb};
use crate::forms::{LoginForm, RegisterForm};
use crate::notice::Notice;
use crate::storage::KeyValueStore;

/// Session-related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The operation needs a signed-in user.
    #[error("Please login first")]
    NotSignedIn,
}

/// Credentials of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<AuthToken>,
    pub user: Option<AuthUser>,
}

impl AuthState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Catalog browsing state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub search: String,
    pub category: Option<CategoryId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub auth: AuthState,
    pub ui: UiState,
}

/// Every way session state can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SetCredentials(StoredAuth),
    Logout,
    SetSearch(String),
    SetCategory(Option<CategoryId>),
}

/// Apply `action` to `state`.
#[must_use]
pub fn reduce(state: SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::SetCredentials(StoredAuth { token, user }) => SessionState {
            auth: AuthState {
                token: Some(token),
                user: Some(user),
            },
            ..state
        },
        SessionAction::Logout => SessionState {
            auth: AuthState::default(),
            ..state
        },
        SessionAction::SetSearch(search) => SessionState {
            ui: UiState { search, ..state.ui },
            ..state
        },
        SessionAction::SetCategory(category) => SessionState {
            ui: UiState {
                category,
                ..state.ui
            },
            ..state
        },
    }
}

impl SessionState {
    /// Restore credentials from the persisted authentication record.
    ///
    /// A missing or malformed record starts an empty session.
    pub fn hydrate<S: KeyValueStore>(store: &S) -> Self {
        load_auth(store).map_or_else(Self::default, |auth| {
            reduce(Self::default(), SessionAction::SetCredentials(auth))
        })
    }

    pub fn dispatch(&mut self, action: SessionAction) {
        *self = reduce(std::mem::take(self), action);
    }

    /// The signed-in user's credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] when nobody is signed in.
    pub fn require_auth(&self) -> Result<StoredAuth, AuthError> {
        match (&self.auth.token, &self.auth.user) {
            (Some(token), Some(user)) => Ok(StoredAuth {
                token: token.clone(),
                user: user.clone(),
            }),
            _ => Err(AuthError::NotSignedIn),
        }
    }

    /// Whose cart is active.
    #[must_use]
    pub fn identity(&self) -> IdentityNamespace {
        self.require_auth()
            .map_or(IdentityNamespace::Guest, |auth| auth.identity())
    }
}

// =============================================================================
// Flows
// =============================================================================

/// Sign in and persist the credentials.
///
/// # Errors
///
/// Returns an error if the form is invalid, the API rejects the credentials,
/// or the record cannot be stored.
#[instrument(skip_all)]
pub async fn login<S: KeyValueStore>(
    client: &LibraryClient,
    store: &S,
    session: &mut SessionState,
    form: &LoginForm,
) -> Result<StoredAuth, ClientError> {
    form.validate()?;

    let auth = client.login(form.email.trim(), &form.password).await?;
    save_auth(store, &auth)?;

    error::set_sentry_user(&auth.user.id, Some(&auth.user.email));
    add_breadcrumb("auth", "Logged in", None);
    info!(user_id = %auth.user.id, "User logged in");

    session.dispatch(SessionAction::SetCredentials(auth.clone()));
    Ok(auth)
}

/// Sign out. The user's cart stays in the store for their next login.
///
/// # Errors
///
/// Returns an error if the record cannot be removed.
pub fn logout<S: KeyValueStore>(store: &S, session: &mut SessionState) -> Result<(), ClientError> {
    clear_auth(store)?;
    session.dispatch(SessionAction::Logout);

    error::clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);
    info!("User logged out");
    Ok(())
}

/// Create an account.
///
/// # Errors
///
/// Returns an error if the form is invalid or the API rejects the account.
#[instrument(skip_all)]
pub async fn register(client: &LibraryClient, form: &RegisterForm) -> Result<Notice, ClientError> {
    form.validate()?;

    client
        .register(form.name.trim(), form.email.trim(), &form.password)
        .await?;

    info!("Account registered");
    Ok(Notice::success("Registered successfully")
        .with_description("Please login using your new account."))
}
