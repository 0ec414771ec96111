//! Services shared by every command.

use std::sync::Arc;

use crate::api::{ApiError, LibraryClient};
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::session::SessionState;
use crate::storage::FileStore;

/// Application state: configuration, API client and persistent store.
///
/// Cheap to clone via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    api: LibraryClient,
    carts: CartStore<FileStore>,
}

impl AppState {
    /// Build the API client and open the store at the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let api = LibraryClient::new(&config.api)?;
        let carts = CartStore::new(FileStore::new(&config.store_path));

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, carts }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Lending API client.
    #[must_use]
    pub fn api(&self) -> &LibraryClient {
        &self.inner.api
    }

    /// Cart store over the persistent store.
    #[must_use]
    pub fn carts(&self) -> &CartStore<FileStore> {
        &self.inner.carts
    }

    /// Persistent key-value store.
    #[must_use]
    pub fn store(&self) -> &FileStore {
        self.inner.carts.store()
    }

    /// Session restored from the persistent store.
    #[must_use]
    pub fn session(&self) -> SessionState {
        SessionState::hydrate(self.store())
    }
}
