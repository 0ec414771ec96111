//! Authentication and profile endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::instrument;

use super::types::{MeData, MyReviews, Profile};
use super::{ApiError, LibraryClient};
use crate::auth::{AuthToken, StoredAuth};

impl LibraryClient {
    /// Exchange credentials for a token and user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<StoredAuth, ApiError> {
        let request = self.request(Method::POST, "auth/login", None)?.json(&json!({
            "email": email,
            "password": password.expose_secret(),
        }));

        self.execute(request).await
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the registration or the request fails.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), ApiError> {
        let request = self.request(Method::POST, "auth/register", None)?.json(&json!({
            "name": name,
            "email": email,
            "password": password.expose_secret(),
        }));

        self.execute::<serde_json::Value>(request).await.map(|_| ())
    }

    /// Profile of the token's owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn me(&self, token: &AuthToken) -> Result<Profile, ApiError> {
        let request = self.request(Method::GET, "me", Some(token))?;
        let data: MeData = self.execute(request).await?;
        Ok(data.profile)
    }

    /// Reviews written by the token's owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn my_reviews(
        &self,
        token: &AuthToken,
        page: u32,
        limit: u32,
    ) -> Result<MyReviews, ApiError> {
        let request = self
            .request(Method::GET, "me/reviews", Some(token))?
            .query(&[("page", page), ("limit", limit)]);

        self.execute(request).await
    }
}
