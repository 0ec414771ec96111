//! Review endpoints.

use booklend_core::BookId;
use reqwest::Method;
use tracing::instrument;

use super::types::{BookReviews, NewReview};
use super::{ApiError, LibraryClient};
use crate::auth::AuthToken;

impl LibraryClient {
    /// Reviews for a book, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn book_reviews(
        &self,
        book_id: BookId,
        page: u32,
        limit: u32,
    ) -> Result<BookReviews, ApiError> {
        let request = self
            .request(Method::GET, &format!("reviews/book/{book_id}"), None)?
            .query(&[("page", page), ("limit", limit)]);

        self.execute(request).await
    }

    /// Submit a review for a book.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the review or the request fails.
    #[instrument(skip(self, token, review), fields(book_id = %review.book_id, star = review.star))]
    pub async fn create_review(
        &self,
        token: &AuthToken,
        review: &NewReview,
    ) -> Result<(), ApiError> {
        let request = self.request(Method::POST, "reviews", Some(token))?.json(review);
        self.execute::<serde_json::Value>(request).await.map(|_| ())
    }
}
