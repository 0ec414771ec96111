//! Loan endpoints.

use booklend_core::{BookId, LoanDuration};
use reqwest::Method;
use tracing::instrument;

use super::types::{Loan, LoanList, NewLoan};
use super::{ApiError, LibraryClient};
use crate::auth::AuthToken;
use crate::checkout::LoanGateway;

impl LibraryClient {
    /// Borrow one book for `duration`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API refuses the loan or the request fails.
    #[instrument(skip(self, token, duration), fields(days = duration.days()))]
    pub async fn create_loan(
        &self,
        token: &AuthToken,
        book_id: BookId,
        duration: LoanDuration,
    ) -> Result<(), ApiError> {
        let body = NewLoan {
            book_id,
            days: duration.days(),
        };
        let request = self.request(Method::POST, "loans", Some(token))?.json(&body);

        self.execute::<serde_json::Value>(request).await.map(|_| ())
    }

    /// Loans of the token's owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn my_loans(&self, token: &AuthToken) -> Result<Vec<Loan>, ApiError> {
        let request = self.request(Method::GET, "loans/my", Some(token))?;
        let list: LoanList = self.execute(request).await?;
        Ok(list.loans)
    }
}

impl LoanGateway for LibraryClient {
    async fn request_loan(
        &self,
        token: &AuthToken,
        book_id: BookId,
        duration: LoanDuration,
    ) -> Result<(), ApiError> {
        self.create_loan(token, book_id, duration).await
    }
}
