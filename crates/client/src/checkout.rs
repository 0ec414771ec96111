//! Batch checkout of the selected cart items.
//!
//! Confirming a checkout borrows every selected book one at a time, then
//! removes the books that were actually borrowed from the cart. A failed loan
//! never stops the rest of the batch; failures are collected and reported
//! together once the batch is done.
//!
//! # Flow
//!
//! 1. Preconditions: a session, at least one selected item and both
//!    acknowledgements. A rejected confirm touches neither the network nor
//!    the cart.
//! 2. One loan request per selected item, in cart order, never concurrent.
//! 3. With at least one success the cart is re-read and the borrowed ids are
//!    removed. With none the cart is left exactly as it was.
//! 4. A [`CheckoutReport`] says what happened and whether the front end may
//!    leave the checkout view.

use std::collections::HashSet;

use booklend_core::{BookId, LoanDuration};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::ApiError;
use crate::auth::{AuthToken, StoredAuth};
use crate::cart::CartStore;
use crate::error::add_breadcrumb;
use crate::notice::Notice;
use crate::storage::{KeyValueStore, StorageError};

/// Something that can create a loan for one book.
///
/// Implemented by [`LibraryClient`](crate::api::LibraryClient); tests use an
/// in-memory fake.
pub trait LoanGateway {
    /// Borrow `book_id` for `duration` on behalf of the token's owner.
    fn request_loan(
        &self,
        token: &AuthToken,
        book_id: BookId,
        duration: LoanDuration,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Checkout form values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub duration: LoanDuration,
    pub borrow_date: NaiveDate,
    /// "I agree to return the book(s) before the due date."
    pub agree_return: bool,
    /// "I accept the library borrowing policy."
    pub agree_policy: bool,
}

impl CheckoutRequest {
    /// Date the books are due back.
    #[must_use]
    pub fn return_date(&self) -> NaiveDate {
        self.duration.due_date(self.borrow_date)
    }

    /// Return date as shown on the checkout view, e.g. `07 March 2026`.
    #[must_use]
    pub fn return_date_label(&self) -> String {
        format_date(self.return_date())
    }
}

/// Day, full month name and year, e.g. `07 March 2026`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// Why a checkout was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutRejected {
    #[error("Please login first")]
    Unauthenticated,

    #[error("No selected books to borrow")]
    NoSelection,

    #[error("Please agree to return the books before the due date")]
    ReturnNotAcknowledged,

    #[error("Please accept the library borrowing policy")]
    PolicyNotAcknowledged,
}

impl CheckoutRejected {
    #[must_use]
    pub fn notice(self) -> Notice {
        Notice::warning(self.to_string())
    }
}

/// Whether the front end should leave the checkout view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Every selected book was borrowed.
    Complete,
    /// Nothing or only part of the batch was borrowed.
    StayOnCheckout,
}

/// Result of one confirmed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReport {
    /// Books borrowed, in cart order.
    pub borrowed: Vec<BookId>,
    /// One reason per failed book, in cart order.
    pub failed: Vec<String>,
    pub return_date: NaiveDate,
}

impl CheckoutReport {
    /// Number of books borrowed.
    #[must_use]
    pub fn success(&self) -> usize {
        self.borrowed.len()
    }

    #[must_use]
    pub fn outcome(&self) -> CheckoutOutcome {
        if self.success() > 0 && self.failed.is_empty() {
            CheckoutOutcome::Complete
        } else {
            CheckoutOutcome::StayOnCheckout
        }
    }

    /// Notices to show: a success notice when anything was borrowed and a
    /// warning listing the failures when anything failed.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();

        let success = self.success();
        if success > 0 {
            let plural = if success > 1 { "s" } else { "" };
            notices.push(
                Notice::success("Borrow success")
                    .with_description(format!("You have borrowed {success} book{plural}.")),
            );
        }

        if !self.failed.is_empty() {
            notices.push(
                Notice::warning("Some books could not be borrowed")
                    .with_description(self.failed.join(" | ")),
            );
        }

        notices
    }
}

/// Errors from a confirmed checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Rejected(#[from] CheckoutRejected),

    /// Loans went through but the cart could not be updated.
    #[error("Borrowed books could not be removed from the cart: {0}")]
    Storage(#[from] StorageError),
}

/// Runs checkouts against a cart and a loan gateway.
#[derive(Debug)]
pub struct CheckoutReconciler<'a, S, G> {
    carts: &'a CartStore<S>,
    gateway: &'a G,
}

impl<'a, S: KeyValueStore, G: LoanGateway> CheckoutReconciler<'a, S, G> {
    pub const fn new(carts: &'a CartStore<S>, gateway: &'a G) -> Self {
        Self { carts, gateway }
    }

    /// Borrow every selected item of the signed-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Rejected`] when a precondition fails, before
    /// any request is made. Returns [`CheckoutError::Storage`] if the cart
    /// cannot be rewritten after at least one successful loan.
    #[instrument(skip_all, fields(days = request.duration.days()))]
    pub async fn confirm(
        &self,
        auth: Option<&StoredAuth>,
        request: &CheckoutRequest,
    ) -> Result<CheckoutReport, CheckoutError> {
        let auth = auth.ok_or(CheckoutRejected::Unauthenticated)?;
        let identity = auth.identity();

        let batch = self.carts.selected(&identity);
        if batch.is_empty() {
            return Err(CheckoutRejected::NoSelection.into());
        }
        if !request.agree_return {
            return Err(CheckoutRejected::ReturnNotAcknowledged.into());
        }
        if !request.agree_policy {
            return Err(CheckoutRejected::PolicyNotAcknowledged.into());
        }

        let books = batch.len().to_string();
        let days = request.duration.days().to_string();
        add_breadcrumb(
            "checkout",
            "Confirmed checkout",
            Some(&[("books", books.as_str()), ("days", days.as_str())]),
        );

        let mut borrowed = Vec::new();
        let mut failed = Vec::new();

        for item in &batch {
            match self
                .gateway
                .request_loan(&auth.token, item.id, request.duration)
                .await
            {
                Ok(()) => {
                    info!(book_id = %item.id, "Book borrowed");
                    borrowed.push(item.id);
                }
                Err(e) => {
                    warn!(book_id = %item.id, error = %e, "Loan failed");
                    failed.push(failure_reason(item.id, &e));
                }
            }
        }

        if !borrowed.is_empty() {
            // Re-read so edits made while the batch ran are kept.
            let ids: HashSet<BookId> = borrowed.iter().copied().collect();
            self.carts.remove(&identity, &ids)?;
        }

        info!(
            borrowed = borrowed.len(),
            failed = failed.len(),
            "Checkout finished"
        );

        Ok(CheckoutReport {
            borrowed,
            failed,
            return_date: request.return_date(),
        })
    }
}

/// User-facing reason for one failed loan.
fn failure_reason(book_id: BookId, error: &ApiError) -> String {
    error
        .api_message()
        .map_or_else(|| format!("Failed to borrow book ID {book_id}"), str::to_owned)
}
