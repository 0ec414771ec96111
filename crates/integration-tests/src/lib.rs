//! Integration tests for Booklend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p booklend-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - cart plus checkout reconciliation across stores
//! - `session_flow` - persisted sessions and per-identity carts
//!
//! None of the tests reach the network: loans go through [`ScriptedGateway`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use booklend_client::api::ApiError;
use booklend_client::auth::{AuthToken, AuthUser, StoredAuth};
use booklend_client::checkout::LoanGateway;
use booklend_core::{BookId, CartItem, LoanDuration, UserId};

/// Loan gateway that refuses a fixed set of books and records every call.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    refusals: HashMap<BookId, String>,
    calls: Mutex<Vec<BookId>>,
}

impl ScriptedGateway {
    /// Refuse `id` with `message`, as the API would.
    #[must_use]
    pub fn refuse(mut self, id: i32, message: &str) -> Self {
        self.refusals.insert(BookId::new(id), message.to_string());
        self
    }

    /// Books a loan was requested for, in order.
    pub fn calls(&self) -> Vec<BookId> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LoanGateway for ScriptedGateway {
    async fn request_loan(
        &self,
        _token: &AuthToken,
        book_id: BookId,
        _duration: LoanDuration,
    ) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(book_id);

        match self.refusals.get(&book_id) {
            Some(message) => Err(ApiError::Rejected {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// A signed-in user with the given email.
#[must_use]
pub fn auth_for(email: &str) -> StoredAuth {
    StoredAuth {
        token: AuthToken::new(format!("token-for-{email}")),
        user: AuthUser {
            id: UserId::new(1),
            name: "Test Reader".to_string(),
            email: email.to_string(),
            role: "USER".to_string(),
            phone: None,
        },
    }
}

/// A cart item with a title and selection state.
#[must_use]
pub fn cart_item(id: i32, checked: bool) -> CartItem {
    CartItem {
        title: format!("Book {id}"),
        is_checked: checked,
        ..CartItem::minimal(BookId::new(id))
    }
}

/// A fresh store file path unique to this process and `name`.
#[must_use]
pub fn temp_store_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("booklend_it_{name}_{}", std::process::id()))
        .join("storage.json")
}
