//! Core types for Booklend.
//!
//! This module provides type-safe wrappers for the lending domain.

pub mod cart;
pub mod email;
pub mod id;
pub mod identity;
pub mod loan;

pub use cart::CartItem;
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::{CART_KEY_PREFIX, GUEST_NAMESPACE, IdentityNamespace};
pub use loan::{LoanDuration, LoanDurationError, LoanStatus};
