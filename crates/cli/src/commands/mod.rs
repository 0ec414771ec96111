//! Command implementations.
//!
//! Each command hydrates the session from the store, calls the client
//! library and renders the result through [`crate::output`].

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod loans;
pub mod reviews;

use booklend_client::Result;
use booklend_client::auth::StoredAuth;
use booklend_client::state::AppState;

/// Credentials of the signed-in user, or an error asking them to sign in.
fn require_auth(state: &AppState) -> Result<StoredAuth> {
    Ok(state.session().require_auth()?)
}
