//! Loans command.

use booklend_client::Result;
use booklend_client::loans::{LoanFilter, filter_loans};
use booklend_client::state::AppState;
use chrono::Utc;

use crate::output;

pub async fn list(state: &AppState, filter: LoanFilter, search: &str) -> Result<()> {
    let auth = super::require_auth(state)?;
    let loans = state.api().my_loans(&auth.token).await?;

    output::loans(&filter_loans(loans, filter, search, Utc::now()));
    Ok(())
}
