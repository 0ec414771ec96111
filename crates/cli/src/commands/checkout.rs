//! Checkout command.

use booklend_client::Result;
use booklend_client::checkout::{
    CheckoutError, CheckoutOutcome, CheckoutReconciler, CheckoutRequest,
};
use booklend_client::state::AppState;
use booklend_core::LoanDuration;
use chrono::{Local, NaiveDate};

use crate::output;

pub async fn run(
    state: &AppState,
    duration: LoanDuration,
    borrow_date: Option<NaiveDate>,
    agree_return: bool,
    agree_policy: bool,
) -> Result<()> {
    let auth = state.session().require_auth().ok();
    let request = CheckoutRequest {
        duration,
        borrow_date: borrow_date.unwrap_or_else(|| Local::now().date_naive()),
        agree_return,
        agree_policy,
    };

    let reconciler = CheckoutReconciler::new(state.carts(), state.api());
    let report = match reconciler.confirm(auth.as_ref(), &request).await {
        Ok(report) => report,
        Err(CheckoutError::Rejected(rejected)) => {
            output::notice(&rejected.notice());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for notice in report.notices() {
        output::notice(&notice);
    }

    match report.outcome() {
        CheckoutOutcome::Complete => {
            output::line(&format!("Return by {}", request.return_date_label()));
        }
        CheckoutOutcome::StayOnCheckout if report.success() > 0 => {
            output::line(&format!(
                "Borrowed books are due {}. Books that failed are still in your cart.",
                request.return_date_label()
            ));
        }
        CheckoutOutcome::StayOnCheckout => {
            output::line("Nothing was borrowed. Your cart is unchanged.");
        }
    }
    Ok(())
}
