//! The signed-in user's loans as shown on the profile page.

use core::fmt;
use std::str::FromStr;

use booklend_core::LoanStatus;
use chrono::{DateTime, Utc};

use crate::api::Loan;

/// Status shown for a loan, with overdue loans called out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayStatus {
    Active,
    Returned,
    Overdue,
    /// A backend status the client does not know, shown as-is.
    Other(String),
}

impl DisplayStatus {
    /// Status of `loan` at `now`. A borrowed loan past its due time is overdue.
    #[must_use]
    pub fn of(loan: &Loan, now: DateTime<Utc>) -> Self {
        match &loan.status {
            LoanStatus::Borrowed if now > loan.due_at => Self::Overdue,
            LoanStatus::Borrowed => Self::Active,
            LoanStatus::Returned => Self::Returned,
            LoanStatus::Other(status) => Self::Other(status.clone()),
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Returned => f.write_str("Returned"),
            Self::Overdue => f.write_str("Overdue"),
            Self::Other(status) => f.write_str(status),
        }
    }
}

/// Filter tabs of the loans view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoanFilter {
    #[default]
    All,
    Active,
    Returned,
    Overdue,
}

impl LoanFilter {
    const fn matches(self, status: &DisplayStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => matches!(status, DisplayStatus::Active),
            Self::Returned => matches!(status, DisplayStatus::Returned),
            Self::Overdue => matches!(status, DisplayStatus::Overdue),
        }
    }
}

impl FromStr for LoanFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "returned" => Ok(Self::Returned),
            "overdue" => Ok(Self::Overdue),
            _ => Err(format!("unknown loan filter: {s}")),
        }
    }
}

/// A loan paired with the status to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRow {
    pub loan: Loan,
    pub status: DisplayStatus,
}

/// Loans matching `filter` whose book title contains `search`, ignoring case.
///
/// Keeps the API's order. A blank search matches everything.
#[must_use]
pub fn filter_loans(
    loans: Vec<Loan>,
    filter: LoanFilter,
    search: &str,
    now: DateTime<Utc>,
) -> Vec<LoanRow> {
    let query = search.trim().to_lowercase();

    loans
        .into_iter()
        .map(|loan| LoanRow {
            status: DisplayStatus::of(&loan, now),
            loan,
        })
        .filter(|row| filter.matches(&row.status))
        .filter(|row| query.is_empty() || row.loan.book.title.to_lowercase().contains(&query))
        .collect()
}
