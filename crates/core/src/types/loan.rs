//! Loan durations and statuses.

use core::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Error returned when a day count is not one of the offered durations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("loan duration must be 3, 5 or 10 days (got {0})")]
pub struct LoanDurationError(pub String);

/// How long a book is borrowed for.
///
/// The library only offers a fixed set of durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LoanDuration {
    #[default]
    ThreeDays,
    FiveDays,
    TenDays,
}

impl LoanDuration {
    /// All offered durations, shortest first.
    pub const ALL: [Self; 3] = [Self::ThreeDays, Self::FiveDays, Self::TenDays];

    /// Number of days in this duration.
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::ThreeDays => 3,
            Self::FiveDays => 5,
            Self::TenDays => 10,
        }
    }

    /// Date by which a book borrowed on `borrowed_on` must be returned.
    #[must_use]
    pub fn due_date(self, borrowed_on: NaiveDate) -> NaiveDate {
        borrowed_on
            .checked_add_days(Days::new(u64::from(self.days())))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for LoanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Days", self.days())
    }
}

impl TryFrom<u32> for LoanDuration {
    type Error = LoanDurationError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.days() == days)
            .ok_or_else(|| LoanDurationError(days.to_string()))
    }
}

impl From<LoanDuration> for u32 {
    fn from(duration: LoanDuration) -> Self {
        duration.days()
    }
}

impl FromStr for LoanDuration {
    type Err = LoanDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| LoanDurationError(s.to_string()))
            .and_then(Self::try_from)
    }
}

/// Status of a loan as reported by the backend.
///
/// Statuses other than the two the client understands are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoanStatus {
    Borrowed,
    Returned,
    Other(String),
}

impl LoanStatus {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Borrowed => "BORROWED",
            Self::Returned => "RETURNED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for LoanStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "BORROWED" => Self::Borrowed,
            "RETURNED" => Self::Returned,
            _ => Self::Other(value),
        }
    }
}

impl From<LoanStatus> for String {
    fn from(status: LoanStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_accepts_only_offered_durations() {
        assert_eq!(LoanDuration::try_from(3), Ok(LoanDuration::ThreeDays));
        assert_eq!(LoanDuration::try_from(5), Ok(LoanDuration::FiveDays));
        assert_eq!(LoanDuration::try_from(10), Ok(LoanDuration::TenDays));
        assert!(LoanDuration::try_from(7).is_err());
        assert!("abc".parse::<LoanDuration>().is_err());
        assert_eq!(" 5 ".parse::<LoanDuration>(), Ok(LoanDuration::FiveDays));
    }

    #[test]
    fn test_default_is_three_days() {
        assert_eq!(LoanDuration::default().days(), 3);
    }

    #[test]
    fn test_due_date_crosses_month_boundary() {
        let borrowed = NaiveDate::from_ymd_opt(2026, 1, 28).unwrap();
        assert_eq!(
            LoanDuration::FiveDays.due_date(borrowed),
            NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
        );
    }

    #[test]
    fn test_duration_serializes_as_day_count() {
        assert_eq!(serde_json::to_string(&LoanDuration::TenDays).unwrap(), "10");
        assert!(serde_json::from_str::<LoanDuration>("4").is_err());
    }

    #[test]
    fn test_status_round_trips_unknown_values() {
        let status: LoanStatus = serde_json::from_str("\"LOST\"").unwrap();
        assert_eq!(status, LoanStatus::Other("LOST".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"LOST\"");

        let status: LoanStatus = serde_json::from_str("\"BORROWED\"").unwrap();
        assert_eq!(status, LoanStatus::Borrowed);
    }
}
