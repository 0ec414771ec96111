//! Domain types for the lending API.
//!
//! Field names follow the API's camelCase JSON. Fields the API sometimes
//! omits are defaulted so a sparse payload still decodes.

use booklend_core::{AuthorId, BookId, CategoryId, LoanId, LoanStatus, ReviewId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Types
// =============================================================================

/// Author reference embedded in a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAuthor {
    pub id: AuthorId,
    pub name: String,
}

/// Book category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A catalog book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub total_copies: u32,
    #[serde(default)]
    pub available_copies: u32,
    #[serde(default)]
    pub borrow_count: u32,
    #[serde(default)]
    pub author_id: Option<AuthorId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub author: Option<BookAuthor>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Book {
    /// Whether at least one copy can be borrowed right now.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Category id, taken from the embedded category when the flat field is absent.
    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
            .or_else(|| self.category.as_ref().map(|c| c.id))
    }
}

/// Minimal book reference used in author listings, loans and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// A catalog author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    #[serde(default)]
    pub bio: String,
}

/// Page metadata for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One page of books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Filters for the book listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookQuery {
    pub category_id: Option<CategoryId>,
    pub page: u32,
    pub limit: u32,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            category_id: None,
            page: 1,
            limit: 8,
        }
    }
}

/// Recommended books and the strategy the API used to pick them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub mode: String,
    pub books: Vec<Book>,
}

/// An author with the books they wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBooks {
    pub author: Author,
    pub books: Vec<BookSummary>,
}

// =============================================================================
// Review Types
// =============================================================================

/// Reviewer shown next to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewUser {
    pub id: UserId,
    pub name: String,
}

/// A review on a book page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub star: u8,
    #[serde(default)]
    pub comment: String,
    pub user_id: UserId,
    pub book_id: BookId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<ReviewUser>,
}

/// Reviews for one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReviews {
    pub book_id: BookId,
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// A review written by the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyReview {
    pub id: ReviewId,
    pub star: u8,
    #[serde(default)]
    pub comment: String,
    pub book_id: BookId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub book: BookSummary,
}

/// A page of the signed-in user's reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyReviews {
    pub reviews: Vec<MyReview>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Body of a review submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub book_id: BookId,
    pub star: u8,
    pub comment: String,
}

// =============================================================================
// Loan Types
// =============================================================================

/// A loan of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub status: LoanStatus,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
    pub book: BookSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoanList {
    pub loans: Vec<Loan>,
}

/// Body of a loan-creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub book_id: BookId,
    pub days: u32,
}

// =============================================================================
// Account Types
// =============================================================================

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MeData {
    pub profile: Profile,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthorList {
    pub authors: Vec<Author>,
}
