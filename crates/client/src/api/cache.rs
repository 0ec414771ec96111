//! Cache types for catalog responses.

use booklend_core::BookId;

use crate::api::types::{Author, Book, Category};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Book(BookId),
    Categories,
    Authors,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Book(Box<Book>),
    Categories(Vec<Category>),
    Authors(Vec<Author>),
}
