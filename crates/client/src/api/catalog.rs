//! Catalog endpoints: books, authors, categories.

use booklend_core::{AuthorId, BookId, CategoryId};
use reqwest::Method;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::types::{
    Author, AuthorBooks, AuthorList, Book, BookPage, BookQuery, Category, CategoryList,
    Recommendation,
};
use super::{ApiError, LibraryClient};

impl LibraryClient {
    // =========================================================================
    // Book Methods
    // =========================================================================

    /// List books, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_books(&self, query: BookQuery) -> Result<BookPage, ApiError> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(category_id) = query.category_id {
            params.push(("categoryId", category_id.to_string()));
        }

        let request = self.request(Method::GET, "books", None)?.query(&params);
        let page: BookPage = self.execute(request).await?;

        debug!(count = page.books.len(), "Fetched books");
        Ok(page)
    }

    /// Get a single book by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the book does not exist or the API request fails.
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn book(&self, id: BookId) -> Result<Book, ApiError> {
        let key = CacheKey::Book(id);
        if let Some(CacheValue::Book(book)) = self.cached(&key).await {
            return Ok(*book);
        }

        let request = self.request(Method::GET, &format!("books/{id}"), None)?;
        let book: Book = self.execute(request).await?;

        self.remember(key, CacheValue::Book(Box::new(book.clone())))
            .await;
        Ok(book)
    }

    /// Books the API recommends on the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn recommended_books(&self, limit: u32) -> Result<Recommendation, ApiError> {
        let request = self
            .request(Method::GET, "books/recommend", None)?
            .query(&[("limit", limit)]);

        self.execute(request).await
    }

    /// Other books in the same category as `book`.
    ///
    /// Empty when the book has no category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, book), fields(book_id = %book.id))]
    pub async fn related_books(&self, book: &Book, limit: u32) -> Result<Vec<Book>, ApiError> {
        let Some(category_id) = book.category_id() else {
            return Ok(Vec::new());
        };

        let page = self.list_books(related_query(category_id, limit)).await?;

        Ok(page
            .books
            .into_iter()
            .filter(|b| b.id != book.id)
            .take(limit as usize)
            .collect())
    }

    // =========================================================================
    // Author & Category Methods
    // =========================================================================

    /// All authors.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn authors(&self) -> Result<Vec<Author>, ApiError> {
        if let Some(CacheValue::Authors(authors)) = self.cached(&CacheKey::Authors).await {
            return Ok(authors);
        }

        let request = self.request(Method::GET, "authors", None)?;
        let list: AuthorList = self.execute(request).await?;

        self.remember(CacheKey::Authors, CacheValue::Authors(list.authors.clone()))
            .await;
        Ok(list.authors)
    }

    /// An author and the books they wrote.
    ///
    /// # Errors
    ///
    /// Returns an error if the author does not exist or the API request fails.
    #[instrument(skip(self), fields(author_id = %id))]
    pub async fn author_books(&self, id: AuthorId) -> Result<AuthorBooks, ApiError> {
        let request = self.request(Method::GET, &format!("authors/{id}/books"), None)?;
        self.execute(request).await
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) = self.cached(&CacheKey::Categories).await
        {
            return Ok(categories);
        }

        let request = self.request(Method::GET, "categories", None)?;
        let list: CategoryList = self.execute(request).await?;

        self.remember(
            CacheKey::Categories,
            CacheValue::Categories(list.categories.clone()),
        )
        .await;
        Ok(list.categories)
    }
}

/// First page of `category_id`, one larger than `limit` so the book being
/// viewed can be dropped without coming up short.
const fn related_query(category_id: CategoryId, limit: u32) -> BookQuery {
    BookQuery {
        category_id: Some(category_id),
        page: 1,
        limit: limit.saturating_add(1),
    }
}
