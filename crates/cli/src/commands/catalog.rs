//! Catalog browsing commands.

use booklend_client::Result;
use booklend_client::api::BookQuery;
use booklend_client::state::AppState;
use booklend_core::{AuthorId, BookId, CategoryId};

use crate::output;

const RELATED_LIMIT: u32 = 4;
const DETAIL_REVIEW_LIMIT: u32 = 5;

pub async fn list_books(
    state: &AppState,
    category: Option<CategoryId>,
    page: u32,
    limit: u32,
) -> Result<()> {
    let page = state
        .api()
        .list_books(BookQuery {
            category_id: category,
            page,
            limit,
        })
        .await?;

    output::books(&page.books, Some(&page.pagination));
    Ok(())
}

pub async fn show_book(state: &AppState, id: BookId) -> Result<()> {
    let api = state.api();
    let book = api.book(id).await?;
    output::book_detail(&book);

    let reviews = api.book_reviews(id, 1, DETAIL_REVIEW_LIMIT).await?;
    output::line("");
    output::line("Reviews");
    output::reviews(&reviews);

    let related = api.related_books(&book, RELATED_LIMIT).await?;
    if !related.is_empty() {
        output::line("");
        output::line("Related books");
        output::books(&related, None);
    }
    Ok(())
}

pub async fn recommend(state: &AppState, limit: u32) -> Result<()> {
    let recommendation = state.api().recommended_books(limit).await?;
    output::books(&recommendation.books, None);
    Ok(())
}

pub async fn authors(state: &AppState, id: Option<AuthorId>) -> Result<()> {
    match id {
        Some(id) => output::author_books(&state.api().author_books(id).await?),
        None => output::authors(&state.api().authors().await?),
    }
    Ok(())
}

pub async fn categories(state: &AppState) -> Result<()> {
    output::categories(&state.api().categories().await?);
    Ok(())
}
