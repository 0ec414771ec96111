//! Review commands.

use booklend_client::Result;
use booklend_client::forms::ReviewForm;
use booklend_client::notice::Notice;
use booklend_client::state::AppState;
use booklend_core::BookId;

use crate::output;

const MY_REVIEWS_LIMIT: u32 = 20;

pub async fn list(state: &AppState, book: BookId, page: u32, limit: u32) -> Result<()> {
    let reviews = state.api().book_reviews(book, page, limit).await?;
    output::reviews(&reviews);
    Ok(())
}

pub async fn add(state: &AppState, book: BookId, star: u8, comment: String) -> Result<()> {
    let auth = super::require_auth(state)?;
    let review = ReviewForm {
        book_id: book,
        star,
        comment,
    }
    .into_request()?;

    state.api().create_review(&auth.token, &review).await?;

    let title = state
        .api()
        .book(book)
        .await
        .map_or_else(|_| "this book".to_string(), |b| b.title);
    output::notice(
        &Notice::success("Review saved").with_description(format!("Thanks for reviewing {title}!")),
    );
    Ok(())
}

pub async fn mine(state: &AppState, page: u32) -> Result<()> {
    let auth = super::require_auth(state)?;
    let reviews = state
        .api()
        .my_reviews(&auth.token, page, MY_REVIEWS_LIMIT)
        .await?;

    output::my_reviews(&reviews);
    Ok(())
}
