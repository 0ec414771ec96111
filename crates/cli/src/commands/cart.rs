//! Cart commands. All of them act on the current session's cart.

use std::collections::HashSet;

use booklend_client::Result;
use booklend_client::cart::guest_warning;
use booklend_client::state::AppState;
use booklend_core::BookId;

use crate::output;

pub fn list(state: &AppState) -> Result<()> {
    let identity = state.session().identity();
    let carts = state.carts();

    output::cart(&carts.load(&identity), carts.summary(&identity));
    Ok(())
}

pub async fn add(state: &AppState, id: BookId) -> Result<()> {
    let identity = state.session().identity();
    if let Some(notice) = guest_warning(&identity) {
        output::notice(&notice);
        return Ok(());
    }
    let book = state.api().book(id).await?;

    let notice = state.carts().add_book_guarded(&identity, &book)?;
    output::notice(&notice);
    Ok(())
}

pub fn set_checked(state: &AppState, id: BookId, checked: bool) -> Result<()> {
    let identity = state.session().identity();
    state.carts().set_checked(&identity, id, checked)?;
    list(state)
}

pub fn set_checked_all(state: &AppState, checked: bool) -> Result<()> {
    let identity = state.session().identity();
    state.carts().set_checked_all(&identity, checked)?;
    list(state)
}

pub fn remove(state: &AppState, ids: &[BookId]) -> Result<()> {
    let identity = state.session().identity();
    let ids: HashSet<BookId> = ids.iter().copied().collect();
    state.carts().remove(&identity, &ids)?;
    list(state)
}
