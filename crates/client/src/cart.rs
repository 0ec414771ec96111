//! Per-identity cart persisted in a [`KeyValueStore`].
//!
//! Every mutation is a single read followed by a single full-replace write of
//! the identity's cart key. Nothing is cached in memory between calls, so the
//! store is always the source of truth.

use std::collections::HashSet;

use booklend_core::{BookId, CartItem, IdentityNamespace};
use tracing::{debug, instrument, warn};

use crate::api::Book;
use crate::error::add_breadcrumb;
use crate::notice::Notice;
use crate::storage::{KeyValueStore, StorageError};

/// Result of adding an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An item with the same id is already in the cart; nothing was written.
    Duplicate,
}

impl AddOutcome {
    /// Notice to show the user for this outcome.
    #[must_use]
    pub fn notice(self) -> Notice {
        match self {
            Self::Added => Notice::success("Successfully added to cart"),
            Self::Duplicate => Notice::warning("Book already in cart")
                .with_description("You have already added this book to your cart"),
        }
    }
}

/// Counts shown next to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    pub items: usize,
    pub selected: usize,
    /// True only for a non-empty cart with every item selected.
    pub all_checked: bool,
}

/// Cart operations over a key-value store.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read the cart for `identity`.
    ///
    /// Never fails: a missing key is an empty cart and malformed payloads are
    /// repaired.
    pub fn load(&self, identity: &IdentityNamespace) -> Vec<CartItem> {
        self.store
            .get(&identity.cart_key())
            .map(|raw| CartItem::repair_all(&raw))
            .unwrap_or_default()
    }

    /// Replace the cart for `identity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn save(&self, identity: &IdentityNamespace, items: &[CartItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.store.set(&identity.cart_key(), &raw)
    }

    /// Append `item` unselected unless its id is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    #[instrument(skip(self, item), fields(book_id = %item.id))]
    pub fn add(&self, identity: &IdentityNamespace, item: CartItem) -> Result<AddOutcome, StorageError> {
        let book_id = item.id;
        let mut items = self.load(identity);
        if items.iter().any(|existing| existing.id == book_id) {
            debug!("Book already in cart");
            return Ok(AddOutcome::Duplicate);
        }

        items.push(CartItem {
            is_checked: false,
            ..item
        });
        self.save(identity, &items)?;

        let book_id = book_id.to_string();
        add_breadcrumb("cart", "Added book to cart", Some(&[("book_id", book_id.as_str())]));
        Ok(AddOutcome::Added)
    }

    /// Add a catalog book, copying its display fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn add_book(&self, identity: &IdentityNamespace, book: &Book) -> Result<AddOutcome, StorageError> {
        self.add(identity, cart_item_from_book(book))
    }

    /// Add a book on behalf of a front end.
    ///
    /// Guests are turned away with a sign-in warning and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn add_book_guarded(&self, identity: &IdentityNamespace, book: &Book) -> Result<Notice, StorageError> {
        if let Some(notice) = guest_warning(identity) {
            warn!(book_id = %book.id, "Add to cart without a session");
            return Ok(notice);
        }
        self.add_book(identity, book).map(AddOutcome::notice)
    }

    /// Select or deselect one item. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn set_checked(
        &self,
        identity: &IdentityNamespace,
        id: BookId,
        checked: bool,
    ) -> Result<(), StorageError> {
        let mut items = self.load(identity);
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            debug!(book_id = %id, "Book not in cart");
            return Ok(());
        };
        item.is_checked = checked;
        self.save(identity, &items)
    }

    /// Select or deselect every item.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn set_checked_all(&self, identity: &IdentityNamespace, checked: bool) -> Result<(), StorageError> {
        let mut items = self.load(identity);
        for item in &mut items {
            item.is_checked = checked;
        }
        self.save(identity, &items)
    }

    /// Drop every item whose id is in `ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub fn remove(&self, identity: &IdentityNamespace, ids: &HashSet<BookId>) -> Result<(), StorageError> {
        let mut items = self.load(identity);
        items.retain(|item| !ids.contains(&item.id));
        self.save(identity, &items)
    }

    /// Selected items in cart order.
    pub fn selected(&self, identity: &IdentityNamespace) -> Vec<CartItem> {
        self.load(identity)
            .into_iter()
            .filter(|item| item.is_checked)
            .collect()
    }

    pub fn summary(&self, identity: &IdentityNamespace) -> CartSummary {
        let items = self.load(identity);
        let selected = items.iter().filter(|item| item.is_checked).count();

        CartSummary {
            items: items.len(),
            selected,
            all_checked: !items.is_empty() && selected == items.len(),
        }
    }
}

/// Sign-in warning for a guest trying to add to the cart, `None` otherwise.
///
/// Front ends that look the book up first should check this before the
/// lookup so a guest always gets the warning.
#[must_use]
pub fn guest_warning(identity: &IdentityNamespace) -> Option<Notice> {
    identity.is_guest().then(|| {
        Notice::warning("Please login first")
            .with_description("You need to login before adding books to cart")
    })
}

fn cart_item_from_book(book: &Book) -> CartItem {
    CartItem {
        id: book.id,
        title: book.title.clone(),
        category_name: book
            .category
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        author_name: book
            .author
            .as_ref()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
        cover_image: book.cover_image.clone(),
        is_checked: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::storage::MemoryStore;
    use booklend_core::Email;

    fn ann() -> IdentityNamespace {
        IdentityNamespace::User(Email::parse("ann@library.test").unwrap())
    }

    fn item(id: i32, checked: bool) -> CartItem {
        CartItem {
            title: format!("Book {id}"),
            is_checked: checked,
            ..CartItem::minimal(BookId::new(id))
        }
    }

    fn ids(items: &[CartItem]) -> Vec<i32> {
        items.iter().map(|item| item.id.as_i32()).collect()
    }

    fn book() -> Book {
        serde_json::from_str(
            r#"{"id":9,"title":"Dune","coverImage":"https://img.test/dune.jpg",
                "author":{"id":2,"name":"Frank Herbert"},
                "category":{"id":3,"name":"Science Fiction"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_load_missing_is_empty() {
        let carts = CartStore::new(MemoryStore::new());
        assert!(carts.load(&ann()).is_empty());
    }

    #[test]
    fn test_load_repairs_payloads() {
        let store = MemoryStore::new();
        store.set("cart:ann@library.test", "[5, {\"id\":6}]").unwrap();
        let carts = CartStore::new(store);

        let items = carts.load(&ann());
        assert_eq!(items, vec![CartItem::minimal(BookId::new(5)), CartItem::minimal(BookId::new(6))]);

        carts.store().set("cart:ann@library.test", "{\"id\":1}").unwrap();
        assert!(carts.load(&ann()).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let carts = CartStore::new(MemoryStore::new());
        let items = vec![item(1, true), item(2, false)];
        carts.save(&ann(), &items).unwrap();
        assert_eq!(carts.load(&ann()), items);
    }

    #[test]
    fn test_add_appends_unchecked() {
        let carts = CartStore::new(MemoryStore::new());
        assert_eq!(carts.add(&ann(), item(1, true)).unwrap(), AddOutcome::Added);
        assert_eq!(carts.add(&ann(), item(2, false)).unwrap(), AddOutcome::Added);

        let items = carts.load(&ann());
        assert_eq!(ids(&items), vec![1, 2]);
        assert!(items.iter().all(|item| !item.is_checked));
    }

    #[test]
    fn test_add_duplicate_does_not_write() {
        let store = MemoryStore::new();
        let carts = CartStore::new(&store);
        carts.add(&ann(), item(1, false)).unwrap();
        let writes = store.write_count();

        let outcome = carts.add(&ann(), item(1, false)).unwrap();
        assert_eq!(outcome, AddOutcome::Duplicate);
        assert_eq!(store.write_count(), writes);
        assert_eq!(ids(&carts.load(&ann())), vec![1]);
        assert_eq!(outcome.notice().title, "Book already in cart");
    }

    #[test]
    fn test_mutation_is_one_read_one_write() {
        let store = MemoryStore::new();
        let carts = CartStore::new(&store);
        carts.save(&ann(), &[item(1, false), item(2, false)]).unwrap();
        let (reads, writes) = (store.read_count(), store.write_count());

        carts.set_checked(&ann(), BookId::new(2), true).unwrap();
        assert_eq!(store.read_count(), reads + 1);
        assert_eq!(store.write_count(), writes + 1);
    }

    #[test]
    fn test_set_checked() {
        let carts = CartStore::new(MemoryStore::new());
        carts.save(&ann(), &[item(1, false), item(2, false)]).unwrap();

        carts.set_checked(&ann(), BookId::new(2), true).unwrap();
        assert_eq!(ids(&carts.selected(&ann())), vec![2]);

        carts.set_checked(&ann(), BookId::new(42), true).unwrap();
        assert_eq!(ids(&carts.selected(&ann())), vec![2]);
    }

    #[test]
    fn test_uncheck_after_repeated_ids_clears_selection() {
        let store = MemoryStore::new();
        store
            .set(
                "cart:ann@library.test",
                r#"[{"id":1,"isChecked":true},{"id":1,"isChecked":true},{"id":2}]"#,
            )
            .unwrap();
        let carts = CartStore::new(store);
        assert_eq!(ids(&carts.load(&ann())), vec![1, 2]);

        carts.set_checked(&ann(), BookId::new(1), false).unwrap();
        assert!(carts.selected(&ann()).is_empty());

        carts.set_checked(&ann(), BookId::new(2), true).unwrap();
        assert_eq!(ids(&carts.selected(&ann())), vec![2]);
    }

    #[test]
    fn test_set_checked_all_and_summary() {
        let carts = CartStore::new(MemoryStore::new());
        assert_eq!(carts.summary(&ann()), CartSummary::default());

        carts.save(&ann(), &[item(1, false), item(2, true)]).unwrap();
        assert_eq!(
            carts.summary(&ann()),
            CartSummary { items: 2, selected: 1, all_checked: false }
        );

        carts.set_checked_all(&ann(), true).unwrap();
        assert!(carts.summary(&ann()).all_checked);

        carts.set_checked_all(&ann(), false).unwrap();
        assert_eq!(carts.summary(&ann()).selected, 0);
    }

    #[test]
    fn test_remove_keeps_order() {
        let carts = CartStore::new(MemoryStore::new());
        carts.save(&ann(), &[item(1, true), item(2, false), item(3, true)]).unwrap();

        carts.remove(&ann(), &HashSet::from([BookId::new(1), BookId::new(3)])).unwrap();
        assert_eq!(ids(&carts.load(&ann())), vec![2]);
    }

    #[test]
    fn test_identities_are_isolated() {
        let carts = CartStore::new(MemoryStore::new());
        carts.add(&ann(), item(1, false)).unwrap();
        carts.add(&IdentityNamespace::Guest, item(2, false)).unwrap();

        assert_eq!(ids(&carts.load(&ann())), vec![1]);
        assert_eq!(ids(&carts.load(&IdentityNamespace::Guest)), vec![2]);
    }

    #[test]
    fn test_add_book_copies_display_fields() {
        let carts = CartStore::new(MemoryStore::new());
        carts.add_book(&ann(), &book()).unwrap();

        let items = carts.load(&ann());
        assert_eq!(items[0].title, "Dune");
        assert_eq!(items[0].author_name, "Frank Herbert");
        assert_eq!(items[0].category_name, "Science Fiction");
        assert_eq!(items[0].cover_image.as_deref(), Some("https://img.test/dune.jpg"));
    }

    #[test]
    fn test_guarded_add_rejects_guest() {
        let store = MemoryStore::new();
        let carts = CartStore::new(&store);

        let notice = carts.add_book_guarded(&IdentityNamespace::Guest, &book()).unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.title, "Please login first");
        assert_eq!(store.write_count(), 0);

        let notice = carts.add_book_guarded(&ann(), &book()).unwrap();
        assert_eq!(notice.title, "Successfully added to cart");
    }

    #[test]
    fn test_guest_warning_only_for_guests() {
        let notice = guest_warning(&IdentityNamespace::Guest).unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.title, "Please login first");

        assert!(guest_warning(&ann()).is_none());
    }
}
