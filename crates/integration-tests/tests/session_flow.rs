//! Integration tests for persisted sessions and per-identity carts.

use booklend_client::auth::{resolve_identity, save_auth};
use booklend_client::cart::{AddOutcome, CartStore};
use booklend_client::session::{SessionState, logout};
use booklend_client::storage::{FileStore, KeyValueStore};
use booklend_core::IdentityNamespace;
use booklend_integration_tests::{auth_for, cart_item, temp_store_path};

#[test]
fn test_carts_follow_the_signed_in_user() {
    let path = temp_store_path("session");
    let store = FileStore::new(&path);
    let carts = CartStore::new(&store);

    save_auth(&store, &auth_for("ann@library.test")).unwrap();
    let ann = resolve_identity(&store);
    carts.add(&ann, cart_item(1, false)).unwrap();

    save_auth(&store, &auth_for("ben@library.test")).unwrap();
    let ben = resolve_identity(&store);
    assert!(carts.load(&ben).is_empty());
    carts.add(&ben, cart_item(2, false)).unwrap();

    let mut session = SessionState::hydrate(&store);
    logout(&store, &mut session).unwrap();
    assert_eq!(resolve_identity(&store), IdentityNamespace::Guest);

    // Both carts survive logout untouched
    let raw_ann = store.get("cart:ann@library.test").unwrap();
    let raw_ben = store.get("cart:ben@library.test").unwrap();
    assert!(raw_ann.contains("\"id\":1"));
    assert!(raw_ben.contains("\"id\":2"));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_duplicate_add_across_runs() {
    let path = temp_store_path("duplicate");
    let ann = auth_for("ann@library.test").identity();

    let first = CartStore::new(FileStore::new(&path));
    assert_eq!(first.add(&ann, cart_item(4, false)).unwrap(), AddOutcome::Added);

    let second = CartStore::new(FileStore::new(&path));
    assert_eq!(
        second.add(&ann, cart_item(4, false)).unwrap(),
        AddOutcome::Duplicate
    );
    assert_eq!(second.load(&ann).len(), 1);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_legacy_cart_payload_is_repaired() {
    let path = temp_store_path("legacy");
    let store = FileStore::new(&path);
    store
        .set(
            "cart:guest",
            r#"[7, {"id": 8, "title": "Emma", "isChecked": "yes"}]"#,
        )
        .unwrap();

    let items = CartStore::new(&store).load(&IdentityNamespace::Guest);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "");
    assert_eq!(items[1].title, "Emma");
    assert!(!items[1].is_checked);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
