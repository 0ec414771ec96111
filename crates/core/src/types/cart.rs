//! Cart item type and repair of persisted cart payloads.
//!
//! A cart is persisted as a JSON array of [`CartItem`]s with camelCase keys.
//! Older clients stored a bare array of book ids, and hand-edited or truncated
//! payloads show up in practice, so decoding never fails: [`CartItem::repair_all`]
//! salvages whatever entries it can.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::id::BookId;

/// A book the user intends to borrow.
///
/// Display strings are copied from the catalog when the item is added and are
/// never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog id of the book. Unique within one cart.
    pub id: BookId,
    /// Book title.
    pub title: String,
    /// Category name at add time.
    pub category_name: String,
    /// Author name at add time.
    pub author_name: String,
    /// Cover image URL, if the book has one.
    pub cover_image: Option<String>,
    /// Whether the item is selected for the next checkout.
    pub is_checked: bool,
}

impl CartItem {
    /// Create an unselected item with only the id populated.
    #[must_use]
    pub const fn minimal(id: BookId) -> Self {
        Self {
            id,
            title: String::new(),
            category_name: String::new(),
            author_name: String::new(),
            cover_image: None,
            is_checked: false,
        }
    }

    /// Repair a single persisted entry.
    ///
    /// - an integer is a legacy entry and expands to [`CartItem::minimal`]
    /// - an object keeps every well-typed field and defaults the rest
    /// - anything without a usable integer id is dropped (`None`)
    #[must_use]
    pub fn repair(value: &Value) -> Option<Self> {
        match value {
            Value::Number(_) => id_from(value).map(Self::minimal),
            Value::Object(fields) => {
                let id = fields.get("id").and_then(id_from)?;
                let text = |key: &str| {
                    fields
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned()
                };

                Some(Self {
                    id,
                    title: text("title"),
                    category_name: text("categoryName"),
                    author_name: text("authorName"),
                    cover_image: fields
                        .get("coverImage")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    is_checked: fields
                        .get("isChecked")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                })
            }
            _ => None,
        }
    }

    /// Decode a raw persisted cart, repairing entries one by one.
    ///
    /// Returns an empty cart for input that is not a JSON array. Ids stay
    /// unique: only the first entry for each id is kept.
    #[must_use]
    pub fn repair_all(raw: &str) -> Vec<Self> {
        let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(raw) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        entries
            .iter()
            .filter_map(Self::repair)
            .filter(|item| seen.insert(item.id))
            .collect()
    }
}

fn id_from(value: &Value) -> Option<BookId> {
    value
        .as_i64()
        .and_then(|id| i32::try_from(id).ok())
        .map(BookId::new)
}
