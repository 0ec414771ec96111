//! Booklend Core - Shared types library.
//!
//! This crate provides common types used across all Booklend components:
//! - `client` - Library API client, cart store and checkout reconciler
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, cart items, loan durations and identity namespaces

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
