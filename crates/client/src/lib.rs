//! Booklend client library.
//!
//! Talks to the lending REST API and keeps the small amount of state a
//! front end needs between runs: the authentication record and one cart per
//! signed-in user.
//!
//! # Modules
//!
//! - [`api`] - REST client for catalog, reviews, loans and account endpoints
//! - [`storage`] - persistent string key-value stores
//! - [`cart`] - per-identity cart over a store
//! - [`checkout`] - sequential batch borrowing and cart reconciliation
//! - [`session`] - session state container, login and logout
//! - [`loans`] - loan status and filtering for the profile view

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod forms;
pub mod loans;
pub mod notice;
pub mod session;
pub mod state;
pub mod storage;

pub use error::{ClientError, Result};
