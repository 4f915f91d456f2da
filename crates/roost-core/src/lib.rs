//! Core types and trait definitions for the Roost listing service.
//!
//! This crate is deliberately free of HTTP, database and cryptography
//! dependencies. It owns the data model and the collaborator traits storage
//! backends implement, plus the backend-independent logic built on top of
//! them (authorization guard, role assignment, rating aggregation).

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod accounts;
pub mod claims;
pub mod error;
pub mod guard;
pub mod post;
pub mod posts;
pub mod principal;
pub mod rating;
pub mod role;
pub mod roles;
pub mod store;

pub use error::{Error, Result};
