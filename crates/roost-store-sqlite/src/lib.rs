//! SQLite backend for the Roost store traits.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every multi-statement write runs in a
//! single transaction on that thread.

mod accounts;
mod encode;
mod password;
mod posts;
mod roles;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
