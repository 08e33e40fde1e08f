//! SQLite backend for the translation feedback store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every operation opens its own
//! connection and releases it before returning.

mod config;
mod queries;
mod rows;
mod schema;
mod store;

pub mod error;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
