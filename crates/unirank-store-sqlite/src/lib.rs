//! SQLite backend for the ranking aggregate.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The database is only ever read.

mod catalog;
mod compose;
mod encode;
mod ident;
mod store;

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use store::SqliteStore;
