//! Core types and trait definitions for the university ranking aggregate.
//!
//! This crate is free of HTTP and database dependencies. It owns the join-key
//! normalizer, the catalog abstraction over whatever store holds the ranking
//! tables, ranking-table resolution, and profile aggregation.

pub mod catalog;
pub mod error;
pub mod normalize;
pub mod profile;
pub mod record;
pub mod resolve;
pub mod store;

pub use error::{Error, Result};
pub use normalize::normalize;
