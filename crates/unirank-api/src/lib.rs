//! JSON REST API over the ranking aggregate.
//!
//! Exposes an axum [`Router`] backed by any [`unirank_core::store::RankingStore`].
//! CORS, TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", unirank_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod rankings;
pub mod universities;

use std::sync::Arc;

use axum::{Router, routing::get};
use unirank_core::store::RankingStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RankingStore + 'static,
{
  Router::new()
    // Universities
    .route("/universities", get(universities::search::<S>))
    .route("/universities/{id}", get(universities::get_one::<S>))
    // Rankings
    .route("/rankings/detail", get(rankings::detail::<S>))
    .route("/rankings/options", get(rankings::options::<S>))
    .route("/rankings/tables", get(rankings::tables::<S>))
    .with_state(store)
}

// ─── Router tests ─────────────────────────────────────────────────────────────
