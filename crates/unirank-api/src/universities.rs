//! Handlers for `/universities` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/universities` | Optional `q`, `ranking`, `country`, `city`; at most 200 rows |
//! | `GET`  | `/universities/:id` | Full profile; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use unirank_core::{
  record::{Profile, SearchRecord},
  store::{RankingStore, SearchQuery},
};

use crate::error::ApiError;

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Case-insensitive substring of the display name.
  pub q:       Option<String>,
  /// Ranking table to order by, e.g. `Global_Rankings`.
  pub ranking: Option<String>,
  pub country: Option<String>,
  pub city:    Option<String>,
}

/// `GET /universities[?q=...][&ranking=...][&country=...][&city=...]`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchRecord>>, ApiError>
where
  S: RankingStore,
{
  let query = SearchQuery {
    text:      params.q,
    criterion: params.ranking,
    country:   params.country,
    city:      params.city,
  };

  let records = store.search(&query).await.map_err(ApiError::store)?;
  Ok(Json(records))
}

// ─── Profile ──────────────────────────────────────────────────────────────────

/// `GET /universities/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Profile>, ApiError>
where
  S: RankingStore,
{
  let profile = store
    .get_profile(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("university {id} not found")))?;
  Ok(Json(profile))
}
