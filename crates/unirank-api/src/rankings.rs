//! Handlers for `/rankings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/rankings/detail` | `table`, `source` and `subject` all required |
//! | `GET`  | `/rankings/options` | Every (table, source, subject) slice |
//! | `GET`  | `/rankings/tables` | Discovered ranking table names |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use unirank_core::{
  record::{DetailRecord, RankingOption},
  store::{DetailQuery, RankingStore},
};

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct DetailParams {
  pub table:   Option<String>,
  pub source:  Option<String>,
  pub subject: Option<String>,
}

/// `GET /rankings/detail?table=...&source=...&subject=...`
///
/// A missing parameter is rejected before the store is touched.
pub async fn detail<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<DetailParams>,
) -> Result<Json<Vec<DetailRecord>>, ApiError>
where
  S: RankingStore,
{
  let query = DetailQuery::from_parts(params.table, params.source, params.subject)?;
  let records = store.list_detail(&query).await.map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `GET /rankings/options`
pub async fn options<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RankingOption>>, ApiError>
where
  S: RankingStore,
{
  let options = store.ranking_options().await.map_err(ApiError::store)?;
  Ok(Json(options))
}

/// `GET /rankings/tables`
pub async fn tables<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: RankingStore,
{
  let tables = store.ranking_tables().await.map_err(ApiError::store)?;
  Ok(Json(tables))
}
