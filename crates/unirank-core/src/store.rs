//! The `RankingStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `unirank-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Error, Result,
  record::{DetailRecord, Profile, RankingOption, SearchRecord},
};

/// Maximum number of records a search returns.
pub const SEARCH_RESULT_CAP: usize = 200;

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`RankingStore::search`]. Every filter is optional.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
  /// Case-insensitive substring of the display name.
  pub text:      Option<String>,
  /// Ranking table that orders the result; defaults to the global table.
  pub criterion: Option<String>,
  pub country:   Option<String>,
  pub city:      Option<String>,
}

impl SearchQuery {
  /// Drop blank filters so they behave exactly like absent ones.
  pub fn cleaned(self) -> Self {
    fn keep(v: Option<String>) -> Option<String> {
      v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
    }
    Self {
      text:      keep(self.text),
      criterion: keep(self.criterion),
      country:   keep(self.country),
      city:      keep(self.city),
    }
  }
}

/// A validated (table, source, subject) triple for [`RankingStore::list_detail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailQuery {
  pub table:   String,
  pub source:  String,
  pub subject: String,
}

impl DetailQuery {
  /// Build a query from raw request parameters.
  ///
  /// Fails with [`Error::MissingParameter`] if any of the three is absent or
  /// blank.
  pub fn from_parts(
    table:   Option<String>,
    source:  Option<String>,
    subject: Option<String>,
  ) -> Result<Self> {
    fn require(v: Option<String>, name: &'static str) -> Result<String> {
      v.filter(|s| !s.trim().is_empty())
        .ok_or(Error::MissingParameter(name))
    }
    Ok(Self {
      table:   require(table, "table")?,
      source:  require(source, "source")?,
      subject: require(subject, "subject")?,
    })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only query surface over the ranking aggregate.
///
/// Every method is a pure read; no backend ever writes.
pub trait RankingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Filtered institutions joined with one resolved ranking table, ranked
  /// rows first, at most [`SEARCH_RESULT_CAP`] records.
  fn search<'a>(
    &'a self,
    query: &'a SearchQuery,
  ) -> impl Future<Output = Result<Vec<SearchRecord>, Self::Error>> + Send + 'a;

  /// The full profile of one institution. `None` if the id is unknown.
  fn get_profile(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Every ranked entity in one exact (table, source, subject) slice.
  fn list_detail<'a>(
    &'a self,
    query: &'a DetailQuery,
  ) -> impl Future<Output = Result<Vec<DetailRecord>, Self::Error>> + Send + 'a;

  /// Names of all discovered ranking tables.
  fn ranking_tables(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Every (table, source, subject) slice across the discovered tables.
  fn ranking_options(
    &self,
  ) -> impl Future<Output = Result<Vec<RankingOption>, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detail_query_requires_every_part() {
    let ok = DetailQuery::from_parts(
      Some("Global_Rankings".into()),
      Some("QS".into()),
      Some("overall".into()),
    )
    .unwrap();
    assert_eq!(ok.table, "Global_Rankings");

    let err = DetailQuery::from_parts(None, Some("QS".into()), Some("overall".into()));
    assert!(matches!(err, Err(Error::MissingParameter("table"))));

    let err = DetailQuery::from_parts(
      Some("Global_Rankings".into()),
      Some("  ".into()),
      Some("overall".into()),
    );
    assert!(matches!(err, Err(Error::MissingParameter("source"))));

    let err = DetailQuery::from_parts(Some("Global_Rankings".into()), Some("QS".into()), None);
    assert!(matches!(err, Err(Error::MissingParameter("subject"))));
  }

  #[test]
  fn blank_search_filters_are_dropped() {
    let q = SearchQuery {
      text:      Some("  ".into()),
      criterion: Some(" QS_Rankings ".into()),
      country:   None,
      city:      Some("".into()),
    }
    .cleaned();
    assert_eq!(q.text, None);
    assert_eq!(q.criterion.as_deref(), Some("QS_Rankings"));
    assert_eq!(q.city, None);
  }
}
