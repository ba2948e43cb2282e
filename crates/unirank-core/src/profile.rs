//! Profile aggregation across every discovered ranking table.
//!
//! Unlike search, which joins a single resolved table, a profile collects the
//! matching rows of *all* ranking tables. Each table is fetched on its own and
//! a table that cannot be read contributes nothing instead of failing the
//! whole profile.

use std::future::Future;

use tracing::{debug, warn};

use crate::{
  catalog::{RANKING_TABLE_SUFFIX, SchemaCatalog},
  record::{Institution, Profile, RankingEntry, StatEntry, cmp_rank},
};

/// Outcome of reading one ranking table for one join key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableFetch {
  Rows(Vec<RankingEntry>),
  /// The table could not be read (schema drift, missing column, timeout).
  Skipped { reason: String },
}

/// Primitive reads a backend provides so [`assemble`] can build a profile.
pub trait ProfileSource: SchemaCatalog {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Base row joined with its translation. `None` if the id is unknown.
  fn fetch_institution(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Institution>, Self::Error>> + Send + '_;

  /// Rows of `table` whose join key equals `key`.
  ///
  /// Only connection-level failures are `Err`; anything specific to the table
  /// comes back as [`TableFetch::Skipped`].
  fn fetch_table_rankings<'a>(
    &'a self,
    table: &'a str,
    key: &'a str,
  ) -> impl Future<Output = Result<TableFetch, Self::Error>> + Send + 'a;

  /// All stats rows for the join key.
  fn fetch_stats<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Vec<StatEntry>, Self::Error>> + Send + 'a;
}

/// Order a ranking collection: global/world subjects first, then ascending
/// rank with unranked rows last. Ties keep their fetch order.
pub fn sort_rankings(rankings: &mut [RankingEntry]) {
  rankings.sort_by(|a, b| {
    b.is_global()
      .cmp(&a.is_global())
      .then_with(|| cmp_rank(a.rank, b.rank))
  });
}

/// Build the profile for `id`, or `None` when the institution does not exist.
///
/// A missing institution short-circuits before any ranking or stats read.
pub async fn assemble<S>(source: &S, id: i64) -> Result<Option<Profile>, S::Error>
where
  S: ProfileSource,
{
  let Some(institution) = source.fetch_institution(id).await? else {
    return Ok(None);
  };
  let key = institution.normalized_name.clone();

  let tables = source.list_tables(RANKING_TABLE_SUFFIX).await;
  debug!(id, %key, tables = tables.len(), "aggregating profile");

  let mut rankings = Vec::new();
  for table in &tables {
    match source.fetch_table_rankings(table, &key).await? {
      TableFetch::Rows(rows) => rankings.extend(rows),
      TableFetch::Skipped { reason } => {
        warn!(%table, %reason, "skipping ranking table");
      }
    }
  }
  sort_rankings(&mut rankings);

  let stats = source.fetch_stats(&key).await?;

  Ok(Some(Profile { institution, rankings, stats }))
}

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
  };

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("connection closed")]
  struct Closed;

  #[derive(Default)]
  struct FakeSource {
    institutions: HashMap<i64, Institution>,
    tables:       Vec<(String, Option<Vec<RankingEntry>>)>,
    stats:        Vec<StatEntry>,
    closed_stats: bool,
    reads:        AtomicUsize,
  }

  impl SchemaCatalog for FakeSource {
    fn table_exists<'a>(
      &'a self,
      name: &'a str,
    ) -> impl Future<Output = bool> + Send + 'a {
      self.reads.fetch_add(1, Ordering::SeqCst);
      let found = self.tables.iter().any(|(t, _)| t == name);
      async move { found }
    }

    fn list_tables<'a>(
      &'a self,
      _suffix: &'a str,
    ) -> impl Future<Output = Vec<String>> + Send + 'a {
      self.reads.fetch_add(1, Ordering::SeqCst);
      let names = self.tables.iter().map(|(t, _)| t.clone()).collect();
      async move { names }
    }
  }

  impl ProfileSource for FakeSource {
    type Error = Closed;

    async fn fetch_institution(&self, id: i64) -> Result<Option<Institution>, Closed> {
      Ok(self.institutions.get(&id).cloned())
    }

    async fn fetch_table_rankings(
      &self,
      table: &str,
      key: &str,
    ) -> Result<TableFetch, Closed> {
      self.reads.fetch_add(1, Ordering::SeqCst);
      let (_, rows) = self.tables.iter().find(|(t, _)| t == table).ok_or(Closed)?;
      Ok(match rows {
        Some(rows) => TableFetch::Rows(
          rows
            .iter()
            .filter(|r| r.source.as_deref() == Some(key))
            .cloned()
            .collect(),
        ),
        None => TableFetch::Skipped { reason: "no such column: rank".into() },
      })
    }

    async fn fetch_stats(&self, _key: &str) -> Result<Vec<StatEntry>, Closed> {
      self.reads.fetch_add(1, Ordering::SeqCst);
      if self.closed_stats {
        return Err(Closed);
      }
      Ok(self.stats.clone())
    }
  }

  fn institution(id: i64, key: &str) -> Institution {
    Institution {
      id,
      normalized_name: key.into(),
      name:            key.into(),
      translated_name: None,
      country:         None,
      country_code:    None,
      city:            None,
      photo:           None,
      blurb:           None,
    }
  }

  // The fake keys ranking rows by `source` so one table can hold rows for
  // several institutions.
  fn row(table: &str, key: &str, subject: &str, rank: Option<i64>) -> RankingEntry {
    RankingEntry {
      table:   table.into(),
      subject: Some(subject.into()),
      source:  Some(key.into()),
      rank,
    }
  }

  fn harvard_source() -> FakeSource {
    let key = "harvard university";
    FakeSource {
      institutions: HashMap::from([(1, institution(1, key))]),
      tables: vec![
        ("Global_Rankings".into(), Some(vec![row("Global_Rankings", key, "overall", Some(1))])),
        ("China_Rankings".into(), Some(vec![row("China_Rankings", key, "overall", Some(5))])),
      ],
      stats: vec![StatEntry {
        stat_type: Some("students".into()),
        count:     Some(21000),
        year:      Some(2024),
      }],
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn missing_institution_short_circuits() {
    let source = harvard_source();
    let profile = assemble(&source, 42).await.unwrap();
    assert!(profile.is_none());
    assert_eq!(source.reads.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn rankings_from_every_table_are_combined() {
    let source = harvard_source();
    let profile = assemble(&source, 1).await.unwrap().unwrap();

    assert_eq!(profile.rankings.len(), 2);
    assert_eq!(profile.rankings[0].table, "Global_Rankings");
    assert_eq!(profile.rankings[0].rank, Some(1));
    assert_eq!(profile.rankings[1].table, "China_Rankings");
    assert_eq!(profile.rankings[1].rank, Some(5));
    assert_eq!(profile.stats.len(), 1);
  }

  #[tokio::test]
  async fn malformed_table_is_skipped() {
    let mut source = harvard_source();
    source.tables.insert(1, ("Broken_Rankings".into(), None));
    let profile = assemble(&source, 1).await.unwrap().unwrap();

    assert_eq!(profile.rankings.len(), 2);
    assert!(profile.rankings.iter().all(|r| r.table != "Broken_Rankings"));
  }

  #[tokio::test]
  async fn connection_failure_propagates() {
    let mut source = harvard_source();
    source.closed_stats = true;
    assert!(assemble(&source, 1).await.is_err());
  }

  #[test]
  fn global_subjects_sort_first_then_rank_nulls_last() {
    let mut rankings = vec![
      row("A_Rankings", "k", "Engineering", Some(3)),
      row("A_Rankings", "k", "Physics", None),
      row("B_Rankings", "k", "World", Some(40)),
      row("B_Rankings", "k", "Chemistry", Some(1)),
      row("C_Rankings", "k", "global", None),
      row("C_Rankings", "k", "GLOBAL overall", Some(12)),
    ];
    sort_rankings(&mut rankings);

    let order: Vec<_> = rankings
      .iter()
      .map(|r| r.subject.as_deref().unwrap())
      .collect();
    assert_eq!(order, vec![
      "GLOBAL overall",
      "World",
      "global",
      "Chemistry",
      "Engineering",
      "Physics",
    ]);
  }
}
