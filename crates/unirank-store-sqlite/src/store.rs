//! [`SqliteStore`] — the SQLite implementation of [`RankingStore`].

use std::{
  path::Path,
  time::{Duration, Instant},
};

use rusqlite::{OpenFlags, OptionalExtension as _};
use tracing::{debug, warn};
use unirank_core::{
  catalog::{RANKING_TABLE_SUFFIX, SchemaCatalog, is_ranking_table},
  profile::{self, ProfileSource, TableFetch},
  record::{DetailRecord, Institution, Profile, RankingEntry, RankingOption, SearchRecord, StatEntry},
  resolve::resolve_table,
  store::{DetailQuery, RankingStore, SEARCH_RESULT_CAP, SearchQuery},
};

use crate::{
  Error, Result,
  compose::{detail_sql, options_sql, search_sql, table_rankings_sql},
  encode::{decode_int, decode_rank, decode_text},
  ident::escape_like,
  schema::BASE_SCHEMA,
};

/// Default execution bound on a single per-table read.
pub const DEFAULT_TABLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Virtual machine steps between deadline checks on a per-table read.
const PROGRESS_INTERVAL: std::ffi::c_int = 1000;

// ─── Store ───────────────────────────────────────────────────────────────────

/// The ranking aggregate backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  table_timeout:   Duration,
}

impl SqliteStore {
  /// Open an existing database at `path` read-only.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
    )
    .await?;
    Ok(Self::from_connection(conn))
  }

  /// Open an in-memory store with the base tables created — useful for
  /// testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    conn
      .call(|conn| {
        conn.execute_batch(BASE_SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self::from_connection(conn))
  }

  /// Wrap an already-open connection.
  pub fn from_connection(conn: tokio_rusqlite::Connection) -> Self {
    Self { conn, table_timeout: DEFAULT_TABLE_TIMEOUT }
  }

  /// Bound the execution time of every per-table read by `timeout`.
  pub fn with_table_timeout(mut self, timeout: Duration) -> Self {
    self.table_timeout = timeout;
    self
  }

  /// Run a read against one ranking table.
  ///
  /// The table timeout starts when the read begins executing on the database
  /// thread, not while it waits behind earlier reads, and an expired read is
  /// interrupted so it cannot hold up the next table. SQL errors and timeouts
  /// are specific to the table and come back as the inner `Err(reason)`; only
  /// connection-level failures escape.
  async fn read_table<T, F>(&self, read: F) -> Result<Result<T, String>>
  where
    T: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
  {
    let timeout = self.table_timeout;
    let outcome = self
      .conn
      .call(move |conn| {
        let deadline = Instant::now() + timeout;
        conn.progress_handler(
          PROGRESS_INTERVAL,
          Some(move || Instant::now() >= deadline),
        );
        let result = read(conn);
        conn.progress_handler(PROGRESS_INTERVAL, None::<fn() -> bool>);
        Ok(result)
      })
      .await?;

    Ok(outcome.map_err(|e| {
      if e.sqlite_error_code() == Some(rusqlite::ErrorCode::OperationInterrupted) {
        format!("timed out after {timeout:?}")
      } else {
        e.to_string()
      }
    }))
  }
}

// ─── ProfileSource impl ──────────────────────────────────────────────────────

impl ProfileSource for SqliteStore {
  type Error = Error;

  async fn fetch_institution(&self, id: i64) -> Result<Option<Institution>> {
    let institution = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT u.id, u.normalized_name, u.name, t.translated_name,
                      u.country, u.country_code, u.city, u.photo, u.blurb
               FROM universities u
               LEFT JOIN university_translations t ON t.id = u.id
               WHERE u.id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(Institution {
                  id:              row.get(0)?,
                  normalized_name: decode_text(row.get_ref(1)?).unwrap_or_default(),
                  name:            decode_text(row.get_ref(2)?).unwrap_or_default(),
                  translated_name: decode_text(row.get_ref(3)?),
                  country:         decode_text(row.get_ref(4)?),
                  country_code:    decode_text(row.get_ref(5)?),
                  city:            decode_text(row.get_ref(6)?),
                  photo:           decode_text(row.get_ref(7)?),
                  blurb:           decode_text(row.get_ref(8)?),
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(institution)
  }

  async fn fetch_table_rankings(&self, table: &str, key: &str) -> Result<TableFetch> {
    let sql = table_rankings_sql(table);
    let key = key.to_owned();
    let owner = table.to_owned();

    let outcome = self
      .read_table(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![key], |row| {
            Ok(RankingEntry {
              table:   owner.clone(),
              subject: decode_text(row.get_ref(0)?),
              source:  decode_text(row.get_ref(1)?),
              rank:    decode_rank(row.get_ref(2)?),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(match outcome {
      Ok(rows) => TableFetch::Rows(rows),
      Err(reason) => TableFetch::Skipped { reason },
    })
  }

  async fn fetch_stats(&self, key: &str) -> Result<Vec<StatEntry>> {
    let key = key.to_owned();
    let outcome = self
      .read_table(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT stat_type, count, year FROM university_stats
           WHERE normalized_name = ?1
           ORDER BY year, stat_type",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![key], |row| {
            Ok(StatEntry {
              stat_type: decode_text(row.get_ref(0)?),
              count:     decode_int(row.get_ref(1)?),
              year:      decode_int(row.get_ref(2)?),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(outcome.unwrap_or_else(|reason| {
      warn!(%reason, "stats unavailable");
      Vec::new()
    }))
  }
}

// ─── RankingStore impl ───────────────────────────────────────────────────────

fn search_rows(
  conn:   &rusqlite::Connection,
  table:  Option<&str>,
  params: &(Option<String>, Option<String>, Option<String>, i64),
) -> rusqlite::Result<Vec<SearchRecord>> {
  let (pattern, country, city, limit) = params;
  let mut stmt = conn.prepare(&search_sql(table))?;
  let records = stmt
    .query_map(rusqlite::params![pattern, country, city, limit], |row| {
      Ok(SearchRecord {
        id:              row.get(0)?,
        name:            decode_text(row.get_ref(1)?).unwrap_or_default(),
        translated_name: decode_text(row.get_ref(2)?),
        country:         decode_text(row.get_ref(3)?),
        country_code:    decode_text(row.get_ref(4)?),
        city:            decode_text(row.get_ref(5)?),
        photo:           decode_text(row.get_ref(6)?),
        rank:            decode_rank(row.get_ref(7)?),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(records)
}

impl RankingStore for SqliteStore {
  type Error = Error;

  async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchRecord>> {
    let query = query.clone().cleaned();
    let table = resolve_table(
      self,
      query.criterion.as_deref(),
      query.country.as_deref(),
    )
    .await;
    debug!(%table, "resolved search table");

    let params = (
      query.text.as_deref().map(|t| format!("%{}%", escape_like(t))),
      query.country,
      query.city,
      SEARCH_RESULT_CAP as i64,
    );

    let records = self
      .conn
      .call(move |conn| {
        match search_rows(conn, Some(table.as_str()), &params) {
          Ok(records) => Ok(records),
          Err(e) => {
            warn!(%table, error = %e, "ranking join failed; searching without ranks");
            Ok(search_rows(conn, None, &params)?)
          }
        }
      })
      .await?;

    Ok(records)
  }

  async fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
    profile::assemble(self, id).await
  }

  async fn list_detail(&self, query: &DetailQuery) -> Result<Vec<DetailRecord>> {
    if !is_ranking_table(&query.table) || !self.table_exists(&query.table).await {
      warn!(table = %query.table, "detail requested for unknown ranking table");
      return Ok(Vec::new());
    }

    let sql = detail_sql(&query.table);
    let source = query.source.clone();
    let subject = query.subject.clone();

    let outcome = self
      .read_table(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![source, subject], |row| {
            Ok(DetailRecord {
              normalized_name: decode_text(row.get_ref(0)?).unwrap_or_default(),
              id:              row.get(1)?,
              name:            decode_text(row.get_ref(2)?),
              country:         decode_text(row.get_ref(3)?),
              rank:            decode_rank(row.get_ref(4)?),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(outcome.unwrap_or_else(|reason| {
      warn!(table = %query.table, %reason, "detail listing unavailable");
      Vec::new()
    }))
  }

  async fn ranking_tables(&self) -> Result<Vec<String>> {
    Ok(self.list_tables(RANKING_TABLE_SUFFIX).await)
  }

  async fn ranking_options(&self) -> Result<Vec<RankingOption>> {
    let mut options = Vec::new();
    for table in self.list_tables(RANKING_TABLE_SUFFIX).await {
      let sql = options_sql(&table);
      let owner = table.clone();
      let outcome = self
        .read_table(move |conn| {
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map([], |row| {
              Ok(RankingOption {
                table:   owner.clone(),
                source:  decode_text(row.get_ref(0)?).unwrap_or_default(),
                subject: decode_text(row.get_ref(1)?).unwrap_or_default(),
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?;

      match outcome {
        Ok(rows) => options.extend(rows),
        Err(reason) => warn!(%table, %reason, "skipping ranking table"),
      }
    }
    Ok(options)
  }
}
