//! [`SchemaCatalog`] over SQLite's `sqlite_master`.

use std::future::Future;

use rusqlite::OptionalExtension as _;
use tracing::warn;
use unirank_core::catalog::SchemaCatalog;

use crate::{SqliteStore, ident::escape_like};

impl SchemaCatalog for SqliteStore {
  fn table_exists<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = bool> + Send + 'a {
    let name = name.to_owned();
    async move {
      let result = self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT 1 FROM sqlite_master
                 WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
                rusqlite::params![name],
                |_| Ok(()),
              )
              .optional()?
              .is_some(),
          )
        })
        .await;

      result.unwrap_or_else(|e| {
        warn!(error = %e, "catalog lookup failed; treating table as absent");
        false
      })
    }
  }

  fn list_tables<'a>(
    &'a self,
    suffix: &'a str,
  ) -> impl Future<Output = Vec<String>> + Send + 'a {
    let pattern = format!("%{}", escape_like(suffix));
    async move {
      let result = self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name LIKE ?1 ESCAPE '\\'
             ORDER BY name",
          )?;
          let names = stmt
            .query_map(rusqlite::params![pattern], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
          Ok(names)
        })
        .await;

      result.unwrap_or_else(|e| {
        warn!(error = %e, "catalog listing failed; assuming no tables");
        Vec::new()
      })
    }
  }
}
