//! Ranking table resolution for list/sort queries.

use tracing::debug;

use crate::catalog::{DEFAULT_RANKING_TABLE, SchemaCatalog, country_table_name};

/// Choose the single ranking table that drives a search.
///
/// A missing or blank criterion becomes [`DEFAULT_RANKING_TABLE`]. When a
/// country is given and its country-scoped global table exists, that table
/// wins over the criterion. Always yields a table name.
pub async fn resolve_table<C>(
  catalog:   &C,
  criterion: Option<&str>,
  country:   Option<&str>,
) -> String
where
  C: SchemaCatalog + ?Sized,
{
  let base = criterion
    .map(str::trim)
    .filter(|c| !c.is_empty())
    .unwrap_or(DEFAULT_RANKING_TABLE)
    .to_owned();

  let Some(candidate) = country.and_then(country_table_name) else {
    return base;
  };

  if catalog.table_exists(&candidate).await {
    debug!(%candidate, replaced = %base, "country table overrides criterion");
    candidate
  } else {
    base
  }
}

#[cfg(test)]
mod tests {
  use std::{future::Future, sync::Mutex};

  use super::*;

  struct FakeCatalog {
    tables: Vec<&'static str>,
    probes: Mutex<Vec<String>>,
  }

  impl FakeCatalog {
    fn new(tables: Vec<&'static str>) -> Self {
      Self { tables, probes: Mutex::new(vec![]) }
    }
  }

  impl SchemaCatalog for FakeCatalog {
    fn table_exists<'a>(
      &'a self,
      name: &'a str,
    ) -> impl Future<Output = bool> + Send + 'a {
      self.probes.lock().unwrap().push(name.to_owned());
      let found = self.tables.iter().any(|t| t.eq_ignore_ascii_case(name));
      async move { found }
    }

    fn list_tables<'a>(
      &'a self,
      _suffix: &'a str,
    ) -> impl Future<Output = Vec<String>> + Send + 'a {
      let tables = self.tables.iter().map(|t| t.to_string()).collect();
      async move { tables }
    }
  }

  #[tokio::test]
  async fn no_criterion_uses_default() {
    let catalog = FakeCatalog::new(vec![]);
    assert_eq!(resolve_table(&catalog, None, None).await, DEFAULT_RANKING_TABLE);
    assert_eq!(
      resolve_table(&catalog, Some("  "), None).await,
      DEFAULT_RANKING_TABLE,
    );
    assert!(catalog.probes.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn explicit_criterion_is_kept_without_country() {
    let catalog = FakeCatalog::new(vec!["QS_Rankings"]);
    assert_eq!(
      resolve_table(&catalog, Some("QS_Rankings"), None).await,
      "QS_Rankings",
    );
  }

  #[tokio::test]
  async fn existing_country_table_overrides_criterion() {
    let catalog = FakeCatalog::new(vec!["China_Rankings", "QS_Rankings"]);
    assert_eq!(
      resolve_table(&catalog, Some("QS_Rankings"), Some(" China ")).await,
      "china_Rankings",
    );
  }

  #[tokio::test]
  async fn missing_country_table_falls_back() {
    let catalog = FakeCatalog::new(vec!["QS_Rankings"]);
    assert_eq!(
      resolve_table(&catalog, Some("QS_Rankings"), Some("Peru")).await,
      "QS_Rankings",
    );
    assert_eq!(
      resolve_table(&catalog, None, Some("Peru")).await,
      DEFAULT_RANKING_TABLE,
    );
    assert_eq!(*catalog.probes.lock().unwrap(), vec![
      "peru_Rankings".to_string(),
      "peru_Rankings".to_string(),
    ]);
  }
}
