//! The `SchemaCatalog` trait and the table naming conventions it discovers.
//!
//! There is no registry of ranking sources. A table whose name ends in
//! [`RANKING_TABLE_SUFFIX`] is a ranking table; dropping a new one into the
//! store is the only registration step.

use std::future::Future;

/// Suffix that marks a table as a ranking source. Matched case-insensitively.
pub const RANKING_TABLE_SUFFIX: &str = "_Rankings";

/// Ranking table used when a search does not name a criterion.
pub const DEFAULT_RANKING_TABLE: &str = "Global_Rankings";

/// Whether `name` follows the ranking-table naming convention.
pub fn is_ranking_table(name: &str) -> bool {
  let suffix = RANKING_TABLE_SUFFIX.len();
  name.len() > suffix
    && name.is_char_boundary(name.len() - suffix)
    && name[name.len() - suffix..].eq_ignore_ascii_case(RANKING_TABLE_SUFFIX)
}

/// Name of the country-scoped global ranking table for `country`.
///
/// The country is trimmed and lower-cased; inner whitespace runs become `_`.
/// Returns `None` for a blank country.
pub fn country_table_name(country: &str) -> Option<String> {
  let slug = country
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("_")
    .to_lowercase();
  if slug.is_empty() {
    return None;
  }
  Some(format!("{slug}{RANKING_TABLE_SUFFIX}"))
}

/// Read access to the store's own metadata.
///
/// Both methods fail soft: an error while reading the catalog reads as "no
/// such table" / "no tables", so callers fall back instead of failing.
pub trait SchemaCatalog: Send + Sync {
  /// Whether a table called `name` currently exists.
  fn table_exists<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = bool> + Send + 'a;

  /// All table names ending in `suffix`, sorted by name.
  fn list_tables<'a>(
    &'a self,
    suffix: &'a str,
  ) -> impl Future<Output = Vec<String>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ranking_suffix_matches_any_case() {
    assert!(is_ranking_table("Global_Rankings"));
    assert!(is_ranking_table("china_rankings"));
    assert!(is_ranking_table("QS_Subject_RANKINGS"));
    assert!(!is_ranking_table("_Rankings"));
    assert!(!is_ranking_table("university_stats"));
    assert!(!is_ranking_table("Rankings_Global"));
  }

  #[test]
  fn country_table_uses_slug() {
    assert_eq!(country_table_name("China").as_deref(), Some("china_Rankings"));
    assert_eq!(
      country_table_name("  United   States ").as_deref(),
      Some("united_states_Rankings"),
    );
    assert_eq!(country_table_name("   "), None);
  }
}
