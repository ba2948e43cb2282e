//! Records returned by the query core.
//!
//! Every record serializes to a flat JSON object; the profile nests its
//! ranking and stats collections as arrays.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A rank value. `None` means unranked and always sorts after any number.
pub type Rank = Option<i64>;

/// Compare two ranks ascending with `None` last.
pub fn cmp_rank(a: Rank, b: Rank) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => a.cmp(&b),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Base attributes of an institution, joined with its optional translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
  pub id:              i64,
  pub normalized_name: String,
  pub name:            String,
  pub translated_name: Option<String>,
  pub country:         Option<String>,
  pub country_code:    Option<String>,
  pub city:            Option<String>,
  pub photo:           Option<String>,
  pub blurb:           Option<String>,
}

/// One row of a search result: an institution with at most one rank, taken
/// from the single resolved ranking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
  pub id:              i64,
  pub name:            String,
  pub translated_name: Option<String>,
  pub country:         Option<String>,
  pub country_code:    Option<String>,
  pub city:            Option<String>,
  pub photo:           Option<String>,
  pub rank:            Rank,
}

/// One ranking row for an institution, tagged with the table it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
  pub table:   String,
  pub subject: Option<String>,
  pub source:  Option<String>,
  pub rank:    Rank,
}

impl RankingEntry {
  /// Whether the subject label marks a global/world ranking (any case).
  pub fn is_global(&self) -> bool {
    self.subject.as_deref().is_some_and(|s| {
      let s = s.to_lowercase();
      s.contains("global") || s.contains("world")
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
  pub stat_type: Option<String>,
  pub count:     Option<i64>,
  pub year:      Option<i64>,
}

/// The deep profile of one institution: base attributes plus every ranking
/// row found across all ranking tables and every stats row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  #[serde(flatten)]
  pub institution: Institution,
  pub rankings:    Vec<RankingEntry>,
  pub stats:       Vec<StatEntry>,
}

/// One ranked entity within an explicit (table, source, subject) slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
  pub normalized_name: String,
  /// Base-table id, when the join key matches an institution.
  pub id:              Option<i64>,
  pub name:            Option<String>,
  pub country:         Option<String>,
  pub rank:            Rank,
}

/// A (table, source, subject) slice that `list_detail` can be asked for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RankingOption {
  pub table:   String,
  pub source:  String,
  pub subject: String,
}
