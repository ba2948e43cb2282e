//! Decoding of loosely-typed column values.
//!
//! Ranking tables come from independent CSV imports, so the same logical
//! column may hold integers, reals or text ("=12", "101-150") depending on
//! the source. Decoding is tolerant and never fails.

use rusqlite::types::ValueRef;
use unirank_core::record::Rank;

pub fn decode_text(value: ValueRef<'_>) -> Option<String> {
  match value {
    ValueRef::Null | ValueRef::Blob(_) => None,
    ValueRef::Integer(i) => Some(i.to_string()),
    ValueRef::Real(f) => Some(f.to_string()),
    ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
  }
}

pub fn decode_int(value: ValueRef<'_>) -> Option<i64> {
  match value {
    ValueRef::Integer(i) => Some(i),
    ValueRef::Real(f) if f.is_finite() => Some(f as i64),
    ValueRef::Text(bytes) => leading_int(&String::from_utf8_lossy(bytes)),
    _ => None,
  }
}

/// Ranks share integer decoding; a band like "101-150" ranks at its start.
///
/// Kept in step with [`rank_key`](crate::compose::rank_key), which sorts the
/// same values inside SQL.
pub fn decode_rank(value: ValueRef<'_>) -> Rank { decode_int(value) }

fn leading_int(text: &str) -> Option<i64> {
  let digits: String = text
    .trim_start_matches([' ', '=', '\t', '\n', '\r'])
    .chars()
    .take_while(char::is_ascii_digit)
    .collect();
  digits.parse().ok()
}
