//! SQL text for queries against runtime-named ranking tables.
//!
//! Filters are always bound parameters. The only interpolated text is a table
//! name, and it always passes through [`quote_ident`].

use crate::ident::quote_ident;

/// Numeric rank of `column`, matching [`decode_rank`](crate::encode::decode_rank).
///
/// Numbers are truncated to integers; text counts only when it starts with
/// digits after leading blanks and `=`. Everything else is `NULL`, so a "-"
/// placeholder never outranks a real position.
pub fn rank_key(column: &str) -> String {
  format!(
    "CASE
       WHEN typeof({column}) IN ('integer', 'real') THEN CAST({column} AS INTEGER)
       WHEN typeof({column}) = 'text'
        AND ltrim({column}, ' =' || char(9, 10, 13)) GLOB '[0-9]*'
         THEN CAST(ltrim({column}, ' =' || char(9, 10, 13)) AS INTEGER)
     END"
  )
}

/// Search over the base table, optionally joined to one ranking table.
///
/// The ranking table is collapsed to its best numeric rank per join key
/// first, so each institution yields at most one row. Parameters: `?1` LIKE
/// pattern, `?2` country, `?3` city, `?4` limit.
pub fn search_sql(ranking_table: Option<&str>) -> String {
  let (rank, join) = match ranking_table {
    Some(table) => (
      "r.rank",
      format!(
        "LEFT JOIN (
           SELECT normalized_name, MIN({}) AS rank
           FROM {}
           GROUP BY normalized_name
         ) r ON r.normalized_name = u.normalized_name",
        rank_key("rank"),
        quote_ident(table)
      ),
    ),
    None => ("NULL", String::new()),
  };

  format!(
    "SELECT u.id, u.name, t.translated_name, u.country, u.country_code,
            u.city, u.photo, {rank}
     FROM universities u
     LEFT JOIN university_translations t ON t.id = u.id
     {join}
     WHERE (?1 IS NULL OR u.name LIKE ?1 ESCAPE '\\')
       AND (?2 IS NULL OR u.country = ?2 COLLATE NOCASE)
       AND (?3 IS NULL OR u.city = ?3 COLLATE NOCASE)
     ORDER BY {rank} IS NULL, {rank}, u.id
     LIMIT ?4"
  )
}

/// Ranking rows of one table for one join key. `?1` is the key.
pub fn table_rankings_sql(table: &str) -> String {
  format!(
    "SELECT subject, source, rank FROM {} WHERE normalized_name = ?1",
    quote_ident(table)
  )
}

/// One (source, subject) slice of a table, numeric rank ascending with
/// unranked rows last. `?1` source, `?2` subject.
pub fn detail_sql(table: &str) -> String {
  format!(
    "SELECT normalized_name, id, name, country, rank
     FROM (
       SELECT r.normalized_name, u.id, u.name, u.country, {} AS rank
       FROM {} r
       LEFT JOIN universities u ON u.normalized_name = r.normalized_name
       WHERE r.source = ?1 AND r.subject = ?2
     )
     ORDER BY rank IS NULL, rank, normalized_name",
    rank_key("r.rank"),
    quote_ident(table)
  )
}

/// Distinct (source, subject) pairs present in a table.
///
/// Counting `rank` keeps tables without a rank column out of discovery, the
/// same way they drop out of profiles and detail listings.
pub fn options_sql(table: &str) -> String {
  format!(
    "SELECT source, subject, COUNT(rank) FROM {}
     WHERE source IS NOT NULL AND subject IS NOT NULL
     GROUP BY source, subject
     ORDER BY source, subject",
    quote_ident(table)
  )
}
