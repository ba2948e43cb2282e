//! Quoting for text that has to be spliced into SQL.
//!
//! Ranking table names are only known at runtime and cannot be bound as
//! parameters. Every query that names a discovered table goes through
//! [`quote_ident`]; nothing else interpolates identifiers.

/// Quote `name` as an SQLite identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
  format!("\"{}\"", name.replace('"', "\"\""))
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'`.
pub fn escape_like(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}
