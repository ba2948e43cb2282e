//! Institution name normalization.
//!
//! The normalized name is the only key linking an institution across the base
//! table, every ranking table and the stats table. Two spellings of the same
//! institution that normalize differently will silently fail to join, so the
//! alias table below patches the known short forms.

use std::sync::LazyLock;

use regex::Regex;

static PARENTHESIZED: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\(.*?\)").expect("static regex"));

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[^\p{Alphabetic}\p{N}\s]").expect("static regex")
});

static WHITESPACE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Known variant forms mapped to their canonical (already normalized) key.
///
/// Every value must itself be a fixed point of [`normalize`] and must not
/// appear as a key.
pub const ALIASES: &[(&str, &str)] = &[
  ("mit", "massachusetts institute of technology"),
  ("caltech", "california institute of technology"),
  ("ucla", "university of california los angeles"),
  ("uc berkeley", "university of california berkeley"),
  ("ucb", "university of california berkeley"),
  ("berkeley", "university of california berkeley"),
  ("ucsd", "university of california san diego"),
  ("uc san diego", "university of california san diego"),
  ("eth zurich", "swiss federal institute of technology zurich"),
  ("epfl", "swiss federal institute of technology lausanne"),
  ("lse", "london school of economics and political science"),
  ("ucl", "university college london"),
  ("nus", "national university of singapore"),
  ("ntu", "nanyang technological university"),
  ("kaist", "korea advanced institute of science and technology"),
  ("hkust", "hong kong university of science and technology"),
  ("cmu", "carnegie mellon university"),
  ("upenn", "university of pennsylvania"),
  ("tsinghua", "tsinghua university"),
  ("peking", "peking university"),
];

fn alias(key: &str) -> Option<&'static str> {
  ALIASES
    .iter()
    .find(|(variant, _)| *variant == key)
    .map(|(_, canonical)| *canonical)
}

/// Turn a raw institution name into its canonical join key.
///
/// Lower-cases, drops parenthesized segments, drops every character that is
/// neither alphanumeric nor whitespace, collapses whitespace, trims, then
/// substitutes a known alias. Total and deterministic.
pub fn normalize(raw: &str) -> String {
  let lowered = raw.to_lowercase();
  let without_parens = PARENTHESIZED.replace_all(&lowered, "");
  let without_punct = PUNCTUATION.replace_all(&without_parens, "");
  let collapsed = WHITESPACE.replace_all(&without_punct, " ");
  let key = collapsed.trim();

  match alias(key) {
    Some(canonical) => canonical.to_owned(),
    None => key.to_owned(),
  }
}
