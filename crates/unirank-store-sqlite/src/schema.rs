//! SQL schema of the base tables the query core reads.
//!
//! Ranking tables (`*_Rankings`) are not listed here: they are discovered at
//! query time and any number of them may exist. Each holds at least
//! `normalized_name`, `subject`, `source` and `rank`.

/// Base table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Production databases are produced by the ingestion job and opened
/// read-only; this is applied only to fresh in-memory stores.
pub const BASE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS universities (
    id              INTEGER PRIMARY KEY,
    normalized_name TEXT NOT NULL,
    name            TEXT NOT NULL,
    country         TEXT,
    country_code    TEXT,
    city            TEXT,
    photo           TEXT,
    blurb           TEXT
);

-- At most one translated display name per university id.
CREATE TABLE IF NOT EXISTS university_translations (
    id              INTEGER PRIMARY KEY REFERENCES universities(id),
    translated_name TEXT NOT NULL
);

-- One row per (stat type, year); append-only.
CREATE TABLE IF NOT EXISTS university_stats (
    normalized_name TEXT NOT NULL,
    stat_type       TEXT,
    count           INTEGER,
    year            INTEGER
);

CREATE INDEX IF NOT EXISTS universities_normalized_idx ON universities(normalized_name);
CREATE INDEX IF NOT EXISTS stats_normalized_idx        ON university_stats(normalized_name);
";
