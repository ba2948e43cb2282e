//! Runtime server configuration.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_table_query_timeout_ms() -> u64 { 2000 }

/// Deserialised from `config.toml` layered with `UNIRANK_*` variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                   String,
  #[serde(default = "default_port")]
  pub port:                   u16,
  /// SQLite database produced by the ingestion job; opened read-only.
  pub database_path:          PathBuf,
  /// Upper bound on one ranking table read while building a profile.
  #[serde(default = "default_table_query_timeout_ms")]
  pub table_query_timeout_ms: u64,
}

impl ServerConfig {
  pub fn table_timeout(&self) -> Duration {
    Duration::from_millis(self.table_query_timeout_ms)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_fill_optional_fields() {
    let cfg = parse(r#"database_path = "rankings.db""#);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.table_timeout(), Duration::from_secs(2));
    assert_eq!(cfg.database_path, PathBuf::from("rankings.db"));
  }

  #[test]
  fn explicit_values_win() {
    let cfg = parse(
      r#"
      host = "0.0.0.0"
      port = 9000
      database_path = "/srv/rankings.db"
      table_query_timeout_ms = 250
      "#,
    );
    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.table_timeout(), Duration::from_millis(250));
  }

  #[test]
  fn tilde_paths_expand() {
    let plain = Path::new("/var/lib/rankings.db");
    assert_eq!(expand_tilde(plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/rankings.db")),
        PathBuf::from(home).join("rankings.db"),
      );
    }
  }
}
