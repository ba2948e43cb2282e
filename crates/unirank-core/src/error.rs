//! Error types for `unirank-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A mandatory request parameter was absent or blank.
  #[error("missing required parameter: {0}")]
  MissingParameter(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
