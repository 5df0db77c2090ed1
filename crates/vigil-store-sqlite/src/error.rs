//! Error type for `vigil-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("column decode error: {0}")]
  Decode(String),

  /// A float-typed metric carried a value that does not parse as a number.
  /// Ingestion validates this, so it indicates out-of-band tampering.
  #[error("stored value for {field:?} is not numeric: {value:?}")]
  NonNumericValue { field: String, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
