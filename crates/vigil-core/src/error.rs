//! Error types for `vigil-core`.

use thiserror::Error;

use crate::metric::DataType;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing or empty device_id")]
  MissingDeviceId,

  #[error("unparsable timestamp: {0:?}")]
  InvalidTimestamp(String),

  #[error("metric {name:?}: value does not match declared data type {declared}")]
  ValueTypeMismatch { name: String, declared: DataType },

  #[error(
    "metric type {name:?} is registered as {existing}; cannot re-declare as {declared}"
  )]
  MetricTypeConflict {
    name:     String,
    existing: String,
    declared: String,
  },

  #[error("unknown metric group: {0:?}")]
  UnknownGroup(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
