//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 UTC strings, which also makes their
//! lexicographic order match chronological order for range scans and
//! `ORDER BY`.

use chrono::{DateTime, Utc};
use vigil_core::{
  device::Device,
  metric::{DataType, MetricType},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── DataType ────────────────────────────────────────────────────────────────

pub fn decode_data_type(s: &str) -> Result<DataType> {
  match s {
    "float" => Ok(DataType::Float),
    "string" => Ok(DataType::String),
    other => Err(Error::Decode(format!("unknown data type: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `devices` row.
pub struct RawDevice {
  pub id:        i64,
  pub device_id: String,
  pub last_seen: String,
  pub admin:     bool,
}

impl RawDevice {
  pub fn into_device(self) -> Result<Device> {
    Ok(Device {
      id:        self.id,
      device_id: self.device_id,
      last_seen: decode_dt(&self.last_seen)?,
      admin:     self.admin,
    })
  }
}

/// Raw values read directly from a `metric_types` row.
pub struct RawMetricType {
  pub id:        i64,
  pub name:      String,
  pub data_type: String,
  pub unit:      Option<String>,
}

impl RawMetricType {
  pub fn into_metric_type(self) -> Result<MetricType> {
    Ok(MetricType {
      id:        self.id,
      name:      self.name,
      data_type: decode_data_type(&self.data_type)?,
      unit:      self.unit,
    })
  }
}
