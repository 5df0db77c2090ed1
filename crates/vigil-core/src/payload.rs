//! Ingestion payload types and eager boundary validation.
//!
//! The payload is a tagged structure with required fields (`device_id`,
//! `metrics`) and an optional `passkey`, validated as a whole before any
//! storage work: a payload either normalizes completely or is rejected
//! completely.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  error::Error,
  metric::{DataType, MetricValue},
};

// ─── Wire types ──────────────────────────────────────────────────────────────

/// One metric entry in an ingestion payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEntry {
  pub metric_type: String,
  pub value:       MetricValue,
  /// ISO 8601. An offset is honoured and converted to UTC; a naive timestamp
  /// is assumed to already be UTC.
  pub timestamp:   String,
  pub data_type:   DataType,
  #[serde(default)]
  pub unit:        Option<String>,
}

/// The JSON body consumed by
/// [`TelemetryStore::ingest`](crate::store::TelemetryStore::ingest).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestPayload {
  pub device_id: String,
  #[serde(default)]
  pub passkey:   Option<String>,
  #[serde(default)]
  pub metrics:   Vec<MetricEntry>,
}

// ─── Normalized types ────────────────────────────────────────────────────────

/// A validated metric entry: timestamp normalized to UTC, value rendered to
/// the text form stored in the facts table.
#[derive(Debug, Clone)]
pub struct NormalizedReading {
  pub metric_type: String,
  pub data_type:   DataType,
  pub unit:        Option<String>,
  pub timestamp:   DateTime<Utc>,
  pub value_text:  String,
}

/// A payload that passed boundary validation, ready for the storage gate.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
  pub device_id: String,
  pub passkey:   Option<String>,
  pub readings:  Vec<NormalizedReading>,
}

impl IngestPayload {
  /// Validate the whole payload eagerly.
  ///
  /// Any malformed entry fails the entire batch — an error here means no
  /// part of the payload may be stored.
  pub fn normalize(self) -> Result<NormalizedBatch> {
    if self.device_id.trim().is_empty() {
      return Err(Error::MissingDeviceId);
    }

    let mut readings = Vec::with_capacity(self.metrics.len());
    for entry in self.metrics {
      if !entry.value.matches(entry.data_type) {
        return Err(Error::ValueTypeMismatch {
          name:     entry.metric_type,
          declared: entry.data_type,
        });
      }
      readings.push(NormalizedReading {
        timestamp:   parse_timestamp(&entry.timestamp)?,
        value_text:  entry.value.to_text(),
        metric_type: entry.metric_type,
        data_type:   entry.data_type,
        unit:        entry.unit,
      });
    }

    Ok(NormalizedBatch {
      device_id: self.device_id,
      passkey:   self.passkey,
      readings,
    })
  }
}

/// Parse an ingestion timestamp and normalize it to UTC.
///
/// RFC 3339 input has its offset applied and stripped; timezone-naive ISO
/// 8601 input is assumed to already be in UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
      return Ok(naive.and_utc());
    }
  }
  Err(Error::InvalidTimestamp(s.to_owned()))
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// The discriminated result of one ingestion call.
///
/// `Err` at the store boundary is reserved for storage failure; everything
/// the gate decides — including rejection of malformed input — is an
/// `IngestOutcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
  /// The device is admin and every fact in the batch was appended.
  Stored { count: usize },
  /// The device was registered and touched, but is not authorized to write
  /// facts. Deliberately not an error.
  Unauthorized,
  /// Malformed input; nothing from the batch is visible.
  Rejected { reason: String },
}

impl IngestOutcome {
  /// `false` only for rejected batches.
  pub fn is_ok(&self) -> bool {
    !matches!(self, Self::Rejected { .. })
  }

  /// Human-readable status line for callers.
  pub fn message(&self) -> String {
    match self {
      Self::Stored { count } => {
        format!("metrics stored successfully ({count})")
      }
      Self::Unauthorized => {
        "device registered, but not authorized to store metrics".to_owned()
      }
      Self::Rejected { reason } => reason.clone(),
    }
  }
}
