//! The fixed metric-group catalog.
//!
//! Group membership and display field names are a fixed mapping maintained by
//! the core; they are not user-configurable.

use std::{fmt, str::FromStr};

use crate::error::Error;

// ─── GroupMember ─────────────────────────────────────────────────────────────

/// One member of a metric group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMember {
  /// Metric type name as it appears in ingestion payloads.
  pub metric:  &'static str,
  /// Field name used in latest snapshots and window frames.
  pub field:   &'static str,
  /// Whether the member contributes a numeric series to window frames.
  /// String-typed members appear in latest snapshots only.
  pub charted: bool,
}

const LOCAL_MEMBERS: &[GroupMember] = &[
  GroupMember { metric: "battery_percent", field: "battery", charted: true },
  GroupMember { metric: "memory_usage", field: "memory", charted: true },
];

const WEATHER_MEMBERS: &[GroupMember] = &[
  GroupMember { metric: "temperature", field: "temperature", charted: true },
  GroupMember { metric: "humidity", field: "humidity", charted: true },
  GroupMember {
    metric:  "weather_description",
    field:   "description",
    charted: false,
  },
  GroupMember { metric: "city", field: "city", charted: false },
];

// ─── MetricGroup ─────────────────────────────────────────────────────────────

/// A predefined group of metric types queried together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricGroup {
  /// Device health readings: battery and memory.
  Local,
  /// Weather readings for the configured city.
  Weather,
}

impl MetricGroup {
  pub fn members(self) -> &'static [GroupMember] {
    match self {
      Self::Local => LOCAL_MEMBERS,
      Self::Weather => WEATHER_MEMBERS,
    }
  }

  /// Members that contribute numeric series to window frames.
  pub fn charted_members(self) -> impl Iterator<Item = &'static GroupMember> {
    self.members().iter().filter(|m| m.charted)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Local => "local",
      Self::Weather => "weather",
    }
  }
}

impl fmt::Display for MetricGroup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MetricGroup {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "local" => Ok(Self::Local),
      "weather" => Ok(Self::Weather),
      other => Err(Error::UnknownGroup(other.to_owned())),
    }
  }
}
