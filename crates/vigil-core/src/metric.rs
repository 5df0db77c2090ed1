//! Metric catalog types and the wire representation of reading values.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── DataType ────────────────────────────────────────────────────────────────

/// The declared type of a metric's values. Fixed at first sighting of the
/// metric name; a conflicting re-declaration is a malformed-input rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
  Float,
  String,
}

impl DataType {
  /// The tag stored in the `data_type` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Float => "float",
      Self::String => "string",
    }
  }
}

impl fmt::Display for DataType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── MetricType ──────────────────────────────────────────────────────────────

/// A catalog row: the named, typed category a fact belongs to.
///
/// Created lazily the first time a fact of that name is ingested; `data_type`
/// and `unit` are treated as immutable for the lifetime of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricType {
  pub id:        i64,
  pub name:      String,
  pub data_type: DataType,
  /// Display unit, e.g. `"%"` or `"°C"`.
  pub unit:      Option<String>,
}

// ─── MetricValue ─────────────────────────────────────────────────────────────

/// A reading's value as it arrives on the wire: a JSON number or a string.
///
/// Facts store the JSON text rendering verbatim, so a payload value of `71`
/// reads back as `"71"` — not `"71.0"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
  Number(serde_json::Number),
  Text(String),
}

impl MetricValue {
  /// Whether this value is consistent with the declared data type.
  pub fn matches(&self, data_type: DataType) -> bool {
    matches!(
      (self, data_type),
      (Self::Number(_), DataType::Float) | (Self::Text(_), DataType::String)
    )
  }

  /// The text form stored in the facts table.
  pub fn to_text(&self) -> String {
    match self {
      Self::Number(n) => n.to_string(),
      Self::Text(s) => s.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn integer_value_keeps_its_json_rendering() {
    let value = MetricValue::Number(serde_json::Number::from(71));
    assert_eq!(value.to_text(), "71");
  }

  #[test]
  fn fractional_value_keeps_its_json_rendering() {
    let value: MetricValue = serde_json::from_str("8.6").unwrap();
    assert_eq!(value.to_text(), "8.6");
  }

  #[test]
  fn value_type_consistency() {
    let number = MetricValue::Number(serde_json::Number::from(48));
    let text = MetricValue::Text("broken clouds".into());

    assert!(number.matches(DataType::Float));
    assert!(!number.matches(DataType::String));
    assert!(text.matches(DataType::String));
    assert!(!text.matches(DataType::Float));
  }
}
