//! Device — a reporting source identified by an opaque client string.
//!
//! A device row carries only contact metadata; all readings it reports live
//! in the fact table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A known reporting device.
///
/// Created on first contact with `admin = false`. `last_seen` reflects "last
/// contact", not "last accepted write": it is updated on every ingestion
/// attempt regardless of the authorization outcome. The `admin` flag is
/// monotonic — once granted via the shared passkey, nothing revokes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
  /// Store-assigned row id.
  pub id:        i64,
  /// Client-generated identifier, stable per physical or logical source.
  pub device_id: String,
  pub last_seen: DateTime<Utc>,
  pub admin:     bool,
}
