//! The `TelemetryStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `vigil-store-sqlite`).
//! Higher layers (`vigil-api`, schedulers) depend on this abstraction, not on
//! any concrete backend.

use std::{collections::BTreeMap, future::Future};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  device::Device,
  group::MetricGroup,
  metric::MetricType,
  payload::{IngestOutcome, IngestPayload},
  series::SeriesFrame,
};

// ─── Snapshot types ──────────────────────────────────────────────────────────

/// The most recent fact for one group member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestPoint {
  /// Value exactly as stored (text form of the ingested value).
  pub value:     String,
  pub timestamp: DateTime<Utc>,
}

/// Latest-value snapshot keyed by display field. Members with no facts are
/// simply absent.
pub type LatestSnapshot = BTreeMap<&'static str, LatestPoint>;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Vigil telemetry store backend.
///
/// Fact writes are append-only and happen only through [`ingest`], which is
/// the authorization gate: the passkey check, device promotion, and the
/// batch's fact appends form one atomic unit of work. Queries are read-only
/// and never touch the gate.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// [`ingest`]: TelemetryStore::ingest
pub trait TelemetryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Ingestion gate ────────────────────────────────────────────────────

  /// Authorize and admit a batch of facts from one device.
  ///
  /// Every call, authorized or not, registers the device on first contact
  /// and updates its `last_seen`. A correct passkey promotes the device to
  /// admin (one-way); only admin devices get facts written. Malformed input
  /// yields [`IngestOutcome::Rejected`] with nothing persisted from the
  /// batch; `Err` is reserved for storage failure.
  ///
  /// Not idempotent across calls: re-sending a batch duplicates facts.
  fn ingest(
    &self,
    payload: IngestPayload,
  ) -> impl Future<Output = Result<IngestOutcome, Self::Error>> + Send + '_;

  // ── Series queries ────────────────────────────────────────────────────

  /// Latest-value snapshot for a group, or `None` if no member has any
  /// facts at all. Used for live display rather than charting.
  fn latest(
    &self,
    group: MetricGroup,
  ) -> impl Future<Output = Result<Option<LatestSnapshot>, Self::Error>> + Send + '_;

  /// Aligned, forward-filled series for a group's charted members over the
  /// trailing `hours` window. An empty window returns an empty frame,
  /// never an error.
  fn window(
    &self,
    group: MetricGroup,
    hours: u32,
  ) -> impl Future<Output = Result<SeriesFrame, Self::Error>> + Send + '_;

  // ── Device registry ───────────────────────────────────────────────────

  /// The device with the most recent `last_seen`, or `None` when the
  /// registry is empty.
  fn default_device(
    &self,
  ) -> impl Future<Output = Result<Option<Device>, Self::Error>> + Send + '_;

  /// Look up a device by its client-generated identifier.
  fn find_device<'a>(
    &'a self,
    device_id: &'a str,
  ) -> impl Future<Output = Result<Option<Device>, Self::Error>> + Send + 'a;

  /// Diagnostic enumeration of all known devices, most recently contacted
  /// first.
  fn list_devices(
    &self,
  ) -> impl Future<Output = Result<Vec<Device>, Self::Error>> + Send + '_;

  // ── Metric catalog ────────────────────────────────────────────────────

  /// Enumerate the lazily-created metric catalog, ordered by name.
  fn list_metric_types(
    &self,
  ) -> impl Future<Output = Result<Vec<MetricType>, Self::Error>> + Send + '_;
}
