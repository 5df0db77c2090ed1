//! Series reconstruction — aligned, forward-filled time series.
//!
//! Metric types are sampled on independent schedules (battery every poll,
//! temperature every ten minutes), so zipping per-type sequences by position
//! would misalign unrelated samples. Instead the aligned index is the sorted
//! union of every observed timestamp across the requested types; each series
//! then carries its last observed value forward over index points with no new
//! observation, starting from `0.0` before its first one.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

// ─── Input ───────────────────────────────────────────────────────────────────

/// A single numeric observation fetched from the fact store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
  pub at:    DateTime<Utc>,
  pub value: f64,
}

/// All in-window observations for one charted group member, ascending by
/// timestamp.
#[derive(Debug, Clone)]
pub struct RawSeries {
  /// Display field name from the group catalog.
  pub field:  &'static str,
  pub points: Vec<SamplePoint>,
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// One forward-filled column of a [`SeriesFrame`], indexed by the frame's
/// shared timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesColumn {
  pub field:  &'static str,
  pub values: Vec<f64>,
}

/// Aligned reconstruction output: the shared x-axis plus one column per
/// requested member. A window with no data is an empty frame, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFrame {
  pub timestamps: Vec<DateTime<Utc>>,
  pub columns:    Vec<SeriesColumn>,
}

// ─── Reconstruction ──────────────────────────────────────────────────────────

/// Merge per-member observations into one aligned, forward-filled frame.
///
/// Every input series contributes a column, including series with no points
/// (all-default if other members did observe something, empty if nothing in
/// the group did).
pub fn reconstruct(inputs: Vec<RawSeries>) -> SeriesFrame {
  let index: BTreeSet<DateTime<Utc>> = inputs
    .iter()
    .flat_map(|s| s.points.iter().map(|p| p.at))
    .collect();
  let timestamps: Vec<DateTime<Utc>> = index.into_iter().collect();

  let columns = inputs
    .into_iter()
    .map(|series| {
      let mut values = Vec::with_capacity(timestamps.len());
      let mut pending = series.points.iter().peekable();
      let mut carried = 0.0;
      for at in &timestamps {
        // Consume every observation at or before this index point; the
        // last one observed is the value carried forward.
        while let Some(p) = pending.next_if(|p| p.at <= *at) {
          carried = p.value;
        }
        values.push(carried);
      }
      SeriesColumn { field: series.field, values }
    })
    .collect();

  SeriesFrame { timestamps, columns }
}
