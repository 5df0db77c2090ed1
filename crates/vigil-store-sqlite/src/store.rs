//! [`SqliteStore`] — the SQLite implementation of [`TelemetryStore`].

use std::path::Path;

use chrono::{Duration, Utc};
use rusqlite::OptionalExtension as _;
use vigil_core::{
  device::Device,
  group::MetricGroup,
  metric::MetricType,
  payload::{IngestOutcome, IngestPayload, NormalizedReading},
  series::{self, RawSeries, SamplePoint, SeriesFrame},
  store::{LatestPoint, LatestSnapshot, TelemetryStore},
};

use crate::{
  Error, Result,
  encode::{RawDevice, RawMetricType, decode_dt, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vigil telemetry store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The admin
/// passkey is fixed at open time; every ingestion call compares against it.
#[derive(Clone)]
pub struct SqliteStore {
  conn:          tokio_rusqlite::Connection,
  admin_passkey: String,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(
    path: impl AsRef<Path>,
    admin_passkey: impl Into<String>,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, admin_passkey: admin_passkey.into() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(admin_passkey: impl Into<String>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, admin_passkey: admin_passkey.into() };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Ingestion gate helpers ──────────────────────────────────────────────────

/// Find or lazily create the catalog row for one reading.
///
/// The first sighting of a metric name fixes its `data_type` and `unit`; a
/// mismatching re-declaration yields a rejection reason instead of a schema
/// update.
fn resolve_metric_type(
  tx: &rusqlite::Transaction<'_>,
  reading: &NormalizedReading,
) -> rusqlite::Result<std::result::Result<i64, String>> {
  let existing: Option<(i64, String, Option<String>)> = tx
    .query_row(
      "SELECT id, data_type, unit FROM metric_types WHERE name = ?1",
      rusqlite::params![reading.metric_type],
      |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )
    .optional()?;

  match existing {
    Some((id, data_type, unit)) => {
      let type_conflicts = data_type != reading.data_type.as_str();
      // A payload may omit the unit; only a differing declared unit is a
      // conflict.
      let unit_conflicts = reading.unit.is_some() && reading.unit != unit;
      if type_conflicts || unit_conflicts {
        let conflict = vigil_core::Error::MetricTypeConflict {
          name:     reading.metric_type.clone(),
          existing: describe_declaration(&data_type, unit.as_deref()),
          declared: describe_declaration(
            reading.data_type.as_str(),
            reading.unit.as_deref(),
          ),
        };
        return Ok(Err(conflict.to_string()));
      }
      Ok(Ok(id))
    }
    None => {
      tx.execute(
        "INSERT INTO metric_types (name, data_type, unit) VALUES (?1, ?2, ?3)",
        rusqlite::params![
          reading.metric_type,
          reading.data_type.as_str(),
          reading.unit
        ],
      )?;
      Ok(Ok(tx.last_insert_rowid()))
    }
  }
}

fn describe_declaration(data_type: &str, unit: Option<&str>) -> String {
  match unit {
    Some(unit) => format!("{data_type} ({unit})"),
    None => data_type.to_owned(),
  }
}

// ─── TelemetryStore impl ─────────────────────────────────────────────────────

impl TelemetryStore for SqliteStore {
  type Error = Error;

  // ── Ingestion gate ────────────────────────────────────────────────────────

  async fn ingest(&self, payload: IngestPayload) -> Result<IngestOutcome> {
    // Eager boundary validation: a malformed payload is rejected before any
    // database work, so nothing — not even the last_seen touch — happens.
    let batch = match payload.normalize() {
      Ok(batch) => batch,
      Err(e) => return Ok(IngestOutcome::Rejected { reason: e.to_string() }),
    };

    let passkey_matches =
      batch.passkey.as_deref() == Some(self.admin_passkey.as_str());
    let now_str = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Find or create the device, and record the contact either way.
        let existing: Option<(i64, bool)> = tx
          .query_row(
            "SELECT id, admin FROM devices WHERE device_id = ?1",
            rusqlite::params![batch.device_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        let (device_row_id, mut admin) = match existing {
          Some((id, admin)) => {
            tx.execute(
              "UPDATE devices SET last_seen = ?1 WHERE id = ?2",
              rusqlite::params![now_str, id],
            )?;
            (id, admin)
          }
          None => {
            tx.execute(
              "INSERT INTO devices (device_id, last_seen, admin)
               VALUES (?1, ?2, 0)",
              rusqlite::params![batch.device_id, now_str],
            )?;
            (tx.last_insert_rowid(), false)
          }
        };

        // One-way promotion: a correct passkey grants admin; a wrong or
        // absent passkey never revokes it.
        if passkey_matches && !admin {
          tx.execute(
            "UPDATE devices SET admin = 1 WHERE id = ?1",
            rusqlite::params![device_row_id],
          )?;
          admin = true;
        }

        if !admin {
          // The contact is still recorded; the batch is silently dropped.
          tx.commit()?;
          return Ok(IngestOutcome::Unauthorized);
        }

        for reading in &batch.readings {
          let metric_type_id = match resolve_metric_type(&tx, reading)? {
            Ok(id) => id,
            // Dropping the transaction rolls back the whole batch,
            // including facts already appended in this loop.
            Err(reason) => return Ok(IngestOutcome::Rejected { reason }),
          };
          tx.execute(
            "INSERT INTO facts (device_id, metric_type_id, timestamp, value)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              device_row_id,
              metric_type_id,
              encode_dt(reading.timestamp),
              reading.value_text
            ],
          )?;
        }

        tx.commit()?;
        Ok(IngestOutcome::Stored { count: batch.readings.len() })
      })
      .await?;

    Ok(outcome)
  }

  // ── Series queries ────────────────────────────────────────────────────────

  async fn latest(&self, group: MetricGroup) -> Result<Option<LatestSnapshot>> {
    let raws: Vec<(&'static str, String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT f.value, f.timestamp
           FROM facts f
           JOIN metric_types mt ON mt.id = f.metric_type_id
           WHERE mt.name = ?1
           ORDER BY f.timestamp DESC
           LIMIT 1",
        )?;

        let mut rows = Vec::new();
        for member in group.members() {
          let row: Option<(String, String)> = stmt
            .query_row(rusqlite::params![member.metric], |row| {
              Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?;
          if let Some((value, timestamp)) = row {
            rows.push((member.field, value, timestamp));
          }
        }
        Ok(rows)
      })
      .await?;

    if raws.is_empty() {
      return Ok(None);
    }

    let mut snapshot = LatestSnapshot::new();
    for (field, value, timestamp) in raws {
      snapshot
        .insert(field, LatestPoint { value, timestamp: decode_dt(&timestamp)? });
    }
    Ok(Some(snapshot))
  }

  async fn window(&self, group: MetricGroup, hours: u32) -> Result<SeriesFrame> {
    let cutoff = encode_dt(Utc::now() - Duration::hours(i64::from(hours)));

    let raws: Vec<(&'static str, Vec<(String, String)>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT f.timestamp, f.value
           FROM facts f
           JOIN metric_types mt ON mt.id = f.metric_type_id
           WHERE mt.name = ?1 AND f.timestamp >= ?2
           ORDER BY f.timestamp ASC",
        )?;

        let mut per_member = Vec::new();
        for member in group.charted_members() {
          let points = stmt
            .query_map(rusqlite::params![member.metric, cutoff], |row| {
              Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<(String, String)>>>()?;
          per_member.push((member.field, points));
        }
        Ok(per_member)
      })
      .await?;

    let mut inputs = Vec::with_capacity(raws.len());
    for (field, rows) in raws {
      let mut points = Vec::with_capacity(rows.len());
      for (timestamp, value) in rows {
        let parsed = value.parse::<f64>().map_err(|_| Error::NonNumericValue {
          field: field.to_owned(),
          value: value.clone(),
        })?;
        points.push(SamplePoint { at: decode_dt(&timestamp)?, value: parsed });
      }
      inputs.push(RawSeries { field, points });
    }

    Ok(series::reconstruct(inputs))
  }

  // ── Device registry ───────────────────────────────────────────────────────

  async fn default_device(&self) -> Result<Option<Device>> {
    let raw: Option<RawDevice> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, device_id, last_seen, admin FROM devices
               ORDER BY last_seen DESC LIMIT 1",
              [],
              |row| {
                Ok(RawDevice {
                  id:        row.get(0)?,
                  device_id: row.get(1)?,
                  last_seen: row.get(2)?,
                  admin:     row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDevice::into_device).transpose()
  }

  async fn find_device(&self, device_id: &str) -> Result<Option<Device>> {
    let device_id = device_id.to_owned();

    let raw: Option<RawDevice> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, device_id, last_seen, admin FROM devices
               WHERE device_id = ?1",
              rusqlite::params![device_id],
              |row| {
                Ok(RawDevice {
                  id:        row.get(0)?,
                  device_id: row.get(1)?,
                  last_seen: row.get(2)?,
                  admin:     row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDevice::into_device).transpose()
  }

  async fn list_devices(&self) -> Result<Vec<Device>> {
    let raws: Vec<RawDevice> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, device_id, last_seen, admin FROM devices
           ORDER BY last_seen DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawDevice {
              id:        row.get(0)?,
              device_id: row.get(1)?,
              last_seen: row.get(2)?,
              admin:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDevice::into_device).collect()
  }

  // ── Metric catalog ────────────────────────────────────────────────────────

  async fn list_metric_types(&self) -> Result<Vec<MetricType>> {
    let raws: Vec<RawMetricType> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, data_type, unit FROM metric_types ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawMetricType {
              id:        row.get(0)?,
              name:      row.get(1)?,
              data_type: row.get(2)?,
              unit:      row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMetricType::into_metric_type).collect()
  }
}
