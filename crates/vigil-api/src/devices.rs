//! Handlers for `/devices` endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use vigil_core::{device::Device, store::TelemetryStore};

use crate::error::ApiError;

// ─── List ────────────────────────────────────────────────────────────────────

/// Diagnostic enumeration entry for `GET /devices`. The admin flag is
/// deliberately not exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
  pub id:        i64,
  pub device_id: String,
  pub last_seen: DateTime<Utc>,
}

impl From<Device> for DeviceSummary {
  fn from(device: Device) -> Self {
    Self {
      id:        device.id,
      device_id: device.device_id,
      last_seen: device.last_seen,
    }
  }
}

/// `GET /devices` — all known devices, most recently contacted first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<DeviceSummary>>, ApiError>
where
  S: TelemetryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let devices = store
    .list_devices()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(devices.into_iter().map(DeviceSummary::from).collect()))
}

// ─── Default ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultDeviceResponse {
  pub device_id: String,
}

/// `GET /devices/default` — the most recently contacted device, or 404 when
/// the registry is empty.
pub async fn default_device<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<DefaultDeviceResponse>, ApiError>
where
  S: TelemetryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let device = store
    .default_device()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("no devices registered".to_owned()))?;
  Ok(Json(DefaultDeviceResponse { device_id: device.device_id }))
}
