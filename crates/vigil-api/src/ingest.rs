//! Handler for `POST /ingest`.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use vigil_core::{payload::IngestPayload, store::TelemetryStore};

use crate::error::ApiError;

/// Response body for an ingestion call.
///
/// `ok` is `true` for both stored and registered-but-unauthorized outcomes;
/// only a rejected batch reports `false`.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
  pub ok:      bool,
  pub message: String,
}

/// `POST /ingest` — admit one batch of metric readings from a device.
///
/// Returns 200 for stored/unauthorized outcomes, 400 for a rejected batch,
/// 500 for a storage failure.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Json(payload): Json<IngestPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TelemetryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let device_id = payload.device_id.clone();
  let outcome = store
    .ingest(payload)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(device_id = %device_id, outcome = ?outcome, "ingest");

  let status = if outcome.is_ok() {
    StatusCode::OK
  } else {
    StatusCode::BAD_REQUEST
  };
  let body = IngestResponse { ok: outcome.is_ok(), message: outcome.message() };
  Ok((status, Json(body)))
}
