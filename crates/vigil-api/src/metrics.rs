//! Handlers for `/metrics/{group}` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/metrics/:group/latest` | Latest snapshot keyed by display field; 404 when the group has no data |
//! | `GET`  | `/metrics/:group/window` | Aligned, forward-filled series; `?hours` defaults to 24 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use vigil_core::{
  DEFAULT_WINDOW_HOURS,
  group::MetricGroup,
  store::{LatestSnapshot, TelemetryStore},
};

use crate::error::ApiError;

fn parse_group(name: &str) -> Result<MetricGroup, ApiError> {
  name
    .parse::<MetricGroup>()
    .map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ─── Latest ──────────────────────────────────────────────────────────────────

/// `GET /metrics/:group/latest`
pub async fn latest<S>(
  State(store): State<Arc<S>>,
  Path(group): Path<String>,
) -> Result<Json<LatestSnapshot>, ApiError>
where
  S: TelemetryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let group = parse_group(&group)?;
  let snapshot = store
    .latest(group)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no data for group {group}"))
    })?;
  Ok(Json(snapshot))
}

// ─── Window ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WindowParams {
  /// Trailing window length in hours. Defaults to 24.
  pub hours: Option<u32>,
}

/// `GET /metrics/:group/window?hours=24`
///
/// Returns `{"timestamps": [...], "<field>": [...], ...}`. An empty window
/// yields empty arrays, never an error.
pub async fn window<S>(
  State(store): State<Arc<S>>,
  Path(group): Path<String>,
  Query(params): Query<WindowParams>,
) -> Result<Json<Value>, ApiError>
where
  S: TelemetryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let group = parse_group(&group)?;
  let hours = params.hours.unwrap_or(DEFAULT_WINDOW_HOURS);
  let frame = store
    .window(group, hours)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut body = Map::new();
  body.insert(
    "timestamps".to_owned(),
    json!(
      frame
        .timestamps
        .iter()
        .map(|t| t.to_rfc3339())
        .collect::<Vec<_>>()
    ),
  );
  for column in frame.columns {
    body.insert(column.field.to_owned(), json!(column.values));
  }
  Ok(Json(Value::Object(body)))
}
