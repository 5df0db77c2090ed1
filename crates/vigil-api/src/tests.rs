//! Router tests against an in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode},
  response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use vigil_store_sqlite::SqliteStore;

use crate::api_router;

const PASSKEY: &str = "hunter2";

async fn router() -> Router {
  let store = SqliteStore::open_in_memory(PASSKEY)
    .await
    .expect("in-memory store");
  api_router(Arc::new(store))
}

fn ingest_request(body: &Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri("/ingest")
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response) -> Value {
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn sample_payload(device: &str, passkey: Option<&str>) -> Value {
  json!({
    "device_id": device,
    "passkey": passkey,
    "metrics": [
      {
        "metric_type": "battery_percent",
        "value": 62,
        "timestamp": "2025-02-25T18:27:55.207467",
        "data_type": "float",
        "unit": "%"
      },
      {
        "metric_type": "memory_usage",
        "value": 48.0,
        "timestamp": "2025-02-25T18:27:55.207467",
        "data_type": "float",
        "unit": "%"
      }
    ]
  })
}

#[tokio::test]
async fn ingest_with_passkey_stores_and_snapshots() {
  let app = router().await;

  let response = app
    .clone()
    .oneshot(ingest_request(&sample_payload("dev-1", Some(PASSKEY))))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["ok"], json!(true));

  let response = app.oneshot(get("/metrics/local/latest")).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["battery"]["value"], json!("62"));
  assert_eq!(body["memory"]["value"], json!("48.0"));
}

#[tokio::test]
async fn ingest_without_passkey_is_ok_but_stores_nothing() {
  let app = router().await;

  let response = app
    .clone()
    .oneshot(ingest_request(&sample_payload("dev-2", None)))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["ok"], json!(true));
  assert!(
    body["message"].as_str().unwrap().contains("not authorized"),
    "unexpected message: {body}"
  );

  let response = app.oneshot(get("/metrics/local/latest")).await.unwrap();
  assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejected_batch_is_bad_request() {
  let app = router().await;

  let payload = json!({
    "device_id": "dev-3",
    "passkey": PASSKEY,
    "metrics": [{
      "metric_type": "battery_percent",
      "value": 62,
      "timestamp": "not a timestamp",
      "data_type": "float",
      "unit": "%"
    }]
  });
  let response = app.oneshot(ingest_request(&payload)).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let body = body_json(response).await;
  assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn unknown_group_is_bad_request() {
  let app = router().await;
  let response = app.oneshot(get("/metrics/kitchen/latest")).await.unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn window_is_well_shaped_even_when_empty() {
  let app = router().await;

  let response = app
    .oneshot(get("/metrics/local/window?hours=24"))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["timestamps"], json!([]));
  assert_eq!(body["battery"], json!([]));
  assert_eq!(body["memory"], json!([]));
}

#[tokio::test]
async fn window_returns_aligned_series() {
  let app = router().await;

  // Recent readings so they land inside the default window.
  let now = chrono::Utc::now();
  let at = |minutes: i64| {
    (now - chrono::Duration::minutes(minutes)).to_rfc3339()
  };
  let payload = json!({
    "device_id": "dev-4",
    "passkey": PASSKEY,
    "metrics": [
      { "metric_type": "battery_percent", "value": 80.0,
        "timestamp": at(20), "data_type": "float", "unit": "%" },
      { "metric_type": "battery_percent", "value": 75.0,
        "timestamp": at(10), "data_type": "float", "unit": "%" },
      { "metric_type": "memory_usage", "value": 40.0,
        "timestamp": at(15), "data_type": "float", "unit": "%" }
    ]
  });
  app
    .clone()
    .oneshot(ingest_request(&payload))
    .await
    .unwrap();

  let response = app.oneshot(get("/metrics/local/window")).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["timestamps"].as_array().unwrap().len(), 3);
  assert_eq!(body["battery"], json!([80.0, 80.0, 75.0]));
  assert_eq!(body["memory"], json!([0.0, 40.0, 40.0]));
}

#[tokio::test]
async fn devices_listing_and_default() {
  let app = router().await;

  let response = app.clone().oneshot(get("/devices/default")).await.unwrap();
  assert_eq!(response.status(), StatusCode::NOT_FOUND);

  app
    .clone()
    .oneshot(ingest_request(&sample_payload("dev-5", None)))
    .await
    .unwrap();
  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  app
    .clone()
    .oneshot(ingest_request(&sample_payload("dev-6", None)))
    .await
    .unwrap();

  let response = app.clone().oneshot(get("/devices")).await.unwrap();
  let body = body_json(response).await;
  let listed = body.as_array().unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0]["deviceId"], json!("dev-6"));
  assert!(listed[0].get("lastSeen").is_some());

  let response = app.oneshot(get("/devices/default")).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["deviceId"], json!("dev-6"));
}
