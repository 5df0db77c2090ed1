//! JSON REST API for Vigil.
//!
//! Exposes an axum [`Router`] backed by any
//! [`vigil_core::store::TelemetryStore`]. Transport, TLS, and request tracing
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vigil_api::api_router(store.clone()))
//! ```

pub mod devices;
pub mod error;
pub mod ingest;
pub mod metrics;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use vigil_core::store::TelemetryStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TelemetryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Ingestion
    .route("/ingest", post(ingest::handler::<S>))
    // Series queries
    .route("/metrics/{group}/latest", get(metrics::latest::<S>))
    .route("/metrics/{group}/window", get(metrics::window::<S>))
    // Device registry
    .route("/devices", get(devices::list::<S>))
    .route("/devices/default", get(devices::default_device::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
