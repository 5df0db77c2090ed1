//! Core types and trait definitions for the Vigil telemetry store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod device;
pub mod error;
pub mod group;
pub mod metric;
pub mod payload;
pub mod series;
pub mod store;

pub use error::{Error, Result};

/// Default lookback for window queries, in hours.
pub const DEFAULT_WINDOW_HOURS: u32 = 24;
