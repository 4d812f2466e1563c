//! Synchronous API client core for the Haras farm-management backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `HarasClient` is immutable: a base URL and an optional bearer token.
//! - Each facade operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit. `Operation` offers the same calls as data.
//! - Both envelope shapes the backend uses are normalised in one place.
//! - Stall placement has a single write path, the horse endpoint.
//! - Gestation, age and stock-alert math are pure functions over `chrono`
//!   dates; callers pass "now" in.

pub mod age;
pub mod alerts;
pub mod client;
pub mod config;
mod envelope;
pub mod error;
pub mod gestation;
pub mod http;
pub mod occupancy;
pub mod operation;
pub mod types;

pub use age::age_in_years;
pub use alerts::{derive_alerts, stock_status, stock_value};
pub use client::HarasClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use gestation::{calculate_gestation_info, GestationInfo, GESTATION_PERIOD_DAYS};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use occupancy::{check_assignment, reconcile_occupancy, OccupancyMismatch};
pub use operation::Operation;
pub use types::*;
