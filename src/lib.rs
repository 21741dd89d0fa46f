//! # courier-routing
//!
//! Assigns delivery stops to a fixed number of couriers and orders each
//! courier's stops to keep travel short, with time and ETA estimates.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Coordinate, Delivery, Tour, CourierRoute, RoutePlan)
//! - [`distance`] — Haversine distance and distance matrix
//! - [`clustering`] — Seeded k-means partitioning across couriers
//! - [`constructive`] — Nearest-neighbor tour construction
//! - [`local_search`] — 2-opt tour improvement
//! - [`evaluation`] — Route statistics and ETA propagation
//! - [`optimizer`] — The per-request pipeline, single plan or per time slot
//! - [`api`] — JSON request/response boundary
//! - [`config`] — Optimizer tunables
//! - [`logging`] — Logger setup for binaries

pub mod api;
pub mod clustering;
pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod logging;
pub mod models;
pub mod optimizer;

pub use error::{Error, Result};
