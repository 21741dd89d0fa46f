//! Geodesic distances and distance matrices.
//!
//! Provides the haversine great-circle distance and a dense matrix built
//! from it.

mod geo;
mod matrix;

pub use geo::{haversine_km, EARTH_RADIUS_KM};
pub use matrix::DistanceMatrix;
