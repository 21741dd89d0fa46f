//! Geographic coordinate type.

use serde::{Deserialize, Serialize};

use crate::distance::haversine_km;
use crate::error::{Error, Result};

/// A WGS84 position in signed decimal degrees.
///
/// No normalization is applied; use [`Coordinate::try_new`] at ingestion
/// boundaries to reject out-of-range values.
///
/// # Examples
///
/// ```
/// use courier_routing::models::Coordinate;
///
/// let a = Coordinate::new(17.50, 78.50);
/// let b = Coordinate::new(17.51, 78.52);
/// assert!(a.distance_to(&b) > 0.0);
/// assert_eq!(a.distance_to(&a), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range degrees.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let c = Self::new(latitude, longitude);
        if !c.is_valid() {
            return Err(Error::invalid_argument(format!(
                "coordinate ({latitude}, {longitude}) is outside valid WGS84 range"
            )));
        }
        Ok(c)
    }

    /// Returns `true` for finite latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in kilometres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_km(*self, *other)
    }
}
