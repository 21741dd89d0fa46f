//! Distance and time rollup for a finished tour.

use crate::distance::DistanceMatrix;
use crate::models::{RouteStatistics, Tour};

/// Average speed of a two-wheeler courier.
pub const DEFAULT_SPEED_KMH: f64 = 12.0;

/// Computes route distance, travel time and service time.
///
/// Travel time assumes a constant courier speed; service time is the sum of
/// the per-location service minutes (zero for the depot).
///
/// # Examples
///
/// ```
/// use courier_routing::models::Tour;
/// use courier_routing::distance::DistanceMatrix;
/// use courier_routing::evaluation::RouteEvaluator;
///
/// let dm = DistanceMatrix::from_data(3, vec![
///     0.0, 6.0, 9.0,
///     6.0, 0.0, 6.0,
///     9.0, 6.0, 0.0,
/// ]).unwrap();
/// let evaluator = RouteEvaluator::new(12.0);
/// let stats = evaluator.evaluate(&Tour::new(vec![0, 1, 2]), &dm, &[0.0, 5.0, 7.0]);
/// assert!((stats.distance_km - 12.0).abs() < 1e-10);
/// assert!((stats.travel_time_h - 1.0).abs() < 1e-10);
/// assert!((stats.service_time_h - 0.2).abs() < 1e-10);
/// assert!((stats.completion_minutes - 72.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEvaluator {
    speed_kmh: f64,
}

impl Default for RouteEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_KMH)
    }
}

impl RouteEvaluator {
    /// Creates an evaluator for the given average speed (must be positive).
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Minutes needed to cover `distance_km`.
    pub fn travel_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.speed_kmh * 60.0
    }

    /// Length of each leg along the tour: `legs[k]` is the distance from
    /// position `k` to `k + 1`.
    pub fn legs(&self, tour: &Tour, distances: &DistanceMatrix) -> Vec<f64> {
        tour.order()
            .windows(2)
            .map(|w| distances.get(w[0], w[1]))
            .collect()
    }

    /// Rolls up a tour into route statistics.
    ///
    /// `service_minutes[i]` is the time spent at location `i`. A closed
    /// tour's repeated start is not serviced twice. An empty tour yields
    /// all-zero statistics.
    pub fn evaluate(
        &self,
        tour: &Tour,
        distances: &DistanceMatrix,
        service_minutes: &[f64],
    ) -> RouteStatistics {
        let distance_km = tour.distance(distances);
        let travel_time_h = distance_km / self.speed_kmh;

        let visits = if tour.is_closed() {
            &tour.order()[..tour.len() - 1]
        } else {
            tour.order()
        };
        let service_minutes_total: f64 = visits
            .iter()
            .map(|&i| service_minutes.get(i).copied().unwrap_or(0.0))
            .sum();
        let service_time_h = service_minutes_total / 60.0;
        let total_time_h = travel_time_h + service_time_h;

        RouteStatistics {
            distance_km,
            travel_time_h,
            service_time_h,
            total_time_h,
            completion_minutes: total_time_h * 60.0,
        }
    }
}
