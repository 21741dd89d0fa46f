//! Courier routes and their statistics.

use super::{Coordinate, Delivery};

/// What is visited at one position of a courier route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopKind<'a> {
    /// The courier's start (and optional return) point.
    Depot(Coordinate),
    /// A delivery from the caller's input.
    Delivery(&'a Delivery),
}

/// A single position in a courier route, with the leg that leads to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop<'a> {
    pub kind: StopKind<'a>,
    /// Distance from the previous stop in km (0 for the first stop).
    pub leg_distance_km: f64,
    /// Travel time from the previous stop in minutes.
    pub travel_time_minutes: f64,
}

impl<'a> Stop<'a> {
    pub fn location(&self) -> Coordinate {
        match self.kind {
            StopKind::Depot(c) => c,
            StopKind::Delivery(d) => d.location(),
        }
    }

    pub fn delivery(&self) -> Option<&'a Delivery> {
        match self.kind {
            StopKind::Delivery(d) => Some(d),
            StopKind::Depot(_) => None,
        }
    }

    pub fn is_depot(&self) -> bool {
        matches!(self.kind, StopKind::Depot(_))
    }

    /// Minutes spent at this stop (zero at the depot).
    pub fn service_minutes(&self) -> f64 {
        self.delivery().map_or(0.0, Delivery::service_minutes)
    }
}

/// Aggregate distance and time figures for one route.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteStatistics {
    pub distance_km: f64,
    pub travel_time_h: f64,
    pub service_time_h: f64,
    /// `travel_time_h + service_time_h`.
    pub total_time_h: f64,
    pub completion_minutes: f64,
}

/// The ordered route of one courier.
///
/// # Examples
///
/// ```
/// use courier_routing::models::{AddressType, Coordinate, CourierRoute, Delivery};
/// use courier_routing::optimizer::RouteOptimizer;
///
/// let deliveries = vec![
///     Delivery::new("A", Coordinate::new(17.50, 78.50), AddressType::Residential),
///     Delivery::new("B", Coordinate::new(17.51, 78.52), AddressType::Commercial),
/// ];
/// let plan = RouteOptimizer::default().optimize(&deliveries, 1, None).unwrap();
/// let route: &CourierRoute = &plan.routes()[0];
/// assert_eq!(route.delivery_count(), 2);
/// assert!(route.stops()[0].is_depot());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CourierRoute<'a> {
    courier_id: String,
    stops: Vec<Stop<'a>>,
    statistics: RouteStatistics,
    two_opt_passes: usize,
    converged: bool,
}

impl<'a> CourierRoute<'a> {
    pub fn new(courier_id: impl Into<String>, stops: Vec<Stop<'a>>, statistics: RouteStatistics) -> Self {
        Self {
            courier_id: courier_id.into(),
            stops,
            statistics,
            two_opt_passes: 0,
            converged: true,
        }
    }

    /// Records how the 2-opt search finished for this route.
    pub fn with_search_outcome(mut self, passes: usize, converged: bool) -> Self {
        self.two_opt_passes = passes;
        self.converged = converged;
        self
    }

    pub fn courier_id(&self) -> &str {
        &self.courier_id
    }

    /// All stops in visiting order, depot entries included.
    pub fn stops(&self) -> &[Stop<'a>] {
        &self.stops
    }

    /// Deliveries in visiting order.
    pub fn deliveries(&self) -> impl Iterator<Item = &'a Delivery> + '_ {
        self.stops.iter().filter_map(Stop::delivery)
    }

    pub fn delivery_count(&self) -> usize {
        self.stops.iter().filter(|s| !s.is_depot()).count()
    }

    pub fn statistics(&self) -> &RouteStatistics {
        &self.statistics
    }

    /// Number of 2-opt scans performed.
    pub fn two_opt_passes(&self) -> usize {
        self.two_opt_passes
    }

    /// `false` if 2-opt stopped at its iteration cap while still improving.
    pub fn converged(&self) -> bool {
        self.converged
    }
}
