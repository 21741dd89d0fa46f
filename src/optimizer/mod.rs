//! Multi-courier route optimization.
//!
//! For each request: cluster deliveries across couriers, then per cluster
//! build a distance matrix, construct a nearest-neighbor tour, improve it
//! with 2-opt, and roll it up into a [`CourierRoute`]. Clusters share no
//! state, so they are routed on a rayon pool and collected in cluster order.

mod deadline;

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::clustering::cluster_refs;
use crate::config::OptimizerConfig;
use crate::constructive::nearest_neighbor_tour;
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::evaluation::RouteEvaluator;
use crate::local_search::two_opt_improve_with;
use crate::models::{
    Coordinate, CourierRoute, Delivery, RoutePlan, Stop, StopKind, TimeSlotPlan,
};

use self::deadline::Deadline;

/// Slot key for deliveries without a requested time slot.
pub const UNSCHEDULED_SLOT: &str = "unscheduled";

/// Route optimization service.
///
/// Holds only configuration; construct once and share by reference. Each
/// call is a pure function of its inputs.
///
/// # Examples
///
/// ```
/// use courier_routing::models::{AddressType, Coordinate, Delivery};
/// use courier_routing::optimizer::RouteOptimizer;
///
/// let deliveries = vec![
///     Delivery::new("ORD1001", Coordinate::new(17.50, 78.50), AddressType::Residential),
///     Delivery::new("ORD1002", Coordinate::new(17.51, 78.52), AddressType::Commercial),
///     Delivery::new("ORD1003", Coordinate::new(17.49, 78.48), AddressType::Residential),
/// ];
/// let optimizer = RouteOptimizer::default();
///
/// let plan = optimizer.optimize(&deliveries, 2, None).unwrap();
/// assert!(plan.total_couriers() <= 2);
/// assert_eq!(plan.total_deliveries(), 3);
/// assert!(plan.total_distance_km() > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer {
    config: OptimizerConfig,
}

struct ClusterJob<'a> {
    courier_id: String,
    deliveries: Vec<&'a Delivery>,
}

impl RouteOptimizer {
    /// Creates an optimizer, rejecting invalid configuration.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    fn evaluator(&self) -> RouteEvaluator {
        RouteEvaluator::new(self.config.speed_kmh)
    }

    /// Assigns deliveries to at most `num_couriers` couriers and orders each
    /// courier's stops.
    ///
    /// Without a `depot`, the first delivery's location is used as one
    /// (unless `implicit_depot` is disabled, in which case routes start at
    /// their first delivery).
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `deliveries` is empty
    /// - [`Error::InvalidArgument`] if `num_couriers` is zero or a
    ///   coordinate is out of range
    /// - [`Error::ComputationTimeout`] if the configured time limit passes
    pub fn optimize<'a>(
        &self,
        deliveries: &'a [Delivery],
        num_couriers: usize,
        depot: Option<Coordinate>,
    ) -> Result<RoutePlan<'a>> {
        let refs: Vec<&Delivery> = deliveries.iter().collect();
        validate(&refs, num_couriers, depot)?;
        let deadline = Deadline::start(self.config.time_limit());
        let plan = self.plan(&refs, num_couriers, depot, &deadline)?;
        log::info!(
            "optimized {} deliveries for {} couriers: {} routes, {:.2} km in {} ms",
            plan.total_deliveries(),
            num_couriers,
            plan.total_couriers(),
            plan.total_distance_km(),
            deadline.elapsed().as_millis()
        );
        Ok(plan)
    }

    /// Groups deliveries by requested time slot and optimizes each slot
    /// independently with up to `num_couriers` couriers.
    ///
    /// Deliveries without a slot are grouped under [`UNSCHEDULED_SLOT`].
    ///
    /// # Errors
    ///
    /// Same as [`RouteOptimizer::optimize`]; the time limit covers all slots.
    pub fn optimize_by_time_slot<'a>(
        &self,
        deliveries: &'a [Delivery],
        num_couriers: usize,
        depot: Option<Coordinate>,
    ) -> Result<TimeSlotPlan<'a>> {
        let refs: Vec<&Delivery> = deliveries.iter().collect();
        validate(&refs, num_couriers, depot)?;
        let deadline = Deadline::start(self.config.time_limit());

        let mut by_slot: BTreeMap<String, Vec<&Delivery>> = BTreeMap::new();
        for d in refs {
            let slot = d.time_slot().unwrap_or(UNSCHEDULED_SLOT);
            by_slot.entry(slot.to_string()).or_default().push(d);
        }

        let mut slots = BTreeMap::new();
        for (slot, slot_deliveries) in by_slot {
            log::debug!("time slot {slot}: {} deliveries", slot_deliveries.len());
            let plan = self.plan(&slot_deliveries, num_couriers, depot, &deadline)?;
            slots.insert(slot, plan);
        }

        let result = TimeSlotPlan::new(slots, num_couriers);
        log::info!(
            "optimized {} deliveries across {} time slots in {} ms",
            result.total_deliveries(),
            result.total_time_slots(),
            deadline.elapsed().as_millis()
        );
        Ok(result)
    }

    fn plan<'a>(
        &self,
        deliveries: &[&'a Delivery],
        num_couriers: usize,
        depot: Option<Coordinate>,
        deadline: &Deadline,
    ) -> Result<RoutePlan<'a>> {
        let depot = match (depot, deliveries.first()) {
            (Some(d), _) => Some(d),
            (None, Some(first)) if self.config.implicit_depot => Some(first.location()),
            _ => None,
        };

        let clusters = cluster_refs(deliveries, num_couriers, &self.config.kmeans())?;
        let jobs: Vec<ClusterJob<'a>> = clusters
            .into_iter()
            .enumerate()
            .filter(|(idx, cluster)| {
                if cluster.is_empty() {
                    log::debug!("cluster {idx} is empty, skipping");
                }
                !cluster.is_empty()
            })
            .map(|(idx, cluster)| ClusterJob {
                courier_id: format!("C{}", idx + 1),
                deliveries: cluster,
            })
            .collect();

        let routes = if self.config.parallel && jobs.len() > 1 {
            let threads = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .min(jobs.len());
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            pool.install(|| {
                jobs.par_iter()
                    .map(|job| self.route_cluster(job, depot, deadline))
                    .collect::<Result<Vec<_>>>()
            })?
        } else {
            jobs.iter()
                .map(|job| self.route_cluster(job, depot, deadline))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(RoutePlan::new(routes))
    }

    fn route_cluster<'a>(
        &self,
        job: &ClusterJob<'a>,
        depot: Option<Coordinate>,
        deadline: &Deadline,
    ) -> Result<CourierRoute<'a>> {
        deadline.check()?;

        if job.deliveries.len() > self.config.max_deliveries_per_courier {
            log::warn!(
                "courier {} has {} deliveries, above the advisory limit of {}",
                job.courier_id,
                job.deliveries.len(),
                self.config.max_deliveries_per_courier
            );
        }

        let offset = usize::from(depot.is_some());
        let mut locations = Vec::with_capacity(job.deliveries.len() + offset);
        let mut service_minutes = Vec::with_capacity(job.deliveries.len() + offset);
        if let Some(d) = depot {
            locations.push(d);
            service_minutes.push(0.0);
        }
        for d in &job.deliveries {
            locations.push(d.location());
            service_minutes.push(d.service_minutes());
        }

        let distances = DistanceMatrix::from_coordinates(&locations);
        let mut tour = nearest_neighbor_tour(&distances, 0);
        if self.config.return_to_depot && depot.is_some() {
            tour.close();
        }
        let initial_km = tour.distance(&distances);

        let outcome = two_opt_improve_with(
            tour,
            &distances,
            self.config.max_two_opt_iterations,
            || deadline.check(),
        )?;

        let evaluator = self.evaluator();
        let statistics = evaluator.evaluate(&outcome.tour, &distances, &service_minutes);
        log::debug!(
            "courier {}: {} stops, {:.3} km -> {:.3} km after {} 2-opt passes",
            job.courier_id,
            job.deliveries.len(),
            initial_km,
            statistics.distance_km,
            outcome.passes
        );

        let mut stops = Vec::with_capacity(outcome.tour.len());
        let mut prev: Option<usize> = None;
        for &idx in outcome.tour.order() {
            let kind = if idx < offset {
                match depot {
                    Some(c) => StopKind::Depot(c),
                    None => continue,
                }
            } else {
                StopKind::Delivery(job.deliveries[idx - offset])
            };
            let leg_distance_km = prev.map_or(0.0, |p| distances.get(p, idx));
            stops.push(Stop {
                kind,
                leg_distance_km,
                travel_time_minutes: evaluator.travel_minutes(leg_distance_km),
            });
            prev = Some(idx);
        }

        Ok(CourierRoute::new(job.courier_id.clone(), stops, statistics)
            .with_search_outcome(outcome.passes, outcome.converged))
    }
}

fn validate(deliveries: &[&Delivery], num_couriers: usize, depot: Option<Coordinate>) -> Result<()> {
    if deliveries.is_empty() {
        return Err(Error::EmptyInput);
    }
    if num_couriers == 0 {
        return Err(Error::invalid_argument("num_couriers must be positive"));
    }
    if let Some(d) = depot {
        if !d.is_valid() {
            return Err(Error::invalid_argument(format!(
                "depot ({}, {}) is outside valid WGS84 range",
                d.latitude, d.longitude
            )));
        }
    }
    if let Some(bad) = deliveries.iter().find(|d| !d.location().is_valid()) {
        return Err(Error::invalid_argument(format!(
            "delivery {} has an out-of-range coordinate",
            bad.id()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::AddressType;

    fn sample() -> Vec<Delivery> {
        vec![
            Delivery::new("ORD1001", Coordinate::new(17.50, 78.50), AddressType::Residential),
            Delivery::new("ORD1002", Coordinate::new(17.51, 78.52), AddressType::Commercial),
            Delivery::new("ORD1003", Coordinate::new(17.49, 78.48), AddressType::Residential),
        ]
    }

    fn spread(n: usize) -> Vec<Delivery> {
        (0..n)
            .map(|i| {
                let lat = 17.40 + (i * 7 % 23) as f64 * 0.01;
                let lon = 78.40 + (i * 11 % 29) as f64 * 0.01;
                let kind = AddressType::try_from((i % 5) as u8).expect("known code");
                Delivery::new(format!("D{i}"), Coordinate::new(lat, lon), kind)
            })
            .collect()
    }

    #[test]
    fn test_single_courier() {
        let ds = sample();
        let plan = RouteOptimizer::default().optimize(&ds, 1, None).expect("valid");
        assert_eq!(plan.total_couriers(), 1);
        let route = &plan.routes()[0];
        assert_eq!(route.courier_id(), "C1");
        assert_eq!(route.delivery_count(), 3);
        assert_eq!(route.stops().len(), 4);
        assert!(route.stops()[0].is_depot());
        assert_eq!(route.stops()[0].leg_distance_km, 0.0);
        assert!(route.statistics().distance_km > 0.0);
        let ids: Vec<&str> = route.deliveries().map(Delivery::id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"ORD1001") && ids.contains(&"ORD1002") && ids.contains(&"ORD1003"));
    }

    #[test]
    fn test_stop_legs_sum_to_distance() {
        let ds = spread(12);
        let plan = RouteOptimizer::default().optimize(&ds, 1, None).expect("valid");
        let route = &plan.routes()[0];
        let legs: f64 = route.stops().iter().map(|s| s.leg_distance_km).sum();
        assert!((legs - route.statistics().distance_km).abs() < 1e-9);
    }

    #[test]
    fn test_two_couriers() {
        let ds = sample();
        let plan = RouteOptimizer::default().optimize(&ds, 2, None).expect("valid");
        assert!(plan.total_couriers() <= 2);
        assert_eq!(plan.total_deliveries(), 3);
    }

    #[test]
    fn test_more_couriers_than_deliveries() {
        let ds = sample();
        let plan = RouteOptimizer::default().optimize(&ds, 5, None).expect("valid");
        assert_eq!(plan.total_couriers(), 3);
        assert_eq!(plan.total_deliveries(), 3);
        assert!(plan.routes().iter().all(|r| r.delivery_count() == 1));
    }

    #[test]
    fn test_empty_input() {
        let err = RouteOptimizer::default().optimize(&[], 1, None).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn test_zero_couriers() {
        let ds = sample();
        let err = RouteOptimizer::default().optimize(&ds, 0, None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_bad_depot() {
        let ds = sample();
        let err = RouteOptimizer::default()
            .optimize(&ds, 1, Some(Coordinate::new(100.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_explicit_depot_first() {
        let ds = sample();
        let depot = Coordinate::new(17.45, 78.45);
        let plan = RouteOptimizer::default().optimize(&ds, 1, Some(depot)).expect("valid");
        let first = plan.routes()[0].stops()[0];
        assert_eq!(first.kind, StopKind::Depot(depot));
    }

    #[test]
    fn test_without_implicit_depot() {
        let ds = sample();
        let optimizer =
            RouteOptimizer::new(OptimizerConfig::default().with_implicit_depot(false)).expect("valid");
        let plan = optimizer.optimize(&ds, 1, None).expect("valid");
        let route = &plan.routes()[0];
        assert_eq!(route.stops().len(), 3);
        assert!(route.stops().iter().all(|s| !s.is_depot()));
        assert_eq!(route.deliveries().next().map(Delivery::id), Some("ORD1001"));
    }

    #[test]
    fn test_return_to_depot() {
        let ds = spread(6);
        let depot = Coordinate::new(17.45, 78.45);
        let open = RouteOptimizer::default().optimize(&ds, 1, Some(depot)).expect("valid");
        let closed = RouteOptimizer::new(OptimizerConfig::default().with_return_to_depot(true))
            .expect("valid")
            .optimize(&ds, 1, Some(depot))
            .expect("valid");
        let stops = closed.routes()[0].stops();
        assert!(stops.first().map_or(false, Stop::is_depot));
        assert!(stops.last().map_or(false, Stop::is_depot));
        assert_eq!(closed.routes()[0].delivery_count(), 6);
        assert_eq!(stops.len(), open.routes()[0].stops().len() + 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ds = spread(40);
        let parallel = RouteOptimizer::default().optimize(&ds, 4, None).expect("valid");
        let sequential = RouteOptimizer::new(OptimizerConfig::default().with_parallel(false))
            .expect("valid")
            .optimize(&ds, 4, None)
            .expect("valid");
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_service_time_from_address_types() {
        let ds = vec![
            Delivery::new("A", Coordinate::new(17.50, 78.50), AddressType::Industrial),
            Delivery::new("B", Coordinate::new(17.51, 78.52), AddressType::Government),
        ];
        let plan = RouteOptimizer::default().optimize(&ds, 1, None).expect("valid");
        let stats = plan.routes()[0].statistics();
        assert!((stats.service_time_h - 18.0 / 60.0).abs() < 1e-10);
        assert!((stats.total_time_h - (stats.travel_time_h + stats.service_time_h)).abs() < 1e-12);
    }

    #[test]
    fn test_time_limit_exceeded() {
        let ds = spread(30);
        let optimizer =
            RouteOptimizer::new(OptimizerConfig::default().with_time_limit(Duration::ZERO)).expect("valid");
        let err = optimizer.optimize(&ds, 2, None).unwrap_err();
        assert!(matches!(err, Error::ComputationTimeout { limit_ms: 0, .. }));
    }

    #[test]
    fn test_by_time_slot() {
        let ds = vec![
            Delivery::new("A", Coordinate::new(17.50, 78.50), AddressType::Residential).with_time_slot("10-11"),
            Delivery::new("B", Coordinate::new(17.51, 78.52), AddressType::Residential).with_time_slot("10-11"),
            Delivery::new("C", Coordinate::new(17.49, 78.48), AddressType::Residential).with_time_slot("14-15"),
            Delivery::new("D", Coordinate::new(17.52, 78.49), AddressType::Residential),
        ];
        let plan = RouteOptimizer::default().optimize_by_time_slot(&ds, 2, None).expect("valid");
        assert_eq!(plan.total_time_slots(), 3);
        assert_eq!(plan.total_deliveries(), 4);
        assert_eq!(plan.num_couriers(), 2);
        assert_eq!(plan.slot("10-11").map(RoutePlan::total_deliveries), Some(2));
        assert_eq!(plan.slot("14-15").map(RoutePlan::total_deliveries), Some(1));
        assert_eq!(plan.slot(UNSCHEDULED_SLOT).map(RoutePlan::total_deliveries), Some(1));
    }

    #[test]
    fn test_by_time_slot_empty() {
        let err = RouteOptimizer::default().optimize_by_time_slot(&[], 1, None).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }
}
