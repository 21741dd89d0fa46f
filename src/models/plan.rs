//! Multi-courier plans.

use std::collections::BTreeMap;

use super::CourierRoute;

/// Routes for all couriers of one optimize call, plus plan totals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutePlan<'a> {
    routes: Vec<CourierRoute<'a>>,
    total_deliveries: usize,
}

impl<'a> RoutePlan<'a> {
    pub fn new(routes: Vec<CourierRoute<'a>>) -> Self {
        let total_deliveries = routes.iter().map(CourierRoute::delivery_count).sum();
        Self {
            routes,
            total_deliveries,
        }
    }

    pub fn routes(&self) -> &[CourierRoute<'a>] {
        &self.routes
    }

    /// Couriers that received at least one delivery.
    pub fn total_couriers(&self) -> usize {
        self.routes.len()
    }

    pub fn total_deliveries(&self) -> usize {
        self.total_deliveries
    }

    pub fn total_distance_km(&self) -> f64 {
        self.routes.iter().map(|r| r.statistics().distance_km).sum()
    }

    pub fn total_time_h(&self) -> f64 {
        self.routes.iter().map(|r| r.statistics().total_time_h).sum()
    }
}

/// Plans optimized independently per requested time slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSlotPlan<'a> {
    slots: BTreeMap<String, RoutePlan<'a>>,
    num_couriers: usize,
}

impl<'a> TimeSlotPlan<'a> {
    pub fn new(slots: BTreeMap<String, RoutePlan<'a>>, num_couriers: usize) -> Self {
        Self {
            slots,
            num_couriers,
        }
    }

    pub fn slots(&self) -> &BTreeMap<String, RoutePlan<'a>> {
        &self.slots
    }

    pub fn slot(&self, label: &str) -> Option<&RoutePlan<'a>> {
        self.slots.get(label)
    }

    pub fn total_time_slots(&self) -> usize {
        self.slots.len()
    }

    /// Couriers available per slot.
    pub fn num_couriers(&self) -> usize {
        self.num_couriers
    }

    pub fn total_deliveries(&self) -> usize {
        self.slots.values().map(RoutePlan::total_deliveries).sum()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.slots.values().map(RoutePlan::total_distance_km).sum()
    }
}
