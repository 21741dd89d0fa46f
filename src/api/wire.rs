//! Request and response payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{
    AddressType, Coordinate, CourierRoute, Delivery, RoutePlan, StopKind, TimeSlotPlan,
};

/// A JSON value that may be a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn to_f64(&self, field: &str) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                Error::invalid_argument(format!("{field}: {s:?} is not a number"))
            }),
        }
    }

    /// Reads a whole number such as `2`, `2.0` or `"2"`.
    pub fn to_whole(&self, field: &str) -> Result<i64> {
        let n = self.to_f64(field)?;
        if !n.is_finite() || n.fract() != 0.0 || n.abs() > i64::MAX as f64 {
            return Err(Error::invalid_argument(format!("{field}: {n} is not a whole number")));
        }
        Ok(n as i64)
    }
}

/// Delivery identifiers arrive as strings or integers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DeliveryId {
    Text(String),
    Integer(i64),
}

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// One delivery as sent by the order layer.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryRecord {
    #[serde(alias = "order_id")]
    pub id: DeliveryId,
    pub latitude: NumberOrString,
    pub longitude: NumberOrString,
    #[serde(default)]
    pub address_type: Option<NumberOrString>,
    #[serde(default)]
    pub time_slot: Option<String>,
}

impl DeliveryRecord {
    /// Validates the record into a typed [`Delivery`].
    pub fn into_delivery(self) -> Result<Delivery> {
        let id = self.id.to_string();
        let location = Coordinate::try_new(
            self.latitude.to_f64("latitude")?,
            self.longitude.to_f64("longitude")?,
        )
        .map_err(|e| Error::invalid_argument(format!("delivery {id}: {e}")))?;
        let address_type = match &self.address_type {
            Some(code) => address_type_from_code(code, &format!("delivery {id}: address_type"))?,
            None => AddressType::default(),
        };
        let delivery = Delivery::new(id, location, address_type);
        Ok(match self.time_slot {
            Some(slot) => delivery.with_time_slot(slot),
            None => delivery,
        })
    }
}

/// Parses an address category code sent as a number or numeric string.
pub(crate) fn address_type_from_code(code: &NumberOrString, field: &str) -> Result<AddressType> {
    let n = code.to_whole(field)?;
    u8::try_from(n)
        .map_err(|_| Error::invalid_argument(format!("{field}: unknown code {n}")))
        .and_then(AddressType::try_from)
}

fn default_couriers() -> NumberOrString {
    NumberOrString::Number(1.0)
}

/// Body of an `optimize-routes` request.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeRoutesRequest {
    pub deliveries: Vec<DeliveryRecord>,
    #[serde(default = "default_couriers", alias = "num_postmen")]
    pub num_couriers: NumberOrString,
    #[serde(default)]
    pub depot_latitude: Option<NumberOrString>,
    #[serde(default)]
    pub depot_longitude: Option<NumberOrString>,
    #[serde(default)]
    pub by_time_slot: bool,
}

impl OptimizeRoutesRequest {
    /// Depot coordinate, if both halves were sent.
    pub fn depot(&self) -> Result<Option<Coordinate>> {
        match (&self.depot_latitude, &self.depot_longitude) {
            (Some(lat), Some(lon)) => {
                Coordinate::try_new(lat.to_f64("depot_latitude")?, lon.to_f64("depot_longitude")?)
                    .map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn courier_count(&self) -> Result<usize> {
        let n = self.num_couriers.to_whole("num_couriers")?;
        if n <= 0 {
            return Err(Error::invalid_argument(format!(
                "num_couriers must be positive, got {n}"
            )));
        }
        usize::try_from(n).map_err(|_| Error::invalid_argument("num_couriers is too large"))
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// One entry of a route listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StopView {
    Depot {
        name: String,
        latitude: f64,
        longitude: f64,
        leg_distance_km: f64,
        travel_time_minutes: f64,
    },
    Delivery {
        id: String,
        latitude: f64,
        longitude: f64,
        address_type: AddressType,
        #[serde(skip_serializing_if = "Option::is_none")]
        time_slot: Option<String>,
        leg_distance_km: f64,
        travel_time_minutes: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsView {
    pub total_distance_km: f64,
    pub travel_time_hours: f64,
    pub service_time_hours: f64,
    pub total_time_hours: f64,
    pub estimated_completion_minutes: f64,
    pub two_opt_passes: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteView {
    pub courier_id: String,
    pub delivery_count: usize,
    pub route: Vec<StopView>,
    pub statistics: StatisticsView,
}

impl From<&CourierRoute<'_>> for RouteView {
    fn from(route: &CourierRoute<'_>) -> Self {
        let stops = route
            .stops()
            .iter()
            .map(|s| {
                let leg_distance_km = round2(s.leg_distance_km);
                let travel_time_minutes = round2(s.travel_time_minutes);
                match s.kind {
                    StopKind::Depot(c) => StopView::Depot {
                        name: "Depot".to_string(),
                        latitude: c.latitude,
                        longitude: c.longitude,
                        leg_distance_km,
                        travel_time_minutes,
                    },
                    StopKind::Delivery(d) => StopView::Delivery {
                        id: d.id().to_string(),
                        latitude: d.location().latitude,
                        longitude: d.location().longitude,
                        address_type: d.address_type(),
                        time_slot: d.time_slot().map(str::to_string),
                        leg_distance_km,
                        travel_time_minutes,
                    },
                }
            })
            .collect();

        let stats = route.statistics();
        Self {
            courier_id: route.courier_id().to_string(),
            delivery_count: route.delivery_count(),
            route: stops,
            statistics: StatisticsView {
                total_distance_km: round2(stats.distance_km),
                travel_time_hours: round2(stats.travel_time_h),
                service_time_hours: round2(stats.service_time_h),
                total_time_hours: round2(stats.total_time_h),
                estimated_completion_minutes: stats.completion_minutes.round(),
                two_opt_passes: route.two_opt_passes(),
                converged: route.converged(),
            },
        }
    }
}

/// Successful `optimize-routes` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResponse {
    pub success: bool,
    pub total_couriers: usize,
    pub total_deliveries: usize,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    pub routes: Vec<RouteView>,
}

impl From<&RoutePlan<'_>> for PlanResponse {
    fn from(plan: &RoutePlan<'_>) -> Self {
        let routes: Vec<RouteView> = plan.routes().iter().map(RouteView::from).collect();
        let total_distance_km = routes.iter().map(|r| r.statistics.total_distance_km).sum();
        let total_time_hours = routes.iter().map(|r| r.statistics.total_time_hours).sum();
        Self {
            success: true,
            total_couriers: plan.total_couriers(),
            total_deliveries: plan.total_deliveries(),
            total_distance_km: round2(total_distance_km),
            total_time_hours: round2(total_time_hours),
            routes,
        }
    }
}

/// Successful `optimize-routes` response with `by_time_slot` set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlotResponse {
    pub success: bool,
    pub total_time_slots: usize,
    pub total_couriers: usize,
    pub total_deliveries: usize,
    pub total_distance_km: f64,
    pub time_slot_routes: BTreeMap<String, PlanResponse>,
}

impl From<&TimeSlotPlan<'_>> for TimeSlotResponse {
    fn from(plan: &TimeSlotPlan<'_>) -> Self {
        let time_slot_routes: BTreeMap<String, PlanResponse> = plan
            .slots()
            .iter()
            .map(|(slot, p)| (slot.clone(), PlanResponse::from(p)))
            .collect();
        let total_distance_km = time_slot_routes.values().map(|p| p.total_distance_km).sum();
        Self {
            success: true,
            total_time_slots: plan.total_time_slots(),
            total_couriers: plan.num_couriers(),
            total_deliveries: plan.total_deliveries(),
            total_distance_km: round2(total_distance_km),
            time_slot_routes,
        }
    }
}

fn default_start_time() -> String {
    "10:00".to_string()
}

/// Body of a `calculate-eta` request. Stops are free-form objects; only
/// `travel_time_minutes`, `address_type` and `type` are read.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateEtaRequest {
    pub route: Vec<Map<String, Value>>,
    #[serde(default = "default_start_time")]
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculateEtaResponse {
    pub route_with_eta: Vec<Map<String, Value>>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
