//! Request/response boundary for a transport layer.
//!
//! Parses JSON bodies into validated domain types, runs the optimizer, and
//! renders either a success payload or `{"error": ...}` with a status code.
//! The transport itself (HTTP server, CORS) lives outside this crate.

mod wire;

pub use wire::{
    CalculateEtaRequest, CalculateEtaResponse, DeliveryId, DeliveryRecord, ErrorResponse,
    HealthResponse, NumberOrString, OptimizeRoutesRequest, PlanResponse, RouteView,
    StatisticsView, StopView, TimeSlotResponse,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::evaluation::{format_clock, parse_clock, propagate_etas, EtaLeg};
use crate::models::{AddressType, Delivery};
use crate::optimizer::RouteOptimizer;

/// Service name reported by the health payload.
pub const SERVICE_NAME: &str = "Courier Route Optimization Service";

/// Travel time assumed for a stop that doesn't state one.
pub const DEFAULT_TRAVEL_MINUTES: f64 = 10.0;

/// A status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: &impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(&Error::from(e)),
        }
    }

    fn error(err: &Error) -> Self {
        log::error!("request failed: {err}");
        Self {
            status: err.status_code(),
            body: serde_json::to_value(ErrorResponse {
                error: err.to_string(),
            })
            .unwrap_or(Value::Null),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Handlers for the routing endpoints, sharing one optimizer.
///
/// # Examples
///
/// ```
/// use courier_routing::api::RouteService;
///
/// let service = RouteService::default();
/// let response = service.handle_calculate_eta(
///     r#"{"route": [{"travel_time_minutes": 15, "address_type": 0}], "start_time": "10:00"}"#,
/// );
/// assert_eq!(response.status, 200);
/// assert_eq!(response.body["route_with_eta"][0]["eta"], "10:15");
/// assert_eq!(response.body["end_time"], "10:20");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteService {
    optimizer: RouteOptimizer,
}

impl RouteService {
    pub fn new(optimizer: RouteOptimizer) -> Self {
        Self { optimizer }
    }

    pub fn optimizer(&self) -> &RouteOptimizer {
        &self.optimizer
    }

    /// `optimize-routes` endpoint.
    pub fn handle_optimize_routes(&self, body: &str) -> ApiResponse {
        let result = serde_json::from_str::<OptimizeRoutesRequest>(body)
            .map_err(Error::from)
            .and_then(|req| self.optimize_routes(req));
        match result {
            Ok(value) => ApiResponse { status: 200, body: value },
            Err(e) => ApiResponse::error(&e),
        }
    }

    /// `calculate-eta` endpoint.
    pub fn handle_calculate_eta(&self, body: &str) -> ApiResponse {
        let result = serde_json::from_str::<CalculateEtaRequest>(body)
            .map_err(Error::from)
            .and_then(|req| self.calculate_eta(req));
        match result {
            Ok(resp) => ApiResponse::ok(&resp),
            Err(e) => ApiResponse::error(&e),
        }
    }

    /// Health endpoint.
    pub fn health(&self) -> ApiResponse {
        ApiResponse::ok(&HealthResponse {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Validates a parsed request and optimizes it, returning the rendered
    /// plan (slot-keyed when `by_time_slot` is set).
    pub fn optimize_routes(&self, req: OptimizeRoutesRequest) -> Result<Value> {
        if req.deliveries.is_empty() {
            return Err(Error::EmptyInput);
        }
        let num_couriers = req.courier_count()?;
        let depot = req.depot()?;
        let by_time_slot = req.by_time_slot;
        let deliveries: Vec<Delivery> = req
            .deliveries
            .into_iter()
            .map(DeliveryRecord::into_delivery)
            .collect::<Result<_>>()?;

        let value = if by_time_slot {
            let plan = self.optimizer.optimize_by_time_slot(&deliveries, num_couriers, depot)?;
            serde_json::to_value(TimeSlotResponse::from(&plan))?
        } else {
            let plan = self.optimizer.optimize(&deliveries, num_couriers, depot)?;
            serde_json::to_value(PlanResponse::from(&plan))?
        };
        Ok(value)
    }

    /// Annotates each stop with an `eta` and reports the route end time.
    pub fn calculate_eta(&self, req: CalculateEtaRequest) -> Result<CalculateEtaResponse> {
        let start = parse_clock(&req.start_time)?;

        let legs = req
            .route
            .iter()
            .enumerate()
            .map(|(k, stop)| {
                let travel_minutes = match stop.get("travel_time_minutes") {
                    None | Some(Value::Null) => DEFAULT_TRAVEL_MINUTES,
                    Some(v) => v.as_f64().ok_or_else(|| {
                        Error::invalid_argument(format!("stop {k}: travel_time_minutes must be a number"))
                    })?,
                };
                let service_minutes = if stop.get("type").and_then(Value::as_str) == Some("depot") {
                    0.0
                } else {
                    stop_address_type(k, stop.get("address_type"))?.service_minutes()
                };
                Ok(EtaLeg {
                    travel_minutes,
                    service_minutes,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let schedule = propagate_etas(start, &legs)?;

        let mut route = req.route;
        for (stop, eta) in route.iter_mut().zip(&schedule.stops) {
            stop.insert("eta".to_string(), Value::String(format_clock(eta.arrival)));
        }

        Ok(CalculateEtaResponse {
            route_with_eta: route,
            start_time: req.start_time,
            end_time: format_clock(schedule.end),
        })
    }
}

fn stop_address_type(k: usize, value: Option<&Value>) -> Result<AddressType> {
    match value {
        None | Some(Value::Null) => Ok(AddressType::default()),
        Some(v) => {
            let code = NumberOrString::deserialize(v).map_err(|_| {
                Error::invalid_argument(format!("stop {k}: address_type must be 0-4"))
            })?;
            wire::address_type_from_code(&code, &format!("stop {k}: address_type"))
        }
    }
}
