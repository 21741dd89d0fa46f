//! Domain model types for courier routing.
//!
//! Coordinates and deliveries come in from the caller; tours index into a
//! distance matrix; courier routes and plans are what the optimizer returns.

mod coordinate;
mod delivery;
mod plan;
mod route;
mod tour;

pub use coordinate::Coordinate;
pub use delivery::{AddressType, Delivery};
pub use plan::{RoutePlan, TimeSlotPlan};
pub use route::{CourierRoute, RouteStatistics, Stop, StopKind};
pub use tour::Tour;
