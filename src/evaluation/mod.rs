//! Route statistics and arrival-time estimation.
//!
//! - [`RouteEvaluator`] — distance, travel time and service time of a tour
//! - [`propagate_etas`] — per-stop arrival times from a start time

mod eta;
mod evaluator;

pub use eta::{
    format_clock, parse_clock, propagate_etas, schedule_route, EtaLeg, EtaSchedule, StopEta,
};
pub use evaluator::{RouteEvaluator, DEFAULT_SPEED_KMH};
