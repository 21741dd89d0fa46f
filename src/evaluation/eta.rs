//! Arrival-time propagation along a route.

use chrono::{NaiveTime, TimeDelta};

use crate::error::{Error, Result};
use crate::models::CourierRoute;

/// Travel into a stop, then service at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaLeg {
    pub travel_minutes: f64,
    pub service_minutes: f64,
}

/// Arrival estimate for one stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopEta {
    /// Wall-clock arrival; wraps past midnight.
    pub arrival: NaiveTime,
    /// Minutes since the route start. Never decreases along a route.
    pub offset_minutes: f64,
}

/// Arrival estimates for a whole route.
#[derive(Debug, Clone, PartialEq)]
pub struct EtaSchedule {
    pub start: NaiveTime,
    pub stops: Vec<StopEta>,
    /// When service at the last stop finishes.
    pub end: NaiveTime,
    pub end_offset_minutes: f64,
}

/// Walks the legs in order: the clock advances by the travel time to reach
/// a stop (its ETA), then by that stop's service time.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for negative or non-finite minutes.
///
/// # Examples
///
/// ```
/// use courier_routing::evaluation::{format_clock, parse_clock, propagate_etas, EtaLeg};
///
/// let start = parse_clock("10:00").unwrap();
/// let schedule = propagate_etas(start, &[EtaLeg { travel_minutes: 15.0, service_minutes: 5.0 }]).unwrap();
/// assert_eq!(format_clock(schedule.stops[0].arrival), "10:15");
/// assert_eq!(format_clock(schedule.end), "10:20");
/// ```
pub fn propagate_etas(start: NaiveTime, legs: &[EtaLeg]) -> Result<EtaSchedule> {
    let mut elapsed = 0.0;
    let mut stops = Vec::with_capacity(legs.len());

    for (k, leg) in legs.iter().enumerate() {
        check_minutes(k, "travel", leg.travel_minutes)?;
        check_minutes(k, "service", leg.service_minutes)?;

        elapsed += leg.travel_minutes;
        stops.push(StopEta {
            arrival: add_minutes(start, elapsed),
            offset_minutes: elapsed,
        });
        elapsed += leg.service_minutes;
    }

    Ok(EtaSchedule {
        start,
        stops,
        end: add_minutes(start, elapsed),
        end_offset_minutes: elapsed,
    })
}

/// ETAs for an optimized courier route, using its leg travel times and
/// per-stop service times. The depot contributes travel but no service.
pub fn schedule_route(route: &CourierRoute<'_>, start: NaiveTime) -> Result<EtaSchedule> {
    let legs: Vec<EtaLeg> = route
        .stops()
        .iter()
        .map(|s| EtaLeg {
            travel_minutes: s.travel_time_minutes,
            service_minutes: s.service_minutes(),
        })
        .collect();
    propagate_etas(start, &legs)
}

/// Parses a wall-clock time in `HH:MM` form.
pub fn parse_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| Error::invalid_argument(format!("start_time {s:?} is not HH:MM: {e}")))
}

/// Formats a wall-clock time as `HH:MM`.
pub fn format_clock(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

fn check_minutes(stop: usize, what: &str, minutes: f64) -> Result<()> {
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(Error::invalid_argument(format!(
            "stop {stop}: {what} minutes must be a non-negative number, got {minutes}"
        )));
    }
    Ok(())
}

fn add_minutes(t: NaiveTime, minutes: f64) -> NaiveTime {
    let (wrapped, _) = t.overflowing_add_signed(TimeDelta::milliseconds((minutes * 60_000.0).round() as i64));
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(travel: f64, service: f64) -> EtaLeg {
        EtaLeg {
            travel_minutes: travel,
            service_minutes: service,
        }
    }

    #[test]
    fn test_single_stop() {
        let start = parse_clock("10:00").expect("valid");
        let s = propagate_etas(start, &[leg(15.0, 5.0)]).expect("valid");
        assert_eq!(format_clock(s.stops[0].arrival), "10:15");
        assert_eq!(format_clock(s.end), "10:20");
        assert_eq!(s.end_offset_minutes, 20.0);
    }

    #[test]
    fn test_service_delays_next_arrival() {
        let start = parse_clock("09:30").expect("valid");
        let s = propagate_etas(start, &[leg(10.0, 7.0), leg(10.0, 10.0), leg(0.0, 5.0)]).expect("valid");
        let etas: Vec<String> = s.stops.iter().map(|e| format_clock(e.arrival)).collect();
        assert_eq!(etas, vec!["09:40", "09:57", "10:17"]);
        assert_eq!(format_clock(s.end), "10:22");
    }

    #[test]
    fn test_wraps_past_midnight() {
        let start = parse_clock("23:50").expect("valid");
        let s = propagate_etas(start, &[leg(20.0, 5.0)]).expect("valid");
        assert_eq!(format_clock(s.stops[0].arrival), "00:10");
        assert_eq!(s.stops[0].offset_minutes, 20.0);
    }

    #[test]
    fn test_empty_route() {
        let start = parse_clock("10:00").expect("valid");
        let s = propagate_etas(start, &[]).expect("valid");
        assert!(s.stops.is_empty());
        assert_eq!(s.end, start);
    }

    #[test]
    fn test_rejects_negative_minutes() {
        let start = parse_clock("10:00").expect("valid");
        assert!(propagate_etas(start, &[leg(-1.0, 5.0)]).is_err());
        assert!(propagate_etas(start, &[leg(1.0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_parse_clock() {
        assert!(parse_clock("25:00").is_err());
        assert!(parse_clock("ten").is_err());
        assert!(parse_clock("").is_err());
        assert_eq!(format_clock(parse_clock("07:05").expect("valid")), "07:05");
    }
}
