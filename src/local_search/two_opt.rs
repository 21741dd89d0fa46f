//! Intra-tour 2-opt improvement with fixed endpoints.
//!
//! # Algorithm
//!
//! For positions `1 <= i < j <= n-2`, reversing `tour[i..=j]` replaces edges
//! `(t[i-1], t[i])` and `(t[j], t[j+1])` with `(t[i-1], t[j])` and
//! `(t[i], t[j+1])`:
//!
//! ```text
//! delta = d(t[i-1], t[j]) + d(t[i], t[j+1]) - d(t[i-1], t[i]) - d(t[j], t[j+1])
//! ```
//!
//! The first move with `delta < 0` is applied and the scan restarts. The
//! first and last positions never move, so a depot start (or a depot at both
//! ends of a closed tour) stays in place. The search stops after a scan with
//! no improving move, or after `max_iterations` scans.
//!
//! The delta formula assumes a symmetric matrix, which haversine matrices are.
//!
//! # Complexity
//!
//! O(n²) per scan; the scan cap bounds the total.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use std::convert::Infallible;

use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Scan cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Result of a 2-opt run.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoOptOutcome {
    /// The improved tour; never longer than the input.
    pub tour: Tour,
    /// Number of scans performed.
    pub passes: usize,
    /// `true` if the last scan found no improving move.
    pub converged: bool,
}

/// Improves a tour with 2-opt, keeping its first and last positions fixed.
///
/// # Examples
///
/// ```
/// use courier_routing::models::{Coordinate, Tour};
/// use courier_routing::distance::DistanceMatrix;
/// use courier_routing::local_search::two_opt_improve;
///
/// let points = vec![
///     Coordinate::new(0.0, 0.0),
///     Coordinate::new(0.0, 1.0),
///     Coordinate::new(0.0, 2.0),
///     Coordinate::new(0.0, 3.0),
/// ];
/// let dm = DistanceMatrix::from_coordinates(&points);
///
/// let crossed = Tour::new(vec![0, 2, 1, 3]);
/// let outcome = two_opt_improve(crossed.clone(), &dm, 100);
/// assert_eq!(outcome.tour.order(), &[0, 1, 2, 3]);
/// assert!(outcome.tour.distance(&dm) < crossed.distance(&dm));
/// assert!(outcome.converged);
/// ```
pub fn two_opt_improve(tour: Tour, distances: &DistanceMatrix, max_iterations: usize) -> TwoOptOutcome {
    match two_opt_improve_with(tour, distances, max_iterations, || Ok::<(), Infallible>(())) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    }
}

/// Like [`two_opt_improve`], but calls `check` before every scan and aborts
/// with its error. Used to enforce a wall-clock deadline.
pub fn two_opt_improve_with<E>(
    mut tour: Tour,
    distances: &DistanceMatrix,
    max_iterations: usize,
    mut check: impl FnMut() -> Result<(), E>,
) -> Result<TwoOptOutcome, E> {
    let n = tour.len();
    if n < 4 {
        return Ok(TwoOptOutcome {
            tour,
            passes: 0,
            converged: true,
        });
    }

    let mut passes = 0;
    let mut converged = false;

    while passes < max_iterations {
        check()?;
        passes += 1;
        match find_improving_move(tour.order(), distances) {
            Some((i, j)) => tour.order_mut()[i..=j].reverse(),
            None => {
                converged = true;
                break;
            }
        }
    }

    if !converged {
        log::warn!(
            "2-opt stopped at its cap of {max_iterations} scans before converging ({n} positions)"
        );
    }

    Ok(TwoOptOutcome {
        tour,
        passes,
        converged,
    })
}

/// First `(i, j)` whose reversal strictly shortens the tour.
fn find_improving_move(order: &[usize], distances: &DistanceMatrix) -> Option<(usize, usize)> {
    let n = order.len();
    for i in 1..n - 2 {
        for j in i + 1..n - 1 {
            if two_opt_delta(order, distances, i, j) < -IMPROVEMENT_EPS {
                return Some((i, j));
            }
        }
    }
    None
}

/// Distance change from reversing `order[i..=j]`.
fn two_opt_delta(order: &[usize], distances: &DistanceMatrix, i: usize, j: usize) -> f64 {
    let (a, b) = (order[i - 1], order[i]);
    let (c, d) = (order[j], order[j + 1]);
    distances.get(a, c) + distances.get(b, d) - distances.get(a, b) - distances.get(c, d)
}
