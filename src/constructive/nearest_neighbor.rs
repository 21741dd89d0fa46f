//! Nearest-neighbor tour construction.
//!
//! Builds a tour greedily: starting from a given location, always move to
//! the nearest unvisited one. Ties go to the lowest index, so the result is
//! fully determined by the matrix.
//!
//! # Complexity
//!
//! O(n²) where n = matrix size. Courier clusters are small, so this is the
//! construction step used for every route.

use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Builds an open tour over every location of `distances`, starting at `start`.
///
/// Returns an empty tour for an empty matrix. An out-of-range `start` is
/// clamped to 0.
///
/// # Examples
///
/// ```
/// use courier_routing::models::Coordinate;
/// use courier_routing::distance::DistanceMatrix;
/// use courier_routing::constructive::nearest_neighbor_tour;
///
/// let points = vec![
///     Coordinate::new(0.0, 0.0),
///     Coordinate::new(0.0, 3.0),
///     Coordinate::new(0.0, 1.0),
///     Coordinate::new(0.0, 2.0),
/// ];
/// let dm = DistanceMatrix::from_coordinates(&points);
/// let tour = nearest_neighbor_tour(&dm, 0);
/// assert_eq!(tour.order(), &[0, 2, 3, 1]);
/// ```
pub fn nearest_neighbor_tour(distances: &DistanceMatrix, start: usize) -> Tour {
    let n = distances.size();
    if n == 0 {
        return Tour::default();
    }
    let start = if start < n { start } else { 0 };

    let mut visited = vec![false; n];
    visited[start] = true;
    let mut order = Vec::with_capacity(n);
    order.push(start);
    let mut current = start;

    while order.len() < n {
        let unvisited = (0..n).filter(|&i| !visited[i]);
        match distances.nearest_neighbor(current, unvisited) {
            Some(next) => {
                visited[next] = true;
                order.push(next);
                current = next;
            }
            None => break,
        }
    }

    Tour::new(order)
}
