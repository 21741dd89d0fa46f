//! Tour: a visiting order over distance-matrix indices.

use crate::distance::DistanceMatrix;

/// An ordered sequence of location indices into a [`DistanceMatrix`].
///
/// Every index appears exactly once, except that a closed tour repeats its
/// start index at the end to model the return leg.
///
/// # Examples
///
/// ```
/// use courier_routing::models::Tour;
/// use courier_routing::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_data(3, vec![
///     0.0, 1.0, 2.0,
///     1.0, 0.0, 1.5,
///     2.0, 1.5, 0.0,
/// ]).unwrap();
/// let tour = Tour::new(vec![0, 1, 2]);
/// assert!((tour.distance(&dm) - 2.5).abs() < 1e-10);
/// assert!(tour.is_complete(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    pub fn new(order: Vec<usize>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub(crate) fn order_mut(&mut self) -> &mut [usize] {
        &mut self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if the tour ends where it started.
    pub fn is_closed(&self) -> bool {
        self.order.len() > 1 && self.order.first() == self.order.last()
    }

    /// Appends the start index so the tour returns to its origin.
    pub fn close(&mut self) {
        if let Some(&start) = self.order.first() {
            if !self.is_closed() {
                self.order.push(start);
            }
        }
    }

    /// Sum of consecutive edge lengths.
    pub fn distance(&self, distances: &DistanceMatrix) -> f64 {
        self.order
            .windows(2)
            .map(|w| distances.get(w[0], w[1]))
            .sum()
    }

    /// Returns `true` if the tour visits each of `0..size` exactly once
    /// (ignoring the repeated start of a closed tour).
    pub fn is_complete(&self, size: usize) -> bool {
        let visits = if self.is_closed() {
            &self.order[..self.order.len() - 1]
        } else {
            &self.order[..]
        };
        if visits.len() != size {
            return false;
        }
        let mut seen = vec![false; size];
        for &i in visits {
            if i >= size || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tour() {
        let t = Tour::default();
        assert!(t.is_empty());
        assert!(!t.is_closed());
        assert!(t.is_complete(0));
        assert_eq!(t.distance(&DistanceMatrix::new(0)), 0.0);
    }

    #[test]
    fn test_close() {
        let mut t = Tour::new(vec![0, 2, 1]);
        t.close();
        assert_eq!(t.order(), &[0, 2, 1, 0]);
        assert!(t.is_closed());
        t.close();
        assert_eq!(t.len(), 4);
        assert!(t.is_complete(3));
    }

    #[test]
    fn test_incomplete() {
        assert!(!Tour::new(vec![0, 1, 1]).is_complete(3));
        assert!(!Tour::new(vec![0, 1]).is_complete(3));
        assert!(!Tour::new(vec![0, 1, 3]).is_complete(3));
    }
}
