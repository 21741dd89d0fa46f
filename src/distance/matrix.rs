//! Dense distance matrix.

use crate::models::Coordinate;

/// A dense n×n distance matrix stored in row-major order.
///
/// Built from coordinates with the haversine distance, so it is square,
/// symmetric, and zero on the diagonal. Values are kilometres.
///
/// # Examples
///
/// ```
/// use courier_routing::models::Coordinate;
/// use courier_routing::distance::DistanceMatrix;
///
/// let points = vec![
///     Coordinate::new(17.50, 78.50),
///     Coordinate::new(17.51, 78.52),
///     Coordinate::new(17.49, 78.48),
/// ];
/// let dm = DistanceMatrix::from_coordinates(&points);
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(1, 1), 0.0);
/// assert_eq!(dm.get(0, 2), dm.get(2, 0));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes great-circle distances between every pair of coordinates.
    pub fn from_coordinates(points: &[Coordinate]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance_to(&points[j]);
                dm.data[i * n + j] = d;
                dm.data[j * n + i] = d;
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the nearest of `candidates` to `from`.
    ///
    /// Ties go to the candidate listed first. Returns `None` if `candidates`
    /// is empty.
    pub fn nearest_neighbor(
        &self,
        from: usize,
        candidates: impl IntoIterator<Item = usize>,
    ) -> Option<usize> {
        candidates
            .into_iter()
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 3.0),
        ]
    }

    #[test]
    fn test_from_coordinates() {
        let dm = DistanceMatrix::from_coordinates(&sample_points());
        assert_eq!(dm.size(), 3);
        assert_eq!(dm.get(0, 0), 0.0);
        assert!(dm.get(0, 2) > dm.get(0, 1));
        assert!((dm.get(0, 1) - 111.195).abs() < 1e-3);
    }

    #[test]
    fn test_symmetric() {
        let dm = DistanceMatrix::from_coordinates(&sample_points());
        assert!(dm.is_symmetric(0.0));
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 5.0);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_nearest_neighbor() {
        let dm = DistanceMatrix::from_coordinates(&sample_points());
        assert_eq!(dm.nearest_neighbor(0, [1, 2]), Some(1));
        assert_eq!(dm.nearest_neighbor(0, [2]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, []), None);
    }

    #[test]
    fn test_nearest_neighbor_tie_goes_to_first() {
        let dm = DistanceMatrix::from_data(3, vec![0.0, 2.0, 2.0, 2.0, 0.0, 1.0, 2.0, 1.0, 0.0])
            .expect("valid");
        assert_eq!(dm.nearest_neighbor(0, [1, 2]), Some(1));
        assert_eq!(dm.nearest_neighbor(0, [2, 1]), Some(2));
    }

    #[test]
    fn test_asymmetric_matrix() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 10.0, 15.0, 0.0]).expect("valid");
        assert!(!dm.is_symmetric(1e-10));
    }
}
