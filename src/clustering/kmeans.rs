//! Seeded k-means over (latitude, longitude).
//!
//! # Algorithm
//!
//! Each restart seeds centroids with k-means++ (first centroid uniform, each
//! further one drawn with probability proportional to its squared distance
//! from the nearest chosen centroid), then runs Lloyd iterations until the
//! assignment stops changing or the iteration cap is hit. The restart with
//! the lowest inertia wins; earlier restarts win ties.
//!
//! All randomness comes from one `StdRng` seeded from
//! [`KMeansConfig::seed`], so identical inputs give identical labels.
//!
//! # Reference
//!
//! Arthur, D. & Vassilvitskii, S. (2007). "k-means++: The Advantages of
//! Careful Seeding", *SODA '07*, 1027-1035.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Coordinate;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Parameters for [`kmeans`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansConfig {
    /// RNG seed for centroid initialization.
    pub seed: u64,
    /// Lloyd iterations per restart.
    pub max_iterations: usize,
    /// Independent initializations; the best one is kept.
    pub restarts: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_iterations: 300,
            restarts: 10,
        }
    }
}

/// Labels produced by [`kmeans`].
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// Cluster index of each input point.
    pub labels: Vec<usize>,
    /// Final centroids, `k` of them.
    pub centroids: Vec<[f64; 2]>,
    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,
}

/// Partitions `points` into `k` groups minimizing within-group variance.
///
/// Requires `k >= 1`; when `k >= points.len()` every point gets its own
/// label. Some labels may end up unused when points coincide.
///
/// # Examples
///
/// ```
/// use courier_routing::clustering::{kmeans, KMeansConfig};
/// use courier_routing::models::Coordinate;
///
/// let points = vec![
///     Coordinate::new(0.0, 0.0),
///     Coordinate::new(0.0, 0.1),
///     Coordinate::new(10.0, 10.0),
///     Coordinate::new(10.0, 10.1),
/// ];
/// let result = kmeans(&points, 2, &KMeansConfig::default());
/// assert_eq!(result.labels[0], result.labels[1]);
/// assert_eq!(result.labels[2], result.labels[3]);
/// assert_ne!(result.labels[0], result.labels[2]);
/// ```
pub fn kmeans(points: &[Coordinate], k: usize, config: &KMeansConfig) -> KMeansResult {
    let data: Vec<[f64; 2]> = points.iter().map(|p| [p.latitude, p.longitude]).collect();
    let n = data.len();
    let k = k.max(1);

    if n <= k {
        let mut centroids = data.clone();
        centroids.resize(k, data.first().copied().unwrap_or([0.0, 0.0]));
        return KMeansResult {
            labels: (0..n).collect(),
            centroids,
            inertia: 0.0,
        };
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KMeansResult> = None;

    for _ in 0..config.restarts.max(1) {
        let centroids = plus_plus_init(&data, k, &mut rng);
        let candidate = lloyd(&data, centroids, config.max_iterations);
        match &best {
            Some(b) if b.inertia <= candidate.inertia => {}
            _ => best = Some(candidate),
        }
    }

    best.unwrap_or_else(|| lloyd(&data, data[..k].to_vec(), config.max_iterations))
}

fn sq_dist(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    d0 * d0 + d1 * d1
}

/// Index of the closest centroid; ties go to the lower index.
fn closest(point: &[f64; 2], centroids: &[[f64; 2]]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, centroid) in centroids.iter().enumerate() {
        let d = sq_dist(point, centroid);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}

fn plus_plus_init(data: &[[f64; 2]], k: usize, rng: &mut StdRng) -> Vec<[f64; 2]> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.random_range(0..n)]);

    let mut nearest: Vec<f64> = data.iter().map(|p| sq_dist(p, &centroids[0])).collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let next = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            let mut pick = n - 1;
            for (i, &w) in nearest.iter().enumerate() {
                acc += w;
                if acc > target && w > 0.0 {
                    pick = i;
                    break;
                }
            }
            pick
        } else {
            // Every point already coincides with a centroid.
            rng.random_range(0..n)
        };
        let chosen = data[next];
        centroids.push(chosen);
        for (d, p) in nearest.iter_mut().zip(data) {
            *d = d.min(sq_dist(p, &chosen));
        }
    }
    centroids
}

fn lloyd(data: &[[f64; 2]], mut centroids: Vec<[f64; 2]>, max_iterations: usize) -> KMeansResult {
    let k = centroids.len();
    let mut labels = vec![usize::MAX; data.len()];

    for _ in 0..max_iterations.max(1) {
        let mut changed = false;
        for (label, p) in labels.iter_mut().zip(data) {
            let (c, _) = closest(p, &centroids);
            if *label != c {
                *label = c;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0f64; 2]; k];
        let mut counts = vec![0usize; k];
        for (&label, p) in labels.iter().zip(data) {
            sums[label][0] += p[0];
            sums[label][1] += p[1];
            counts[label] += 1;
        }
        for c in 0..k {
            // An empty cluster keeps its previous centroid.
            if counts[c] > 0 {
                centroids[c] = [sums[c][0] / counts[c] as f64, sums[c][1] / counts[c] as f64];
            }
        }
    }

    // Labels must agree with the final centroids even if the cap was hit.
    let mut inertia = 0.0;
    for (label, p) in labels.iter_mut().zip(data) {
        let (c, d) = closest(p, &centroids);
        *label = c;
        inertia += d;
    }

    KMeansResult {
        labels,
        centroids,
        inertia,
    }
}
