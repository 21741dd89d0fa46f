//! Geographic partitioning of deliveries across couriers.
//!
//! - [`cluster_deliveries`] — split deliveries into exactly `k` groups
//! - [`cluster_refs`] — the same over borrowed deliveries
//! - [`kmeans`] — seeded k-means over raw (lat, lon)

mod kmeans;

pub use kmeans::{kmeans, KMeansConfig, KMeansResult, DEFAULT_SEED};

use crate::error::{Error, Result};
use crate::models::{Coordinate, Delivery};

/// Partitions deliveries into exactly `num_groups` groups, one per courier.
///
/// Groups are disjoint and together contain every input delivery, each
/// keeping input order. With no more deliveries than groups, delivery `i`
/// goes alone into group `i` and the remaining groups stay empty. Otherwise
/// groups come from [`kmeans`], and may be empty when points coincide.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `num_groups` is zero.
///
/// # Examples
///
/// ```
/// use courier_routing::clustering::{cluster_deliveries, KMeansConfig};
/// use courier_routing::models::{AddressType, Coordinate, Delivery};
///
/// let deliveries = vec![
///     Delivery::new("A", Coordinate::new(17.50, 78.50), AddressType::Residential),
///     Delivery::new("B", Coordinate::new(17.51, 78.52), AddressType::Residential),
/// ];
/// let groups = cluster_deliveries(&deliveries, 3, &KMeansConfig::default()).unwrap();
/// assert_eq!(groups.len(), 3);
/// assert!(groups[2].is_empty());
/// ```
pub fn cluster_deliveries<'a>(
    deliveries: &'a [Delivery],
    num_groups: usize,
    config: &KMeansConfig,
) -> Result<Vec<Vec<&'a Delivery>>> {
    let refs: Vec<&Delivery> = deliveries.iter().collect();
    cluster_refs(&refs, num_groups, config)
}

/// [`cluster_deliveries`] over borrowed deliveries, e.g. one time slot's
/// share of a larger input.
pub fn cluster_refs<'a>(
    deliveries: &[&'a Delivery],
    num_groups: usize,
    config: &KMeansConfig,
) -> Result<Vec<Vec<&'a Delivery>>> {
    if num_groups == 0 {
        return Err(Error::invalid_argument("number of groups must be positive"));
    }

    let mut groups: Vec<Vec<&Delivery>> = vec![Vec::new(); num_groups];

    if deliveries.len() <= num_groups {
        for (group, &d) in groups.iter_mut().zip(deliveries) {
            group.push(d);
        }
        return Ok(groups);
    }

    let points: Vec<Coordinate> = deliveries.iter().map(|d| d.location()).collect();
    let result = kmeans(&points, num_groups, config);
    for (&d, &label) in deliveries.iter().zip(&result.labels) {
        groups[label].push(d);
    }

    log::debug!(
        "clustered {} deliveries into {} groups (inertia {:.6})",
        deliveries.len(),
        num_groups,
        result.inertia
    );

    Ok(groups)
}
