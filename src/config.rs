//! Optimizer configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clustering::{KMeansConfig, DEFAULT_SEED};
use crate::error::{Error, Result};
use crate::evaluation::DEFAULT_SPEED_KMH;
use crate::local_search::DEFAULT_MAX_ITERATIONS;

/// Advisory cap on deliveries handed to one courier.
pub const MAX_DELIVERIES_PER_COURIER: usize = 25;

/// Tunables for [`RouteOptimizer`](crate::optimizer::RouteOptimizer).
///
/// Every field has a default, so a JSON config only needs the keys it
/// changes.
///
/// # Examples
///
/// ```
/// use courier_routing::config::OptimizerConfig;
///
/// let config = OptimizerConfig::from_json_str(r#"{ "seed": 7, "return_to_depot": true }"#).unwrap();
/// assert_eq!(config.seed, 7);
/// assert!(config.return_to_depot);
/// assert_eq!(config.max_two_opt_iterations, 100);
///
/// let config = OptimizerConfig::default().with_speed_kmh(20.0).with_parallel(false);
/// assert_eq!(config.speed_kmh, 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Seed for k-means initialization.
    pub seed: u64,
    /// Lloyd iterations per k-means restart.
    pub kmeans_max_iterations: usize,
    /// k-means restarts; the lowest-inertia one is kept.
    pub kmeans_restarts: usize,
    /// Cap on 2-opt scans per route.
    pub max_two_opt_iterations: usize,
    /// Average courier speed.
    pub speed_kmh: f64,
    /// Clusters above this size are logged, not split.
    pub max_deliveries_per_courier: usize,
    /// Close every route back at the depot.
    pub return_to_depot: bool,
    /// Use the first delivery as depot when the caller gives none.
    pub implicit_depot: bool,
    /// Route clusters on a worker pool.
    pub parallel: bool,
    /// Wall-clock limit for one optimize call.
    pub time_limit_ms: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            kmeans_max_iterations: 300,
            kmeans_restarts: 10,
            max_two_opt_iterations: DEFAULT_MAX_ITERATIONS,
            speed_kmh: DEFAULT_SPEED_KMH,
            max_deliveries_per_courier: MAX_DELIVERIES_PER_COURIER,
            return_to_depot: false,
            implicit_depot: true,
            parallel: true,
            time_limit_ms: None,
        }
    }
}

impl OptimizerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_argument(format!("cannot read config {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.speed_kmh.is_finite() || self.speed_kmh <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "speed_kmh must be positive, got {}",
                self.speed_kmh
            )));
        }
        if self.kmeans_restarts == 0 || self.kmeans_max_iterations == 0 {
            return Err(Error::invalid_argument(
                "kmeans_restarts and kmeans_max_iterations must be positive",
            ));
        }
        if self.max_deliveries_per_courier == 0 {
            return Err(Error::invalid_argument("max_deliveries_per_courier must be positive"));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_two_opt_iterations(mut self, max: usize) -> Self {
        self.max_two_opt_iterations = max;
        self
    }

    pub fn with_speed_kmh(mut self, speed: f64) -> Self {
        self.speed_kmh = speed;
        self
    }

    pub fn with_return_to_depot(mut self, enabled: bool) -> Self {
        self.return_to_depot = enabled;
        self
    }

    pub fn with_implicit_depot(mut self, enabled: bool) -> Self {
        self.implicit_depot = enabled;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    /// Clustering parameters derived from this config.
    pub fn kmeans(&self) -> KMeansConfig {
        KMeansConfig {
            seed: self.seed,
            max_iterations: self.kmeans_max_iterations,
            restarts: self.kmeans_restarts,
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}
