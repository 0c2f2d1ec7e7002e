//! Selector configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::histogram::DEFAULT_BINS;

/// Default dissimilarity matrix capacity (and output cap).
pub const DEFAULT_CAPACITY: usize = 30;

/// Default number of jump-method dimensions.
pub const DEFAULT_DIMENSIONS: usize = 10;

/// Default clustering iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default number of cap-doubling retries after a clustering run fails to converge.
pub const DEFAULT_CONVERGENCE_RETRIES: usize = 1;

/// How distance cache keys are built from a pair of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyPolicy {
    /// Unordered pair: `(a, b)` and `(b, a)` share one entry.
    #[default]
    Canonical,

    /// Call order: `(a, b)` and `(b, a)` are cached separately.
    Ordered,
}

/// Configuration for an order parameter selection run.
///
/// Missing fields in a YAML file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Dissimilarity matrix capacity K; also the largest cluster count tried.
    pub capacity: usize,

    /// Histogram bins per axis for the information distance.
    pub bins: usize,

    /// Jump-method dimensions are 1..=dimensions.
    pub dimensions: usize,

    /// Iteration cap for a single clustering run.
    pub max_iterations: usize,

    /// Times a non-converged clustering run is retried with a doubled cap.
    pub convergence_retries: usize,

    /// Distance cache key policy.
    pub cache_keys: CacheKeyPolicy,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            bins: DEFAULT_BINS,
            dimensions: DEFAULT_DIMENSIONS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_retries: DEFAULT_CONVERGENCE_RETRIES,
            cache_keys: CacheKeyPolicy::default(),
        }
    }
}

impl SelectorConfig {
    /// Creates a configuration with the given capacity and default settings.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Loads a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the matrix capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the number of histogram bins.
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Sets the number of jump-method dimensions.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets the clustering iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the number of convergence retries.
    pub fn with_convergence_retries(mut self, retries: usize) -> Self {
        self.convergence_retries = retries;
        self
    }

    /// Sets the cache key policy.
    pub fn with_cache_keys(mut self, policy: CacheKeyPolicy) -> Self {
        self.cache_keys = policy;
        self
    }

    /// Checks that every size-like setting is at least 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("capacity", self.capacity),
            ("bins", self.bins),
            ("dimensions", self.dimensions),
            ("max_iterations", self.max_iterations),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", field)));
            }
        }
        Ok(())
    }
}
