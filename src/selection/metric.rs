//! Normalized information distance between order parameters.
//!
//! The distance is `1 - I(X;Y) / H(X,Y)`, estimated from equal-width
//! histograms, and is memoized per pair of names for the lifetime of a run.

use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

use crate::error::MetricError;

use super::config::CacheKeyPolicy;
use super::histogram::{bin_indices, joint_pmf, marginal_pmf, DEFAULT_BINS};
use super::order_parameter::OrderParameter;

/// Cache key built from a pair of order parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PairKey(String, String);

/// Memo of previously computed distances.
///
/// Entries are never invalidated; the cache only grows while a run is alive.
#[derive(Debug, Clone)]
pub struct DistanceCache {
    policy: CacheKeyPolicy,
    entries: HashMap<PairKey, f64>,
    hits: u64,
    misses: u64,
}

/// Counters describing how a distance cache was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl DistanceCache {
    /// Creates an empty cache using the given key policy.
    pub fn new(policy: CacheKeyPolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the key policy.
    pub fn policy(&self) -> CacheKeyPolicy {
        self.policy
    }

    /// Returns the stored distance for a pair without touching the counters.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.entries.get(&self.key(a, b)).copied()
    }

    /// Looks up a pair and records the hit or miss.
    fn lookup(&mut self, a: &str, b: &str) -> Option<f64> {
        let found = self.get(a, b);
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Stores a distance for a pair.
    pub fn insert(&mut self, a: &str, b: &str, distance: f64) {
        let key = self.key(a, b);
        self.entries.insert(key, distance);
    }

    /// Returns the number of stored pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns usage counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    fn key(&self, a: &str, b: &str) -> PairKey {
        match self.policy {
            CacheKeyPolicy::Canonical if b < a => PairKey(b.to_string(), a.to_string()),
            _ => PairKey(a.to_string(), b.to_string()),
        }
    }
}

impl Default for DistanceCache {
    fn default() -> Self {
        Self::new(CacheKeyPolicy::default())
    }
}

/// Memoizing information-distance metric.
///
/// # Example
///
/// ```
/// use opselect::selection::{InformationDistance, OrderParameter};
///
/// let mut metric = InformationDistance::default();
/// let ramp: Vec<f64> = (1..=1000).map(f64::from).collect();
/// let a = OrderParameter::new("a", ramp.clone());
/// let b = OrderParameter::new("b", ramp);
///
/// let d = metric.distance(&a, &b).unwrap();
/// assert!(d < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct InformationDistance {
    bins: usize,
    cache: DistanceCache,
}

impl Default for InformationDistance {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            cache: DistanceCache::default(),
        }
    }
}

impl InformationDistance {
    /// Creates a metric with the given number of histogram bins per axis.
    pub fn new(bins: usize, policy: CacheKeyPolicy) -> Result<Self, MetricError> {
        if bins == 0 {
            return Err(MetricError::InvalidBins(bins));
        }
        Ok(Self {
            bins,
            cache: DistanceCache::new(policy),
        })
    }

    /// Returns the number of histogram bins per axis.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Returns the distance cache.
    pub fn cache(&self) -> &DistanceCache {
        &self.cache
    }

    /// Returns the information distance between two order parameters.
    ///
    /// The result lies in `[0, 1]`; 0 means the two series carry the same
    /// information at this bin resolution. Fails if the trajectories are
    /// empty, contain non-finite samples, or differ in length.
    pub fn distance(&mut self, a: &OrderParameter, b: &OrderParameter) -> Result<f64, MetricError> {
        if let Some(cached) = self.cache.lookup(a.name(), b.name()) {
            return Ok(cached);
        }

        // Canonical keys also fix the argument order of the computation, so the
        // stored value does not depend on which order was asked for first.
        let (a, b) = match self.cache.policy() {
            CacheKeyPolicy::Canonical if b.name() < a.name() => (b, a),
            _ => (a, b),
        };

        validate(a)?;
        validate(b)?;
        if a.len() != b.len() {
            return Err(MetricError::LengthMismatch {
                left: a.name().to_string(),
                right: b.name().to_string(),
                left_len: a.len(),
                right_len: b.len(),
            });
        }

        let distance = information_distance(a.trajectory(), b.trajectory(), self.bins);
        trace!(left = a.name(), right = b.name(), distance, "computed information distance");
        self.cache.insert(a.name(), b.name(), distance);
        Ok(distance)
    }
}

/// Computes `1 - I/H` for two equal-length, finite, non-empty series.
///
/// Sums run over the nonzero joint bins in row-major order. A joint entropy
/// of zero (all mass in a single joint bin) yields 0.
pub fn information_distance(x: &[f64], y: &[f64], bins: usize) -> f64 {
    let xi = bin_indices(x, bins);
    let yi = bin_indices(y, bins);

    let p_x = marginal_pmf(&xi, bins);
    let p_y = marginal_pmf(&yi, bins);
    let p_xy = joint_pmf(&xi, &yi, bins);

    let mut entropy = 0.0;
    let mut info = 0.0;
    for ((i, j), &p) in p_xy.indexed_iter() {
        if p != 0.0 {
            entropy -= p * p.ln();
            info += p * (p / (p_x[i] * p_y[j])).ln();
        }
    }

    if entropy <= 0.0 {
        return 0.0;
    }

    (1.0 - info / entropy).max(0.0)
}

fn validate(op: &OrderParameter) -> Result<(), MetricError> {
    if op.is_empty() {
        return Err(MetricError::EmptyTrajectory(op.name().to_string()));
    }
    if let Some(index) = op.trajectory().iter().position(|v| !v.is_finite()) {
        return Err(MetricError::NonFiniteSample {
            name: op.name().to_string(),
            index,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(name: &str, n: usize) -> OrderParameter {
        OrderParameter::new(name, (1..=n).map(|i| i as f64).collect::<Vec<_>>())
    }

    fn wave(name: &str, n: usize, freq: f64) -> OrderParameter {
        OrderParameter::new(
            name,
            (0..n).map(|i| (i as f64 * freq).sin()).collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_identical_trajectories_are_near_zero() {
        let mut metric = InformationDistance::default();
        let d = metric.distance(&ramp("a", 1000), &ramp("b", 1000)).unwrap();
        assert!(d >= 0.0);
        assert!(d < 1e-9, "expected ~0, got {}", d);
    }

    #[test]
    fn test_self_distance_is_near_zero() {
        let mut metric = InformationDistance::default();
        let op = wave("w", 2000, 0.13);
        let d = metric.distance(&op, &op).unwrap();
        assert!(d < 1e-9);
    }

    #[test]
    fn test_affine_transform_is_near_zero() {
        let mut metric = InformationDistance::default();
        let a = wave("a", 1500, 0.07);
        let b = OrderParameter::new(
            "b",
            a.trajectory().iter().map(|v| 3.0 * v - 12.0).collect::<Vec<_>>(),
        );
        let d = metric.distance(&a, &b).unwrap();
        assert!(d < 0.01, "expected ~0, got {}", d);
    }

    #[test]
    fn test_range_wider_than_f64_keeps_information() {
        let mut metric = InformationDistance::new(4, CacheKeyPolicy::Canonical).unwrap();
        let top = 2f64.powi(1023);
        let wide = OrderParameter::new("wide", vec![-top, 0.0, top / 2.0, top]);
        let scaled = OrderParameter::new(
            "scaled",
            wide.trajectory().iter().map(|v| v / 4.0).collect::<Vec<_>>(),
        );

        let d = metric.distance(&wide, &scaled).unwrap();
        assert!(d < 1e-9, "expected ~0, got {}", d);
    }

    #[test]
    fn test_unrelated_trajectories_are_far() {
        let mut metric = InformationDistance::new(20, CacheKeyPolicy::Canonical).unwrap();
        let a = wave("a", 5000, 0.011);
        let b = OrderParameter::new(
            "b",
            (0..5000).map(|i| ((i * 7919) % 4999) as f64).collect::<Vec<_>>(),
        );
        let d = metric.distance(&a, &b).unwrap();
        assert!(d > 0.5, "expected a large distance, got {}", d);
        assert!(d <= 1.0);
    }

    #[test]
    fn test_distance_in_unit_interval() {
        let mut metric = InformationDistance::default();
        let ops = [
            wave("a", 800, 0.05),
            wave("b", 800, 0.11),
            ramp("c", 800),
            wave("d", 800, 1.7),
        ];
        for x in &ops {
            for y in &ops {
                let d = metric.distance(x, y).unwrap();
                assert!((0.0..=1.0).contains(&d), "{} vs {}: {}", x, y, d);
            }
        }
    }

    #[test]
    fn test_length_mismatch() {
        let mut metric = InformationDistance::default();
        let err = metric.distance(&ramp("a", 10), &ramp("b", 11)).unwrap_err();
        assert!(matches!(
            err,
            MetricError::LengthMismatch {
                left_len: 10,
                right_len: 11,
                ..
            }
        ));
        assert!(metric.cache().is_empty());
    }

    #[test]
    fn test_empty_trajectory_rejected() {
        let mut metric = InformationDistance::default();
        let empty = OrderParameter::new("empty", Vec::<f64>::new());
        let err = metric.distance(&empty, &ramp("a", 3)).unwrap_err();
        assert_eq!(err, MetricError::EmptyTrajectory("empty".to_string()));
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let mut metric = InformationDistance::default();
        let bad = OrderParameter::new("bad", vec![1.0, f64::NAN, 3.0]);
        let err = metric.distance(&ramp("a", 3), &bad).unwrap_err();
        assert_eq!(
            err,
            MetricError::NonFiniteSample {
                name: "bad".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn test_zero_bins_rejected() {
        let err = InformationDistance::new(0, CacheKeyPolicy::Canonical).unwrap_err();
        assert_eq!(err, MetricError::InvalidBins(0));
    }

    #[test]
    fn test_zero_joint_entropy_is_zero_distance() {
        let mut metric = InformationDistance::default();
        let a = OrderParameter::new("a", vec![2.0; 50]);
        let b = OrderParameter::new("b", vec![-1.0; 50]);
        assert_eq!(metric.distance(&a, &b).unwrap(), 0.0);

        let single = OrderParameter::new("s", vec![4.2]);
        assert_eq!(metric.distance(&single, &single).unwrap(), 0.0);
    }

    #[test]
    fn test_repeated_call_hits_cache() {
        let mut metric = InformationDistance::default();
        let a = wave("a", 600, 0.2);
        let b = wave("b", 600, 0.9);

        let first = metric.distance(&a, &b).unwrap();
        let second = metric.distance(&a, &b).unwrap();

        assert_eq!(first, second);
        let stats = metric.cache().stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_cached_value_is_returned_without_recompute() {
        let mut metric = InformationDistance::default();
        let a = wave("a", 100, 0.2);
        let b = wave("b", 100, 0.9);
        metric.distance(&a, &b).unwrap();

        // Same names, different samples: identity is the name, so the memo wins.
        let a2 = ramp("a", 100);
        let cached = metric.cache().get("a", "b").unwrap();
        assert_eq!(metric.distance(&a2, &b).unwrap(), cached);
    }

    #[test]
    fn test_canonical_keys_are_symmetric() {
        let mut metric = InformationDistance::new(40, CacheKeyPolicy::Canonical).unwrap();
        let a = wave("a", 900, 0.3);
        let b = wave("b", 900, 0.05);

        let ab = metric.distance(&a, &b).unwrap();
        let ba = metric.distance(&b, &a).unwrap();

        assert_eq!(ab, ba);
        assert_eq!(metric.cache().len(), 1);
    }

    #[test]
    fn test_ordered_keys_store_each_direction() {
        let mut metric = InformationDistance::new(40, CacheKeyPolicy::Ordered).unwrap();
        let a = wave("a", 900, 0.3);
        let b = wave("b", 900, 0.05);

        let ab = metric.distance(&a, &b).unwrap();
        let ba = metric.distance(&b, &a).unwrap();

        assert_eq!(metric.cache().len(), 2);
        assert!((ab - ba).abs() < 1e-9);
        assert!(metric.cache().get("a", "b").is_some());
        assert!(metric.cache().get("b", "a").is_some());
    }
}
