//! End-to-end order parameter selection.
//!
//! Builds a diverse basis in a [`DissimilarityMatrix`], measures clustering
//! distortion for every basis size, picks a count with the jump method and
//! returns the medoids of a final clustering run.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ClusterError, SelectionError};

use super::clustering::{distortion, ClusterOutcome, MedoidClustering};
use super::config::SelectorConfig;
use super::jump::{choose_count, jump_estimates, DistortionPoint, JumpEstimate};
use super::matrix::DissimilarityMatrix;
use super::metric::{CacheStats, InformationDistance};
use super::order_parameter::OrderParameter;

/// Outcome of a selection run.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    /// Selected names, in the order produced by the final clustering run.
    pub selected: Vec<String>,

    /// Cluster count chosen by the jump method.
    pub chosen_count: usize,

    /// Number of candidates considered.
    pub candidate_count: usize,

    /// Dissimilarity matrix capacity.
    pub capacity: usize,

    /// Distortion per basis size, largest size first.
    pub distortion_curve: Vec<DistortionPoint>,

    /// Count suggested by each jump-method dimension.
    pub estimates: Vec<JumpEstimate>,

    /// Distance cache usage.
    pub cache: CacheStats,

    /// Selected order parameters, matching `selected`.
    #[serde(skip)]
    pub centers: Vec<OrderParameter>,
}

/// Selects a small, informative subset of order parameters.
///
/// # Example
///
/// ```
/// use opselect::selection::{OrderParameterSelector, OrderParameter, SelectorConfig};
///
/// let candidates: Vec<OrderParameter> = (0..4)
///     .map(|k| {
///         let samples: Vec<f64> = (0..500).map(|i| (i as f64 * 0.01 * (k + 1) as f64).sin()).collect();
///         OrderParameter::new(format!("op{}", k), samples)
///     })
///     .collect();
///
/// let selector = OrderParameterSelector::new(SelectorConfig::new(3)).unwrap();
/// let selected = selector.select(&candidates).unwrap();
/// assert!(!selected.is_empty() && selected.len() <= 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderParameterSelector {
    config: SelectorConfig,
}

impl OrderParameterSelector {
    /// Creates a selector, rejecting configurations with zero-sized settings.
    pub fn new(config: SelectorConfig) -> Result<Self, SelectionError> {
        config
            .validate()
            .map_err(|e| SelectionError::InvalidConfig(e.to_string()))?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Returns the selected order parameters.
    pub fn select(&self, candidates: &[OrderParameter]) -> Result<Vec<OrderParameter>, SelectionError> {
        Ok(self.select_with_report(candidates)?.centers)
    }

    /// Runs a selection and returns the full report.
    pub fn select_with_report(
        &self,
        candidates: &[OrderParameter],
    ) -> Result<SelectionReport, SelectionError> {
        check_candidates(candidates)?;

        let mut metric = InformationDistance::new(self.config.bins, self.config.cache_keys)?;
        let mut matrix = DissimilarityMatrix::new(self.config.capacity)?;

        // The reverse pass gives early candidates a second chance against the
        // members that displaced them.
        for candidate in candidates.iter().chain(candidates.iter().rev()) {
            matrix.add(candidate, &mut metric)?;
        }
        info!(
            candidates = candidates.len(),
            basis = matrix.len(),
            "built dissimilarity basis"
        );

        let curve = self.distortion_curve(&matrix, candidates, &mut metric)?;
        let estimates = jump_estimates(&curve, self.config.dimensions);
        // The basis is never empty here, so neither is the curve.
        let chosen_count = choose_count(&estimates).unwrap_or(matrix.len());
        info!(chosen_count, ?estimates, "jump method chose cluster count");

        matrix.reduce_to(chosen_count)?;
        let outcome = self.cluster(candidates, matrix.members(), &mut metric)?;
        let selected: Vec<String> = outcome
            .centers
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        info!(selected = selected.len(), iterations = outcome.iterations, "selection complete");

        Ok(SelectionReport {
            selected,
            chosen_count,
            candidate_count: candidates.len(),
            capacity: self.config.capacity,
            distortion_curve: curve,
            estimates,
            cache: metric.cache().stats(),
            centers: outcome.centers,
        })
    }

    /// Clusters from every basis size, shrinking a copy of the basis one member at a time.
    fn distortion_curve(
        &self,
        matrix: &DissimilarityMatrix,
        candidates: &[OrderParameter],
        metric: &mut InformationDistance,
    ) -> Result<Vec<DistortionPoint>, SelectionError> {
        let mut working = matrix.clone();
        let mut curve = Vec::with_capacity(working.len());

        while !working.is_empty() {
            let count = working.len();
            let outcome = self.cluster(candidates, working.members(), metric)?;
            let distortion = distortion(&outcome.centers, candidates, metric)?;
            debug!(count, distortion, iterations = outcome.iterations, "measured distortion");

            curve.push(DistortionPoint { count, distortion });
            working.reduce()?;
        }

        Ok(curve)
    }

    /// Runs medoid clustering, doubling the iteration cap on non-convergence.
    fn cluster(
        &self,
        candidates: &[OrderParameter],
        seeds: &[OrderParameter],
        metric: &mut InformationDistance,
    ) -> Result<ClusterOutcome, ClusterError> {
        let mut cap = self.config.max_iterations;
        let mut retries = 0;

        loop {
            match MedoidClustering::new(cap).cluster(candidates, seeds, metric) {
                Err(ClusterError::NotConverged { iterations })
                    if retries < self.config.convergence_retries =>
                {
                    retries += 1;
                    cap = cap.saturating_mul(2);
                    warn!(iterations, next_cap = cap, "clustering did not converge, retrying");
                }
                result => return result,
            }
        }
    }
}

/// Selects from `candidates` with default settings and the given capacity.
pub fn select_order_parameters(
    candidates: &[OrderParameter],
    capacity: usize,
) -> Result<Vec<OrderParameter>, SelectionError> {
    OrderParameterSelector::new(SelectorConfig::new(capacity))?.select(candidates)
}

fn check_candidates(candidates: &[OrderParameter]) -> Result<(), SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    let mut seen = HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        if !seen.insert(candidate.name()) {
            return Err(SelectionError::DuplicateName(candidate.name().to_string()));
        }
    }
    Ok(())
}
