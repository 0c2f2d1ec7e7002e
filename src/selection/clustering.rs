//! k-medoids clustering under the information distance.
//!
//! Centers are always order parameters themselves. Each iteration assigns
//! every candidate to its nearest center and moves each center to the medoid
//! of its group, until the set of center names stops changing.

use std::collections::{BTreeSet, HashSet};

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::error::ClusterError;

use super::config::DEFAULT_MAX_ITERATIONS;
use super::metric::InformationDistance;
use super::order_parameter::OrderParameter;

/// Converged centers of a clustering run.
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    /// Final centers, one per non-collapsed group, in group order.
    pub centers: Vec<OrderParameter>,

    /// Number of assign/re-center iterations performed.
    pub iterations: usize,
}

/// Scores how well `centers` represent `candidates`.
///
/// Returns `1 + sqrt(sum of squared nearest-center distances)`; lower is better.
pub fn distortion(
    centers: &[OrderParameter],
    candidates: &[OrderParameter],
    metric: &mut InformationDistance,
) -> Result<f64, ClusterError> {
    if centers.is_empty() {
        return Err(ClusterError::NoCenters);
    }

    let mut sum = 0.0;
    for candidate in candidates {
        let mut nearest = f64::INFINITY;
        for center in centers {
            let d = metric.distance(candidate, center)?;
            if d < nearest {
                nearest = d;
            }
        }
        sum += nearest * nearest;
    }

    Ok(1.0 + sum.sqrt())
}

/// Partitions `candidates` by nearest center.
///
/// Group `i` belongs to `centers[i]`. On equal distances the earlier center
/// wins, and a center nobody is closest to gets an empty group.
pub fn group_assign(
    centers: &[OrderParameter],
    candidates: &[OrderParameter],
    metric: &mut InformationDistance,
) -> Result<Vec<Vec<OrderParameter>>, ClusterError> {
    if centers.is_empty() {
        return Err(ClusterError::NoCenters);
    }

    let mut groups = vec![Vec::new(); centers.len()];
    for candidate in candidates {
        let mut best = 0;
        let mut best_distance = metric.distance(candidate, &centers[0])?;
        for (i, center) in centers.iter().enumerate().skip(1) {
            let d = metric.distance(candidate, center)?;
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
        groups[best].push(candidate.clone());
    }

    Ok(groups)
}

/// Returns the member of `group` with the lowest single-center distortion.
pub fn group_medoid(
    group: &[OrderParameter],
    metric: &mut InformationDistance,
) -> Result<OrderParameter, ClusterError> {
    let mut scored = Vec::with_capacity(group.len());
    for member in group {
        let score = distortion(std::slice::from_ref(member), group, metric)?;
        scored.push((member, score));
    }

    scored
        .into_iter()
        .min_by_key(|&(_, score)| OrderedFloat(score))
        .map(|(member, _)| member.clone())
        .ok_or(ClusterError::EmptyGroup)
}

/// Fixed-point medoid clustering with an iteration cap.
#[derive(Debug, Clone)]
pub struct MedoidClustering {
    max_iterations: usize,
}

impl Default for MedoidClustering {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl MedoidClustering {
    /// Creates a clustering engine that gives up after `max_iterations`.
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// Returns the iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Refines `seeds` into converged medoids of `candidates`.
    ///
    /// Seeds with repeated names are collapsed, and a center whose group
    /// comes up empty is carried over unchanged. Fails with
    /// [`ClusterError::NotConverged`] rather than returning centers that are
    /// still moving when the cap is reached.
    pub fn cluster(
        &self,
        candidates: &[OrderParameter],
        seeds: &[OrderParameter],
        metric: &mut InformationDistance,
    ) -> Result<ClusterOutcome, ClusterError> {
        if seeds.is_empty() {
            return Err(ClusterError::NoCenters);
        }

        let mut centers = dedup_by_name(seeds.iter().cloned());
        for iteration in 1..=self.max_iterations {
            let previous = center_names(&centers);
            let groups = group_assign(&centers, candidates, metric)?;

            let mut next = Vec::with_capacity(groups.len());
            for (center, group) in centers.iter().zip(&groups) {
                if group.is_empty() {
                    next.push(center.clone());
                } else {
                    next.push(group_medoid(group, metric)?);
                }
            }
            centers = dedup_by_name(next);

            let converged = center_names(&centers) == previous;
            debug!(iteration, centers = centers.len(), converged, "medoid clustering iteration");
            if converged {
                return Ok(ClusterOutcome {
                    centers,
                    iterations: iteration,
                });
            }
        }

        Err(ClusterError::NotConverged {
            iterations: self.max_iterations,
        })
    }
}

/// Order-insensitive snapshot of a center set.
fn center_names(centers: &[OrderParameter]) -> BTreeSet<String> {
    centers.iter().map(|c| c.name().to_string()).collect()
}

fn dedup_by_name(centers: impl IntoIterator<Item = OrderParameter>) -> Vec<OrderParameter> {
    let mut seen = HashSet::new();
    centers
        .into_iter()
        .filter(|c| seen.insert(c.name().to_string()))
        .collect()
}
