//! Equal-width binning and probability mass estimation.
//!
//! Each trajectory is binned against its own range, so the estimates below
//! are invariant under affine rescaling of either series.

use ndarray::{Array1, Array2};

/// Default number of histogram bins per axis.
pub const DEFAULT_BINS: usize = 80;

/// Maps every sample to an equal-width bin spanning the trajectory's range.
///
/// A sample equal to the maximum lands in the last bin. A constant trajectory
/// has no span, and all of its samples land in bin 0. A range too wide to
/// represent as an `f64` is binned on halved values.
pub fn bin_indices(trajectory: &[f64], bins: usize) -> Vec<usize> {
    let (min, max) = trajectory
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;

    if span.is_infinite() && min.is_finite() && max.is_finite() {
        let half_span = max * 0.5 - min * 0.5;
        return trajectory
            .iter()
            .map(|&v| {
                let index = (bins as f64 * ((v * 0.5 - min * 0.5) / half_span)) as usize;
                index.min(bins - 1)
            })
            .collect();
    }

    trajectory
        .iter()
        .map(|&v| {
            if span > 0.0 {
                let index = (bins as f64 * (v - min) / span) as usize;
                index.min(bins - 1)
            } else {
                0
            }
        })
        .collect()
}

/// Estimates a marginal probability mass function from bin indices.
pub fn marginal_pmf(indices: &[usize], bins: usize) -> Array1<f64> {
    let mut pmf = Array1::<f64>::zeros(bins);
    if indices.is_empty() {
        return pmf;
    }

    for &i in indices {
        pmf[i] += 1.0;
    }
    pmf /= indices.len() as f64;
    pmf
}

/// Estimates the joint probability mass function of two co-indexed series.
///
/// Both index slices must have the same length; rows follow `x`, columns `y`.
pub fn joint_pmf(x: &[usize], y: &[usize], bins: usize) -> Array2<f64> {
    debug_assert_eq!(x.len(), y.len());

    let mut pmf = Array2::<f64>::zeros((bins, bins));
    if x.is_empty() {
        return pmf;
    }

    for (&i, &j) in x.iter().zip(y) {
        pmf[[i, j]] += 1.0;
    }
    pmf /= x.len() as f64;
    pmf
}
