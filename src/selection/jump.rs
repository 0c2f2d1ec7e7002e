//! Cluster-count estimation with the jump method.
//!
//! A distortion curve is transformed as `D(m)^(-Y/2)` for an assumed
//! dimension `Y`, and the count sitting just before the largest drop between
//! adjacent entries is taken as that dimension's estimate.

use serde::Serialize;

/// Distortion measured for one cluster count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistortionPoint {
    pub count: usize,
    pub distortion: f64,
}

/// Cluster count suggested for one assumed dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JumpEstimate {
    pub dimension: usize,
    pub count: usize,
}

/// Estimates the cluster count for a single dimension.
///
/// `curve` is in recording order (largest count first). The jump at index
/// `j` is `t[j] - t[j + 1]`; the first maximal jump wins. A curve with a
/// single point yields that point's count. Returns `None` for an empty curve.
pub fn estimate_count(curve: &[DistortionPoint], dimension: usize) -> Option<usize> {
    if curve.is_empty() {
        return None;
    }

    let exponent = -0.5 * dimension as f64;
    let transformed: Vec<f64> = curve.iter().map(|p| p.distortion.powf(exponent)).collect();

    let mut best = 0;
    let mut best_jump = f64::NEG_INFINITY;
    for (j, pair) in transformed.windows(2).enumerate() {
        let jump = pair[0] - pair[1];
        if jump > best_jump {
            best = j;
            best_jump = jump;
        }
    }

    Some(curve[best].count)
}

/// Returns one estimate per dimension in `1..=dimensions`.
pub fn jump_estimates(curve: &[DistortionPoint], dimensions: usize) -> Vec<JumpEstimate> {
    (1..=dimensions)
        .filter_map(|dimension| {
            estimate_count(curve, dimension).map(|count| JumpEstimate { dimension, count })
        })
        .collect()
}

/// Chooses the final count: the largest of the per-dimension estimates.
pub fn choose_count(estimates: &[JumpEstimate]) -> Option<usize> {
    estimates.iter().map(|e| e.count).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(usize, f64)]) -> Vec<DistortionPoint> {
        points
            .iter()
            .map(|&(count, distortion)| DistortionPoint { count, distortion })
            .collect()
    }

    #[test]
    fn test_empty_curve() {
        assert_eq!(estimate_count(&[], 1), None);
        assert!(jump_estimates(&[], 10).is_empty());
        assert_eq!(choose_count(&[]), None);
    }

    #[test]
    fn test_single_point_curve() {
        let c = curve(&[(1, 3.2)]);
        assert_eq!(estimate_count(&c, 4), Some(1));
    }

    #[test]
    fn test_largest_jump_picks_elbow() {
        // Distortion barely changes from 4 to 3 clusters, then blows up at 2.
        let c = curve(&[(4, 1.10), (3, 1.12), (2, 2.50), (1, 2.60)]);
        assert_eq!(estimate_count(&c, 1), Some(3));
        assert_eq!(estimate_count(&c, 6), Some(3));
    }

    #[test]
    fn test_first_maximal_jump_wins_ties() {
        let flat = curve(&[(3, 4.0), (2, 4.0), (1, 4.0)]);
        assert_eq!(estimate_count(&flat, 2), Some(3));
    }

    #[test]
    fn test_dimension_changes_estimate() {
        let c = curve(&[(3, 1.0), (2, 1.5), (1, 4.0)]);
        // Y=1: 1 - 0.816 = 0.184 vs 0.816 - 0.5 = 0.316 -> count 2.
        assert_eq!(estimate_count(&c, 1), Some(2));
        // Y=4: 1 - 0.444 = 0.556 vs 0.444 - 0.0625 = 0.382 -> count 3.
        assert_eq!(estimate_count(&c, 4), Some(3));

        let estimates = jump_estimates(&c, 10);
        assert_eq!(estimates.len(), 10);
        assert_eq!(estimates[0], JumpEstimate { dimension: 1, count: 2 });
        assert_eq!(choose_count(&estimates), Some(3));
    }
}
