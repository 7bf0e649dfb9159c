//! Score-based pattern comparison: sequence alignment and DTW.
//!
//! Both algorithms share one per-pair score over (segment, position) pairs:
//! direction agreement (exponential decay with circular distance), weight
//! agreement (Gaussian on the weight difference) and positional agreement.
//! The pair scores form an |a| × |b| similarity matrix that either
//! - an edit-distance style DP walks with a fixed gap penalty, or
//! - a dynamic-time-warping DP walks over costs `1 − score`.
//!
//! Tables are (n+1) × (m+1) with row/column 0 as the boundary. Callers
//! handle empty patterns before reaching this module.

use crate::types::{Pattern, PatternSegment};

/// Spread of the Gaussian weight-agreement term.
const MAGNITUDE_SPREAD: f32 = 0.1;

/// Relative importance of direction and weight agreement in a pair score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub direction: f32,
    pub magnitude: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            direction: 0.7,
            magnitude: 0.3,
        }
    }
}

/// 1.0 for the same bucket, `exp(−d/2)` for circular distance `d`.
///
/// Directions from different discretizations are unrelated.
pub fn direction_similarity(a: &PatternSegment, b: &PatternSegment) -> f32 {
    if a.direction == b.direction {
        return 1.0;
    }
    match a.direction.cyclic_distance(&b.direction) {
        Some(diff) => (-(diff as f32) / 2.0).exp(),
        None => 0.0,
    }
}

/// `exp(−(w1 − w2)² / 0.1)`.
pub fn magnitude_similarity(a: &PatternSegment, b: &PatternSegment) -> f32 {
    let diff = a.weight - b.weight;
    (-(diff * diff) / MAGNITUDE_SPREAD).exp()
}

/// Penalty for a pair sitting at different positions in the two sequences.
///
/// Pairs at the same position score 1.0. Otherwise the score decays with the
/// position gap relative to the later position and is scaled by the pair's
/// mean weight.
pub fn position_similarity(a: &PatternSegment, pos_a: usize, b: &PatternSegment, pos_b: usize) -> f32 {
    if pos_a == pos_b {
        return 1.0;
    }
    let gap = pos_a.abs_diff(pos_b) as f32;
    let span = pos_a.max(pos_b) as f32 + 1.0;
    let avg_weight = (a.weight + b.weight) / 2.0;
    (-gap / span).exp() * (0.5 + 0.5 * avg_weight)
}

/// Score of segment `a` at `pos_a` against segment `b` at `pos_b`, in [0, 1].
pub fn segment_similarity(
    a: &PatternSegment,
    pos_a: usize,
    b: &PatternSegment,
    pos_b: usize,
    weights: ScoreWeights,
) -> f32 {
    let base = (direction_similarity(a, b) * weights.direction
        + magnitude_similarity(a, b) * weights.magnitude)
        / (weights.direction + weights.magnitude);
    base * position_similarity(a, pos_a, b, pos_b)
}

/// |a| × |b| matrix of pair scores, row-major by `a`.
pub fn similarity_matrix(a: &Pattern, b: &Pattern, weights: ScoreWeights) -> Vec<Vec<f32>> {
    a.segments()
        .iter()
        .enumerate()
        .map(|(i, seg_a)| {
            b.segments()
                .iter()
                .enumerate()
                .map(|(j, seg_b)| segment_similarity(seg_a, i, seg_b, j, weights))
                .collect()
        })
        .collect()
}

/// Global alignment score normalized by the shorter sequence, clamped to [0, 1].
///
/// `dp[i][j] = max(dp[i−1][j−1] + M[i−1][j−1], dp[i−1][j] − gap, dp[i][j−1] − gap)`
/// with `dp[0][0] = 0` and linear gap boundaries.
pub fn alignment_similarity(matrix: &[Vec<f32>], gap_penalty: f32) -> f32 {
    let n = matrix.len();
    let m = matrix.first().map_or(0, Vec::len);
    if n == 0 || m == 0 {
        return 0.0;
    }

    let mut dp = vec![vec![0.0f32; m + 1]; n + 1];
    for i in 1..=n {
        dp[i][0] = dp[i - 1][0] - gap_penalty;
    }
    for j in 1..=m {
        dp[0][j] = dp[0][j - 1] - gap_penalty;
    }

    for i in 1..=n {
        for j in 1..=m {
            let matched = dp[i - 1][j - 1] + matrix[i - 1][j - 1];
            let skip_a = dp[i - 1][j] - gap_penalty;
            let skip_b = dp[i][j - 1] - gap_penalty;
            dp[i][j] = matched.max(skip_a).max(skip_b);
        }
    }

    (dp[n][m] / n.min(m) as f32).clamp(0.0, 1.0)
}

/// Accumulated DTW cost over `1 − M`, mapped to a similarity by
/// `exp(−cost / max(n, m))`.
pub fn dtw_similarity(matrix: &[Vec<f32>]) -> f32 {
    let n = matrix.len();
    let m = matrix.first().map_or(0, Vec::len);
    if n == 0 || m == 0 {
        return 0.0;
    }

    let mut dtw = vec![vec![f32::INFINITY; m + 1]; n + 1];
    dtw[0][0] = 0.0;

    for i in 1..=n {
        for j in 1..=m {
            let cost = 1.0 - matrix[i - 1][j - 1];
            let best_prev = dtw[i - 1][j].min(dtw[i][j - 1]).min(dtw[i - 1][j - 1]);
            dtw[i][j] = cost + best_prev;
        }
    }

    (-dtw[n][m] / n.max(m) as f32).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn seg(index: u32, weight: f32) -> PatternSegment {
        PatternSegment::new(Direction::new(index, 8), weight)
    }

    fn pattern(raw: &[(u32, f32)]) -> Pattern {
        Pattern::new(raw.iter().map(|&(i, w)| seg(i, w)).collect())
    }

    #[test]
    fn test_direction_similarity_decay() {
        assert_eq!(direction_similarity(&seg(1, 1.0), &seg(1, 0.2)), 1.0);
        assert_relative_eq!(
            direction_similarity(&seg(1, 1.0), &seg(2, 1.0)),
            (-0.5f32).exp()
        );
        assert_relative_eq!(
            direction_similarity(&seg(1, 1.0), &seg(8, 1.0)),
            (-0.5f32).exp()
        );
        assert_relative_eq!(
            direction_similarity(&seg(1, 1.0), &seg(5, 1.0)),
            (-2.0f32).exp()
        );
        let other_k = PatternSegment::new(Direction::new(1, 4), 1.0);
        assert_eq!(direction_similarity(&seg(1, 1.0), &other_k), 0.0);
    }

    #[test]
    fn test_magnitude_similarity() {
        assert_eq!(magnitude_similarity(&seg(1, 0.4), &seg(3, 0.4)), 1.0);
        assert_relative_eq!(
            magnitude_similarity(&seg(1, 1.0), &seg(1, 0.5)),
            (-2.5f32).exp()
        );
    }

    #[test]
    fn test_position_similarity() {
        assert_eq!(position_similarity(&seg(1, 0.2), 0, &seg(1, 0.2), 0), 1.0);
        assert_eq!(position_similarity(&seg(1, 0.2), 3, &seg(1, 0.2), 3), 1.0);
        // gap 1, span 2, mean weight 1.0
        assert_relative_eq!(
            position_similarity(&seg(1, 1.0), 0, &seg(1, 1.0), 1),
            (-0.5f32).exp()
        );
        // gap 2, span 3, mean weight 0.5
        assert_relative_eq!(
            position_similarity(&seg(1, 0.25), 0, &seg(1, 0.75), 2),
            (-2.0f32 / 3.0).exp() * 0.75
        );
    }

    #[test]
    fn test_segment_similarity_combines_terms() {
        let weights = ScoreWeights::default();
        assert_eq!(segment_similarity(&seg(2, 0.5), 1, &seg(2, 0.5), 1, weights), 1.0);

        let expected = (0.7 * (-0.5f32).exp() + 0.3 * 1.0) / 1.0;
        assert_relative_eq!(
            segment_similarity(&seg(2, 0.5), 0, &seg(3, 0.5), 0, weights),
            expected,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_matrix_shape() {
        let a = pattern(&[(1, 1.0), (3, 0.5), (5, 0.8)]);
        let b = pattern(&[(1, 1.0), (3, 0.5)]);
        let matrix = similarity_matrix(&a, &b, ScoreWeights::default());
        assert_eq!(matrix.len(), 3);
        assert!(matrix.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_alignment_self_similarity_is_one() {
        let p = pattern(&[(1, 1.0), (3, 0.4), (6, 0.7), (8, 0.05)]);
        let matrix = similarity_matrix(&p, &p, ScoreWeights::default());
        assert_eq!(alignment_similarity(&matrix, 0.1), 1.0);
    }

    #[test]
    fn test_alignment_extra_segment_costs_a_gap() {
        let a = pattern(&[(1, 1.0), (3, 1.0)]);
        let b = pattern(&[(1, 1.0), (3, 1.0), (5, 1.0)]);
        let matrix = similarity_matrix(&a, &b, ScoreWeights::default());
        // Two exact diagonal hits then one gap: (1 + 1 − 0.1) / 2.
        assert_relative_eq!(alignment_similarity(&matrix, 0.1), 0.95, epsilon = 1e-6);
    }

    #[test]
    fn test_alignment_clamps_at_zero() {
        let matrix = vec![vec![0.0; 1]];
        assert_eq!(alignment_similarity(&matrix, 0.1), 0.0);
    }

    #[test]
    fn test_alignment_is_symmetric() {
        let a = pattern(&[(1, 1.0), (3, 0.6), (5, 0.3)]);
        let b = pattern(&[(2, 0.9), (3, 1.0), (6, 0.2), (7, 0.5)]);
        let ab = alignment_similarity(&similarity_matrix(&a, &b, ScoreWeights::default()), 0.1);
        let ba = alignment_similarity(&similarity_matrix(&b, &a, ScoreWeights::default()), 0.1);
        assert_abs_diff_eq!(ab, ba, epsilon = 1e-6);
    }

    #[test]
    fn test_dtw_self_similarity_is_one() {
        let p = pattern(&[(1, 1.0), (4, 0.3), (7, 0.9)]);
        let matrix = similarity_matrix(&p, &p, ScoreWeights::default());
        assert_eq!(dtw_similarity(&matrix), 1.0);
    }

    #[test]
    fn test_dtw_hand_computed() {
        let matrix = vec![vec![1.0, 0.5], vec![0.2, 1.0]];
        // costs [[0, .5], [.8, 0]]: best path is the diagonal, total 0.
        assert_eq!(dtw_similarity(&matrix), 1.0);

        let matrix = vec![vec![0.5]];
        assert_relative_eq!(dtw_similarity(&matrix), (-0.5f32).exp());
    }

    #[test]
    fn test_dtw_orders_candidates() {
        let ell = pattern(&[(1, 1.0), (3, 0.5)]);
        let close = pattern(&[(1, 1.0), (3, 0.45)]);
        let far = pattern(&[(5, 1.0), (7, 0.5)]);
        let w = ScoreWeights::default();
        assert!(
            dtw_similarity(&similarity_matrix(&ell, &close, w))
                > dtw_similarity(&similarity_matrix(&ell, &far, w))
        );
    }
}
