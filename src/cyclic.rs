//! Rule-based comparison with cyclic-shift search.
//!
//! Built for closed shapes that can be started from any corner: when both
//! patterns have the same segment count, every rotation of the second
//! pattern is compared position-by-position against the first, and the
//! rotation with the lowest weighted error score wins. Patterns with
//! different segment counts are rejected outright.
//!
//! Error categories and their weights:
//! - direction: bucket (or discretization) differs at a position
//! - weight: |w1 − w2| exceeds the acceptable tolerance
//! - order: the rotation distance of the selected shift
//! - length: segment counts differ (scaled by the difference)
//! - missing: segments with no counterpart
//!
//! The weighted sum is normalized by the longer pattern's length.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_non_negative, ensure_unit_interval, Result};
use crate::types::{Pattern, PatternSegment};

/// Thresholds and error weights for cyclic matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CyclicConfig {
    /// Largest |w1 − w2| still counted as the same weight.
    pub acceptable_weight_diff: f32,
    /// Both patterns need at least this many segments to match.
    pub min_pattern_size: usize,

    pub weight_error_weight: f32,
    pub direction_error_weight: f32,
    pub length_error_weight: f32,
    pub order_error_weight: f32,
    pub missing_segment_weight: f32,

    /// Ceiling on the normalized error score for a match.
    pub max_total_error_score: f32,
    /// Floor on the matched-position ratio for a match.
    pub min_similarity_score: f32,
}

impl Default for CyclicConfig {
    fn default() -> Self {
        Self {
            acceptable_weight_diff: 0.1,
            min_pattern_size: 1,
            weight_error_weight: 1.0,
            direction_error_weight: 2.0,
            length_error_weight: 3.0,
            order_error_weight: 1.5,
            missing_segment_weight: 2.0,
            max_total_error_score: 5.0,
            min_similarity_score: 0.7,
        }
    }
}

impl CyclicConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("cyclic.acceptable_weight_diff", self.acceptable_weight_diff)?;
        ensure_non_negative("cyclic.weight_error_weight", self.weight_error_weight)?;
        ensure_non_negative("cyclic.direction_error_weight", self.direction_error_weight)?;
        ensure_non_negative("cyclic.length_error_weight", self.length_error_weight)?;
        ensure_non_negative("cyclic.order_error_weight", self.order_error_weight)?;
        ensure_non_negative("cyclic.missing_segment_weight", self.missing_segment_weight)?;
        ensure_non_negative("cyclic.max_total_error_score", self.max_total_error_score)?;
        ensure_unit_interval("cyclic.min_similarity_score", self.min_similarity_score)?;
        Ok(())
    }
}

/// Per-category error counts for one comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchErrors {
    pub weight_errors: usize,
    pub direction_errors: usize,
    pub length_mismatch: bool,
    pub order_errors: usize,
    pub missing_segments: usize,
}

impl MatchErrors {
    /// Count of individual errors (the length flag is scored separately).
    pub fn total(&self) -> usize {
        self.weight_errors + self.direction_errors + self.order_errors + self.missing_segments
    }
}

/// Outcome of a cyclic comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclicReport {
    pub is_match: bool,
    /// Normalized weighted error score; lower is better.
    pub error_score: f32,
    /// Fraction of positions where direction and weight both agree.
    pub similarity: f32,
    /// Rotation of the second pattern that produced this report.
    pub shift: usize,
    pub errors: MatchErrors,
}

/// Compare `a` against `b`, searching all rotations when lengths agree.
pub fn evaluate(a: &Pattern, b: &Pattern, config: &CyclicConfig) -> CyclicReport {
    let n = a.len();
    if n != b.len() {
        return evaluate_length_mismatch(a, b, config);
    }
    if n == 0 {
        return CyclicReport {
            is_match: true,
            error_score: 0.0,
            similarity: 1.0,
            shift: 0,
            errors: MatchErrors::default(),
        };
    }

    let seq_a = a.segments();
    let seq_b = b.segments();
    let mut best: Option<CyclicReport> = None;

    for shift in 0..n {
        let mut errors = MatchErrors::default();
        let mut matched = 0;

        for (i, seg_a) in seq_a.iter().enumerate() {
            let seg_b = &seq_b[(i + shift) % n];
            if compare_segments(seg_a, seg_b, config, &mut errors) {
                matched += 1;
            }
        }

        // Rotating by `shift` one way equals rotating by `n − shift` the other.
        errors.order_errors = shift.min(n - shift);

        let similarity = matched as f32 / n as f32;
        let report = score(errors, a, b, similarity, shift, config);

        if best.map_or(true, |current| report.error_score < current.error_score) {
            best = Some(report);
        }
    }

    let best = best.unwrap_or_else(|| score(MatchErrors::default(), a, b, 0.0, 0, config));
    debug!(
        shift = best.shift,
        error_score = best.error_score,
        errors = best.errors.total(),
        similarity = best.similarity,
        "selected cyclic shift"
    );
    best
}

/// Patterns of different lengths never match: only the length error is
/// recorded, scaled by the count difference, and similarity is zero.
fn evaluate_length_mismatch(a: &Pattern, b: &Pattern, config: &CyclicConfig) -> CyclicReport {
    let errors = MatchErrors {
        length_mismatch: true,
        ..Default::default()
    };
    score(errors, a, b, 0.0, 0, config)
}

/// Record direction and weight disagreements; true when neither occurred.
fn compare_segments(
    a: &PatternSegment,
    b: &PatternSegment,
    config: &CyclicConfig,
    errors: &mut MatchErrors,
) -> bool {
    let mut is_match = true;

    if a.direction != b.direction {
        errors.direction_errors += 1;
        is_match = false;
    }

    if (a.weight - b.weight).abs() > config.acceptable_weight_diff {
        errors.weight_errors += 1;
        is_match = false;
    }

    is_match
}

fn score(
    errors: MatchErrors,
    a: &Pattern,
    b: &Pattern,
    similarity: f32,
    shift: usize,
    config: &CyclicConfig,
) -> CyclicReport {
    let error_score = error_score(&errors, a, b, config);

    let is_match = error_score <= config.max_total_error_score
        && similarity >= config.min_similarity_score
        && a.len() >= config.min_pattern_size
        && b.len() >= config.min_pattern_size;

    CyclicReport {
        is_match,
        error_score,
        similarity,
        shift,
        errors,
    }
}

fn error_score(errors: &MatchErrors, a: &Pattern, b: &Pattern, config: &CyclicConfig) -> f32 {
    let mut total = errors.weight_errors as f32 * config.weight_error_weight
        + errors.direction_errors as f32 * config.direction_error_weight
        + errors.order_errors as f32 * config.order_error_weight
        + errors.missing_segments as f32 * config.missing_segment_weight;

    if errors.length_mismatch {
        total += a.len().abs_diff(b.len()) as f32 * config.length_error_weight;
    }

    let longest = a.len().max(b.len());
    if longest > 0 {
        total /= longest as f32;
    }
    total
}
