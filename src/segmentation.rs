//! Gesture segmentation: raw motion deltas to a normalized `Pattern`.
//!
//! Design: filter, aggregate, merge, normalize.
//! - Noise filter drops jitter and magnitude spikes (see `signal`)
//! - Each surviving delta is bucketed by the discretizer and its magnitude
//!   accumulated into the running segment
//! - A delta one bucket away from the running segment is treated as wobble:
//!   it extends the segment with a damped weight instead of opening a new one
//! - Weights are normalized against the strongest segment and weak segments
//!   dropped
//!
//! Why this matters:
//! The same shape drawn twice never produces the same deltas. Collapsing
//! runs of similar direction into a few weighted segments is what makes two
//! attempts comparable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discretizer::Discretizer;
use crate::error::{ensure_non_negative, ensure_unit_interval, GestureError, Result};
use crate::signal::NoiseFilter;
use crate::types::{Direction, Pattern, PatternSegment, ShiftSample};

/// Configuration for pattern building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Samples with both |dx| and |dy| below this are jitter.
    /// Typical: 0.002.
    pub min_shift_magnitude: f32,

    /// Normalized weight below which a segment is dropped. Also the floor
    /// for the raw maximum weight: weaker gestures are rejected outright.
    /// Range: (0.0, 1.0]. Typical: 0.01 to 0.03.
    pub min_segment_weight: f32,

    /// Damping applied when a neighbouring direction is folded into the
    /// running segment. Range: [0.0, 1.0]. Typical: 0.5.
    pub noise_filter_threshold: f32,

    /// Fold neighbouring directions into the running segment.
    pub merge_similar_directions: bool,

    /// Drop magnitude spikes above Q3 + 1.5·IQR.
    pub reject_outliers: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            min_shift_magnitude: 0.002,
            min_segment_weight: 0.01,
            noise_filter_threshold: 0.5,
            merge_similar_directions: true,
            reject_outliers: true,
        }
    }
}

impl BuilderConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("min_shift_magnitude", self.min_shift_magnitude)?;
        ensure_unit_interval("min_segment_weight", self.min_segment_weight)?;
        if self.min_segment_weight <= 0.0 {
            return Err(GestureError::invalid(
                "min_segment_weight",
                "must be strictly positive",
            ));
        }
        ensure_unit_interval("noise_filter_threshold", self.noise_filter_threshold)?;
        Ok(())
    }
}

/// Turns one completed gesture into a `Pattern`.
///
/// Holds only read-only configuration; safe to share across threads.
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    discretizer: Discretizer,
    noise_filter: NoiseFilter,
    config: BuilderConfig,
}

impl PatternBuilder {
    pub fn new(discretizer: Discretizer, config: BuilderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            discretizer,
            noise_filter: NoiseFilter::new(config.min_shift_magnitude, config.reject_outliers),
            config,
        })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    /// Build the pattern for one gesture.
    ///
    /// Empty input, all-noise input, and gestures whose strongest segment is
    /// below `min_segment_weight` all yield the empty pattern.
    pub fn build(&self, shifts: &[ShiftSample]) -> Pattern {
        if shifts.is_empty() {
            return Pattern::empty();
        }

        let filtered = self.noise_filter.filter(shifts);
        debug!(
            input = shifts.len(),
            kept = filtered.len(),
            "filtered gesture samples"
        );
        if filtered.is_empty() {
            return Pattern::empty();
        }

        let mut segments = self.aggregate(&filtered);
        debug!(segments = segments.len(), "aggregated raw segments");

        if self.config.merge_similar_directions {
            segments = self.merge_similar(segments);
            debug!(segments = segments.len(), "merged similar directions");
        }

        self.normalize(segments)
    }

    /// Accumulate samples into directional segments, in capture order.
    fn aggregate(&self, shifts: &[ShiftSample]) -> Vec<PatternSegment> {
        let mut segments: Vec<PatternSegment> = Vec::new();

        for shift in shifts {
            let weight = shift.magnitude();
            if !weight.is_finite() {
                continue;
            }
            let direction = self.discretizer.direction_of(shift);

            let Some(last) = segments.last_mut() else {
                segments.push(PatternSegment::new(direction, weight));
                continue;
            };

            if direction.index == last.direction.index {
                last.weight = saturating_add(last.weight, weight);
            } else if self.config.merge_similar_directions
                && is_similar(&last.direction, &direction)
            {
                last.weight =
                    saturating_add(last.weight, weight * self.config.noise_filter_threshold);
            } else {
                segments.push(PatternSegment::new(direction, weight));
            }
        }

        segments
    }

    /// Second pass: fold still-adjacent similar segments with damping.
    fn merge_similar(&self, segments: Vec<PatternSegment>) -> Vec<PatternSegment> {
        let mut iter = segments.into_iter();
        let Some(mut current) = iter.next() else {
            return Vec::new();
        };

        let mut merged = Vec::new();
        for next in iter {
            if is_similar(&current.direction, &next.direction) {
                current.weight = saturating_add(
                    current.weight,
                    next.weight * self.config.noise_filter_threshold,
                );
            } else {
                merged.push(current);
                current = next;
            }
        }
        merged.push(current);

        merged
    }

    /// Normalize against the strongest segment and drop weak ones.
    fn normalize(&self, segments: Vec<PatternSegment>) -> Pattern {
        let max_weight = segments
            .iter()
            .map(|s| s.weight)
            .filter(|w| w.is_finite())
            .fold(0.0, f32::max);
        debug!(max_weight, "normalizing segment weights");

        if max_weight < self.config.min_segment_weight {
            return Pattern::empty();
        }

        let mut kept: Vec<PatternSegment> = Vec::with_capacity(segments.len());
        for segment in segments {
            let weight = segment.weight / max_weight;
            if !weight.is_finite() || weight < self.config.min_segment_weight {
                continue;
            }
            match kept.last_mut() {
                // Dropping a weak segment can bring two equal directions together.
                Some(last) if last.direction.index == segment.direction.index => {
                    last.weight = last.weight.max(weight);
                }
                _ => kept.push(PatternSegment::new(segment.direction, weight)),
            }
        }

        Pattern::new(kept)
    }
}

/// Weight sum clamped at `f32::MAX` so huge strokes stay comparable.
fn saturating_add(total: f32, weight: f32) -> f32 {
    (total + weight).min(f32::MAX)
}

/// Same bucket or one bucket apart, wrapping at `discretization`.
fn is_similar(a: &Direction, b: &Direction) -> bool {
    a.index == b.index || a.is_adjacent_to(b)
}
