//! Core data types for the air-gesture engine.
//!
//! This module defines the values that flow through the gesture pipeline:
//! raw motion deltas in, discrete directions and weighted segments in the
//! middle, and the finished `Pattern` out.
//!
//! Design principle: Types should make intent obvious. If a concept exists,
//! it gets a type. Never pass raw tuples or untyped collections across boundaries.
//!
//! Persisted types derive serde so a stored pattern is an ordered list of
//! `{direction: {index, discretization}, weight}` records.

use serde::{Deserialize, Serialize};

// ============================================================================
// RAW MOTION
// ============================================================================

/// A single raw motion delta reported by the motion source.
///
/// One sample is produced per motion event while the gesture button is held.
/// It is never modified after capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftSample {
    /// Horizontal displacement since the previous event.
    pub dx: f32,
    /// Vertical displacement since the previous event.
    pub dy: f32,
}

impl ShiftSample {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length of the delta; finite for any finite delta.
    pub fn magnitude(&self) -> f32 {
        self.dx.hypot(self.dy)
    }

    /// Angle of the delta in radians, in (−π, π], measured from the positive x-axis.
    pub fn angle(&self) -> f32 {
        self.dy.atan2(self.dx)
    }
}

impl From<(f32, f32)> for ShiftSample {
    fn from((dx, dy): (f32, f32)) -> Self {
        Self::new(dx, dy)
    }
}

// ============================================================================
// DIRECTIONS AND SEGMENTS
// ============================================================================

/// One of `discretization` equally spaced direction buckets.
///
/// Indices are 1-based and cyclic: index `discretization` neighbours index 1.
/// Two directions are equal only when both fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub index: u32,
    pub discretization: u32,
}

impl Direction {
    pub fn new(index: u32, discretization: u32) -> Self {
        Self {
            index,
            discretization,
        }
    }

    /// Circular distance between two indices of the same discretization.
    ///
    /// Returns `None` when the discretizations differ.
    pub fn cyclic_distance(&self, other: &Direction) -> Option<u32> {
        if self.discretization != other.discretization {
            return None;
        }
        let diff = self.index.abs_diff(other.index);
        Some(diff.min(self.discretization.saturating_sub(diff)))
    }

    /// True when the two directions are neighbouring buckets (one step apart, wrapping).
    pub fn is_adjacent_to(&self, other: &Direction) -> bool {
        self.cyclic_distance(other) == Some(1)
    }
}

/// A run of same-direction motion with its accumulated magnitude.
///
/// `weight` accumulates raw magnitude while a pattern is being built and is
/// normalized into [0, 1] once the pattern is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternSegment {
    pub direction: Direction,
    pub weight: f32,
}

impl PatternSegment {
    pub fn new(direction: Direction, weight: f32) -> Self {
        Self { direction, weight }
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

/// The symbolic form of one completed gesture.
///
/// Segment order is the temporal order in which directions were traversed.
/// A pattern with no segments is the empty-gesture sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    segments: Vec<PatternSegment>,
}

impl Pattern {
    /// Wrap an already-ordered segment list.
    pub fn new(segments: Vec<PatternSegment>) -> Self {
        Self { segments }
    }

    /// The empty-gesture sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Largest segment weight, or 0.0 for the empty pattern.
    pub fn max_weight(&self) -> f32 {
        self.segments
            .iter()
            .map(|s| s.weight)
            .fold(0.0, f32::max)
    }

    /// True when no two consecutive segments share a direction index.
    pub fn has_no_adjacent_duplicates(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].direction.index != pair[1].direction.index)
    }

    pub fn into_segments(self) -> Vec<PatternSegment> {
        self.segments
    }
}

impl From<Vec<PatternSegment>> for Pattern {
    fn from(segments: Vec<PatternSegment>) -> Self {
        Self::new(segments)
    }
}

/// A pattern stored under a user-chosen name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPattern {
    pub name: String,
    /// Persisted under `segments`, the on-disk name of the segment list.
    #[serde(rename = "segments")]
    pub pattern: Pattern,
}

impl NamedPattern {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}
