//! Angle discretization.
//!
//! Maps the continuous angle of a motion delta onto one of `k` direction
//! buckets of width 2π/k. Bucket 1 straddles angle 0 symmetrically, indices
//! grow counter-clockwise through the upper half-plane and clockwise through
//! the lower half, meeting at bucket k/2 + 1 around ±π.

use crate::error::{GestureError, Result};
use crate::types::{Direction, ShiftSample};

/// Discretizer for a fixed number of directions.
#[derive(Debug, Clone, Copy)]
pub struct Discretizer {
    k: u32,
    half_segment: f32,
}

impl Discretizer {
    /// Create a discretizer with `k` directions.
    ///
    /// `k` must be a positive multiple of 4 so the axes fall on bucket centres.
    pub fn new(k: u32) -> Result<Self> {
        if k == 0 || k % 4 != 0 {
            return Err(GestureError::invalid(
                "discretization",
                format!("must be a positive multiple of 4, got {k}"),
            ));
        }
        Ok(Self {
            k,
            half_segment: std::f32::consts::PI / k as f32,
        })
    }

    /// Number of direction buckets.
    pub fn directions(&self) -> u32 {
        self.k
    }

    /// Bucket the angle of `shift`.
    pub fn direction_of(&self, shift: &ShiftSample) -> Direction {
        self.direction_for_angle(shift.angle())
    }

    /// Bucket a raw angle in radians.
    pub fn direction_for_angle(&self, angle: f32) -> Direction {
        let k = self.k;
        // |angle| <= π keeps r <= k; the clamp only guards float rounding.
        let r = ((angle.abs() / self.half_segment) as u32).min(k);

        let index = if r == 0 {
            1
        } else if r == k - 1 {
            k / 2 + 1
        } else if angle > 0.0 {
            (r - 1) / 2 + 2
        } else {
            k - (r - 1) / 2
        };

        Direction::new(index, k)
    }
}

impl Default for Discretizer {
    fn default() -> Self {
        Self {
            k: 8,
            half_segment: std::f32::consts::PI / 8.0,
        }
    }
}
