//! Noise filtering for raw motion deltas.
//!
//! Two independent rules decide whether a sample is kept:
//! - Jitter: a sample whose |dx| and |dy| are both below the minimum shift
//!   magnitude is sensor noise from a hand holding still.
//! - Outliers: when the batch has at least three samples, magnitudes above
//!   Q3 + 1.5·IQR of the batch are spikes (dropped frames, double reports).
//!
//! Quartiles are read straight off the sorted magnitudes at indices
//! ⌊n·0.25⌋ and ⌊n·0.75⌋; no interpolation.

use crate::types::ShiftSample;

/// Minimum batch size for the quartile rule to apply.
const OUTLIER_MIN_SAMPLES: usize = 3;

/// IQR multiplier for the upper outlier fence.
const OUTLIER_IQR_FACTOR: f32 = 1.5;

/// Jitter and outlier filter applied before segmentation.
#[derive(Debug, Clone, Copy)]
pub struct NoiseFilter {
    min_shift_magnitude: f32,
    reject_outliers: bool,
}

impl NoiseFilter {
    pub fn new(min_shift_magnitude: f32, reject_outliers: bool) -> Self {
        Self {
            min_shift_magnitude,
            reject_outliers,
        }
    }

    /// True when both axes fall under the jitter floor.
    pub fn is_jitter(&self, shift: &ShiftSample) -> bool {
        shift.dx.abs() < self.min_shift_magnitude && shift.dy.abs() < self.min_shift_magnitude
    }

    /// Filter a batch, preserving capture order.
    pub fn filter(&self, shifts: &[ShiftSample]) -> Vec<ShiftSample> {
        let fence = if self.reject_outliers {
            outlier_fence(shifts)
        } else {
            None
        };

        shifts
            .iter()
            .filter(|shift| !self.is_jitter(shift))
            .filter(|shift| fence.map_or(true, |limit| shift.magnitude() <= limit))
            .copied()
            .collect()
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(0.002, true)
    }
}

/// Upper magnitude fence `Q3 + 1.5·IQR` for the batch.
///
/// Returns `None` for batches too small to have meaningful quartiles.
pub fn outlier_fence(shifts: &[ShiftSample]) -> Option<f32> {
    if shifts.len() < OUTLIER_MIN_SAMPLES {
        return None;
    }

    let mut magnitudes: Vec<f32> = shifts.iter().map(ShiftSample::magnitude).collect();
    magnitudes.sort_by(f32::total_cmp);

    let n = magnitudes.len();
    let q1 = magnitudes[(n as f32 * 0.25) as usize];
    let q3 = magnitudes[(n as f32 * 0.75) as usize];
    let iqr = q3 - q1;

    Some(q3 + OUTLIER_IQR_FACTOR * iqr)
}
