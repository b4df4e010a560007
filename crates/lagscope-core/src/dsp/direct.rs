//! Sliding absolute-difference scan
//!
//! Slides the reference across the recording and scores every start offset
//! by the summed absolute difference. The best match is the offset with the
//! smallest divergence. O(n·m): meant for short windows and as a cross-check
//! for the FFT path.

use super::error::{CorrelationError, Result};

/// Result of a direct scan
#[derive(Debug, Clone, PartialEq)]
pub struct DirectCorrelation {
    /// Divergence per start offset, `len(recording) - len(reference) + 1` entries
    pub curve: Vec<f32>,
    /// Start offset with the smallest divergence (first one on ties)
    pub index_of_best_match: usize,
    /// Divergence at `index_of_best_match`
    pub min_divergence: f32,
}

/// Brute-force time-domain correlator
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCorrelator;

impl DirectCorrelator {
    /// Scan `recording` for the offset that best matches `reference`
    ///
    /// # Errors
    /// [`CorrelationError::InvalidInput`] if `reference` is empty or longer
    /// than `recording`.
    ///
    /// # Example
    /// ```
    /// use lagscope_core::dsp::direct::DirectCorrelator;
    ///
    /// let reference = [1.0, -1.0];
    /// let recording = [0.0, 0.0, 1.0, -1.0, 0.0];
    /// let result = DirectCorrelator::correlate(&reference, &recording).unwrap();
    /// assert_eq!(result.index_of_best_match, 2);
    /// assert_eq!(result.curve.len(), 4);
    /// ```
    pub fn correlate(reference: &[f32], recording: &[f32]) -> Result<DirectCorrelation> {
        if reference.is_empty() {
            return Err(CorrelationError::invalid("reference signal is empty"));
        }
        if recording.len() < reference.len() {
            return Err(CorrelationError::invalid(format!(
                "recording ({} samples) shorter than reference ({} samples)",
                recording.len(),
                reference.len()
            )));
        }

        let curve: Vec<f32> = recording
            .windows(reference.len())
            .map(|window| divergence(reference, window))
            .collect();

        // Seeded from the curve so the reported minimum is always a curve
        // value. NaN scores lose to any number.
        let mut index_of_best_match = 0;
        let mut min_divergence = curve[0];
        for (i, &d) in curve.iter().enumerate().skip(1) {
            if d < min_divergence || (min_divergence.is_nan() && !d.is_nan()) {
                min_divergence = d;
                index_of_best_match = i;
            }
        }

        Ok(DirectCorrelation {
            curve,
            index_of_best_match,
            min_divergence,
        })
    }
}

fn divergence(reference: &[f32], window: &[f32]) -> f32 {
    reference
        .iter()
        .zip(window)
        .map(|(r, w)| (r - w).abs())
        .sum()
}
