//! Lag estimation entry point
//!
//! Prepares the reference and recording for the selected algorithm, runs
//! one correlator and converts its peak into a signed lag in samples and
//! milliseconds.
//!
//! ## Index-to-lag mapping
//!
//! ```text
//! direct:   curve[i] = divergence at start offset i      lag = i
//! spectral: curve[i] = coefficient at circular lag i     lag = i        if i < L/2
//!                                                        lag = i - L    otherwise
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::direct::DirectCorrelator;
use super::error::{CorrelationError, Result};
use super::padding::{next_power_of_two_padding, pad_signal};
use super::spectral::{PeakPolicy, SpectralCorrelator};
use crate::signal::Signal;

/// Correlation algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Sliding absolute-difference scan, O(n·m)
    Direct,
    /// FFT circular cross-correlation, O(n log n). Also parsed from `"fft"`.
    #[default]
    Spectral,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Direct => write!(f, "direct"),
            Algorithm::Spectral => write!(f, "spectral"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = CorrelationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Algorithm::Direct),
            "spectral" | "fft" => Ok(Algorithm::Spectral),
            other => Err(CorrelationError::invalid(format!(
                "unknown algorithm '{other}' (expected 'direct' or 'spectral')"
            ))),
        }
    }
}

/// Correlation scores, one per candidate lag
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct CorrelationCurve(Vec<f32>);

impl CorrelationCurve {
    /// Scores in curve order
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of candidate lags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the curve holds no scores
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the curve, returning its scores
    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for CorrelationCurve {
    fn from(scores: Vec<f32>) -> Self {
        Self(scores)
    }
}

/// Estimated lag between a reference and a recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagEstimate {
    /// Algorithm that produced the estimate
    pub algorithm: Algorithm,
    /// Index of the selected peak in `curve`
    pub index_of_best_match: usize,
    /// Signed lag in samples (positive: recording lags the reference)
    pub lag_samples: i64,
    /// Lag in milliseconds, minus any external trigger latency
    pub lag_ms: f64,
    /// Curve value at the peak (divergence for direct, coefficient for spectral)
    pub peak_value: f32,
    /// Full correlation curve
    pub curve: CorrelationCurve,
}

/// Estimator settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Peak selection for the spectral path
    #[serde(default)]
    pub peak_policy: PeakPolicy,
}

/// Orchestrates signal preparation and one correlator
///
/// # Example
/// ```
/// use lagscope_core::{Algorithm, LatencyEstimator, Signal};
///
/// let reference = Signal::new((0..256).map(|i| (i as f32 * 0.3).sin()).collect(), 48000);
/// let recording = reference.padded(48, 48, 0.0);
///
/// let estimator = LatencyEstimator::default();
/// let estimate = estimator
///     .estimate(&reference, &recording, Algorithm::Spectral, None)
///     .unwrap();
/// assert_eq!(estimate.lag_samples, 48);
/// assert!((estimate.lag_ms - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LatencyEstimator {
    config: EstimatorConfig,
}

impl LatencyEstimator {
    /// Create an estimator with the given settings
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> EstimatorConfig {
        self.config
    }

    /// Estimate the lag of `recording` relative to `reference`
    ///
    /// # Arguments
    /// * `reference` - The signal that was played
    /// * `recording` - The captured signal, at least as long as `reference`
    /// * `algorithm` - Correlator to use
    /// * `trigger_latency_s` - Externally measured delay between the capture
    ///   start and the playback start, subtracted from `lag_ms`
    ///
    /// The spectral path only adds a guard band when the recording length is
    /// not already a power of two. Without one, lags of `len(recording) / 2`
    /// or more wrap around and come back negative; use the direct path or a
    /// longer recording for delays that large.
    ///
    /// # Errors
    /// [`CorrelationError::SampleRateMismatch`] if the rates differ, or
    /// [`CorrelationError::InvalidInput`] if the signals cannot be correlated.
    pub fn estimate(
        &self,
        reference: &Signal,
        recording: &Signal,
        algorithm: Algorithm,
        trigger_latency_s: Option<f64>,
    ) -> Result<LagEstimate> {
        if reference.sample_rate() != recording.sample_rate() {
            return Err(CorrelationError::SampleRateMismatch {
                reference: reference.sample_rate(),
                recording: recording.sample_rate(),
            });
        }
        let sample_rate = recording.sample_rate();
        if sample_rate == 0 {
            return Err(CorrelationError::invalid("sample rate must be nonzero"));
        }

        let (index_of_best_match, lag_samples, peak_value, curve) = match algorithm {
            Algorithm::Direct => {
                let result = DirectCorrelator::correlate(reference.samples(), recording.samples())?;
                (
                    result.index_of_best_match,
                    result.index_of_best_match as i64,
                    result.min_divergence,
                    result.curve,
                )
            }
            Algorithm::Spectral => {
                let (reference, recording) = equalize(reference.samples(), recording.samples())?;
                let result = SpectralCorrelator::new(self.config.peak_policy)
                    .correlate(&recording, &reference)?;
                (
                    result.index_of_best_match,
                    result.lag,
                    result.peak_value,
                    result.curve,
                )
            }
        };

        let mut lag_ms = lag_samples as f64 * 1000.0 / sample_rate as f64;
        if let Some(trigger) = trigger_latency_s {
            lag_ms -= trigger * 1000.0;
        }

        Ok(LagEstimate {
            algorithm,
            index_of_best_match,
            lag_samples,
            lag_ms,
            peak_value,
            curve: curve.into(),
        })
    }
}

/// Pad the reference to the recording length, then add the guard band to both
fn equalize(reference: &[f32], recording: &[f32]) -> Result<(Vec<f32>, Vec<f32>)> {
    if recording.len() < reference.len() {
        return Err(CorrelationError::invalid(format!(
            "recording ({} samples) shorter than reference ({} samples)",
            recording.len(),
            reference.len()
        )));
    }
    let reference = pad_signal(reference, 0, recording.len() - reference.len(), 0.0);
    let guard = next_power_of_two_padding(recording.len())?;
    Ok((
        pad_signal(&reference, 0, guard, 0.0),
        pad_signal(recording, 0, guard, 0.0),
    ))
}
