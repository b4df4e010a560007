//! FFT-based circular cross-correlation
//!
//! Computes the cross-correlation of two equal-length signals through the
//! cross-power spectrum `S1 · conj(S2)`, normalized by both RMS levels so a
//! clean match peaks near 1.0. The result is circular: index `i` of the
//! curve is lag `i` modulo the window length, and indices in the upper half
//! of the window are negative lags.

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use super::error::{CorrelationError, Result};
use super::padding::next_power_of_two_padding;

/// How the correlation peak is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakPolicy {
    /// Largest `|coefficient|`, tolerates a polarity flip in the capture path
    #[default]
    Absolute,
    /// Largest signed coefficient
    Signed,
}

/// Result of a spectral correlation
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralCorrelation {
    /// Normalized coefficient per circular lag, one entry per padded sample
    pub curve: Vec<f32>,
    /// Curve index of the selected peak (first one on ties)
    pub index_of_best_match: usize,
    /// Peak index unwrapped into `[-L/2, L/2)`
    pub lag: i64,
    /// Signed coefficient at the peak
    pub peak_value: f32,
}

/// Circular cross-correlator using rustfft
///
/// # Example
/// ```
/// use lagscope_core::dsp::spectral::SpectralCorrelator;
///
/// let original: Vec<f32> = (0..64)
///     .map(|i| if i < 16 { (i as f32 * 0.9).sin() } else { 0.0 })
///     .collect();
/// let mut delayed = vec![0.0f32; 5];
/// delayed.extend_from_slice(&original[..59]);
///
/// let result = SpectralCorrelator::default().correlate(&delayed, &original).unwrap();
/// assert_eq!(result.lag, 5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralCorrelator {
    policy: PeakPolicy,
}

impl SpectralCorrelator {
    /// Create a correlator with the given peak selection
    pub fn new(policy: PeakPolicy) -> Self {
        Self { policy }
    }

    /// Peak selection in use
    pub fn policy(&self) -> PeakPolicy {
        self.policy
    }

    /// Correlate `sig1` against `sig2`
    ///
    /// A positive lag means `sig1` is `sig2` delayed by that many samples.
    /// Lengths that are not a power of two are zero-padded to the guard-band
    /// size first. The caller is responsible for equalizing lengths.
    ///
    /// # Errors
    /// [`CorrelationError::InvalidInput`] if the lengths differ, are zero or
    /// odd, or if either signal is entirely silent.
    pub fn correlate(&self, sig1: &[f32], sig2: &[f32]) -> Result<SpectralCorrelation> {
        validate(sig1, sig2)?;

        let fft_size = sig1.len() + next_power_of_two_padding(sig1.len())?;

        // Both signals are scaled to unit peak first. The coefficient does not
        // depend on scale, and quiet captures stay clear of f32 underflow.
        let scale1 = peak_scale(sig1)?;
        let scale2 = peak_scale(sig2)?;
        let rms1 = rms(sig1, scale1, fft_size);
        let rms2 = rms(sig2, scale2, fft_size);

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);

        let mut spectrum1 = to_complex(sig1, scale1, fft_size);
        let mut spectrum2 = to_complex(sig2, scale2, fft_size);
        fft.process(&mut spectrum1);
        fft.process(&mut spectrum2);

        // Cross-power spectrum: S1 * conj(S2)
        let mut cross: Vec<Complex<f32>> = spectrum1
            .iter()
            .zip(&spectrum2)
            .map(|(a, b)| {
                Complex::new(a.re * b.re + a.im * b.im, -a.re * b.im + b.re * a.im)
            })
            .collect();

        let ifft = planner.plan_fft_inverse(fft_size);
        ifft.process(&mut cross);

        // rustfft leaves the inverse unscaled, so one factor of L undoes the
        // transform and the other is the RMS normalization.
        let n = fft_size as f32;
        let norm = 1.0 / (n * rms1 * rms2 * n);
        let curve: Vec<f32> = cross.iter().map(|c| c.re * norm).collect();

        let index_of_best_match = find_peak(&curve, self.policy);
        let lag = unwrap_lag(index_of_best_match, fft_size);

        Ok(SpectralCorrelation {
            peak_value: curve[index_of_best_match],
            curve,
            index_of_best_match,
            lag,
        })
    }
}

/// Map a circular index into a signed lag
pub fn unwrap_lag(index: usize, window: usize) -> i64 {
    if index < window / 2 {
        index as i64
    } else {
        index as i64 - window as i64
    }
}

fn validate(sig1: &[f32], sig2: &[f32]) -> Result<()> {
    if sig1.len() != sig2.len() {
        return Err(CorrelationError::invalid(format!(
            "signals have different lengths: {} vs {}",
            sig1.len(),
            sig2.len()
        )));
    }
    if sig1.is_empty() {
        return Err(CorrelationError::invalid("signals are empty"));
    }
    if sig1.len() % 2 != 0 {
        return Err(CorrelationError::invalid(format!(
            "signal length must be even, got {}",
            sig1.len()
        )));
    }
    Ok(())
}

/// Factor that brings the largest sample magnitude to 1.0
fn peak_scale(samples: &[f32]) -> Result<f64> {
    let peak = samples.iter().fold(0.0f64, |m, &x| m.max((x as f64).abs()));
    if peak == 0.0 {
        return Err(CorrelationError::invalid(
            "cannot normalize correlation of a silent signal",
        ));
    }
    Ok(1.0 / peak)
}

/// RMS of the scaled samples over the padded window (padding contributes zeros)
fn rms(samples: &[f32], scale: f64, window: usize) -> f32 {
    let energy: f64 = samples
        .iter()
        .map(|&x| {
            let v = x as f64 * scale;
            v * v
        })
        .sum();
    (energy / window as f64).sqrt() as f32
}

fn to_complex(samples: &[f32], scale: f64, fft_size: usize) -> Vec<Complex<f32>> {
    samples
        .iter()
        .map(|&x| Complex::new((x as f64 * scale) as f32, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(fft_size)
        .collect()
}

fn find_peak(curve: &[f32], policy: PeakPolicy) -> usize {
    let score = |v: f32| match policy {
        PeakPolicy::Absolute => v.abs(),
        PeakPolicy::Signed => v,
    };

    let mut best_idx = 0;
    let mut best = f32::NEG_INFINITY;
    for (i, &v) in curve.iter().enumerate() {
        let s = score(v);
        if s > best {
            best = s;
            best_idx = i;
        }
    }
    best_idx
}
