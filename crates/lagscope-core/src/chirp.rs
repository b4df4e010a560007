//! Reference chirp synthesis
//!
//! Generates an exponential sine sweep used as the reference waveform for
//! latency tests. A sweep has a sharp autocorrelation peak and no repeating
//! period, so the correlation has a single unambiguous maximum.

use std::f64::consts::TAU;

use crate::dsp::error::{CorrelationError, Result};
use crate::signal::Signal;

/// Default sweep start frequency in Hz
pub const DEFAULT_FROM_HZ: f64 = 440.0;

/// Default sweep end frequency in Hz
pub const DEFAULT_TO_HZ: f64 = 1500.0;

/// Chirp amplitude (-6dB for headroom)
const CHIRP_AMPLITUDE: f32 = 0.5;

/// Exponential sine sweep generator
///
/// The instantaneous frequency moves from `from_hz` to `to_hz` as
/// `f(t) = from · (to / from)^(t / T)` over the chirp duration `T`.
///
/// # Example
/// ```
/// use lagscope_core::ChirpGenerator;
///
/// let chirp = ChirpGenerator::default().generate(1024, 44100).unwrap();
/// assert_eq!(chirp.len(), 1024);
/// assert_eq!(chirp.sample_rate(), 44100);
/// ```
#[derive(Debug, Clone)]
pub struct ChirpGenerator {
    /// Start frequency in Hz
    from_hz: f64,
    /// End frequency in Hz
    to_hz: f64,
    /// Amplitude scaling factor
    amplitude: f32,
}

impl Default for ChirpGenerator {
    fn default() -> Self {
        Self {
            from_hz: DEFAULT_FROM_HZ,
            to_hz: DEFAULT_TO_HZ,
            amplitude: CHIRP_AMPLITUDE,
        }
    }
}

impl ChirpGenerator {
    /// Create a sweep between two frequencies
    ///
    /// # Errors
    /// [`CorrelationError::InvalidInput`] if either frequency is not positive
    /// and finite.
    pub fn new(from_hz: f64, to_hz: f64) -> Result<Self> {
        for f in [from_hz, to_hz] {
            if !(f.is_finite() && f > 0.0) {
                return Err(CorrelationError::invalid(format!(
                    "chirp frequency must be positive, got {f}"
                )));
            }
        }
        Ok(Self {
            from_hz,
            to_hz,
            ..Self::default()
        })
    }

    /// Set amplitude scaling factor
    ///
    /// # Arguments
    /// * `amplitude` - Amplitude from 0.0 to 1.0
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }

    /// Get current amplitude
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Sweep start frequency in Hz
    pub fn from_hz(&self) -> f64 {
        self.from_hz
    }

    /// Sweep end frequency in Hz
    pub fn to_hz(&self) -> f64 {
        self.to_hz
    }

    /// Render `length` samples of the sweep at `sample_rate`
    ///
    /// # Errors
    /// [`CorrelationError::InvalidInput`] if `length` or `sample_rate` is zero.
    pub fn generate(&self, length: usize, sample_rate: u32) -> Result<Signal> {
        if length == 0 {
            return Err(CorrelationError::invalid("chirp length must be nonzero"));
        }
        if sample_rate == 0 {
            return Err(CorrelationError::invalid("sample rate must be nonzero"));
        }

        let fs = sample_rate as f64;
        let duration = length as f64 / fs;
        let ratio = self.to_hz / self.from_hz;
        let log_ratio = ratio.ln();

        let samples = (0..length)
            .map(|i| {
                let t = i as f64 / fs;
                let phase = if log_ratio.abs() < f64::EPSILON {
                    TAU * self.from_hz * t
                } else {
                    // Integral of f(t) for an exponential sweep
                    TAU * self.from_hz * duration / log_ratio * ((t / duration * log_ratio).exp() - 1.0)
                };
                phase.sin() as f32 * self.amplitude
            })
            .collect();

        Ok(Signal::new(samples, sample_rate))
    }
}
