//! Capture collaborators
//!
//! The estimator never touches audio devices. A [`CaptureSource`] is handed
//! in by the caller, plays the reference and returns what came back along
//! with any trigger delay it measured itself. [`SimulatedLoopback`] is a
//! device-free implementation for tests and dry runs.

use thiserror::Error;

use crate::signal::Signal;

/// Noise floor amplitude ceiling (-20dB)
const MAX_NOISE_AMPLITUDE: f32 = 0.1;

/// Errors raised by a capture source
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture failed: {0}")]
    Failed(String),
}

/// Captured audio plus timing reported by the capture path
#[derive(Debug, Clone)]
pub struct Capture {
    /// Recorded signal
    pub signal: Signal,
    /// Delay between capture start and playback start in seconds, if measured
    pub trigger_latency_s: Option<f64>,
}

/// Something that can play a reference and record the result
pub trait CaptureSource {
    /// Play `reference` and return the recording
    fn capture(&mut self, reference: &Signal) -> Result<Capture, CaptureError>;
}

/// Device-free loopback: the reference surrounded by silence
///
/// # Example
/// ```
/// use lagscope_core::{CaptureSource, Signal, SimulatedLoopback};
///
/// let reference = Signal::new(vec![0.5; 4], 8000);
/// let mut source = SimulatedLoopback::new(3, 2);
/// let capture = source.capture(&reference).unwrap();
/// assert_eq!(capture.signal.len(), 9);
/// assert_eq!(capture.signal.samples()[3], 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedLoopback {
    /// Silence before the reference, in samples
    lead_samples: usize,
    /// Silence after the reference, in samples
    tail_samples: usize,
    /// Peak amplitude of the added noise floor (0 = clean)
    noise_amplitude: f32,
    /// Trigger latency reported alongside the capture
    trigger_latency_s: Option<f64>,
    /// PRNG state for noise generation
    noise_seed: u32,
}

impl SimulatedLoopback {
    /// Loopback with `lead_samples` of silence before and `tail_samples` after
    pub fn new(lead_samples: usize, tail_samples: usize) -> Self {
        Self {
            lead_samples,
            tail_samples,
            noise_amplitude: 0.0,
            trigger_latency_s: None,
            noise_seed: 0xDEADBEEF,
        }
    }

    /// A quarter second of silence on each side of the reference
    pub fn quarter_second(sample_rate: u32) -> Self {
        let delay = sample_rate as usize / 4;
        Self::new(delay, delay)
    }

    /// Add a deterministic white-noise floor
    ///
    /// # Arguments
    /// * `amplitude` - Noise amplitude from 0.0 to 0.1
    pub fn with_noise(mut self, amplitude: f32) -> Self {
        self.noise_amplitude = amplitude.clamp(0.0, MAX_NOISE_AMPLITUDE);
        self
    }

    /// Report a fixed trigger latency with every capture
    pub fn with_trigger_latency(mut self, seconds: f64) -> Self {
        self.trigger_latency_s = Some(seconds);
        self
    }

    /// Silence before the reference, in samples
    pub fn lead_samples(&self) -> usize {
        self.lead_samples
    }

    /// Noise floor amplitude after clamping
    pub fn noise_amplitude(&self) -> f32 {
        self.noise_amplitude
    }

    /// Generate a single noise sample using LCG PRNG
    fn generate_noise(&mut self) -> f32 {
        // LCG parameters (same as glibc)
        self.noise_seed = self.noise_seed.wrapping_mul(1103515245).wrapping_add(12345);
        let bits = (self.noise_seed >> 16) & 0x7FFF;
        (bits as f32 / 16384.0) - 1.0
    }
}

impl CaptureSource for SimulatedLoopback {
    fn capture(&mut self, reference: &Signal) -> Result<Capture, CaptureError> {
        let mut samples = reference
            .padded(self.lead_samples, self.tail_samples, 0.0)
            .into_samples();

        if self.noise_amplitude > 0.0 {
            for sample in samples.iter_mut() {
                *sample += self.generate_noise() * self.noise_amplitude;
            }
        }

        tracing::trace!(
            lead = self.lead_samples,
            tail = self.tail_samples,
            noise = self.noise_amplitude,
            "simulated_capture"
        );

        Ok(Capture {
            signal: Signal::new(samples, reference.sample_rate()),
            trigger_latency_s: self.trigger_latency_s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_capture_layout() {
        let reference = Signal::new(vec![1.0, -1.0], 48000);
        let mut source = SimulatedLoopback::new(2, 1);
        let capture = source.capture(&reference).unwrap();
        assert_eq!(capture.signal.samples(), &[0.0, 0.0, 1.0, -1.0, 0.0]);
        assert_eq!(capture.signal.sample_rate(), 48000);
        assert_eq!(capture.trigger_latency_s, None);
    }

    #[test]
    fn test_quarter_second() {
        let source = SimulatedLoopback::quarter_second(44100);
        assert_eq!(source.lead_samples(), 11025);
    }

    #[test]
    fn test_noise_is_bounded_and_deterministic() {
        let reference = Signal::new(vec![0.0; 1000], 48000);
        let mut a = SimulatedLoopback::new(0, 0).with_noise(0.05);
        let mut b = SimulatedLoopback::new(0, 0).with_noise(0.05);
        let ca = a.capture(&reference).unwrap();
        let cb = b.capture(&reference).unwrap();
        assert_eq!(ca.signal, cb.signal);
        assert!(ca.signal.samples().iter().all(|s| s.abs() <= 0.05));
        assert!(ca.signal.samples().iter().any(|s| *s != 0.0));
    }

    #[test]
    fn test_noise_amplitude_clamped() {
        let source = SimulatedLoopback::new(0, 0).with_noise(0.9);
        assert_eq!(source.noise_amplitude(), MAX_NOISE_AMPLITUDE);
    }

    #[test]
    fn test_trigger_latency_reported() {
        let reference = Signal::new(vec![0.5; 4], 8000);
        let mut source = SimulatedLoopback::new(1, 1).with_trigger_latency(0.012);
        let capture = source.capture(&reference).unwrap();
        assert_eq!(capture.trigger_latency_s, Some(0.012));
    }
}
