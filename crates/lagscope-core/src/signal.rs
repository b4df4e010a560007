//! Sampled single-channel signal

use crate::dsp::padding::pad_signal;

/// An immutable sequence of samples tagged with its sample rate
///
/// Signals are produced by capture or synthesis and only ever read by the
/// correlation engine.
///
/// # Example
/// ```
/// use lagscope_core::Signal;
///
/// let signal = Signal::new(vec![0.0, 0.5, -0.5, 0.0], 48000);
/// assert_eq!(signal.len(), 4);
/// assert!((signal.duration_secs() - 4.0 / 48000.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Signal {
    /// Create a signal from samples at the given sample rate (Hz)
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Sample data
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the signal holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// New signal with `left` and `right` samples of `fill` around this one
    pub fn padded(&self, left: usize, right: usize, fill: f32) -> Signal {
        Signal {
            samples: pad_signal(&self.samples, left, right, fill),
            sample_rate: self.sample_rate,
        }
    }

    /// Consume the signal, returning its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
