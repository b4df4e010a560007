//! Lagscope Core - lag estimation engine for round-trip audio latency
//!
//! Correlates a known reference waveform (a synthetic chirp) against a
//! captured recording and estimates the sample offset at which the two best
//! align. Two interchangeable algorithms are provided: a direct time-domain
//! divergence scan and an FFT-based circular cross-correlation.
//!
//! Device capture and chirp synthesis are collaborators; simple reference
//! implementations live in [`capture`] and [`chirp`].

pub mod capture;
pub mod chirp;
pub mod dsp;
pub mod signal;

pub use capture::{Capture, CaptureError, CaptureSource, SimulatedLoopback};
pub use chirp::ChirpGenerator;
pub use dsp::estimator::{
    Algorithm, CorrelationCurve, EstimatorConfig, LagEstimate, LatencyEstimator,
};
pub use dsp::spectral::PeakPolicy;
pub use dsp::{CorrelationError, Result};
pub use signal::Signal;

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default sample rate for latency tests (CD quality, the usual browser/device default)
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default chirp length in samples (~0.74s at 44.1kHz)
pub const DEFAULT_CHIRP_LENGTH: usize = 32768;
