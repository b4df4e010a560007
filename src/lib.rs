//! Lagscope - round-trip audio latency measurement
//!
//! This library re-exports the correlation engine from `lagscope-core` and
//! adds the application layer: persistent configuration ([`config`]) and the
//! synthesize → capture → estimate test run ([`session`]).

pub mod config;
pub mod session;

pub use lagscope_core::{capture, chirp, dsp, signal};

pub use lagscope_core::{
    Algorithm, Capture, CaptureError, CaptureSource, ChirpGenerator, CorrelationCurve,
    CorrelationError, EstimatorConfig, LagEstimate, LatencyEstimator, PeakPolicy, Signal,
    SimulatedLoopback,
};
pub use lagscope_core::{DEFAULT_CHIRP_LENGTH, DEFAULT_SAMPLE_RATE, VERSION};

pub use config::TestConfig;
pub use session::{LatencyTest, TestReport};
