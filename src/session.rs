//! Latency test runs
//!
//! A run synthesizes the reference chirp, hands it to a capture source,
//! correlates the recording against the reference and times the
//! computation. The capture source is injected so the same run works
//! against real hardware or a [`SimulatedLoopback`].

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lagscope_core::{
    Algorithm, CaptureSource, ChirpGenerator, EstimatorConfig, LagEstimate, LatencyEstimator,
    SimulatedLoopback,
};
use serde::Serialize;
use tracing::info;

use crate::config::TestConfig;

/// Outcome of one estimate within a run
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    /// The lag estimate, including the correlation curve
    pub estimate: LagEstimate,
    /// Sample rate of the run in Hz
    pub sample_rate: u32,
    /// Trigger latency reported by the capture source, in seconds
    pub trigger_latency_s: Option<f64>,
    /// Wall-clock time spent in the estimator
    pub computation_time_ms: f64,
    /// When the estimate was produced
    pub measured_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct CurveExport<'a> {
    algorithm: Algorithm,
    index_of_best_match: usize,
    lag_samples: i64,
    curve: &'a [f32],
}

impl TestReport {
    /// One-line human readable result
    pub fn summary(&self) -> String {
        format!(
            "Latency: {:.3}ms ({} samples, {}) | computation time: {:.3}ms",
            self.estimate.lag_ms,
            self.estimate.lag_samples,
            self.estimate.algorithm,
            self.computation_time_ms
        )
    }

    /// Write the correlation curve as JSON for an external plotter
    pub fn write_curve(&self, path: &Path) -> Result<()> {
        let export = CurveExport {
            algorithm: self.estimate.algorithm,
            index_of_best_match: self.estimate.index_of_best_match,
            lag_samples: self.estimate.lag_samples,
            curve: self.estimate.curve.as_slice(),
        };
        let json = serde_json::to_string(&export)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write curve to {}", path.display()))?;
        info!(path = %path.display(), points = self.estimate.curve.len(), "Curve written");
        Ok(())
    }
}

/// A configured latency test
#[derive(Debug, Clone)]
pub struct LatencyTest {
    config: TestConfig,
}

impl LatencyTest {
    /// Create a test from a configuration
    pub fn new(config: TestConfig) -> Self {
        Self { config }
    }

    /// Configuration of this test
    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Capture source matching the configured simulation settings
    pub fn simulated_source(&self) -> SimulatedLoopback {
        let delay = self.config.effective_delay();
        SimulatedLoopback::new(delay, delay).with_noise(self.config.noise_amplitude)
    }

    /// Run once with the configured algorithm
    pub fn run(&self, source: &mut dyn CaptureSource) -> Result<TestReport> {
        let mut reports = self.run_algorithms(source, &[self.config.algorithm])?;
        reports.pop().context("Latency run produced no report")
    }

    /// Capture once, then estimate with each algorithm in turn
    pub fn run_algorithms(
        &self,
        source: &mut dyn CaptureSource,
        algorithms: &[Algorithm],
    ) -> Result<Vec<TestReport>> {
        let generator = ChirpGenerator::new(self.config.chirp_from_hz, self.config.chirp_to_hz)
            .context("Invalid chirp configuration")?;
        let reference = generator
            .generate(self.config.chirp_length, self.config.sample_rate)
            .context("Failed to synthesize reference chirp")?;

        info!(
            samples = reference.len(),
            sample_rate = reference.sample_rate(),
            from_hz = generator.from_hz(),
            to_hz = generator.to_hz(),
            "Reference chirp ready"
        );

        let capture = source
            .capture(&reference)
            .context("Failed to capture recording")?;
        info!(
            samples = capture.signal.len(),
            duration_s = %format!("{:.3}", capture.signal.duration_secs()),
            "Recording captured"
        );

        let estimator = LatencyEstimator::new(EstimatorConfig {
            peak_policy: self.config.peak_policy,
        });

        let mut reports = Vec::with_capacity(algorithms.len());
        for &algorithm in algorithms {
            let start = Instant::now();
            let estimate = estimator
                .estimate(&reference, &capture.signal, algorithm, capture.trigger_latency_s)
                .with_context(|| format!("{algorithm} correlation failed"))?;
            let computation_time_ms = start.elapsed().as_secs_f64() * 1000.0;

            info!(
                algorithm = %algorithm,
                index = estimate.index_of_best_match,
                curve_len = estimate.curve.len(),
                lag_samples = estimate.lag_samples,
                latency_ms = %format!("{:.3}", estimate.lag_ms),
                computation_ms = %format!("{:.3}", computation_time_ms),
                "Latency estimated"
            );

            reports.push(TestReport {
                estimate,
                sample_rate: reference.sample_rate(),
                trigger_latency_s: capture.trigger_latency_s,
                computation_time_ms,
                measured_at: Utc::now(),
            });
        }

        Ok(reports)
    }
}
