//! Persistent latency test configuration
//!
//! Stores chirp shape, sample rate and algorithm choice in a JSON file at
//! `<data_dir>/lagscope/config.json`.

use std::path::{Path, PathBuf};

use lagscope_core::chirp::{DEFAULT_FROM_HZ, DEFAULT_TO_HZ};
use lagscope_core::{Algorithm, PeakPolicy, DEFAULT_CHIRP_LENGTH, DEFAULT_SAMPLE_RATE};
use serde::{Deserialize, Serialize};

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_chirp_length() -> usize {
    DEFAULT_CHIRP_LENGTH
}

fn default_from_hz() -> f64 {
    DEFAULT_FROM_HZ
}

fn default_to_hz() -> f64 {
    DEFAULT_TO_HZ
}

/// Latency test configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Chirp length in samples
    #[serde(default = "default_chirp_length")]
    pub chirp_length: usize,
    /// Sweep start frequency in Hz
    #[serde(default = "default_from_hz")]
    pub chirp_from_hz: f64,
    /// Sweep end frequency in Hz
    #[serde(default = "default_to_hz")]
    pub chirp_to_hz: f64,
    /// Correlation algorithm
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Peak selection for the spectral path
    #[serde(default)]
    pub peak_policy: PeakPolicy,
    /// Simulated loopback delay in samples (None = a quarter second)
    #[serde(default)]
    pub delay_samples: Option<usize>,
    /// Simulated noise floor amplitude
    #[serde(default)]
    pub noise_amplitude: f32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            chirp_length: default_chirp_length(),
            chirp_from_hz: default_from_hz(),
            chirp_to_hz: default_to_hz(),
            algorithm: Algorithm::default(),
            peak_policy: PeakPolicy::default(),
            delay_samples: None,
            noise_amplitude: 0.0,
        }
    }
}

impl TestConfig {
    /// Config file path: `<data_dir>/lagscope/config.json`
    pub fn path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lagscope")
            .join("config.json")
    }

    /// Load config from the default path, falling back to defaults on any error
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded config from disk");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to disk, creating parent directories if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Config saved to disk");
        Ok(())
    }

    /// Simulated loopback delay, defaulting to a quarter second
    pub fn effective_delay(&self) -> usize {
        self.delay_samples.unwrap_or(self.sample_rate as usize / 4)
    }
}
