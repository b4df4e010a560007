//! Lag estimation
//!
//! This module contains the correlation engine:
//! - Zero-padding and power-of-two sizing ([`padding`])
//! - Sliding absolute-difference scan ([`direct`])
//! - FFT-based circular cross-correlation ([`spectral`])
//! - Peak-to-lag conversion and orchestration ([`estimator`])

pub mod direct;
pub mod error;
pub mod estimator;
pub mod padding;
pub mod spectral;

pub use error::{CorrelationError, Result};
