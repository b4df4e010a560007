//! E2E tests for lag estimation
//!
//! Drives the estimator the way a latency test does: a synthetic chirp as
//! the reference and a padded copy of it as the recording.
//!
//! ## Expected results
//!
//! ```text
//! reference: 1024-sample chirp at 44.1kHz
//! recording: 500 zeros + chirp + 500 zeros (2024 samples)
//! lag:       500 samples = 500 * 1000 / 44100 ≈ 11.338ms
//! ```

use approx::assert_abs_diff_eq;
use lagscope::dsp::direct::DirectCorrelator;
use lagscope::dsp::padding::{next_power_of_two_padding, pad_signal};
use lagscope::dsp::spectral::SpectralCorrelator;
use lagscope::{
    Algorithm, ChirpGenerator, CorrelationError, EstimatorConfig, LatencyEstimator, PeakPolicy,
    Signal,
};

fn chirp(length: usize, rate: u32) -> Signal {
    ChirpGenerator::default().generate(length, rate).unwrap()
}

/// The reference case: 1024-sample chirp with 500 samples of silence each side
#[test]
fn test_chirp_500_sample_delay_both_algorithms() {
    let reference = chirp(1024, 44100);
    let recording = reference.padded(500, 500, 0.0);
    assert_eq!(recording.len(), 2024);

    let estimator = LatencyEstimator::default();
    let spectral = estimator
        .estimate(&reference, &recording, Algorithm::Spectral, None)
        .unwrap();
    let direct = estimator
        .estimate(&reference, &recording, Algorithm::Direct, None)
        .unwrap();

    assert_eq!(spectral.lag_samples, 500);
    assert_eq!(direct.lag_samples, 500);
    assert_eq!(direct.index_of_best_match, 500);
    assert_abs_diff_eq!(spectral.lag_ms, 11.3378, epsilon = 1e-3);
    assert_abs_diff_eq!(spectral.lag_ms, direct.lag_ms, epsilon = 1e-9);

    // 2024 -> 4096 guard band; direct curve spans every start offset
    assert_eq!(spectral.curve.len(), 4096);
    assert_eq!(direct.curve.len(), 2024 - 1024 + 1);
    assert_abs_diff_eq!(spectral.peak_value, 1.0, epsilon = 1e-2);
}

/// Manual preparation through the padding helpers gives the same answer
#[test]
fn test_manual_preparation_matches_estimator() {
    let reference = chirp(1024, 44100);
    let recording = reference.padded(500, 500, 0.0);

    let padded_reference = pad_signal(reference.samples(), 0, 1000, 0.0);
    let guard = next_power_of_two_padding(recording.len()).unwrap();
    let a = pad_signal(recording.samples(), 0, guard, 0.0);
    let b = pad_signal(&padded_reference, 0, guard, 0.0);

    let result = SpectralCorrelator::default().correlate(&a, &b).unwrap();
    assert_eq!(result.lag, 500);
    assert_eq!(result.index_of_best_match, 500);
}

/// Correlating the reference against itself finds zero lag in both paths
#[test]
fn test_self_correlation() {
    let reference = chirp(2048, 48000);

    let direct = DirectCorrelator::correlate(reference.samples(), reference.samples()).unwrap();
    assert_eq!(direct.index_of_best_match, 0);
    assert_eq!(direct.curve[0], 0.0);

    let spectral = SpectralCorrelator::default()
        .correlate(reference.samples(), reference.samples())
        .unwrap();
    assert_eq!(spectral.index_of_best_match, 0);
    assert_abs_diff_eq!(spectral.peak_value, 1.0, epsilon = 1e-3);
}

/// Delays across the window agree between algorithms
#[test]
fn test_delay_sweep() {
    let reference = chirp(512, 44100);
    let estimator = LatencyEstimator::default();

    for delay in [0usize, 1, 7, 64, 250, 511] {
        let recording = reference.padded(delay, 512 - delay, 0.0);
        let spectral = estimator
            .estimate(&reference, &recording, Algorithm::Spectral, None)
            .unwrap();
        let direct = estimator
            .estimate(&reference, &recording, Algorithm::Direct, None)
            .unwrap();
        assert_eq!(spectral.lag_samples, delay as i64, "spectral, delay {}", delay);
        assert_eq!(direct.lag_samples, delay as i64, "direct, delay {}", delay);
    }
}

/// A noisy capture still lands on the right lag
#[test]
fn test_noisy_recording() {
    let reference = chirp(4096, 44100);
    let clean = reference.padded(1234, 800, 0.0);

    let mut seed = 0x1234_5678u32;
    let noisy: Vec<f32> = clean
        .samples()
        .iter()
        .map(|s| {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let noise = (((seed >> 16) & 0x7FFF) as f32 / 16384.0) - 1.0;
            s + noise * 0.05
        })
        .collect();
    let recording = Signal::new(noisy, 44100);

    let estimate = LatencyEstimator::default()
        .estimate(&reference, &recording, Algorithm::Spectral, None)
        .unwrap();
    assert_eq!(estimate.lag_samples, 1234);
    assert!(estimate.peak_value > 0.5);
}

/// A polarity-inverted capture is found under either peak policy with different peaks
#[test]
fn test_inverted_recording_peak_policies() {
    let reference = chirp(1024, 44100);
    let inverted: Vec<f32> = reference
        .padded(300, 300, 0.0)
        .samples()
        .iter()
        .map(|s| -s)
        .collect();
    let recording = Signal::new(inverted, 44100);

    let absolute = LatencyEstimator::new(EstimatorConfig {
        peak_policy: PeakPolicy::Absolute,
    })
    .estimate(&reference, &recording, Algorithm::Spectral, None)
    .unwrap();
    assert_eq!(absolute.lag_samples, 300);
    assert!(absolute.peak_value < -0.9);

    let signed = LatencyEstimator::new(EstimatorConfig {
        peak_policy: PeakPolicy::Signed,
    })
    .estimate(&reference, &recording, Algorithm::Spectral, None)
    .unwrap();
    assert!(signed.peak_value > 0.0);
    assert!(signed.peak_value < absolute.peak_value.abs());
}

#[test]
fn test_trigger_latency_isolates_round_trip() {
    let reference = chirp(1024, 44100);
    let recording = reference.padded(441, 100, 0.0);

    let estimate = LatencyEstimator::default()
        .estimate(&reference, &recording, Algorithm::Spectral, Some(0.004))
        .unwrap();
    assert_eq!(estimate.lag_samples, 441);
    // 10ms total, 4ms of it was harness overhead
    assert_abs_diff_eq!(estimate.lag_ms, 6.0, epsilon = 1e-9);
}

#[test]
fn test_sample_rate_mismatch_any_algorithm() {
    let reference = chirp(256, 44100);
    let recording = chirp(256, 48000).padded(10, 10, 0.0);

    for algorithm in [Algorithm::Direct, Algorithm::Spectral] {
        let err = LatencyEstimator::default()
            .estimate(&reference, &recording, algorithm, None)
            .unwrap_err();
        assert!(
            matches!(err, CorrelationError::SampleRateMismatch { .. }),
            "{:?}",
            err
        );
    }
}

#[test]
fn test_spectral_rejects_invalid_lengths() {
    let correlator = SpectralCorrelator::default();
    let odd = vec![0.5f32; 1023];
    let even = vec![0.5f32; 1024];

    assert!(matches!(
        correlator.correlate(&odd, &odd),
        Err(CorrelationError::InvalidInput(_))
    ));
    assert!(matches!(
        correlator.correlate(&[], &[]),
        Err(CorrelationError::InvalidInput(_))
    ));
    assert!(matches!(
        correlator.correlate(&even, &even[..1022]),
        Err(CorrelationError::InvalidInput(_))
    ));
}
