//! Zero-padding and power-of-two sizing
//!
//! Circular correlation wraps the end of the window onto its start. Padding
//! both signals with a guard band of zeros past the next power of two keeps
//! the wrapped tail silent, so the circular result matches a linear one for
//! every lag of interest.

use super::error::{CorrelationError, Result};

/// Return a copy of `samples` with `left` and `right` samples of `fill` added
///
/// # Example
/// ```
/// use lagscope_core::dsp::padding::pad_signal;
///
/// let padded = pad_signal(&[1.0, 2.0], 1, 2, 0.0);
/// assert_eq!(padded, vec![0.0, 1.0, 2.0, 0.0, 0.0]);
/// ```
pub fn pad_signal(samples: &[f32], left: usize, right: usize, fill: f32) -> Vec<f32> {
    let mut padded = Vec::with_capacity(samples.len() + left + right);
    padded.resize(left, fill);
    padded.extend_from_slice(samples);
    padded.resize(samples.len() + left + right, fill);
    padded
}

/// Right-padding needed to reach the guard-band power of two
///
/// Returns 0 when `length` is already a power of two. Otherwise the target is
/// the power of two *after* the next one (e.g. 1000 → 2048, not 1024), which
/// leaves at least as many zeros as signal in the circular window.
///
/// # Errors
/// [`CorrelationError::InvalidInput`] if `length` is zero.
///
/// # Example
/// ```
/// use lagscope_core::dsp::padding::next_power_of_two_padding;
///
/// assert_eq!(next_power_of_two_padding(1024).unwrap(), 0);
/// assert_eq!(next_power_of_two_padding(1000).unwrap(), 1048);
/// ```
pub fn next_power_of_two_padding(length: usize) -> Result<usize> {
    if length == 0 {
        return Err(CorrelationError::invalid("cannot size a zero-length signal"));
    }
    if length.is_power_of_two() {
        return Ok(0);
    }
    let target = length
        .checked_next_power_of_two()
        .and_then(|p| p.checked_mul(2))
        .ok_or_else(|| CorrelationError::invalid(format!("signal too long: {length}")))?;
    Ok(target - length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_lengths() {
        let s = [0.1f32, 0.2, 0.3];
        for (l, r) in [(0, 0), (1, 0), (0, 4), (5, 7)] {
            assert_eq!(pad_signal(&s, l, r, 0.0).len(), s.len() + l + r);
        }
    }

    #[test]
    fn test_pad_identity() {
        let s = [0.25f32, -0.5, 1.0];
        assert_eq!(pad_signal(&s, 0, 0, 9.0), s.to_vec());
    }

    #[test]
    fn test_pad_fill_regions() {
        let padded = pad_signal(&[1.0, 2.0], 2, 3, -1.0);
        assert_eq!(padded, vec![-1.0, -1.0, 1.0, 2.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_pad_empty_input() {
        assert_eq!(pad_signal(&[], 1, 1, 0.5), vec![0.5, 0.5]);
    }

    #[test]
    fn test_power_of_two_is_noop() {
        for n in [1usize, 2, 4, 512, 4096, 1 << 20] {
            assert_eq!(next_power_of_two_padding(n).unwrap(), 0, "n = {}", n);
        }
    }

    #[test]
    fn test_padding_reaches_power_of_two() {
        for n in [3usize, 5, 6, 7, 100, 1000, 2024, 44100] {
            let p = next_power_of_two_padding(n).unwrap();
            assert!((n + p).is_power_of_two(), "n = {}, p = {}", n, p);
            assert!(n + p > n);
            // Double step: at least twice the original length
            assert!(n + p >= 2 * n, "n = {}, p = {}", n, p);
        }
    }

    #[test]
    fn test_known_paddings() {
        assert_eq!(next_power_of_two_padding(3).unwrap(), 5);
        assert_eq!(next_power_of_two_padding(2024).unwrap(), 2072);
        assert_eq!(next_power_of_two_padding(44100).unwrap(), 131072 - 44100);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            next_power_of_two_padding(0),
            Err(CorrelationError::InvalidInput(_))
        ));
    }
}
