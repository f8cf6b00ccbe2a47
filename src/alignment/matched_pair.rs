//! Matched window pairs and their alignment error

use std::fmt;

use super::window::Window;
use crate::error::SyncError;
use crate::features::novelty::Sample;

/// Two equal-length windows believed to hold the same audio
///
/// The error is the summed absolute value difference at corresponding
/// positions, computed once when the pair is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPair<'a> {
    window_a: Window<'a>,
    window_b: Window<'a>,
    total_error: f64,
}

impl<'a> MatchedPair<'a> {
    /// Pair two windows and score them
    ///
    /// # Errors
    ///
    /// Returns `SyncError::LengthMismatch` if the windows differ in length
    pub fn new(window_a: Window<'a>, window_b: Window<'a>) -> Result<Self, SyncError> {
        if window_a.len() != window_b.len() {
            return Err(SyncError::LengthMismatch {
                left: window_a.len(),
                right: window_b.len(),
            });
        }
        let total_error = sum_abs_diff(window_a.as_slice(), window_b.as_slice());
        Ok(Self {
            window_a,
            window_b,
            total_error,
        })
    }

    /// Window over track A
    pub fn window_a(&self) -> Window<'a> {
        self.window_a
    }

    /// Window over track B
    pub fn window_b(&self) -> Window<'a> {
        self.window_b
    }

    /// Summed absolute difference over the pair
    pub fn total_error(&self) -> f64 {
        self.total_error
    }

    /// `window_a.start - window_b.start`, constant over the pair
    pub fn offset(&self) -> isize {
        self.window_a.start() as isize - self.window_b.start() as isize
    }

    /// Number of samples in each window
    pub fn len(&self) -> usize {
        self.window_a.len()
    }

    /// True if the pair covers no samples
    pub fn is_empty(&self) -> bool {
        self.window_a.is_empty()
    }
}

impl fmt::Display for MatchedPair<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:6}, {:9.0}, {}, {}",
            self.offset(),
            self.total_error,
            self.window_a,
            self.window_b
        )
    }
}

/// Summed absolute value difference of two sample runs
pub fn sum_abs_diff(a: &[Sample], b: &[Sample]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x.value - y.value).abs())
        .sum()
}

/// Same as [`sum_abs_diff`], but gives up once the sum reaches `bound`
///
/// Returns `None` when the pair cannot beat `bound`. The searcher keeps a
/// candidate only if it is strictly better than the best so far, so pruning
/// never changes which pair wins.
pub fn sum_abs_diff_bounded(a: &[Sample], b: &[Sample], bound: f64) -> Option<f64> {
    let mut total = 0.0;
    for (x, y) in a.iter().zip(b) {
        total += (x.value - y.value).abs();
        if total >= bound {
            return None;
        }
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::novelty::compute_novelty;

    #[test]
    fn test_error_and_offset() {
        let a = compute_novelty(&[0, 0, 5, 7, 9, 0], 0);
        let b = compute_novelty(&[5, 7, 8, 0], 0);
        let pair = MatchedPair::new(
            Window::new(&a, 2, 3).unwrap(),
            Window::new(&b, 0, 3).unwrap(),
        )
        .unwrap();
        assert_eq!(pair.offset(), 2);
        assert_eq!(pair.len(), 3);
        assert_eq!(pair.total_error(), 1.0);
    }

    #[test]
    fn test_negative_offset() {
        let a = compute_novelty(&[1; 10], 0);
        let b = compute_novelty(&[1; 10], 0);
        let pair = MatchedPair::new(
            Window::new(&a, 1, 4).unwrap(),
            Window::new(&b, 5, 4).unwrap(),
        )
        .unwrap();
        assert_eq!(pair.offset(), -4);
        assert_eq!(pair.total_error(), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let a = compute_novelty(&[1; 10], 0);
        let result = MatchedPair::new(
            Window::new(&a, 0, 4).unwrap(),
            Window::new(&a, 0, 5).unwrap(),
        );
        assert!(matches!(
            result,
            Err(SyncError::LengthMismatch { left: 4, right: 5 })
        ));
    }

    #[test]
    fn test_bounded_sum() {
        let a = compute_novelty(&[0, 0, 0, 0], 0);
        let b = compute_novelty(&[1, 1, 1, 1], 0);
        assert_eq!(sum_abs_diff_bounded(&a, &b, 10.0), Some(4.0));
        assert_eq!(sum_abs_diff_bounded(&a, &b, 4.0), None);
        assert_eq!(sum_abs_diff_bounded(&a, &b, f64::INFINITY), Some(4.0));
    }
}
