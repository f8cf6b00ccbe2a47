//! Alignment result types

use serde::{Deserialize, Serialize};

use super::matched_pair::MatchedPair;
use crate::offsets::OffsetLookup;

/// Owned summary of one final match, in signature samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// First sample of the match in track A
    pub start_a: usize,

    /// First sample of the match in track B
    pub start_b: usize,

    /// Number of samples covered in each track
    pub length: usize,

    /// `start_a - start_b`
    pub offset: isize,

    /// Summed absolute difference over the match
    pub total_error: f64,
}

impl MatchSpan {
    /// One past the last sample covered in track A
    pub fn end_a(&self) -> usize {
        self.start_a + self.length
    }

    /// One past the last sample covered in track B
    pub fn end_b(&self) -> usize {
        self.start_b + self.length
    }
}

impl From<&MatchedPair<'_>> for MatchSpan {
    fn from(pair: &MatchedPair<'_>) -> Self {
        Self {
            start_a: pair.window_a().start(),
            start_b: pair.window_b().start(),
            length: pair.len(),
            offset: pair.offset(),
            total_error: pair.total_error(),
        }
    }
}

/// Diagnostics for one comparison run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentMetadata {
    /// Length of track A in signature samples
    pub samples_a: usize,

    /// Length of track B in signature samples
    pub samples_b: usize,

    /// Signature rate shared by both tracks
    pub samples_per_second: u32,

    /// Number of final matches
    pub match_count: usize,

    /// Fraction of track A covered by matches (0.0-1.0)
    pub coverage_a: f64,

    /// Fraction of track B covered by matches (0.0-1.0)
    pub coverage_b: f64,

    /// Processing time in milliseconds, from signature decoding to the final result
    pub processing_time_ms: f32,
}

/// Complete alignment result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Final matches, ordered by position
    pub matches: Vec<MatchSpan>,

    /// Time remapping from track A to track B
    pub offsets: OffsetLookup,

    /// Run diagnostics
    pub metadata: AlignmentMetadata,
}

impl AlignmentResult {
    /// False when no part of the tracks could be matched
    ///
    /// An uncorrelated pair still carries a lookup (a single unmapped
    /// segment), so callers can translate positions without special-casing.
    pub fn is_correlated(&self) -> bool {
        !self.matches.is_empty()
    }
}
