//! Signature alignment
//!
//! Pipeline for one pair of tracks:
//!
//! ```text
//! Signatures → Novelty → Search → Edge expansion → Reconcile → Edge expansion → Offsets
//! ```
//!
//! A [`SignalComparer`] owns the two novelty series for the duration of the
//! run; every [`Window`] and [`MatchedPair`] produced along the way borrows
//! from it.

pub mod expansion;
pub mod matched_pair;
pub mod reconcile;
pub mod result;
pub mod search;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use matched_pair::MatchedPair;
pub use result::{AlignmentMetadata, AlignmentResult, MatchSpan};
pub use window::Window;

use std::time::{Duration, Instant};

use crate::config::AlignmentConfig;
use crate::error::SyncError;
use crate::features::novelty::{compute_novelty, Sample};
use crate::offsets::OffsetLookup;
use crate::signature::Signature;
use expansion::expand_edges;
use reconcile::Reconciler;
use search::Searcher;

/// Comparison session between two signatures
#[derive(Debug, Clone)]
pub struct SignalComparer {
    samples_per_second: u32,
    samples_a: Vec<Sample>,
    samples_b: Vec<Sample>,
    searcher: Searcher,
    reconciler: Reconciler,
    preparation_time: Duration,
}

impl SignalComparer {
    /// Decode both signatures and prepare their novelty series
    ///
    /// # Errors
    ///
    /// - `SyncError::SampleRateMismatch` if the signatures differ in rate
    /// - `SyncError::InvalidInput` if the configuration is invalid
    /// - `SyncError::DecodingError` if a signature cannot be decoded
    pub fn new(
        signature_a: &Signature,
        signature_b: &Signature,
        config: &AlignmentConfig,
    ) -> Result<Self, SyncError> {
        let start_time = Instant::now();
        if signature_a.samples_per_second != signature_b.samples_per_second {
            return Err(SyncError::SampleRateMismatch {
                first: signature_a.samples_per_second,
                second: signature_b.samples_per_second,
            });
        }
        Self::prepare(
            &signature_a.samples()?,
            &signature_b.samples()?,
            signature_a.samples_per_second,
            config,
            start_time,
        )
    }

    /// Prepare a session from raw peak samples sharing one rate
    pub fn from_samples(
        raw_a: &[u16],
        raw_b: &[u16],
        samples_per_second: u32,
        config: &AlignmentConfig,
    ) -> Result<Self, SyncError> {
        Self::prepare(raw_a, raw_b, samples_per_second, config, Instant::now())
    }

    fn prepare(
        raw_a: &[u16],
        raw_b: &[u16],
        samples_per_second: u32,
        config: &AlignmentConfig,
        start_time: Instant,
    ) -> Result<Self, SyncError> {
        if samples_per_second == 0 {
            return Err(SyncError::InvalidInput(
                "Signature rate must be positive".to_string(),
            ));
        }
        let searcher = Searcher::new(samples_per_second, config)?;
        let reconciler = Reconciler::from_config(samples_per_second, config)?;

        log::debug!(
            "Comparing {} and {} samples at {} samples/s (minimum match {} samples)",
            raw_a.len(),
            raw_b.len(),
            samples_per_second,
            searcher.minimum_match_samples()
        );

        let samples_a = compute_novelty(raw_a, config.smoothing_radius);
        let samples_b = compute_novelty(raw_b, config.smoothing_radius);

        Ok(Self {
            samples_per_second,
            samples_a,
            samples_b,
            searcher,
            reconciler,
            preparation_time: start_time.elapsed(),
        })
    }

    /// Signature rate shared by both tracks
    pub fn samples_per_second(&self) -> u32 {
        self.samples_per_second
    }

    /// Novelty series of track A
    pub fn samples_a(&self) -> &[Sample] {
        &self.samples_a
    }

    /// Novelty series of track B
    pub fn samples_b(&self) -> &[Sample] {
        &self.samples_b
    }

    /// Time spent decoding signatures and computing novelty
    pub fn preparation_time(&self) -> Duration {
        self.preparation_time
    }

    /// Search, reconcile and expand; the final ordered match list
    ///
    /// Returns an empty list when the tracks do not correlate (including
    /// tracks shorter than the minimum match length).
    pub fn find_matches(&self) -> Result<Vec<MatchedPair<'_>>, SyncError> {
        let mut matches = self.searcher.find_matches(
            Window::full(&self.samples_a),
            Window::full(&self.samples_b),
        );
        if matches.is_empty() {
            log::warn!("No match found, tracks are uncorrelated");
            return Ok(matches);
        }
        log::debug!("Search found {} raw matches", matches.len());

        expand_edges(&mut matches)?;
        let mut matches = self.reconciler.reconcile(matches)?;
        expand_edges(&mut matches)?;
        Ok(matches)
    }

    /// Offset lookup translating track A positions into track B
    pub fn find_offsets(&self) -> Result<OffsetLookup, SyncError> {
        let spans: Vec<MatchSpan> = self.find_matches()?.iter().map(MatchSpan::from).collect();
        Ok(OffsetLookup::from_matches(
            &spans,
            self.samples_a.len(),
            self.samples_per_second,
        ))
    }

    /// Run the full comparison and collect an owned result
    pub fn align(&self) -> Result<AlignmentResult, SyncError> {
        let start_time = Instant::now();

        let spans: Vec<MatchSpan> = self.find_matches()?.iter().map(MatchSpan::from).collect();
        let offsets =
            OffsetLookup::from_matches(&spans, self.samples_a.len(), self.samples_per_second);

        let matched: usize = spans.iter().map(|s| s.length).sum();
        let coverage = |len: usize| {
            if len == 0 {
                0.0
            } else {
                matched as f64 / len as f64
            }
        };
        let coverage_a = coverage(self.samples_a.len());
        let coverage_b = coverage(self.samples_b.len());

        for span in &spans {
            log::debug!(
                "final offset {:6}, error {:9.0}, A {}..{}, B {}..{}",
                span.offset,
                span.total_error,
                span.start_a,
                span.end_a(),
                span.start_b,
                span.end_b()
            );
        }
        log::info!(
            "Aligned {} matches: coverage A = {:.2}%, B = {:.2}%",
            spans.len(),
            coverage_a * 100.0,
            coverage_b * 100.0
        );

        Ok(AlignmentResult {
            metadata: AlignmentMetadata {
                samples_a: self.samples_a.len(),
                samples_b: self.samples_b.len(),
                samples_per_second: self.samples_per_second,
                match_count: spans.len(),
                coverage_a,
                coverage_b,
                processing_time_ms: (self.preparation_time + start_time.elapsed()).as_secs_f32()
                    * 1000.0,
            },
            matches: spans,
            offsets,
        })
    }
}
