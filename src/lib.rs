//! # Tracksync DSP
//!
//! Alignment engine for audio signatures: given the peak-amplitude envelopes
//! of two edits or encodes of the same recording, it finds where their
//! content matches and builds a piecewise time remapping from the first
//! timeline to the second. Scripts, subtitles and other timed annotations can
//! then be carried over from one edit to the other.
//!
//! ## Quick Start
//!
//! ```no_run
//! use time::Duration;
//! use tracksync_dsp::{align_signatures, AlignmentConfig, Signature};
//!
//! // Peak envelopes at 120 samples per second, e.g. from `Signature::from_pcm`
//! let original = Signature::from_samples(120, &[0u16; 120 * 60])?;
//! let reedit = Signature::from_samples(120, &[0u16; 120 * 60])?;
//!
//! let mut result = align_signatures(&original, &reedit, &AlignmentConfig::default())?;
//! if result.is_correlated() {
//!     let moved = result.offsets.transform_position(Duration::seconds(42));
//!     println!("42s in the original is {:?} in the re-edit", moved);
//! }
//! # Ok::<(), tracksync_dsp::SyncError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Signature → Novelty → Recursive search → Reconcile → Offset lookup
//! ```
//!
//! Only piecewise-constant offsets are modeled: cuts, insertions and shifted
//! sections, not speed or pitch changes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alignment;
pub mod config;
pub mod error;
pub mod features;
pub mod offsets;
pub mod signature;

// Re-export main types
pub use alignment::{AlignmentMetadata, AlignmentResult, MatchSpan, MatchedPair, SignalComparer, Window};
pub use config::AlignmentConfig;
pub use error::SyncError;
pub use features::novelty::Sample;
pub use offsets::{OffsetLookup, OffsetSegment, PartSegment};
pub use signature::Signature;

/// Main alignment function
///
/// Compares two signatures and returns the final matches, the offset lookup
/// for track A and run diagnostics.
///
/// # Arguments
///
/// * `signature_a` - Signature of the timeline positions are translated from
/// * `signature_b` - Signature of the timeline positions are translated to
/// * `config` - Alignment configuration parameters
///
/// # Errors
///
/// Returns `SyncError` if the signatures have different rates, cannot be
/// decoded, or the configuration is invalid. Tracks that do not correlate
/// are not an error: see [`AlignmentResult::is_correlated`].
pub fn align_signatures(
    signature_a: &Signature,
    signature_b: &Signature,
    config: &AlignmentConfig,
) -> Result<AlignmentResult, SyncError> {
    log::debug!(
        "Starting alignment: {} vs {} compressed bytes at {} samples/s",
        signature_a.compressed_samples.len(),
        signature_b.compressed_samples.len(),
        signature_a.samples_per_second
    );
    SignalComparer::new(signature_a, signature_b, config)?.align()
}
