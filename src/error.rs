//! Error types for the alignment engine

use thiserror::Error;

/// Errors that can occur while building signatures or aligning them
///
/// A pair of tracks that simply do not correlate is not an error: the
/// comparer returns an empty match list in that case.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The two signatures were not sampled at the same rate
    #[error("Sample rate mismatch: first signature is {first} samples/s, second is {second} samples/s")]
    SampleRateMismatch {
        /// Rate of the first signature
        first: u32,
        /// Rate of the second signature
        second: u32,
    },

    /// A matched pair was built from windows of different lengths
    #[error("Length mismatch: {left} vs {right} samples")]
    LengthMismatch {
        /// Length of the window over track A
        left: usize,
        /// Length of the window over track B
        right: usize,
    },

    /// Compression or decompression of a signature failed
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// Round-trip validation of a freshly compressed signature failed
    #[error("Codec integrity error: {0}")]
    CodecIntegrity(String),

    /// Internal processing error
    #[error("Processing error: {0}")]
    ProcessingError(String),
}
