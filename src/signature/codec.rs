//! Lossless codec for peak-amplitude sample streams
//!
//! Each sample is written as two big-endian bytes and the resulting stream is
//! compressed with zstd. Decoding reverses both steps; there is no partial or
//! streaming decode.
//!
//! # Example
//!
//! ```
//! use tracksync_dsp::signature::codec::{decode, encode};
//!
//! let samples = vec![0u16, 1, 500, u16::MAX];
//! let bytes = encode(&samples)?;
//! assert_eq!(decode(&bytes)?, samples);
//! # Ok::<(), tracksync_dsp::SyncError>(())
//! ```

use crate::error::SyncError;

/// zstd level used for signatures (peak envelopes compress well at low levels)
const COMPRESSION_LEVEL: i32 = 3;

/// Compress a sample stream
///
/// # Errors
///
/// Returns `SyncError::DecodingError` if the compressor fails
pub fn encode(samples: &[u16]) -> Result<Vec<u8>, SyncError> {
    let mut raw = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        raw.extend_from_slice(&sample.to_be_bytes());
    }

    let compressed = zstd::stream::encode_all(raw.as_slice(), COMPRESSION_LEVEL)
        .map_err(|e| SyncError::DecodingError(format!("Compression failed: {}", e)))?;

    log::debug!(
        "Encoded {} samples into {} bytes ({} raw)",
        samples.len(),
        compressed.len(),
        raw.len()
    );

    Ok(compressed)
}

/// Decompress a sample stream produced by [`encode`]
///
/// # Errors
///
/// Returns `SyncError::DecodingError` if the bytes are not a valid zstd frame
/// or decompress to an odd number of bytes
pub fn decode(bytes: &[u8]) -> Result<Vec<u16>, SyncError> {
    let raw = zstd::stream::decode_all(bytes)
        .map_err(|e| SyncError::DecodingError(format!("Decompression failed: {}", e)))?;

    if raw.len() % 2 != 0 {
        return Err(SyncError::DecodingError(format!(
            "Decompressed stream has odd length {}",
            raw.len()
        )));
    }

    Ok(raw
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let samples: Vec<u16> = (0..5000u32).map(|i| ((i * 7919) % 65536) as u16).collect();
        let bytes = encode(&samples).unwrap();
        assert_eq!(decode(&bytes).unwrap(), samples);
    }

    #[test]
    fn test_empty() {
        let bytes = encode(&[]).unwrap();
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_big_endian_layout() {
        let bytes = encode(&[0x1234]).unwrap();
        let raw = zstd::stream::decode_all(bytes.as_slice()).unwrap();
        assert_eq!(raw, vec![0x12, 0x34]);
    }

    #[test]
    fn test_odd_length_rejected() {
        let bytes = zstd::stream::encode_all(&[1u8, 2, 3][..], COMPRESSION_LEVEL).unwrap();
        assert!(matches!(decode(&bytes), Err(SyncError::DecodingError(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(decode(&[0xde, 0xad, 0xbe, 0xef]).is_err());
    }
}
