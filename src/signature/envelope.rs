//! Peak-envelope reduction of PCM audio
//!
//! A signature stores one sample per block of PCM frames: the largest
//! absolute amplitude in the block. At the usual 120 samples per second this
//! keeps enough shape to align edits while staying tiny.

use crate::error::SyncError;

/// Reduce mono PCM to its peak envelope
///
/// # Arguments
///
/// * `pcm` - Mono 16-bit PCM samples
/// * `samples_per_peak` - Number of PCM samples folded into one peak
///
/// # Returns
///
/// One peak per block, including a trailing partial block
///
/// # Errors
///
/// Returns `SyncError::InvalidInput` if `samples_per_peak` is zero
pub fn peak_envelope(pcm: &[i16], samples_per_peak: usize) -> Result<Vec<u16>, SyncError> {
    if samples_per_peak == 0 {
        return Err(SyncError::InvalidInput(
            "Block size for peak envelope must be positive".to_string(),
        ));
    }

    log::debug!(
        "Computing peak envelope: {} PCM samples, {} per peak",
        pcm.len(),
        samples_per_peak
    );

    Ok(pcm
        .chunks(samples_per_peak)
        .map(|block| block.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_maxima() {
        let pcm = [1, -5, 3, 2, -2, 0, 7];
        let peaks = peak_envelope(&pcm, 3).unwrap();
        assert_eq!(peaks, vec![5, 2, 7]);
    }

    #[test]
    fn test_extreme_negative() {
        let peaks = peak_envelope(&[i16::MIN, 0], 2).unwrap();
        assert_eq!(peaks, vec![32768]);
    }

    #[test]
    fn test_zero_block_size() {
        assert!(peak_envelope(&[1, 2], 0).is_err());
    }

    #[test]
    fn test_empty_pcm() {
        assert!(peak_envelope(&[], 4).unwrap().is_empty());
    }
}
