//! Audio signatures
//!
//! A signature is the compressed peak-amplitude envelope of one audio track,
//! sampled at a fixed rate (typically 120 samples per second). It is built
//! once per track and never modified.

pub mod codec;
pub mod envelope;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::error::SyncError;

/// Format version written alongside new signatures
pub const SIGNATURE_VERSION: &str = "1.0";

/// Default signature rate in samples per second
pub const DEFAULT_SAMPLES_PER_SECOND: u32 = 120;

fn default_version() -> String {
    SIGNATURE_VERSION.to_string()
}

/// Compressed peak-amplitude sequence of one audio track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Signature format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Number of peak samples per second of audio
    pub samples_per_second: u32,

    /// Peak samples, compressed with [`codec::encode`]
    pub compressed_samples: Vec<u8>,
}

impl Signature {
    /// Wrap already-compressed samples (e.g. loaded from a persisted document)
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidInput` if the rate is zero
    pub fn new(samples_per_second: u32, compressed_samples: Vec<u8>) -> Result<Self, SyncError> {
        if samples_per_second == 0 {
            return Err(SyncError::InvalidInput(
                "Signature rate must be positive".to_string(),
            ));
        }
        Ok(Self {
            version: default_version(),
            samples_per_second,
            compressed_samples,
        })
    }

    /// Build a signature from raw peak samples
    ///
    /// The compressed bytes are decoded again immediately and compared to the
    /// input sample by sample; a signature that would not reproduce its input
    /// is never returned.
    ///
    /// # Errors
    ///
    /// - `SyncError::InvalidInput` if the rate is zero
    /// - `SyncError::DecodingError` if compression fails
    /// - `SyncError::CodecIntegrity` if the round trip does not reproduce `samples`
    pub fn from_samples(samples_per_second: u32, samples: &[u16]) -> Result<Self, SyncError> {
        let signature = Self::new(samples_per_second, codec::encode(samples)?)?;

        let decoded = signature.samples()?;
        if decoded.len() != samples.len() {
            return Err(SyncError::CodecIntegrity(format!(
                "Size mismatch: encoded {} samples, decoded {}",
                samples.len(),
                decoded.len()
            )));
        }
        let errors = decoded
            .iter()
            .zip(samples)
            .filter(|(decoded, original)| decoded != original)
            .count();
        if errors > 0 {
            return Err(SyncError::CodecIntegrity(format!(
                "{} samples differ after decoding",
                errors
            )));
        }

        Ok(signature)
    }

    /// Build a signature from mono 16-bit PCM
    ///
    /// # Arguments
    ///
    /// * `pcm` - Mono PCM samples
    /// * `pcm_rate` - PCM sample rate in Hz
    /// * `samples_per_second` - Signature rate; must divide `pcm_rate`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidInput` if the rates are zero or `pcm_rate`
    /// is not a multiple of `samples_per_second`
    pub fn from_pcm(pcm: &[i16], pcm_rate: u32, samples_per_second: u32) -> Result<Self, SyncError> {
        if samples_per_second == 0 || pcm_rate == 0 || pcm_rate % samples_per_second != 0 {
            return Err(SyncError::InvalidInput(format!(
                "PCM rate {} is not a positive multiple of signature rate {}",
                pcm_rate, samples_per_second
            )));
        }
        let peaks = envelope::peak_envelope(pcm, (pcm_rate / samples_per_second) as usize)?;
        Self::from_samples(samples_per_second, &peaks)
    }

    /// Decompress the peak samples
    pub fn samples(&self) -> Result<Vec<u16>, SyncError> {
        codec::decode(&self.compressed_samples)
    }

    /// Join the signatures of consecutive parts into one track
    ///
    /// A recording split over several files is aligned as a single virtual
    /// track. The returned start times locate each part on the merged
    /// timeline and can be handed to
    /// [`OffsetLookup::split_at_parts`](crate::offsets::OffsetLookup::split_at_parts).
    ///
    /// # Returns
    ///
    /// The merged signature and the start time of every part, in order
    ///
    /// # Errors
    ///
    /// - `SyncError::InvalidInput` if `parts` is empty
    /// - `SyncError::SampleRateMismatch` if a part's rate differs from the first part's
    /// - `SyncError::DecodingError` if a part cannot be decoded
    pub fn concat(parts: &[Signature]) -> Result<(Signature, Vec<Duration>), SyncError> {
        let Some(first) = parts.first() else {
            return Err(SyncError::InvalidInput(
                "At least one signature is required to merge".to_string(),
            ));
        };
        let rate = first.samples_per_second;

        let mut merged: Vec<u16> = Vec::new();
        let mut starts = Vec::with_capacity(parts.len());
        for part in parts {
            if part.samples_per_second != rate {
                return Err(SyncError::SampleRateMismatch {
                    first: rate,
                    second: part.samples_per_second,
                });
            }
            starts.push(Duration::seconds_f64(merged.len() as f64 / rate as f64));
            merged.extend(part.samples()?);
        }

        log::debug!(
            "Merged {} parts into {} samples at {} samples/s",
            parts.len(),
            merged.len(),
            rate
        );

        Ok((Self::from_samples(rate, &merged)?, starts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples_round_trip() {
        let samples: Vec<u16> = (0..1200).map(|i| (i % 300) as u16 * 11).collect();
        let signature = Signature::from_samples(120, &samples).unwrap();
        assert_eq!(signature.samples_per_second, 120);
        assert_eq!(signature.version, SIGNATURE_VERSION);
        assert_eq!(signature.samples().unwrap(), samples);
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(matches!(
            Signature::from_samples(0, &[1, 2, 3]),
            Err(SyncError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_pcm() {
        let pcm: Vec<i16> = vec![100, -200, 50, 0, 10, -20];
        let signature = Signature::from_pcm(&pcm, 360, 120).unwrap();
        assert_eq!(signature.samples().unwrap(), vec![200, 20]);
    }

    #[test]
    fn test_from_pcm_rate_not_multiple() {
        assert!(Signature::from_pcm(&[1, 2, 3], 44100, 120).is_err());
    }

    #[test]
    fn test_corrupt_bytes_fail_to_decode() {
        let signature = Signature::new(120, vec![1, 2, 3]).unwrap();
        assert!(signature.samples().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let signature = Signature::from_samples(120, &[1, 2, 3]).unwrap();
        let json = serde_json::to_string(&signature).unwrap();
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signature);
    }

    #[test]
    fn test_concat_records_part_starts() {
        let first = Signature::from_samples(120, &[1; 120]).unwrap();
        let second = Signature::from_samples(120, &[2; 60]).unwrap();
        let third = Signature::from_samples(120, &[3; 30]).unwrap();

        let (merged, starts) = Signature::concat(&[first, second, third]).unwrap();
        assert_eq!(merged.samples_per_second, 120);
        assert_eq!(
            starts,
            vec![Duration::ZERO, Duration::seconds(1), Duration::seconds_f64(1.5)]
        );

        let samples = merged.samples().unwrap();
        assert_eq!(samples.len(), 210);
        assert_eq!((samples[0], samples[120], samples[180]), (1, 2, 3));
    }

    #[test]
    fn test_concat_rejects_mixed_rates() {
        let first = Signature::from_samples(120, &[1; 10]).unwrap();
        let second = Signature::from_samples(100, &[1; 10]).unwrap();
        assert!(matches!(
            Signature::concat(&[first, second]),
            Err(SyncError::SampleRateMismatch {
                first: 120,
                second: 100
            })
        ));
    }

    #[test]
    fn test_concat_empty() {
        assert!(matches!(
            Signature::concat(&[]),
            Err(SyncError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_version_defaults() {
        let json = r#"{"samples_per_second":120,"compressed_samples":[]}"#;
        let signature: Signature = serde_json::from_str(json).unwrap();
        assert_eq!(signature.version, SIGNATURE_VERSION);
    }
}
