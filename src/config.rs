//! Configuration parameters for signature alignment

use time::Duration;

use crate::error::SyncError;

/// Alignment configuration parameters
#[derive(Debug, Clone)]
pub struct AlignmentConfig {
    // Search
    /// Shortest stretch of audio that may form a match (default: 20 s)
    ///
    /// Converted to samples with the signature rate. Every match the searcher
    /// produces, and every segment the reconciler keeps, is at least this long.
    pub minimum_match_duration: Duration,

    /// Number of anchor candidates taken per minute of section (default: 10)
    pub anchor_points_per_minute: usize,

    /// Minimum distance between two anchors of the same section (default: 0, disabled)
    pub min_anchor_spacing: Duration,

    /// Largest shift, in samples, tried when refining the best pair (default: 3)
    pub refinement_radius: usize,

    // Novelty
    /// Radius of the moving average applied to raw peaks (default: 0, passthrough)
    pub smoothing_radius: usize,

    // Reconciliation
    /// Offsets closer than this many samples are treated as equivalent (default: 2)
    pub near_tie_tolerance: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            minimum_match_duration: Duration::seconds(20),
            anchor_points_per_minute: 10,
            min_anchor_spacing: Duration::ZERO,
            refinement_radius: 3,
            smoothing_radius: 0,
            near_tie_tolerance: 2,
        }
    }
}

impl AlignmentConfig {
    /// Check that the configuration can drive a search
    pub fn validate(&self) -> Result<(), SyncError> {
        if !self.minimum_match_duration.is_positive() {
            return Err(SyncError::InvalidInput(format!(
                "Minimum match duration must be positive, got {}",
                self.minimum_match_duration
            )));
        }
        if self.anchor_points_per_minute == 0 {
            return Err(SyncError::InvalidInput(
                "At least one anchor point per minute is required".to_string(),
            ));
        }
        if self.min_anchor_spacing.is_negative() {
            return Err(SyncError::InvalidInput(format!(
                "Anchor spacing must not be negative, got {}",
                self.min_anchor_spacing
            )));
        }
        Ok(())
    }

    /// Minimum match length in samples for a given rate
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidInput` if the duration rounds down to zero samples
    pub fn minimum_match_samples(&self, samples_per_second: u32) -> Result<usize, SyncError> {
        let samples =
            (self.minimum_match_duration.as_seconds_f64() * samples_per_second as f64).floor();
        if samples < 1.0 {
            return Err(SyncError::InvalidInput(format!(
                "Minimum match duration {} is shorter than one sample at {} samples/s",
                self.minimum_match_duration, samples_per_second
            )));
        }
        Ok(samples as usize)
    }

    /// Minimum anchor spacing in samples for a given rate
    pub fn anchor_spacing_samples(&self, samples_per_second: u32) -> usize {
        (self.min_anchor_spacing.as_seconds_f64() * samples_per_second as f64)
            .floor()
            .max(0.0) as usize
    }
}
