//! Novelty transform for peak-amplitude signatures
//!
//! Turns raw peak samples into a (optionally smoothed) value series plus a
//! novelty score, `|value[i] - value[i - 1]|`. Instants with high novelty
//! (sudden loudness changes) are the anchor candidates of the search.
//!
//! # Example
//!
//! ```
//! use tracksync_dsp::features::novelty::compute_novelty;
//!
//! let samples = compute_novelty(&[10, 10, 40, 20], 0);
//! assert_eq!(samples[2].diff_from_previous, 30.0);
//! assert_eq!(samples[0].diff_from_previous, 0.0);
//! ```

/// One element of the derived novelty series of a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position in the track, in signature samples
    pub index: usize,

    /// Locally smoothed peak amplitude
    pub value: f64,

    /// Absolute change from the previous smoothed value (0 for the first sample)
    pub diff_from_previous: f64,
}

/// Compute the novelty series of a raw peak sequence
///
/// # Arguments
///
/// * `raw_samples` - Peak amplitudes, one per signature sample
/// * `radius` - Moving-average radius; `value[i]` is the mean of
///   `raw[i - radius ..= i + radius]` clipped to the sequence (0 = passthrough)
///
/// # Returns
///
/// One `Sample` per input sample, indexed `0..raw_samples.len()`
pub fn compute_novelty(raw_samples: &[u16], radius: usize) -> Vec<Sample> {
    log::debug!(
        "Computing novelty: {} samples, smoothing radius {}",
        raw_samples.len(),
        radius
    );

    let values = smooth(raw_samples, radius);

    let mut samples = Vec::with_capacity(values.len());
    let mut previous = None;
    for (index, &value) in values.iter().enumerate() {
        let diff_from_previous = previous.map_or(0.0, |p: f64| (value - p).abs());
        samples.push(Sample {
            index,
            value,
            diff_from_previous,
        });
        previous = Some(value);
    }
    samples
}

/// Centered moving average using prefix sums
fn smooth(raw_samples: &[u16], radius: usize) -> Vec<f64> {
    if radius == 0 {
        return raw_samples.iter().map(|&s| s as f64).collect();
    }

    let mut prefix = Vec::with_capacity(raw_samples.len() + 1);
    prefix.push(0u64);
    for &s in raw_samples {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + s as u64);
    }

    (0..raw_samples.len())
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(raw_samples.len());
            (prefix[hi] - prefix[lo]) as f64 / (hi - lo) as f64
        })
        .collect()
}
