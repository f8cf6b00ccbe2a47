//! Anchor candidate selection
//!
//! Picks the instants with the largest novelty inside a section. Only these
//! anchors are compared pairwise by the searcher, which is what keeps the
//! peak-by-peak search tractable.

use crate::alignment::window::Window;

/// Number of anchors to take for a section
///
/// `per_minute × ceil(len / (60 × rate))`, so every started minute of the
/// section contributes its share.
pub fn anchor_count(section_len: usize, samples_per_second: u32, per_minute: usize) -> usize {
    let samples_per_minute = (samples_per_second as usize * 60).max(1);
    per_minute * section_len.div_ceil(samples_per_minute)
}

/// Find the `count` indices with the largest novelty in a window
///
/// # Arguments
///
/// * `window` - Section to search
/// * `count` - Maximum number of anchors to return
/// * `margin` - Trailing samples excluded, so a `margin`-long window fits after every anchor
/// * `min_spacing` - Minimum distance between two accepted anchors (0 disables)
///
/// # Returns
///
/// Indices relative to the window start, in ascending order. Equal novelty
/// values are ranked by ascending index, so the result is deterministic.
pub fn largest_peaks(window: &Window, count: usize, margin: usize, min_spacing: usize) -> Vec<usize> {
    if count == 0 || margin > window.len() {
        return vec![];
    }
    let last_candidate = window.len() - margin;

    let mut candidates: Vec<(usize, f64)> = window
        .iter()
        .take(last_candidate + 1)
        .enumerate()
        .map(|(i, s)| (i, s.diff_from_previous))
        .collect();
    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    let mut peaks: Vec<usize> = Vec::with_capacity(count.min(candidates.len()));
    for (idx, _) in candidates {
        if min_spacing > 0 && peaks.iter().any(|&p| p.abs_diff(idx) < min_spacing) {
            continue;
        }
        peaks.push(idx);
        if peaks.len() == count {
            break;
        }
    }

    peaks.sort_unstable();
    peaks
}
