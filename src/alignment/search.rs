//! Recursive best-match search
//!
//! Algorithm, per pair of sections:
//! 1. Stop if either section is shorter than the minimum match length
//! 2. Pick the highest-novelty anchors of each section
//! 3. Score a minimum-length window at every (anchor A, anchor B) pair and keep the lowest error
//! 4. Refine the winner by sliding its B window a few samples either way
//! 5. Recurse on the sections before and after the winner
//!
//! Recursion yields fine-grained matches where the alignment is locally noisy
//! and long ones where it is stable. The returned list is ordered by position
//! in both tracks: `before ++ [winner] ++ after`.

use super::matched_pair::{sum_abs_diff_bounded, MatchedPair};
use super::window::Window;
use crate::config::AlignmentConfig;
use crate::error::SyncError;
use crate::features::peak_picking::{anchor_count, largest_peaks};

/// Stateless searcher parameterized by the alignment configuration
#[derive(Debug, Clone)]
pub struct Searcher {
    samples_per_second: u32,
    minimum_match_samples: usize,
    anchors_per_minute: usize,
    anchor_spacing: usize,
    refinement_radius: usize,
}

impl Searcher {
    /// Create a searcher for signatures sampled at `samples_per_second`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidInput` if the configuration is invalid for this rate
    pub fn new(samples_per_second: u32, config: &AlignmentConfig) -> Result<Self, SyncError> {
        config.validate()?;
        Ok(Self {
            samples_per_second,
            minimum_match_samples: config.minimum_match_samples(samples_per_second)?,
            anchors_per_minute: config.anchor_points_per_minute,
            anchor_spacing: config.anchor_spacing_samples(samples_per_second),
            refinement_radius: config.refinement_radius,
        })
    }

    /// Minimum match length in samples
    pub fn minimum_match_samples(&self) -> usize {
        self.minimum_match_samples
    }

    /// Find an ordered list of matches covering the two sections
    ///
    /// Ranges where no eligible anchor pair exists contribute nothing; an
    /// empty result means the sections do not correlate at all.
    pub fn find_matches<'a>(
        &self,
        section_a: Window<'a>,
        section_b: Window<'a>,
    ) -> Vec<MatchedPair<'a>> {
        let Some(best) = self.best_match(section_a, section_b) else {
            return vec![];
        };

        let (a, b) = (best.window_a(), best.window_b());
        let mut matches = self.find_matches(
            section_a.slice(0, a.start() - section_a.start()),
            section_b.slice(0, b.start() - section_b.start()),
        );

        log::debug!("match {:<3} {}", matches.len(), best);
        matches.push(best);

        matches.extend(self.find_matches(
            section_a.tail(a.end() - section_a.start()),
            section_b.tail(b.end() - section_b.start()),
        ));
        matches
    }

    /// Best minimum-length pair between two sections, if any
    pub fn best_match<'a>(
        &self,
        section_a: Window<'a>,
        section_b: Window<'a>,
    ) -> Option<MatchedPair<'a>> {
        let length = self.minimum_match_samples;
        if section_a.len() < length || section_b.len() < length {
            return None;
        }

        let peaks_a = self.anchors(&section_a);
        let peaks_b = self.anchors(&section_b);

        let mut best: Option<(Window<'a>, Window<'a>, f64)> = None;
        for &peak_a in &peaks_a {
            let candidate_a = section_a.slice(peak_a, length);
            if candidate_a.len() != length {
                continue;
            }
            for &peak_b in &peaks_b {
                let candidate_b = section_b.slice(peak_b, length);
                if candidate_b.len() != length {
                    continue;
                }
                let bound = best.map_or(f64::INFINITY, |(_, _, error)| error);
                if let Some(error) =
                    sum_abs_diff_bounded(candidate_a.as_slice(), candidate_b.as_slice(), bound)
                {
                    best = Some((candidate_a, candidate_b, error));
                }
            }
        }

        let (window_a, window_b, _) = best?;
        let anchor = MatchedPair::new(window_a, window_b).ok()?;
        Some(self.refine(anchor, &section_b))
    }

    fn anchors(&self, section: &Window) -> Vec<usize> {
        let count = anchor_count(section.len(), self.samples_per_second, self.anchors_per_minute);
        largest_peaks(section, count, self.minimum_match_samples, self.anchor_spacing)
    }

    /// Slide the B window by up to `refinement_radius` samples and keep the best variant
    ///
    /// Shifted windows stay inside `section_b` so recursion ranges never overlap.
    fn refine<'a>(&self, anchor: MatchedPair<'a>, section_b: &Window<'a>) -> MatchedPair<'a> {
        let radius = self.refinement_radius as isize;
        let deltas = (-radius..0).chain(1..=radius);

        let mut best = anchor;
        for delta in deltas {
            let Some(shifted) = anchor.window_b().shifted_by(delta) else {
                continue;
            };
            if shifted.start() < section_b.start() || shifted.end() > section_b.end() {
                continue;
            }
            if let Ok(candidate) = MatchedPair::new(anchor.window_a(), shifted) {
                if candidate.total_error() < best.total_error() {
                    best = candidate;
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::test_support::noise;
    use crate::features::novelty::compute_novelty;
    use time::Duration;

    fn searcher(min_seconds: i64) -> Searcher {
        let config = AlignmentConfig {
            minimum_match_duration: Duration::seconds(min_seconds),
            ..Default::default()
        };
        Searcher::new(120, &config).unwrap()
    }

    #[test]
    fn test_short_sections_yield_nothing() {
        let data = compute_novelty(&noise(100, 1), 0);
        let matches = searcher(1).find_matches(Window::full(&data), Window::full(&data));
        assert!(matches.is_empty());
    }

    #[test]
    fn test_identical_sections_match_at_zero_offset() {
        let data = compute_novelty(&noise(3000, 2), 0);
        let matches = searcher(1).find_matches(Window::full(&data), Window::full(&data));
        assert!(!matches.is_empty());
        for pair in &matches {
            assert_eq!(pair.offset(), 0);
            assert_eq!(pair.total_error(), 0.0);
            assert_eq!(pair.len(), 120);
        }
    }

    #[test]
    fn test_matches_are_ordered_and_disjoint() {
        let raw = noise(4000, 3);
        let mut shifted = vec![0u16; 300];
        shifted.extend_from_slice(&raw[..3700]);
        let a = compute_novelty(&raw, 0);
        let b = compute_novelty(&shifted, 0);

        let matches = searcher(1).find_matches(Window::full(&a), Window::full(&b));
        assert!(!matches.is_empty());
        for pair in matches.windows(2) {
            assert!(pair[0].window_a().end() <= pair[1].window_a().start());
            assert!(pair[0].window_b().end() <= pair[1].window_b().start());
        }
        assert!(matches.iter().any(|m| m.offset() == -300 && m.total_error() == 0.0));
    }

    #[test]
    fn test_refinement_corrects_anchor() {
        let raw = noise(1000, 4);
        let a = compute_novelty(&raw, 0);
        let searcher = searcher(1);
        let section = Window::full(&a);
        // Anchor two samples off the true alignment
        let anchor = MatchedPair::new(
            Window::new(&a, 100, 120).unwrap(),
            Window::new(&a, 102, 120).unwrap(),
        )
        .unwrap();
        let refined = searcher.refine(anchor, &section);
        assert_eq!(refined.offset(), 0);
        assert_eq!(refined.total_error(), 0.0);
    }

    #[test]
    fn test_refinement_stays_inside_section() {
        let raw = noise(1000, 5);
        let a = compute_novelty(&raw, 0);
        let searcher = searcher(1);
        let section_b = Window::new(&a, 102, 200).unwrap();
        let anchor = MatchedPair::new(
            Window::new(&a, 100, 120).unwrap(),
            Window::new(&a, 102, 120).unwrap(),
        )
        .unwrap();
        // The perfect variant would start before the section and is not tried
        let refined = searcher.refine(anchor, &section_b);
        assert!(refined.window_b().start() >= 102);
    }

    #[test]
    fn test_uncorrelated_range_contributes_nothing() {
        // Track B is shorter than one minimum match
        let a = compute_novelty(&noise(500, 6), 0);
        let b = compute_novelty(&noise(119, 7), 0);
        let matches = searcher(1).find_matches(Window::full(&a), Window::full(&b));
        assert!(matches.is_empty());
    }
}
