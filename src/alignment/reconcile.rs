//! Gap reconciliation
//!
//! The searcher returns an ordered list of matches that may leave gaps
//! between neighbours. This pass turns it into a clean partition: for each
//! adjacent pair it decides which offset owns every sample of the span
//! between them.
//!
//! For a pair (prev, curr) the span starts at prev's start and ends at curr's
//! end, in both tracks. Its length is the shorter of the two tracks' spans,
//! so prev's piece grows forward from prev's starts and curr's piece grows
//! backward from curr's ends; whatever one track has in excess (content
//! inserted or removed by the edit) stays between the two pieces and is left
//! unmatched.
//!
//! - Offsets within `near_tie_tolerance`: the whole span goes to the cheaper
//!   offset, never split.
//! - Otherwise: the split point minimizing the summed difference is found in
//!   one walk, moving the split one sample at a time and updating the cost.
//! - A piece shorter than the minimum match length is dropped and its
//!   neighbour takes over the whole span; another pass is then required.

use super::matched_pair::MatchedPair;
use super::window::Window;
use crate::config::AlignmentConfig;
use crate::error::SyncError;

/// Outcome of reconciling one adjacent pair
enum Resolution<'a> {
    /// Both matches survive, truncated at the split point
    Split(MatchedPair<'a>, MatchedPair<'a>),
    /// One match absorbed the other
    Merged(MatchedPair<'a>),
}

/// Post-pass turning raw matches into a contiguous partition
#[derive(Debug, Clone)]
pub struct Reconciler {
    minimum_match_samples: usize,
    near_tie_tolerance: usize,
}

impl Reconciler {
    /// Create a reconciler
    pub fn new(minimum_match_samples: usize, near_tie_tolerance: usize) -> Self {
        Self {
            minimum_match_samples,
            near_tie_tolerance,
        }
    }

    /// Create a reconciler from the alignment configuration
    pub fn from_config(
        samples_per_second: u32,
        config: &AlignmentConfig,
    ) -> Result<Self, SyncError> {
        Ok(Self::new(
            config.minimum_match_samples(samples_per_second)?,
            config.near_tie_tolerance,
        ))
    }

    /// Reconcile until a pass merges nothing
    ///
    /// Every pass that merges removes at least one match, so the loop ends
    /// after at most `matches.len()` passes.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ProcessingError` if the input is not ordered by position
    pub fn reconcile<'a>(
        &self,
        matches: Vec<MatchedPair<'a>>,
    ) -> Result<Vec<MatchedPair<'a>>, SyncError> {
        let mut matches = matches;
        let mut pass = 0;
        loop {
            pass += 1;
            let (cleaned, merged) = self.reconcile_pass(&matches)?;
            log::debug!(
                "Reconcile pass {}: {} -> {} matches",
                pass,
                matches.len(),
                cleaned.len()
            );
            for pair in &cleaned {
                log::trace!("  {}", pair);
            }
            matches = cleaned;
            if !merged {
                return Ok(matches);
            }
        }
    }

    fn reconcile_pass<'a>(
        &self,
        matches: &[MatchedPair<'a>],
    ) -> Result<(Vec<MatchedPair<'a>>, bool), SyncError> {
        let Some((&first, rest)) = matches.split_first() else {
            return Ok((vec![], false));
        };

        let mut cleaned = Vec::with_capacity(matches.len());
        let mut merged = false;
        let mut pending = first;
        for &current in rest {
            match self.resolve(&pending, &current)? {
                Resolution::Split(left, right) => {
                    cleaned.push(left);
                    pending = right;
                }
                Resolution::Merged(pair) => {
                    merged = true;
                    pending = pair;
                }
            }
        }
        if !pending.is_empty() {
            cleaned.push(pending);
        }
        Ok((cleaned, merged))
    }

    fn resolve<'a>(
        &self,
        prev: &MatchedPair<'a>,
        curr: &MatchedPair<'a>,
    ) -> Result<Resolution<'a>, SyncError> {
        let (prev_a, prev_b) = (prev.window_a(), prev.window_b());
        let (curr_a, curr_b) = (curr.window_a(), curr.window_b());

        let (Some(span_a), Some(span_b)) = (
            curr_a.end().checked_sub(prev_a.start()),
            curr_b.end().checked_sub(prev_b.start()),
        ) else {
            return Err(SyncError::ProcessingError(format!(
                "Matches out of order: {} before {}",
                prev, curr
            )));
        };
        let span = span_a.min(span_b);

        // Whole span at prev's offset, and whole span at curr's offset
        let all_prev = span_pair(prev_a, prev_b, prev_a.start(), prev_b.start(), span)?;
        let all_curr = span_pair(
            curr_a,
            curr_b,
            curr_a.end() - span,
            curr_b.end() - span,
            span,
        )?;

        if prev.offset().abs_diff(curr.offset()) <= self.near_tie_tolerance {
            let winner = if all_prev.total_error() < all_curr.total_error() {
                all_prev
            } else {
                all_curr
            };
            log::debug!(
                "Merging near-equal offsets {} and {} into {}",
                prev.offset(),
                curr.offset(),
                winner
            );
            return Ok(Resolution::Merged(winner));
        }

        let keep = best_split(&all_prev, &all_curr);
        if keep < self.minimum_match_samples {
            log::debug!("Dropping {} ({} samples kept)", prev, keep);
            return Ok(Resolution::Merged(all_curr));
        }
        if span - keep < self.minimum_match_samples {
            log::debug!("Dropping {} ({} samples kept)", curr, span - keep);
            return Ok(Resolution::Merged(all_prev));
        }

        let left = MatchedPair::new(
            all_prev.window_a().slice(0, keep),
            all_prev.window_b().slice(0, keep),
        )?;
        let right = MatchedPair::new(
            all_curr.window_a().tail(keep),
            all_curr.window_b().tail(keep),
        )?;
        Ok(Resolution::Split(left, right))
    }
}

fn span_pair<'a>(
    track_a: Window<'a>,
    track_b: Window<'a>,
    start_a: usize,
    start_b: usize,
    len: usize,
) -> Result<MatchedPair<'a>, SyncError> {
    let window_a = Window::new(track_a.backing(), start_a, len);
    let window_b = Window::new(track_b.backing(), start_b, len);
    match (window_a, window_b) {
        (Some(a), Some(b)) => MatchedPair::new(a, b),
        _ => Err(SyncError::ProcessingError(format!(
            "Span of {} samples at {}/{} leaves the tracks",
            len, start_a, start_b
        ))),
    }
}

/// Number of leading samples to keep at prev's offset
///
/// Walks the split from "everything to prev" down to "everything to curr",
/// swapping one sample's cost per step. Ties go to the split producing the
/// larger of the two pieces.
fn best_split(all_prev: &MatchedPair, all_curr: &MatchedPair) -> usize {
    let span = all_prev.len();

    let mut cost = all_prev.total_error();
    let mut best_keep = span;
    let mut best_cost = cost;
    let mut best_block = span;

    for keep in (0..span).rev() {
        cost -= sample_error(all_prev, keep);
        cost += sample_error(all_curr, keep);

        let block = keep.max(span - keep);
        if cost < best_cost || (cost == best_cost && block > best_block) {
            best_keep = keep;
            best_cost = cost;
            best_block = block;
        }
    }
    best_keep
}

/// Absolute difference at one position of a pair
fn sample_error(pair: &MatchedPair, index: usize) -> f64 {
    match (pair.window_a().get(index), pair.window_b().get(index)) {
        (Some(a), Some(b)) => (a.value - b.value).abs(),
        _ => 0.0,
    }
}
