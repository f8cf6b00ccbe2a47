//! Edge expansion of the outermost matches
//!
//! The searcher only produces minimum-length windows anchored on peaks, so
//! the first and last matches rarely touch the ends of the tracks. Growing
//! both windows of a pair by the same amount keeps its offset unchanged.

use super::matched_pair::MatchedPair;
use crate::error::SyncError;

/// Grow a pair backward until one of its windows starts at index 0
pub fn expand_start<'a>(pair: &MatchedPair<'a>) -> Result<MatchedPair<'a>, SyncError> {
    let (a, b) = (pair.window_a(), pair.window_b());
    let amount = a.start().min(b.start());
    if amount == 0 {
        return Ok(*pair);
    }
    let expanded_a = a.expanded_start(amount);
    let expanded_b = b.expanded_start(amount);
    match (expanded_a, expanded_b) {
        (Some(a), Some(b)) => MatchedPair::new(a, b),
        _ => Err(SyncError::ProcessingError(format!(
            "Cannot expand start of {} by {} samples",
            pair, amount
        ))),
    }
}

/// Grow a pair forward until one of its windows ends at its track's end
pub fn expand_end<'a>(pair: &MatchedPair<'a>) -> Result<MatchedPair<'a>, SyncError> {
    let (a, b) = (pair.window_a(), pair.window_b());
    let amount = (a.backing_len() - a.end()).min(b.backing_len() - b.end());
    if amount == 0 {
        return Ok(*pair);
    }
    let expanded_a = a.expanded_end(amount);
    let expanded_b = b.expanded_end(amount);
    match (expanded_a, expanded_b) {
        (Some(a), Some(b)) => MatchedPair::new(a, b),
        _ => Err(SyncError::ProcessingError(format!(
            "Cannot expand end of {} by {} samples",
            pair, amount
        ))),
    }
}

/// Expand the first match backward and the last match forward
pub fn expand_edges(matches: &mut [MatchedPair<'_>]) -> Result<(), SyncError> {
    if let Some(first) = matches.first_mut() {
        *first = expand_start(first)?;
    }
    if let Some(last) = matches.last_mut() {
        *last = expand_end(last)?;
    }
    Ok(())
}
