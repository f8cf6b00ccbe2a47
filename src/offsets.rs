//! Piecewise time remapping
//!
//! The published artifact of an alignment: an ordered list of time
//! intervals of track A, each carrying either the offset to add to reach
//! track B or nothing (content with no counterpart in B).
//!
//! # Example
//!
//! ```
//! use time::Duration;
//! use tracksync_dsp::offsets::{OffsetLookup, OffsetSegment};
//!
//! let mut lookup = OffsetLookup::new(vec![
//!     OffsetSegment::new(Duration::ZERO, Duration::seconds(10), Some(Duration::seconds(2))),
//!     OffsetSegment::new(Duration::seconds(10), Duration::seconds(12), None),
//! ]);
//! assert_eq!(lookup.transform_position(Duration::seconds(3)), Some(Duration::seconds(5)));
//! assert_eq!(lookup.transform_position(Duration::seconds(11)), None);
//! assert_eq!(lookup.transform_position(Duration::seconds(99)), None);
//! ```

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::alignment::result::MatchSpan;

/// Time interval of track A with a constant offset, or unmapped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetSegment {
    /// Inclusive start
    pub start_time: Duration,

    /// Exclusive end
    pub end_time: Duration,

    /// Offset to add to reach track B; `None` if the interval is unmapped
    pub offset: Option<Duration>,

    /// Number of lookups that landed in this segment (diagnostic only)
    #[serde(skip)]
    usage_count: u32,
}

impl OffsetSegment {
    /// Create a segment with a zero usage count
    pub fn new(start_time: Duration, end_time: Duration, offset: Option<Duration>) -> Self {
        Self {
            start_time,
            end_time,
            offset,
            usage_count: 0,
        }
    }

    /// Length of the interval
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// True if `time` lies in `[start_time, end_time)`
    pub fn contains(&self, time: Duration) -> bool {
        time >= self.start_time && time < self.end_time
    }

    /// Number of lookups served since the last reset
    pub fn usage_count(&self) -> u32 {
        self.usage_count
    }

    /// Count one more lookup
    pub fn increment_usage(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
    }

    /// Clear the usage counter
    pub fn reset_usage(&mut self) {
        self.usage_count = 0;
    }
}

/// Ordered list of offset segments supporting point lookups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffsetLookup {
    segments: Vec<OffsetSegment>,
}

impl OffsetLookup {
    /// Wrap segments as given; lookups scan them in order
    pub fn new(segments: Vec<OffsetSegment>) -> Self {
        Self { segments }
    }

    /// Build the lookup for track A from final matches
    ///
    /// Ranges of `[0, samples_a)` not covered by any match become unmapped
    /// segments, so the result always partitions the whole track. With no
    /// matches at all, the result is a single unmapped segment.
    pub fn from_matches(matches: &[MatchSpan], samples_a: usize, samples_per_second: u32) -> Self {
        let to_time = |index: i64| -> Duration {
            Duration::seconds_f64(index as f64 / samples_per_second as f64)
        };

        let mut segments = Vec::with_capacity(matches.len() * 2 + 1);
        let mut current = 0usize;
        for span in matches {
            if span.start_a > current {
                segments.push(OffsetSegment::new(
                    to_time(current as i64),
                    to_time(span.start_a as i64),
                    None,
                ));
            }
            segments.push(OffsetSegment::new(
                to_time(span.start_a as i64),
                to_time(span.end_a() as i64),
                Some(to_time(-(span.offset as i64))),
            ));
            current = current.max(span.end_a());
        }
        if current < samples_a {
            segments.push(OffsetSegment::new(
                to_time(current as i64),
                to_time(samples_a as i64),
                None,
            ));
        }

        Self { segments }
    }

    /// Translate a position of track A into track B
    ///
    /// The first segment containing `time` decides: its offset is added, or
    /// `None` is returned if it is unmapped. Positions outside every segment
    /// also give `None`. The segment's usage counter is incremented.
    pub fn transform_position(&mut self, time: Duration) -> Option<Duration> {
        let segment = self.segments.iter_mut().find(|s| s.contains(time))?;
        segment.increment_usage();
        segment.offset.map(|offset| time + offset)
    }

    /// Translate an interval of track A into the intervals of track B it maps to
    ///
    /// Each mapped segment overlapping `[start, end)` contributes the shifted
    /// intersection and counts one use; unmapped segments contribute nothing.
    pub fn transform_range(&mut self, start: Duration, end: Duration) -> Vec<(Duration, Duration)> {
        let mut ranges = Vec::new();
        for segment in &mut self.segments {
            if start >= segment.end_time || end <= segment.start_time {
                continue;
            }
            let Some(offset) = segment.offset else {
                continue;
            };
            let from = start.max(segment.start_time);
            let to = end.min(segment.end_time);
            segment.increment_usage();
            ranges.push((from + offset, to + offset));
        }
        ranges
    }

    /// Cut every segment at the part boundaries of both tracks
    ///
    /// `parts_a` and `parts_b` are the ascending start times of the parts
    /// each track was merged from (see [`Signature::concat`]); the last part
    /// of a track runs to its end. Mapped pieces are cut again where their
    /// image crosses a part boundary of track B, and any piece whose image
    /// falls before the first part of B is dropped.
    ///
    /// [`Signature::concat`]: crate::signature::Signature::concat
    pub fn split_at_parts(&self, parts_a: &[Duration], parts_b: &[Duration]) -> Vec<PartSegment> {
        let mut pieces = Vec::new();
        for segment in &self.segments {
            for range_a in part_ranges(parts_a, segment.start_time, segment.end_time) {
                let Some(offset) = segment.offset else {
                    pieces.push(PartSegment {
                        part_a: range_a.part,
                        start_a: range_a.start - range_a.part_start,
                        part_b: None,
                        start_b: None,
                        duration: range_a.end - range_a.start,
                        offset: None,
                    });
                    continue;
                };
                for range_b in part_ranges(parts_b, range_a.start + offset, range_a.end + offset) {
                    pieces.push(PartSegment {
                        part_a: range_a.part,
                        start_a: range_b.start - offset - range_a.part_start,
                        part_b: Some(range_b.part),
                        start_b: Some(range_b.start - range_b.part_start),
                        duration: range_b.end - range_b.start,
                        offset: Some(offset),
                    });
                }
            }
        }
        log::debug!(
            "Split {} segments into {} part pieces ({} + {} parts)",
            self.segments.len(),
            pieces.len(),
            parts_a.len(),
            parts_b.len()
        );
        pieces
    }

    /// Clear every usage counter
    pub fn reset_usage(&mut self) {
        for segment in &mut self.segments {
            segment.reset_usage();
        }
    }

    /// True if some lookup landed in a segment that moves positions
    ///
    /// A translated script that only touched zero-offset segments is already
    /// in sync with track B.
    pub fn has_shifted_usage(&self) -> bool {
        self.segments
            .iter()
            .any(|s| s.usage_count > 0 && s.offset != Some(Duration::ZERO))
    }

    /// Segments in lookup order
    pub fn segments(&self) -> &[OffsetSegment] {
        &self.segments
    }

    /// Iterate over segments
    pub fn iter(&self) -> std::slice::Iter<'_, OffsetSegment> {
        self.segments.iter()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if there are no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Piece of an offset segment lying inside one part of each track
///
/// Times are relative to the start of the part they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSegment {
    /// Part of track A holding the piece
    pub part_a: usize,

    /// Start of the piece inside its part of track A
    pub start_a: Duration,

    /// Part of track B the piece maps into; `None` if unmapped
    pub part_b: Option<usize>,

    /// Start of the image inside its part of track B; `None` if unmapped
    pub start_b: Option<Duration>,

    /// Length of the piece
    pub duration: Duration,

    /// Offset on the merged timelines; `None` if unmapped
    pub offset: Option<Duration>,
}

struct PartRange {
    part: usize,
    part_start: Duration,
    start: Duration,
    end: Duration,
}

/// Intersections of `[start, end)` with each part
fn part_ranges(part_starts: &[Duration], start: Duration, end: Duration) -> Vec<PartRange> {
    part_starts
        .iter()
        .enumerate()
        .filter_map(|(part, &part_start)| {
            let part_end = part_starts.get(part + 1).copied().unwrap_or(Duration::MAX);
            let from = start.max(part_start);
            let to = end.min(part_end);
            (from < to).then_some(PartRange {
                part,
                part_start,
                start: from,
                end: to,
            })
        })
        .collect()
}
