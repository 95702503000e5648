//! Character-to-time map rebuilt from engine timing segments.
//!
//! The reconstructed text is the only transcript whose character offsets line
//! up with segment timings, so it replaces any engine-supplied text whenever
//! segments exist.

use tracing::{debug, warn};

use crate::error::{AlignError, MappingError, Result};
use crate::types::TimingSegment;

/// Transcript text plus, for every character, the segment that produced it.
#[derive(Debug, Clone)]
pub struct CharTimeMap<'a> {
    segments: &'a [TimingSegment],
    text: String,
    chars: Vec<char>,
    owners: Vec<usize>,
}

impl<'a> CharTimeMap<'a> {
    /// Concatenates segment texts in order and records the owning segment of each char.
    pub fn build(segments: &'a [TimingSegment]) -> Result<Self> {
        let mut text = String::new();
        let mut owners = Vec::new();
        let mut previous_start = 0.0;

        for (index, segment) in segments.iter().enumerate() {
            validate_segment(index, segment)?;
            if segment.start_time < previous_start {
                warn!(
                    index,
                    start_time = segment.start_time,
                    previous_start,
                    "timing segment starts before its predecessor"
                );
            }
            previous_start = segment.start_time;

            for ch in segment.text.chars() {
                text.push(ch);
                owners.push(index);
            }
        }

        let chars: Vec<char> = text.chars().collect();
        debug_assert_eq!(chars.len(), owners.len());
        debug!(
            segments = segments.len(),
            chars = chars.len(),
            "character time map built"
        );

        Ok(Self {
            segments,
            text,
            chars,
            owners,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of characters (and map entries).
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// True when no timing data was supplied.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Segment that produced the character at `index`.
    pub fn segment_at(
        &self,
        index: usize,
    ) -> std::result::Result<&'a TimingSegment, MappingError> {
        let segments = self.segments;
        self.owners
            .get(index)
            .and_then(|&owner| segments.get(owner))
            .ok_or(MappingError {
                index,
                len: self.owners.len(),
            })
    }

    /// Time interval covering the half-open character range `[start, end)`.
    pub fn interval(
        &self,
        start: usize,
        end: usize,
    ) -> std::result::Result<(f64, f64), MappingError> {
        let last = end.checked_sub(1).filter(|&last| last >= start).ok_or(MappingError {
            index: end,
            len: self.owners.len(),
        })?;
        let first = self.segment_at(start)?;
        let last = self.segment_at(last)?;
        Ok((first.start_time, last.end_time))
    }

    /// Largest segment end time, or 0 when untimed.
    pub fn duration(&self) -> f64 {
        self.segments
            .iter()
            .map(|segment| segment.end_time)
            .fold(0.0, f64::max)
    }
}

fn validate_segment(index: usize, segment: &TimingSegment) -> Result<()> {
    let invalid = |reason: String| AlignError::InvalidSegment { index, reason };
    if !segment.start_time.is_finite() || !segment.end_time.is_finite() {
        return Err(invalid(format!(
            "times must be finite (start {}, end {})",
            segment.start_time, segment.end_time
        )));
    }
    if segment.start_time < 0.0 {
        return Err(invalid(format!(
            "start time {} is negative",
            segment.start_time
        )));
    }
    if segment.end_time < segment.start_time {
        return Err(invalid(format!(
            "end time {} precedes start time {}",
            segment.end_time, segment.start_time
        )));
    }
    Ok(())
}
