//! Greedy longest-first placement of candidates onto the transcript.
//!
//! Shorter candidates are often fragments of longer names ("小明" inside
//! "王小明"), so longer candidates claim their characters first and any later
//! occurrence touching a claimed character is discarded whole.

use std::ops::Range;

use tracing::{debug, info, warn};

use crate::timing::CharTimeMap;
use crate::types::{CandidateSet, ConfirmedSpan};

/// Output of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Spans in emission order (candidate priority, then position).
    pub spans: Vec<ConfirmedSpan>,
    /// Occurrences dropped because their range could not be mapped to times.
    pub dropped: usize,
    /// True when no timing data existed and the untimed roster was produced.
    pub degraded: bool,
}

/// Character indices already assigned to a confirmed span.
struct ClaimedSet {
    claimed: Vec<bool>,
}

impl ClaimedSet {
    fn new(len: usize) -> Self {
        Self {
            claimed: vec![false; len],
        }
    }

    /// Claims the whole range, or nothing if any index is already taken.
    fn try_claim(&mut self, range: Range<usize>) -> bool {
        let slots = &mut self.claimed[range];
        if slots.iter().any(|&taken| taken) {
            return false;
        }
        slots.fill(true);
        true
    }
}

/// Resolution order: longer candidates first, equal lengths in lexicographic order.
pub fn order_candidates(candidates: &CandidateSet) -> Vec<&str> {
    let mut ordered: Vec<(usize, &str)> = candidates
        .iter()
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| (candidate.chars().count(), candidate.as_str()))
        .collect();
    ordered.sort_by(|(len_a, a), (len_b, b)| len_b.cmp(len_a).then_with(|| a.cmp(b)));
    ordered.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Places every candidate occurrence that does not overlap a higher-priority one.
///
/// With an empty map the positional search is skipped and each candidate is
/// reported once with zeroed times and offsets.
pub fn resolve_spans(map: &CharTimeMap<'_>, candidates: &CandidateSet) -> Resolution {
    let ordered = order_candidates(candidates);
    if map.is_empty() {
        warn!(
            candidates = ordered.len(),
            "no timing data; listing names without positions"
        );
        return Resolution {
            spans: ordered.into_iter().map(ConfirmedSpan::untimed).collect(),
            dropped: 0,
            degraded: true,
        };
    }

    place_candidates(map, map.chars(), ordered)
}

/// Greedy placement over `text`. An occurrence whose range cannot be mapped is
/// dropped on its own; its characters stay claimed and placement carries on.
fn place_candidates(map: &CharTimeMap<'_>, text: &[char], ordered: Vec<&str>) -> Resolution {
    let mut claimed = ClaimedSet::new(text.len());
    let mut resolution = Resolution::default();

    for candidate in ordered {
        let pattern: Vec<char> = candidate.chars().collect();
        let mut placed = 0usize;
        for idx in occurrences(text, &pattern) {
            let range = idx..idx + pattern.len();
            if !claimed.try_claim(range.clone()) {
                continue;
            }
            match map.interval(range.start, range.end) {
                Ok((start_time, end_time)) => {
                    placed += 1;
                    resolution.spans.push(ConfirmedSpan {
                        start_idx: range.start,
                        end_idx: range.end,
                        start_time,
                        end_time,
                        display_text: candidate.to_string(),
                    });
                }
                Err(err) => {
                    resolution.dropped += 1;
                    warn!(name = candidate, error = %err, "dropping unmappable occurrence");
                }
            }
        }
        debug!(name = candidate, placed, "candidate resolved");
    }

    info!(
        spans = resolution.spans.len(),
        dropped = resolution.dropped,
        "span resolution complete"
    );
    resolution
}

/// Start index of every exact match, overlapping matches included.
fn occurrences<'t>(text: &'t [char], pattern: &'t [char]) -> impl Iterator<Item = usize> + 't {
    let last_start = (text.len() + 1).saturating_sub(pattern.len());
    (0..last_start)
        .filter(move |&idx| !pattern.is_empty() && text[idx..idx + pattern.len()] == *pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimingSegment;

    fn per_char_segments(text: &str) -> Vec<TimingSegment> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| TimingSegment::new(ch.to_string(), i as f64, i as f64 + 0.5))
            .collect()
    }

    fn candidates(names: &[&str]) -> CandidateSet {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn ranges(resolution: &Resolution) -> Vec<(usize, usize)> {
        resolution
            .spans
            .iter()
            .map(|span| (span.start_idx, span.end_idx))
            .collect()
    }

    #[test]
    fn longer_candidate_suppresses_embedded_shorter_one() {
        let segments = per_char_segments("王小明和小明");
        let map = CharTimeMap::build(&segments).unwrap();
        let resolution = resolve_spans(&map, &candidates(&["王小明", "小明"]));

        assert_eq!(ranges(&resolution), vec![(0, 3), (4, 6)]);
        assert_eq!(resolution.spans[0].display_text, "王小明");
        assert_eq!(resolution.spans[1].display_text, "小明");
        assert_eq!(resolution.spans[1].start_time, 4.0);
        assert_eq!(resolution.spans[1].end_time, 5.5);
        assert!(!resolution.degraded);
    }

    #[test]
    fn times_come_from_first_and_last_char_segments() {
        let segments = vec![
            TimingSegment::new("大家好王", 0.0, 1.2),
            TimingSegment::new("小明", 1.2, 1.9),
        ];
        let map = CharTimeMap::build(&segments).unwrap();
        let resolution = resolve_spans(&map, &candidates(&["王小明"]));
        assert_eq!(ranges(&resolution), vec![(3, 6)]);
        assert_eq!(resolution.spans[0].start_time, 0.0);
        assert_eq!(resolution.spans[0].end_time, 1.9);
    }

    #[test]
    fn overlapping_repeats_of_one_candidate_do_not_both_claim() {
        let segments = per_char_segments("明明明");
        let map = CharTimeMap::build(&segments).unwrap();
        let resolution = resolve_spans(&map, &candidates(&["明明"]));
        assert_eq!(ranges(&resolution), vec![(0, 2)]);
    }

    #[test]
    fn partial_overlap_skips_whole_occurrence() {
        let segments = per_char_segments("歐陽小明華");
        let map = CharTimeMap::build(&segments).unwrap();
        let resolution = resolve_spans(&map, &candidates(&["歐陽小明", "明華"]));
        assert_eq!(ranges(&resolution), vec![(0, 4)]);
    }

    #[test]
    fn equal_lengths_resolve_in_lexicographic_order() {
        let segments = per_char_segments("張三李四");
        let map = CharTimeMap::build(&segments).unwrap();
        // "三李" and "張三" overlap at index 1; "三李" sorts first.
        let resolution = resolve_spans(&map, &candidates(&["張三", "三李", "李四"]));
        assert_eq!(
            order_candidates(&candidates(&["張三", "三李", "李四"])),
            vec!["三李", "張三", "李四"]
        );
        assert_eq!(ranges(&resolution), vec![(1, 3)]);
    }

    #[test]
    fn spans_are_pairwise_disjoint() {
        let text = "王小明和小明還有王小明的朋友陳小華與小華";
        let segments = per_char_segments(text);
        let map = CharTimeMap::build(&segments).unwrap();
        let resolution = resolve_spans(
            &map,
            &candidates(&["王小明", "小明", "陳小華", "小華", "明和小"]),
        );
        for (i, a) in resolution.spans.iter().enumerate() {
            for b in &resolution.spans[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
        assert_eq!(ranges(&resolution), vec![(2, 5), (8, 11), (14, 17), (18, 20)]);
    }

    #[test]
    fn missing_candidates_produce_nothing() {
        let segments = per_char_segments("今天天氣很好");
        let map = CharTimeMap::build(&segments).unwrap();
        let resolution = resolve_spans(&map, &candidates(&["王小明"]));
        assert!(resolution.spans.is_empty());
        assert_eq!(resolution.dropped, 0);
    }

    #[test]
    fn unmappable_occurrence_is_dropped_and_placement_continues() {
        let segments = per_char_segments("陳小華和小華");
        let map = CharTimeMap::build(&segments).unwrap();
        // Search text runs past the map: "王小明" at 6..9 has no timing.
        let text: Vec<char> = "陳小華和小華王小明".chars().collect();
        let candidates = candidates(&["王小明", "陳小華", "小華", "小明"]);
        let resolution = place_candidates(&map, &text, order_candidates(&candidates));

        assert_eq!(resolution.dropped, 1);
        assert_eq!(ranges(&resolution), vec![(0, 3), (4, 6)]);
        // "小明" at 7..9 overlaps the dropped occurrence, which still holds its claim.
        assert!(resolution.spans.iter().all(|span| span.display_text != "小明"));
    }

    #[test]
    fn empty_map_takes_degraded_path() {
        let map = CharTimeMap::build(&[]).unwrap();
        let resolution = resolve_spans(&map, &candidates(&["陳小華"]));
        assert!(resolution.degraded);
        assert_eq!(resolution.spans, vec![ConfirmedSpan::untimed("陳小華")]);
    }

    #[test]
    fn empty_candidate_is_ignored() {
        let segments = per_char_segments("王小明");
        let map = CharTimeMap::build(&segments).unwrap();
        let resolution = resolve_spans(&map, &candidates(&["", "王小明"]));
        assert_eq!(ranges(&resolution), vec![(0, 3)]);
    }

    #[test]
    fn candidate_longer_than_text_is_not_found() {
        let segments = per_char_segments("王小");
        let map = CharTimeMap::build(&segments).unwrap();
        let resolution = resolve_spans(&map, &candidates(&["王小明"]));
        assert!(resolution.spans.is_empty());
    }
}
