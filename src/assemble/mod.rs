//! Turns resolved spans into the chronologically ordered roster.

use crate::convert::ScriptConverter;
use crate::format::format_interval;
use crate::types::{AlignmentResult, ConfirmedSpan, RosterEntry, StageTimings};

/// Request-level facts the roster is packaged with.
#[derive(Debug, Clone)]
pub struct AssemblyContext<'a> {
    pub filename: &'a str,
    /// Unconverted transcript; converted here for output.
    pub full_text: &'a str,
    pub duration: f64,
    pub timings: StageTimings,
}

/// Orders spans by start time and converts all display text.
///
/// The sort is stable: spans sharing a start time keep resolver order.
pub fn assemble<C>(
    mut spans: Vec<ConfirmedSpan>,
    context: AssemblyContext<'_>,
    converter: &C,
) -> AlignmentResult
where
    C: ScriptConverter + ?Sized,
{
    spans.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let segments = spans
        .into_iter()
        .map(|span| RosterEntry {
            start: span.start_time,
            end: span.end_time,
            text: format_interval(span.start_time, span.end_time),
            name: converter.convert(&span.display_text),
            start_idx: span.start_idx,
            end_idx: span.end_idx,
        })
        .collect();

    AlignmentResult {
        filename: context.filename.to_string(),
        duration: context.duration,
        segments,
        full_text: converter.convert(context.full_text),
        metrics: context.timings.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{HantConverter, Identity};

    fn span(start_idx: usize, start_time: f64, text: &str) -> ConfirmedSpan {
        ConfirmedSpan {
            start_idx,
            end_idx: start_idx + text.chars().count(),
            start_time,
            end_time: start_time + 0.5,
            display_text: text.to_string(),
        }
    }

    fn context(full_text: &str) -> AssemblyContext<'_> {
        AssemblyContext {
            filename: "meeting.json",
            full_text,
            duration: 12.5,
            timings: StageTimings::default(),
        }
    }

    #[test]
    fn orders_by_start_time() {
        let spans = vec![span(10, 5.0, "王小明"), span(0, 1.0, "陈小华"), span(4, 2.0, "小明")];
        let result = assemble(spans, context(""), &Identity);
        let starts: Vec<f64> = result.segments.iter().map(|entry| entry.start).collect();
        assert_eq!(starts, vec![1.0, 2.0, 5.0]);
        assert_eq!(result.segments[0].text, "[00:01.000 - 00:01.500]");
    }

    #[test]
    fn equal_start_times_keep_resolver_order() {
        let spans = vec![span(3, 1.0, "第一"), span(0, 1.0, "第二"), span(8, 0.5, "第三")];
        let result = assemble(spans, context(""), &Identity);
        let names: Vec<&str> = result.segments.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["第三", "第一", "第二"]);
    }

    #[test]
    fn converts_names_and_transcript_but_keeps_offsets() {
        let spans = vec![span(3, 1.0, "陈小华")];
        let result = assemble(spans, context("大家好陈小华"), &HantConverter);
        assert_eq!(result.segments[0].name, "陳小華");
        assert_eq!((result.segments[0].start_idx, result.segments[0].end_idx), (3, 6));
        assert_eq!(result.full_text, "大家好陳小華");
        assert_eq!(result.duration, 12.5);
        assert_eq!(result.filename, "meeting.json");
    }

    #[test]
    fn empty_roster_is_valid() {
        let result = assemble(Vec::new(), context("今天天氣很好"), &Identity);
        assert!(result.segments.is_empty());
        assert_eq!(result.full_text, "今天天氣很好");
    }
}
