//! Plain-text report for people reading results outside a client.

use std::fmt::Write as _;

use crate::chunking::split_windows;
use crate::types::AlignmentResult;

const RULE_WIDTH: usize = 30;
const TRANSCRIPT_WIDTH: usize = 50;

/// Renders the roster followed by the wrapped transcript.
pub fn render_report(result: &AlignmentResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "File: {}", result.filename);
    let _ = writeln!(out, "Total time: {:.2} s", result.metrics.total_secs);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Names (with timestamps):");
    if result.segments.is_empty() {
        let _ = writeln!(out, "(no names detected)");
    }
    for entry in &result.segments {
        let _ = writeln!(out, "{} {}", entry.text, entry.name);
    }
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Full transcript:");
    for line in wrap(&result.full_text, TRANSCRIPT_WIDTH) {
        let _ = writeln!(out, "{line}");
    }
    out
}

/// Breaks text into lines of at most `width` characters, keeping existing line breaks.
fn wrap(text: &str, width: usize) -> Vec<&str> {
    text.lines()
        .flat_map(|line| split_windows(line, width).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RosterEntry, StageMetrics};

    fn result(segments: Vec<RosterEntry>, full_text: &str) -> AlignmentResult {
        AlignmentResult {
            filename: "case4.json".to_string(),
            duration: 3.0,
            segments,
            full_text: full_text.to_string(),
            metrics: StageMetrics {
                total_secs: 1.234,
                ..StageMetrics::default()
            },
        }
    }

    #[test]
    fn lists_names_with_times() {
        let entry = RosterEntry {
            start: 1.0,
            end: 2.5,
            text: "[00:01.000 - 00:02.500]".to_string(),
            name: "王小明".to_string(),
            start_idx: 0,
            end_idx: 3,
        };
        let report = render_report(&result(vec![entry], "王小明來了"));
        assert!(report.starts_with("File: case4.json\nTotal time: 1.23 s\n"));
        assert!(report.contains("[00:01.000 - 00:02.500] 王小明\n"));
        assert!(report.ends_with("Full transcript:\n王小明來了\n"));
    }

    #[test]
    fn notes_when_no_names_found() {
        let report = render_report(&result(Vec::new(), ""));
        assert!(report.contains("(no names detected)"));
    }

    #[test]
    fn wraps_transcript_at_fifty_chars() {
        let text = "字".repeat(120);
        let report = render_report(&result(Vec::new(), &text));
        let body: Vec<&str> = report
            .rsplit("Full transcript:\n")
            .next()
            .unwrap()
            .lines()
            .collect();
        let widths: Vec<usize> = body.iter().map(|line| line.chars().count()).collect();
        assert_eq!(widths, vec![50, 50, 20]);
    }
}
