//! Core types for the nameline alignment pipeline

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One unit of engine output: a run of transcript text spoken between two instants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimingSegment {
    pub text: String,
    #[serde(alias = "start")]
    pub start_time: f64, // seconds
    #[serde(alias = "end")]
    pub end_time: f64, // seconds
}

impl TimingSegment {
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
        }
    }
}

/// Everything the speech engine hands back for one input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpeechTranscript {
    /// Engine-supplied transcript. Only used when there are no segments.
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "time_stamps")]
    pub segments: Vec<TimingSegment>,
}

/// Unique, filtered entity strings harvested from the transcript.
///
/// A `BTreeSet` keeps iteration order fixed, so degraded output is reproducible.
pub type CandidateSet = BTreeSet<String>;

/// A positioned occurrence of a candidate, produced by the span resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedSpan {
    pub start_idx: usize,
    pub end_idx: usize, // exclusive
    pub start_time: f64,
    pub end_time: f64,
    pub display_text: String,
}

impl ConfirmedSpan {
    /// Placeholder span used when no timing data exists.
    pub fn untimed(display_text: impl Into<String>) -> Self {
        Self {
            start_idx: 0,
            end_idx: 0,
            start_time: 0.0,
            end_time: 0.0,
            display_text: display_text.into(),
        }
    }

    pub fn overlaps(&self, other: &ConfirmedSpan) -> bool {
        self.start_idx < other.end_idx && other.start_idx < self.end_idx
    }
}

/// Wall-clock time spent in each stage of one request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub transcription: Duration,
    pub tagging: Duration,
    pub alignment: Duration,
    pub total: Duration,
}

/// One line of the final roster, in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub start: f64,
    pub end: f64,
    /// `[MM:SS.mmm - MM:SS.mmm]`
    pub text: String,
    pub name: String,
    pub start_idx: usize,
    pub end_idx: usize,
}

/// Stage metrics in seconds, as reported to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    pub transcription_secs: f64,
    pub tagging_secs: f64,
    pub alignment_secs: f64,
    pub total_secs: f64,
}

impl From<StageTimings> for StageMetrics {
    fn from(timings: StageTimings) -> Self {
        Self {
            transcription_secs: timings.transcription.as_secs_f64(),
            tagging_secs: timings.tagging.as_secs_f64(),
            alignment_secs: timings.alignment.as_secs_f64(),
            total_secs: timings.total.as_secs_f64(),
        }
    }
}

/// Complete result of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub filename: String,
    /// Transcript duration in seconds (0 when untimed).
    pub duration: f64,
    pub segments: Vec<RosterEntry>,
    pub full_text: String,
    pub metrics: StageMetrics,
}
