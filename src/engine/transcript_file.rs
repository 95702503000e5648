use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use super::SpeechEngine;
use crate::types::{SpeechTranscript, TimingSegment};

/// Reads an engine transcript that was produced ahead of time.
///
/// Accepts `{"text": ..., "segments": [...]}` or a bare segment array.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptFile;

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptDocument {
    Segments(Vec<TimingSegment>),
    Full(SpeechTranscript),
}

impl TranscriptFile {
    pub fn parse(raw: &str) -> Result<SpeechTranscript> {
        let document: TranscriptDocument =
            serde_json::from_str(raw).context("failed to parse transcript JSON")?;
        Ok(match document {
            TranscriptDocument::Segments(segments) => SpeechTranscript {
                text: String::new(),
                segments,
            },
            TranscriptDocument::Full(transcript) => transcript,
        })
    }
}

impl SpeechEngine for TranscriptFile {
    fn transcribe(&self, input: &Path) -> Result<SpeechTranscript> {
        let raw = fs::read_to_string(input)
            .with_context(|| format!("failed to read transcript file {:?}", input))?;
        let transcript =
            Self::parse(&raw).with_context(|| format!("invalid transcript file {:?}", input))?;
        info!(
            input = %input.display(),
            segments = transcript.segments.len(),
            "transcript loaded"
        );
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document_with_aliases() {
        let raw = r#"{
            "text": "王小明",
            "segments": [{"text": "王小明", "start": 1.0, "end": 1.5}]
        }"#;
        let transcript = TranscriptFile::parse(raw).unwrap();
        assert_eq!(transcript.text, "王小明");
        assert_eq!(transcript.segments, vec![TimingSegment::new("王小明", 1.0, 1.5)]);
    }

    #[test]
    fn parses_bare_segment_array() {
        let raw = r#"[{"text": "你好", "start_time": 0.0, "end_time": 0.4}]"#;
        let transcript = TranscriptFile::parse(raw).unwrap();
        assert!(transcript.text.is_empty());
        assert_eq!(transcript.segments.len(), 1);
    }

    #[test]
    fn text_only_document_has_no_segments() {
        let transcript = TranscriptFile::parse(r#"{"text": "陳小華來了"}"#).unwrap();
        assert!(transcript.segments.is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert!(TranscriptFile::parse("[1, 2, 3]").is_err());
    }
}
