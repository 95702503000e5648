//! One request, end to end: timing map, name scan, resolution, assembly.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::info;

use crate::assemble::{assemble, AssemblyContext};
use crate::chunking::{scan_candidates, ScanConfig};
use crate::convert::ScriptConverter;
use crate::engine::SpeechEngine;
use crate::error::Result;
use crate::resolve::resolve_spans;
use crate::tagging::NerTagger;
use crate::timing::CharTimeMap;
use crate::types::{AlignmentResult, SpeechTranscript, StageTimings};

/// Borrowed collaborators plus scan settings. Holds no per-request state.
pub struct Pipeline<'c, T: ?Sized, C: ?Sized> {
    tagger: &'c T,
    converter: &'c C,
    scan: ScanConfig,
}

impl<'c, T, C> Pipeline<'c, T, C>
where
    T: NerTagger + ?Sized,
    C: ScriptConverter + ?Sized,
{
    pub fn new(tagger: &'c T, converter: &'c C, scan: ScanConfig) -> Self {
        Self {
            tagger,
            converter,
            scan,
        }
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    /// Transcribes `input` with `engine`, then aligns the result.
    pub fn run<E>(&self, engine: &E, input: &Path) -> anyhow::Result<AlignmentResult>
    where
        E: SpeechEngine + ?Sized,
    {
        let started = Instant::now();
        let transcript = engine
            .transcribe(input)
            .with_context(|| format!("failed to transcribe {:?}", input))?;
        let transcription = started.elapsed();
        let filename = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.align(&filename, &transcript, transcription)
            .with_context(|| format!("failed to align {:?}", input))
    }

    /// Aligns an already transcribed input. `transcription` is the time the
    /// caller spent producing `transcript` and is folded into the totals.
    pub fn align(
        &self,
        filename: &str,
        transcript: &SpeechTranscript,
        transcription: Duration,
    ) -> Result<AlignmentResult> {
        let started = Instant::now();
        let map = CharTimeMap::build(&transcript.segments)?;
        let full_text = if map.is_empty() {
            transcript.text.as_str()
        } else {
            map.text()
        };

        let tagging_started = Instant::now();
        let (candidates, report) = scan_candidates(full_text, &self.scan, self.tagger)?;
        let tagging = tagging_started.elapsed();

        let alignment_started = Instant::now();
        let resolution = resolve_spans(&map, &candidates);
        let mut timings = StageTimings {
            transcription,
            tagging,
            alignment: Duration::ZERO,
            total: Duration::ZERO,
        };
        let context = AssemblyContext {
            filename,
            full_text,
            duration: map.duration(),
            timings,
        };
        let mut result = assemble(resolution.spans, context, self.converter);
        timings.alignment = alignment_started.elapsed();
        timings.total = transcription + started.elapsed();
        result.metrics = timings.into();

        info!(
            file = filename,
            names = result.segments.len(),
            candidates = candidates.len(),
            failed_windows = report.windows_failed,
            degraded = resolution.degraded,
            total_secs = result.metrics.total_secs,
            "alignment finished"
        );
        Ok(result)
    }
}
