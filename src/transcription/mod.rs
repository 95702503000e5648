//! Whisper speech engine - converts audio into timed transcript segments
//!
//! Uses whisper-rs for recognition. Segment timings feed the character time
//! map, so every character inherits the interval of the segment it came from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::decoder::decode_audio;
use crate::audio::resample::{linear_resample, WHISPER_SAMPLE_RATE};
use crate::engine::{SpeechEngine, Utf8Joiner};
use crate::types::{SpeechTranscript, TimingSegment};

/// A loaded whisper model. Loading is the expensive part; keep it in an
/// [`EngineSlot`](crate::engine::EngineSlot) to control its lifetime.
pub struct WhisperEngine {
    ctx: WhisperContext,
    language: Option<String>,
}

impl WhisperEngine {
    /// Loads a ggml model. `language` of `None` lets whisper auto-detect.
    pub fn load(model_path: &Path, language: Option<String>) -> Result<Self> {
        let path = model_path
            .to_str()
            .with_context(|| format!("model path {:?} is not valid UTF-8", model_path))?;
        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .with_context(|| format!("Failed to load Whisper model {:?}", model_path))?;
        info!(model = %model_path.display(), "whisper model loaded");
        Ok(Self { ctx, language })
    }

    /// Model path from `WHISPER_MODEL_PATH`, falling back to `./models/ggml-base.bin`.
    pub fn default_model_path() -> PathBuf {
        std::env::var_os("WHISPER_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./models/ggml-base.bin"))
    }
}

impl SpeechEngine for WhisperEngine {
    fn transcribe(&self, input: &Path) -> Result<SpeechTranscript> {
        let audio = decode_audio(input).context("Failed to decode input audio")?;
        let samples = linear_resample(&audio.samples, audio.sample_rate, WHISPER_SAMPLE_RATE)?;
        info!(
            input = %input.display(),
            seconds = audio.duration_secs(),
            "transcribing with whisper"
        );

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(self.language.as_deref().unwrap_or("auto")));
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let mut state = self
            .ctx
            .create_state()
            .context("Failed to create Whisper state")?;
        state
            .full(params, &samples)
            .context("Failed to transcribe audio")?;

        // Segment boundaries can split a multi-byte character; the fragment
        // moves to the following segment.
        let mut joiner = Utf8Joiner::default();
        let mut segments: Vec<TimingSegment> = Vec::new();
        for segment in state.as_iter() {
            let bytes = segment.to_bytes().context("Failed to get segment text")?;
            let text = joiner.push(bytes).trim().to_string();
            if text.is_empty() {
                continue;
            }
            // Timestamps are in centiseconds.
            let start_time = segment.start_timestamp() as f64 / 100.0;
            let end_time = segment.end_timestamp() as f64 / 100.0;
            segments.push(TimingSegment::new(text, start_time, end_time.max(start_time)));
        }

        let tail = joiner.finish();
        if let Some(last) = segments.last_mut() {
            last.text.push_str(tail.trim_end());
        }

        let text = segments.iter().map(|segment| segment.text.as_str()).collect();
        Ok(SpeechTranscript { text, segments })
    }
}
