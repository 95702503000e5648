//! Speech engine seam and the resource slot that owns a loaded engine.
//!
//! The alignment core never touches an engine directly. Request handling asks
//! the slot for an engine, which loads it on demand and, under the lazy
//! policy, releases it again as soon as the request is done.

mod slot;
mod transcript_file;
mod utf8;

use std::path::Path;

use anyhow::Result;

use crate::types::SpeechTranscript;

pub use slot::{EngineSlot, EngineStatus, LoadPolicy};
pub use transcript_file::TranscriptFile;
pub use utf8::Utf8Joiner;

/// Produces a transcript with timing segments for one input.
pub trait SpeechEngine {
    fn transcribe(&self, input: &Path) -> Result<SpeechTranscript>;
}

impl<E: SpeechEngine + ?Sized> SpeechEngine for Box<E> {
    fn transcribe(&self, input: &Path) -> Result<SpeechTranscript> {
        (**self).transcribe(input)
    }
}
