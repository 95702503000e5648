//! Aligns person names found in a transcript with the time they were spoken.
//!
//! The pipeline rebuilds the transcript from timing segments
//! ([`timing`]), harvests candidate names window by window ([`chunking`]),
//! places them greedily longest-first ([`resolve`]) and packages an ordered
//! roster ([`assemble`]).

pub mod assemble;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod tagging;
pub mod timing;
pub mod types;

#[cfg(feature = "whisper")]
pub mod audio;
#[cfg(feature = "whisper")]
pub mod transcription;

pub use error::{AlignError, MappingError, TaggingError};
pub use pipeline::Pipeline;
pub use types::{AlignmentResult, ConfirmedSpan, RosterEntry, SpeechTranscript, TimingSegment};
