//! Candidate harvesting over fixed-size transcript windows.

mod accumulator;
mod filter;
mod windows;


use tracing::{debug, info};

use crate::error::Result;
use crate::tagging::{NerTagger, DEFAULT_PERSON_LABEL};
use crate::types::CandidateSet;

use self::accumulator::CandidateAccumulator;

pub use self::accumulator::ScanReport;
pub use self::filter::is_person_candidate;
pub use self::windows::split_windows;

/// Default window length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Window size and the label that marks a person entity.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub chunk_size: usize,
    pub person_label: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            person_label: DEFAULT_PERSON_LABEL.to_string(),
        }
    }
}

/// Tags every window of `text` and collects the person-like candidates.
///
/// A tagger failure only costs that window. The sole error is an invalid chunk size.
pub fn scan_candidates<T>(
    text: &str,
    config: &ScanConfig,
    tagger: &T,
) -> Result<(CandidateSet, ScanReport)>
where
    T: NerTagger + ?Sized,
{
    let windows = split_windows(text, config.chunk_size)?;
    info!(
        chars = text.chars().count(),
        windows = windows.len(),
        "scanning transcript for names"
    );

    let mut accumulator = CandidateAccumulator::new(&config.person_label);
    for (idx, window) in windows.iter().enumerate() {
        debug!(window = idx + 1, total = windows.len(), "tagging window");
        accumulator.handle_window(idx, tagger.tag(window));
    }

    let (candidates, report) = accumulator.finish();
    info!(
        candidates = candidates.len(),
        failed_windows = report.windows_failed,
        "name scan complete"
    );
    Ok((candidates, report))
}
