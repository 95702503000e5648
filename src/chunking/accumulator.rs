use tracing::warn;

use crate::error::TaggingError;
use crate::tagging::TaggedEntity;
use crate::types::CandidateSet;

use super::filter::is_person_candidate;

/// Per-scan bookkeeping reported alongside the candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub windows_scanned: usize,
    pub windows_failed: usize,
    pub entities_seen: usize,
}

pub(super) struct CandidateAccumulator<'l> {
    person_label: &'l str,
    candidates: CandidateSet,
    report: ScanReport,
}

impl<'l> CandidateAccumulator<'l> {
    pub(super) fn new(person_label: &'l str) -> Self {
        Self {
            person_label,
            candidates: CandidateSet::new(),
            report: ScanReport::default(),
        }
    }

    /// Folds one window's tagger outcome in; a failed window contributes nothing.
    pub(super) fn handle_window(
        &mut self,
        window_idx: usize,
        outcome: Result<Vec<TaggedEntity>, TaggingError>,
    ) {
        self.report.windows_scanned += 1;
        let entities = match outcome {
            Ok(entities) => entities,
            Err(err) => {
                self.report.windows_failed += 1;
                warn!(window = window_idx + 1, error = %err, "tagging failed; skipping window");
                return;
            }
        };
        self.report.entities_seen += entities.len();
        for entity in entities {
            self.attach_entity(entity);
        }
    }

    pub(super) fn finish(self) -> (CandidateSet, ScanReport) {
        (self.candidates, self.report)
    }

    fn attach_entity(&mut self, entity: TaggedEntity) {
        if entity.label != self.person_label || !is_person_candidate(&entity.text) {
            return;
        }
        self.candidates.insert(entity.text);
    }
}
