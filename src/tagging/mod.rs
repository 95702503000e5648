//! Named-entity tagger seam.
//!
//! The scanner only needs `tag(chunk) -> [(text, label)]`. Two adapters ship
//! with the crate: a gazetteer over a names file and a client for a remote
//! tagging service.

pub mod http;
pub mod lexicon;

use crate::error::TaggingError;

pub use http::HttpTagger;
pub use lexicon::LexiconTagger;

/// Label the MSRA tag set uses for personal names.
pub const DEFAULT_PERSON_LABEL: &str = "PERSON";

/// A labelled span reported by a tagger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEntity {
    pub text: String,
    pub label: String,
}

impl TaggedEntity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Labels entity spans in one window of transcript text.
pub trait NerTagger {
    fn tag(&self, chunk: &str) -> Result<Vec<TaggedEntity>, TaggingError>;
}

impl<F> NerTagger for F
where
    F: Fn(&str) -> Result<Vec<TaggedEntity>, TaggingError>,
{
    fn tag(&self, chunk: &str) -> Result<Vec<TaggedEntity>, TaggingError> {
        self(chunk)
    }
}
