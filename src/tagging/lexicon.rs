use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::{NerTagger, TaggedEntity, DEFAULT_PERSON_LABEL};
use crate::error::TaggingError;

/// Gazetteer tagger: reports every known name that appears in a chunk.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    entries: BTreeMap<String, String>,
}

impl LexiconTagger {
    /// Reads a names file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read names lexicon {:?}", path))?;
        Self::from_lexicon(&data).with_context(|| format!("invalid names lexicon {:?}", path))
    }

    /// Parses one name per line, optionally followed by a tab and a label.
    /// Blank lines and lines starting with `#` or `;` are skipped.
    pub fn from_lexicon(data: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (idx, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let mut columns = line.split('\t').map(str::trim);
            let name = columns.next().unwrap_or_default();
            if name.is_empty() {
                bail!("lexicon line {} has an empty name column", idx + 1);
            }
            let label = columns
                .next()
                .filter(|label| !label.is_empty())
                .unwrap_or(DEFAULT_PERSON_LABEL);
            entries.insert(name.to_string(), label.to_string());
        }

        if entries.is_empty() {
            bail!("names lexicon contained no entries");
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NerTagger for LexiconTagger {
    fn tag(&self, chunk: &str) -> Result<Vec<TaggedEntity>, TaggingError> {
        Ok(self
            .entries
            .iter()
            .filter(|(name, _)| chunk.contains(name.as_str()))
            .map(|(name, label)| TaggedEntity::new(name.clone(), label.clone()))
            .collect())
    }
}
