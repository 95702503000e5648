use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context, Result};
use serde::Deserialize;

use crate::chunking::{ScanConfig, DEFAULT_CHUNK_SIZE};
use crate::engine::LoadPolicy;
use crate::tagging::http::DEFAULT_NER_KEY;
use crate::tagging::DEFAULT_PERSON_LABEL;

const DEFAULT_TAGGER_TIMEOUT_SECS: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub assets_root: PathBuf,
}

impl AppConfig {
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        let root = match path {
            Some(custom) => canonicalize_dir(&custom)?,
            None => default_assets_root()?,
        };
        Ok(Self { assets_root: root })
    }

    /// Names lexicon shipped in the assets directory, if present.
    pub fn names_lexicon(&self) -> Option<PathBuf> {
        let path = self.assets_root.join("names").join("lexicon.txt");
        path.is_file().then_some(path)
    }
}

fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve assets directory at {:?}", path))?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(anyhow!("assets path {:?} is not a directory", canonical))
    }
}

fn default_assets_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("unable to resolve current executable path")?;
    let assets = exe
        .ancestors()
        .find_map(|dir| {
            let candidate = dir.join("assets");
            candidate.is_dir().then_some(candidate)
        })
        .ok_or_else(|| anyhow!("could not locate default assets directory alongside binary"))?;
    Ok(assets)
}

/// Settings read from an optional JSON file; CLI flags override them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    #[serde(alias = "chunkSize")]
    pub chunk_size: Option<usize>,
    #[serde(alias = "personLabel", alias = "label")]
    pub person_label: Option<String>,
    #[serde(alias = "names")]
    pub lexicon: Option<PathBuf>,
    #[serde(alias = "taggerUrl")]
    pub tagger_url: Option<String>,
    #[serde(alias = "taggerTimeout")]
    pub tagger_timeout_secs: Option<f64>,
    #[serde(alias = "nerKey")]
    pub ner_key: Option<String>,
    #[serde(alias = "table")]
    pub conversion_table: Option<PathBuf>,
    pub convert: Option<bool>,
    #[serde(alias = "loadPolicy")]
    pub load_policy: Option<LoadPolicy>,
    #[serde(alias = "model")]
    pub model_path: Option<PathBuf>,
    pub language: Option<String>,
}

impl RuntimeConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        Self::parse(&data).with_context(|| format!("invalid config file {:?}", path))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: RuntimeConfig =
            serde_json::from_str(raw).context("failed to parse config JSON")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.chunk_size {
            ensure!(size > 0, "chunk_size must be greater than zero");
        }
        if let Some(label) = &self.person_label {
            ensure!(!label.trim().is_empty(), "person_label must not be empty");
        }
        if let Some(timeout) = self.tagger_timeout_secs {
            ensure!(
                timeout.is_finite() && timeout > 0.0,
                "tagger_timeout_secs must be positive, got {}",
                timeout
            );
        }
        ensure!(
            !(self.lexicon.is_some() && self.tagger_url.is_some()),
            "configure either a names lexicon or a tagger URL, not both"
        );
        Ok(())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            person_label: self
                .person_label
                .clone()
                .unwrap_or_else(|| DEFAULT_PERSON_LABEL.to_string()),
        }
    }

    pub fn tagger_timeout_secs(&self) -> f64 {
        self.tagger_timeout_secs
            .unwrap_or(DEFAULT_TAGGER_TIMEOUT_SECS)
    }

    pub fn ner_key(&self) -> &str {
        self.ner_key.as_deref().unwrap_or(DEFAULT_NER_KEY)
    }
}
