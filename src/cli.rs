use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};

use crate::config::RuntimeConfig;
use crate::engine::LoadPolicy;

/// nameline - find who was named in a recording, and when
///
/// Reads timed transcripts (or audio, when built with the `whisper` feature),
/// tags person names window by window and prints a time-ordered roster.
#[derive(Parser, Debug, Clone)]
#[command(name = "nameline")]
#[command(version)]
#[command(about = "Align person names in a transcript with their timestamps", long_about = None)]
pub struct Cli {
    /// Transcript JSON files or audio files to process, in order
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// JSON runtime configuration; flags below override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Window length in characters for name tagging
    #[arg(long, value_name = "CHARS")]
    pub chunk_size: Option<usize>,

    /// Names lexicon used as the tagger (one name per line)
    #[arg(long, value_name = "PATH", conflicts_with = "tagger_url")]
    pub lexicon: Option<PathBuf>,

    /// HTTP tagging service endpoint
    #[arg(long, value_name = "URL")]
    pub tagger_url: Option<String>,

    /// Per-request timeout for the tagging service, in seconds
    #[arg(long, value_name = "SECS")]
    pub tagger_timeout: Option<f64>,

    /// Response key holding entities in the tagging service reply
    #[arg(long, value_name = "KEY")]
    pub ner_key: Option<String>,

    /// Entity label that marks a person
    #[arg(long, value_name = "LABEL")]
    pub person_label: Option<String>,

    /// Conversion table applied to names and transcript text
    #[arg(long, value_name = "PATH", conflicts_with = "no_convert")]
    pub table: Option<PathBuf>,

    /// Keep output text in the transcript's original script
    #[arg(long)]
    pub no_convert: bool,

    /// Optional override for the assets directory
    #[arg(long = "assets-path", value_name = "DIR")]
    pub assets_path: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write one result file per input here instead of printing to stdout
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// When the speech engine is loaded and released
    #[arg(long, value_enum)]
    pub load_policy: Option<LoadPolicy>,

    /// Whisper model for audio inputs
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Spoken language hint for audio inputs (e.g. zh)
    #[arg(long)]
    pub language: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Report,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Report => "txt",
        }
    }
}

impl Cli {
    /// Validate CLI arguments
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            ensure!(input.exists(), "Input file does not exist: {:?}", input);
            ensure!(input.is_file(), "Input path is not a file: {:?}", input);
        }
        if let Some(dir) = &self.output_dir {
            ensure!(
                !dir.exists() || dir.is_dir(),
                "Output path must be a directory: {:?}",
                dir
            );
        }
        if let Some(size) = self.chunk_size {
            ensure!(size > 0, "Chunk size must be positive, got: {}", size);
        }
        if let Some(timeout) = self.tagger_timeout {
            ensure!(
                timeout.is_finite() && timeout > 0.0,
                "Tagger timeout must be positive, got: {}",
                timeout
            );
        }
        Ok(())
    }

    /// Applies flag overrides on top of the file configuration.
    pub fn merge_into(&self, mut config: RuntimeConfig) -> RuntimeConfig {
        if let Some(size) = self.chunk_size {
            config.chunk_size = Some(size);
        }
        if let Some(label) = &self.person_label {
            config.person_label = Some(label.clone());
        }
        if let Some(lexicon) = &self.lexicon {
            config.lexicon = Some(lexicon.clone());
            config.tagger_url = None;
        }
        if let Some(url) = &self.tagger_url {
            config.tagger_url = Some(url.clone());
            config.lexicon = None;
        }
        if let Some(timeout) = self.tagger_timeout {
            config.tagger_timeout_secs = Some(timeout);
        }
        if let Some(key) = &self.ner_key {
            config.ner_key = Some(key.clone());
        }
        if let Some(table) = &self.table {
            config.conversion_table = Some(table.clone());
            config.convert = Some(true);
        }
        if self.no_convert {
            config.convert = Some(false);
        }
        if let Some(policy) = self.load_policy {
            config.load_policy = Some(policy);
        }
        if let Some(model) = &self.model {
            config.model_path = Some(model.clone());
        }
        if let Some(language) = &self.language {
            config.language = Some(language.clone());
        }
        config
    }
}

/// Inputs with a `.json` extension are pre-computed transcripts; anything else is audio.
pub fn is_transcript_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Result file name for `input` inside `dir`: `<stem>_ner.<ext>`.
pub fn output_path(dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    dir.join(format!("{stem}_ner.{}", format.extension()))
}
