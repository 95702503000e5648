use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use nameline::cli::{is_transcript_file, output_path, Cli, OutputFormat};
use nameline::config::{AppConfig, RuntimeConfig};
use nameline::convert::{HantConverter, Identity, ScriptConverter, TableConverter};
use nameline::engine::{EngineSlot, LoadPolicy, SpeechEngine, TranscriptFile};
use nameline::report::render_report;
use nameline::tagging::http::HttpTagger;
use nameline::tagging::lexicon::LexiconTagger;
use nameline::tagging::NerTagger;
use nameline::types::AlignmentResult;
use nameline::Pipeline;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    cli.validate()
        .context("Failed to validate command-line arguments")?;

    let settings = load_settings(&cli).context("Failed to load configuration")?;
    let assets = locate_assets(&cli)?;

    let tagger = build_tagger(&settings, assets.as_ref()).context("Failed to set up name tagger")?;
    let converter = build_converter(&settings).context("Failed to set up script conversion")?;
    let pipeline = Pipeline::new(tagger.as_ref(), converter.as_ref(), settings.scan_config());
    info!(
        inputs = cli.inputs.len(),
        chunk_size = pipeline.scan_config().chunk_size,
        label = %pipeline.scan_config().person_label,
        "nameline starting"
    );

    // Transcript-only runs never need the speech engine, so they never load it eagerly.
    let needs_engine = cli.inputs.iter().any(|input| !is_transcript_file(input));
    let policy = match settings.load_policy.unwrap_or_default() {
        LoadPolicy::Eager if needs_engine => LoadPolicy::Eager,
        _ => LoadPolicy::Lazy,
    };
    let mut slot = EngineSlot::new(policy, || load_speech_engine(&settings))?;

    if let Some(dir) = &cli.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;
    }

    let mut failed = 0usize;
    for input in &cli.inputs {
        let outcome = if is_transcript_file(input) {
            pipeline.run(&TranscriptFile, input)
        } else {
            slot.with_engine(|engine| pipeline.run(engine.as_ref(), input))
        };
        let written = outcome.and_then(|result| emit(&cli, input, &result));
        if let Err(err) = written {
            failed += 1;
            error!(input = %input.display(), "{err:#}");
        }
    }
    debug!(status = %slot.status(), loads = slot.load_count(), "speech engine slot");

    ensure!(
        failed == 0,
        "{} of {} inputs failed",
        failed,
        cli.inputs.len()
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<RuntimeConfig> {
    let file = match &cli.config {
        Some(path) => RuntimeConfig::from_path(path)?,
        None => RuntimeConfig::default(),
    };
    let settings = cli.merge_into(file);
    settings.validate()?;
    Ok(settings)
}

/// An explicit `--assets-path` must resolve; the default location is optional.
fn locate_assets(cli: &Cli) -> Result<Option<AppConfig>> {
    if cli.assets_path.is_some() {
        return AppConfig::from_override(cli.assets_path.clone()).map(Some);
    }
    match AppConfig::from_override(None) {
        Ok(config) => Ok(Some(config)),
        Err(err) => {
            debug!("no assets directory: {err:#}");
            Ok(None)
        }
    }
}

fn build_tagger(
    settings: &RuntimeConfig,
    assets: Option<&AppConfig>,
) -> Result<Box<dyn NerTagger>> {
    if let Some(url) = &settings.tagger_url {
        let timeout = Duration::from_secs_f64(settings.tagger_timeout_secs());
        let tagger = HttpTagger::new(url.as_str(), timeout)?.with_ner_key(settings.ner_key());
        info!(endpoint = tagger.endpoint(), "using HTTP tagger");
        return Ok(Box::new(tagger));
    }
    let lexicon = settings
        .lexicon
        .clone()
        .or_else(|| assets.and_then(AppConfig::names_lexicon));
    match lexicon {
        Some(path) => {
            let tagger = LexiconTagger::from_path(&path)?;
            info!(lexicon = %path.display(), names = tagger.len(), "using lexicon tagger");
            Ok(Box::new(tagger))
        }
        None => bail!("No name tagger configured; pass --lexicon or --tagger-url"),
    }
}

fn build_converter(settings: &RuntimeConfig) -> Result<Box<dyn ScriptConverter>> {
    if settings.convert == Some(false) {
        return Ok(Box::new(Identity));
    }
    match &settings.conversion_table {
        Some(path) => {
            let converter = TableConverter::from_path(path)?;
            info!(table = %path.display(), entries = converter.len(), "conversion table loaded");
            Ok(Box::new(converter))
        }
        None => Ok(Box::new(HantConverter)),
    }
}

#[cfg(feature = "whisper")]
fn load_speech_engine(settings: &RuntimeConfig) -> Result<Box<dyn SpeechEngine>> {
    use nameline::transcription::WhisperEngine;

    let model = settings
        .model_path
        .clone()
        .unwrap_or_else(WhisperEngine::default_model_path);
    let engine = WhisperEngine::load(&model, settings.language.clone())?;
    Ok(Box::new(engine))
}

#[cfg(not(feature = "whisper"))]
fn load_speech_engine(settings: &RuntimeConfig) -> Result<Box<dyn SpeechEngine>> {
    if settings.model_path.is_some() {
        tracing::warn!("--model is ignored without the `whisper` feature");
    }
    bail!("Audio input requires a build with the `whisper` feature; pass a transcript JSON instead")
}

fn render(result: &AlignmentResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(result).context("Failed to serialize result")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Report => Ok(render_report(result)),
    }
}

fn emit(cli: &Cli, input: &Path, result: &AlignmentResult) -> Result<()> {
    let rendered = render(result, cli.format)?;
    match &cli.output_dir {
        Some(dir) => {
            let path = output_path(dir, input, cli.format);
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write result to {:?}", path))?;
            info!(output = %path.display(), names = result.segments.len(), "result written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
