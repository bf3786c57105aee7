//! Command-line front-end: identify the spoken language of a WAV file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vaani_core::{catalog, DetectorConfig, LanguageDetector};

#[derive(Parser, Debug)]
#[command(name = "vaani", version, about = "Spoken language identification")]
struct Cli {
    /// WAV file to identify.
    audio: PathBuf,

    /// Detection backend (`whisper`, `facebook_mms`).
    #[arg(long, default_value = "whisper")]
    backend: String,

    /// Whisper model size (`tiny`, `base`, `small`, ...).
    #[arg(long, default_value = "small")]
    model_size: String,

    /// Root directory holding model subdirectories.
    #[arg(long, env = "VAANI_MODELS_DIR")]
    models_dir: Option<PathBuf>,

    /// Device preference (`cpu`, `cuda`, `auto`).
    #[arg(long)]
    device: Option<String>,

    /// Intra-op threads per inference session.
    #[arg(long)]
    threads: Option<usize>,

    /// Print the full result as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// How many languages to list in the summary.
    #[arg(long, default_value_t = 5)]
    top: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = DetectorConfig {
        backend: cli.backend,
        model_size: cli.model_size,
        device: cli.device,
        ..DetectorConfig::default()
    };
    if let Some(dir) = cli.models_dir {
        config.models_dir = dir;
    }
    if let Some(threads) = cli.threads {
        config.intra_threads = threads;
    }

    let mut detector = LanguageDetector::new(&config).context("failed to construct detector")?;
    let detection = detector
        .detect(&cli.audio)
        .with_context(|| format!("detection failed for {}", cli.audio.display()))?;

    if cli.json {
        let mut probabilities: Vec<_> = detection.probabilities.iter().collect();
        probabilities.sort_by(|a, b| b.1.total_cmp(a.1).then(a.0.cmp(b.0)));
        let body = serde_json::json!({
            "language": detection.code,
            "probabilities": probabilities
                .into_iter()
                .map(|(code, prob)| serde_json::json!({ "code": code, "probability": prob }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match detection.code {
        Some(code) => {
            let name = catalog::display_name(code).unwrap_or(code);
            println!("Detected language: {name} ({code})");
        }
        None => {
            println!("No detectable language in {}", cli.audio.display());
            return Ok(());
        }
    }

    let mut ranked: Vec<_> = detection.probabilities.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1).then(a.0.cmp(b.0)));
    for (code, prob) in ranked.into_iter().take(cli.top) {
        println!("  {code:>9}  {:>6.2}%", prob * 100.0);
    }

    Ok(())
}
