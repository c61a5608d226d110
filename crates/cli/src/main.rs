//! # autoprompt: write prompt templates from an objective
//!
//! Loads `.env`, reads the instructional document, and prints the prompt
//! template the model writes for the given objective.

mod app;

use anyhow::{Context, Result};
use app::{apply_overrides, format_output, read_objective, Overrides};
use autoprompt::constants::{DEFAULT_DOCUMENT_PATH, ENV_DOCUMENT_PATH};
use autoprompt::{PipelineConfig, PromptPipeline, StaticDocument};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// What the generated prompt template should accomplish. Read from stdin
    /// when omitted or "-".
    objective: Option<String>,

    /// Path to the instructional document
    #[arg(long, env = ENV_DOCUMENT_PATH)]
    document: Option<PathBuf>,

    /// Chat model to use instead of the default
    #[arg(long)]
    model: Option<String>,

    /// Print only the body of the ```prompt block in the reply
    #[arg(long)]
    extract: bool,

    /// Print the first CHARS characters of the document and exit
    #[arg(long, value_name = "CHARS", num_args = 0..=1, default_missing_value = "200")]
    preview: Option<usize>,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    // The document is read before credentials are checked, so a missing file
    // is reported even when OPENAI_API_KEY is also unset.
    let document_path = cli
        .document
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_PATH));
    let document = StaticDocument::load(&document_path)?;

    if let Some(chars) = cli.preview {
        println!("{}", document.preview(chars));
        return Ok(());
    }

    let overrides = Overrides {
        document: Some(document_path),
        model: cli.model.clone(),
    };
    let config = apply_overrides(PipelineConfig::from_env()?, &overrides);
    info!("Loaded configuration: {:?}", config);

    let pipeline = PromptPipeline::builder()
        .config(&config)
        .document(document)
        .build()?;
    let objective = read_objective(cli.objective.as_deref(), std::io::stdin().lock())
        .context("Failed to read objective")?;

    let reply = pipeline.generate(&objective).await?;
    println!("{}", format_output(&reply, cli.extract));

    Ok(())
}
