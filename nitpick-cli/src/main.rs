//! nitpick: grammar correction from the command line
//!
//! One positional argument, one generation pass, corrected text on stdout.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nitpick_core::{check_status, variant_registry, Config};
use nitpick_llm::{correct_once, CorrectorConfig};

#[derive(Parser)]
#[command(name = "nitpick")]
#[command(about = "Local grammar correction - one-shot seq2seq inference")]
struct Cli {
    /// Text to correct
    #[arg(required_unless_present = "list_variants")]
    text: Option<String>,

    /// Correction variant to use (see --list-variants)
    #[arg(short, long)]
    variant: Option<String>,

    /// Model directory, overriding the configured location
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// List known variants and whether their models are in place
    #[arg(long)]
    list_variants: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the corrected text
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.list_variants {
        list_variants(&config, cli.model_dir.as_ref());
        return Ok(());
    }

    let text = cli.text.unwrap_or_default();
    let variant = config.resolve_variant(cli.variant.as_deref())?;
    let model_dir = config.model_dir_for(&variant, cli.model_dir.as_ref());

    let corrector_config = CorrectorConfig {
        prefix: variant.prefix.clone(),
        skip_blank: variant.skip_blank,
        max_tokens: config.generation.max_tokens,
        temperature: config.generation.temperature,
        top_p: config.generation.top_p,
        seed: config.generation.seed,
    };

    let corrected = correct_once(&model_dir, &corrector_config, &text)?;

    let mut stdout = std::io::stdout();
    writeln!(stdout, "{corrected}")?;
    stdout.flush()?;

    Ok(())
}

fn list_variants(config: &Config, cli_dir: Option<&PathBuf>) {
    println!("Available variants:\n");

    for variant in variant_registry() {
        let dir = config.model_dir_for(&variant, cli_dir);
        let status = check_status(&dir);
        let default_marker = if variant.id == config.models.variant {
            " (default)"
        } else {
            ""
        };
        let blank_behavior = if variant.skip_blank {
            "returned unchanged"
        } else {
            "corrected like any other input"
        };

        println!(
            "  {} - {}{}\n    Prefix: {:?}, blank input: {}\n    Model: {}\n",
            variant.id, variant.name, default_marker, variant.prefix, blank_behavior, status
        );
    }
}
