//! CLI tool for building decks from markdown slide documents.

use anyhow::{Context, Result};
use clap::Parser;
use deck_pipeline::{BuildConfig, LogSink, Orchestrator};
use std::fs;
use std::path::{Path, PathBuf};

mod outline;

use outline::OutlineRenderer;

/// Build a deck from a markdown slide document.
#[derive(Parser, Debug)]
#[command(name = "markdeck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input markdown slide document
    input: PathBuf,

    /// Output document path (default: <input stem>-deck.txt beside the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print parsed slide records as JSON and exit without building
    #[arg(long)]
    json: bool,

    /// Skip image acquisition entirely
    #[arg(long)]
    skip_images: bool,

    /// Regenerate images even when files from a prior run exist
    #[arg(long)]
    force_images: bool,

    /// Date line for the title slide
    #[arg(long)]
    date: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    if args.json {
        let slides = deck_parser::parse_document(&text)
            .with_context(|| format!("Failed to parse {}", args.input.display()))?;
        println!("{}", serde_json::to_string_pretty(&slides)?);
        return Ok(());
    }

    let output_path = get_output_path(&args.input, args.output.as_ref());
    log::debug!("Building {} -> {}", args.input.display(), output_path.display());

    let mut config = BuildConfig::new(&output_path);
    config.skip_images = args.skip_images;
    config.force_regenerate = args.force_images;
    config.date = args.date;

    // No image generation backend is wired in here; images from prior runs
    // are still discovered in the images/ directory beside the output.
    let mut renderer = OutlineRenderer::new();
    let mut sink = LogSink;
    let mut orchestrator = Orchestrator::new(config, &mut renderer, None, &mut sink);

    let report = orchestrator
        .run(&text)
        .with_context(|| format!("Failed to build {}", args.input.display()))?;

    println!(
        "Wrote {} ({} slides)",
        report.output.display(),
        report.slides
    );
    if report.images_reused > 0 {
        println!("  Reused {} existing image(s)", report.images_reused);
    }
    if !report.images_failed.is_empty() {
        println!(
            "  Note: no image for slide(s) {:?}; rendered text-only",
            report.images_failed
        );
    }

    Ok(())
}

/// Determine the output path: explicit flag, or derived beside the input.
fn get_output_path(input: &Path, output: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = output {
        return path.clone();
    }

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("deck");
    let filename = format!("{}-deck.txt", stem);

    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(filename),
        _ => PathBuf::from(filename),
    }
}
