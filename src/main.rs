//! mind-glass binary — CLI entry point.
//!
//! Two modes:
//! - monitor (default): capture → OCR → classify → notify, repeating until
//!   Ctrl-C;
//! - offline (`--input`): OCR a stored image or a folder of images into a
//!   plain-text report. No capture, no classifier, no credential needed.

use anyhow::{bail, Context, Result};
use clap::Parser;
use mind_glass::capture;
use mind_glass::config::ClassifierConfig;
use mind_glass::monitor::{MonitorConfig, MonitorLoop};
use mind_glass::notify::DesktopNotifier;
use mind_glass::ocr::{BatchItem, TesseractEngine, TextExtractor};
use mind_glass::sentiment::SentimentClassifier;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

#[derive(Parser)]
#[command(
    name = "mind-glass",
    version,
    about = "Screen wellness monitor — watches on-screen text for negative spirals and offers a gentle nudge"
)]
struct Cli {
    /// Image file or folder to extract text from, instead of monitoring the screen
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Report file for offline extraction
    #[arg(short, long, default_value = "extracted_text.txt")]
    output: PathBuf,

    /// Seconds between monitoring cycles
    #[arg(long, default_value_t = 10)]
    interval: u64,

    /// OCR language passed to Tesseract
    #[arg(long, default_value = "eng")]
    lang: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let engine = TesseractEngine::locate(&cli.lang)
        .context("Tesseract OCR is required — install it and make sure it is on PATH")?;
    let extractor = TextExtractor::new(Box::new(engine));

    match &cli.input {
        Some(input) => run_offline(&extractor, input, &cli.output),
        None => run_monitor(extractor, Duration::from_secs(cli.interval)).await,
    }
}

async fn run_monitor(extractor: TextExtractor, interval: Duration) -> Result<()> {
    let classifier_config =
        ClassifierConfig::from_env().context("Monitor mode needs classifier configuration")?;
    let classifier = SentimentClassifier::new(classifier_config)?;

    let monitor = MonitorLoop::new(
        capture::detect(),
        Arc::new(extractor),
        classifier,
        Box::new(DesktopNotifier),
        MonitorConfig {
            interval,
            ..Default::default()
        },
    );

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl-C received — stopping after the current cycle");
            ctrl_c_cancel.cancel();
        }
    });

    monitor.run(cancel).await;
    Ok(())
}

fn run_offline(extractor: &TextExtractor, input: &Path, output: &Path) -> Result<()> {
    let paths = collect_image_paths(input)?;
    if paths.is_empty() {
        bail!("No image files found under {}", input.display());
    }

    let items = extractor.extract_all(&paths);
    write_report(&items, output)?;

    let extracted = items.iter().filter(|item| item.result.is_ok()).count();
    println!(
        "Processed {} image(s), {} extracted — report written to {}",
        items.len(),
        extracted,
        output.display()
    );
    Ok(())
}

fn collect_image_paths(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if input.is_dir() {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(input)
            .with_context(|| format!("Cannot read {}", input.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        return Ok(paths);
    }
    bail!("{} is not a file or directory", input.display());
}

/// Write the batch report: one section per input image, in input order.
fn write_report(items: &[BatchItem], output: &Path) -> Result<()> {
    let mut file = std::fs::File::create(output)
        .with_context(|| format!("Cannot create {}", output.display()))?;

    for item in items {
        let name = item
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.path.display().to_string());

        writeln!(file, "=== {} ===", name)?;
        match &item.result {
            Ok(text) => {
                writeln!(file, "Text Length: {} characters", text.char_count())?;
                writeln!(file, "{}", "-".repeat(50))?;
                for block in &text.blocks {
                    writeln!(file, "{}", block)?;
                }
            }
            Err(e) => writeln!(file, "Extraction failed: {}", e)?,
        }
        writeln!(file, "\n{}\n", "=".repeat(80))?;
    }

    Ok(())
}
