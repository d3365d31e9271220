//! Batch command - extract transactions from many text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use txtract_core::{ExtractionMode, ExtractionReport, OutputFormat, TransactionEngine};

use super::load_config;
use super::scan::{format_candidates, read_input, totals, warn_fallback_dates};

/// File extensions picked up from the glob.
const TEXT_EXTENSIONS: [&str; 3] = ["txt", "sms", "log"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Extraction mode (default: from config)
    #[arg(short, long)]
    mode: Option<ExtractionMode>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of scanning a single file.
struct FileResult {
    path: PathBuf,
    report: Option<ExtractionReport>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let mode = args.mode.unwrap_or(config.extraction.mode);
    let format = args.format.unwrap_or(config.output.format);
    let max_bytes = config.extraction.max_input_bytes;
    let engine = Arc::new(config.build_engine()?);

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let engine = Arc::clone(&engine);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            let outcome = scan_file(&path, &engine, mode, max_bytes);
            (index, path, outcome)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, path, outcome) = joined?;

        match outcome {
            Ok(report) => {
                warn_fallback_dates(&report, &path);
                results.push((index, FileResult { path, report: Some(report), error: None }));
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push((index, FileResult { path, report: None, error: Some(error_msg) }));
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<FileResult> = results.into_iter().map(|(_, r)| r).collect();

    let successful: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(report) = &result.report else {
                continue;
            };
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("transactions");
            let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

            fs::write(&output_path, format_candidates(&report.candidates, format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let transactions: usize = successful
        .iter()
        .filter_map(|r| r.report.as_ref())
        .map(|r| r.candidates.len())
        .sum();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} transactions",
        style(successful.len()).green(),
        style(failed.len()).red(),
        transactions
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn scan_file(
    path: &Path,
    engine: &TransactionEngine,
    mode: ExtractionMode,
    max_bytes: usize,
) -> anyhow::Result<ExtractionReport> {
    let text = read_input(path, max_bytes)?;
    Ok(engine.scan(&text, mode))
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "transactions",
        "total_debit",
        "total_credit",
        "fallback_dates",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(report) = &result.report {
            let count = report.candidates.len().to_string();
            let fallback_dates = report.fallback_dates.to_string();
            let time_ms = report.processing_time_ms.to_string();

            match totals(&report.candidates) {
                Ok((debits, credits)) => wtr.write_record([
                    filename,
                    "success",
                    &count,
                    &debits.to_string(),
                    &credits.to_string(),
                    &fallback_dates,
                    &time_ms,
                    "",
                ])?,
                Err(e) => wtr.write_record([
                    filename,
                    "error",
                    &count,
                    "",
                    "",
                    &fallback_dates,
                    &time_ms,
                    &e.to_string(),
                ])?,
            }
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
