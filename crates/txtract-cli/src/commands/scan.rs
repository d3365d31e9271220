//! Scan command - extract transactions from a single text file or stdin.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use txtract_core::{
    ExtractionMode, ExtractionReport, OutputFormat, TransactionCandidate, TransactionType,
};

use super::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input text file, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Extraction mode (default: from config)
    #[arg(short, long)]
    mode: Option<ExtractionMode>,

    /// Output format (default: from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Drop transactions whose date could not be parsed
    #[arg(long)]
    strict_dates: bool,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,

    /// Fail when no transaction is found
    #[arg(long)]
    require_match: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let mode = args.mode.unwrap_or(config.extraction.mode);
    let format = args.format.unwrap_or(config.output.format);

    let engine = config
        .build_engine()?
        .with_strict_dates(args.strict_dates || config.extraction.strict_dates);

    let text = read_input(&args.input, config.extraction.max_input_bytes)?;
    info!("Scanning {} bytes in {} mode", text.len(), mode);

    let report = engine.scan(&text, mode);
    warn_fallback_dates(&report, &args.input);

    if args.require_match && report.candidates.is_empty() {
        anyhow::bail!("No transactions found in {}", args.input.display());
    }

    let output = format_candidates(&report.candidates, format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if args.show_confidence {
        eprintln!();
        for candidate in &report.candidates {
            eprintln!(
                "{} {} {} ({}) confidence: {:.0}%",
                style("ℹ").blue(),
                candidate.kind,
                candidate.amount,
                candidate.pattern,
                candidate.confidence * 100.0
            );
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            report.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read a file or stdin, refusing anything larger than `max_bytes`.
pub(crate) fn read_input(input: &Path, max_bytes: usize) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .take(max_bytes as u64 + 1)
            .read_to_end(&mut buffer)?;
        if buffer.len() > max_bytes {
            anyhow::bail!("Input exceeds the {} byte limit", max_bytes);
        }
        return Ok(String::from_utf8(buffer)?);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let size = fs::metadata(input)?.len();
    if size > max_bytes as u64 {
        anyhow::bail!(
            "Input file {} is {} bytes, exceeding the {} byte limit",
            input.display(),
            size,
            max_bytes
        );
    }

    Ok(fs::read_to_string(input)?)
}

pub(crate) fn warn_fallback_dates(report: &ExtractionReport, source: &Path) {
    if report.fallback_dates > 0 {
        warn!(
            "{} transaction(s) in {} have an unparseable date; the current time was used",
            report.fallback_dates,
            source.display()
        );
    }
}

pub(crate) fn format_candidates(
    candidates: &[TransactionCandidate],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(candidates)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => format_csv(candidates),
        OutputFormat::Text => format_text(candidates),
    }
}

fn format_csv(candidates: &[TransactionCandidate]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "date",
        "description",
        "amount",
        "type",
        "category",
        "balance",
        "confidence",
        "pattern",
    ])?;

    for candidate in candidates {
        wtr.write_record([
            &candidate.date.to_rfc3339(),
            &candidate.description,
            &candidate.amount.to_string(),
            candidate.kind.as_str(),
            candidate.category.as_str(),
            &candidate.balance.map(|b| b.to_string()).unwrap_or_default(),
            &format!("{:.2}", candidate.confidence),
            candidate.pattern.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(candidates: &[TransactionCandidate]) -> anyhow::Result<String> {
    if candidates.is_empty() {
        return Ok("No transactions found\n".to_string());
    }

    let mut output = String::new();

    for candidate in candidates {
        let sign = match candidate.kind {
            TransactionType::Debit => "-",
            TransactionType::Credit => "+",
        };
        output.push_str(&format!(
            "{}  {}{:>12}  {:<13} {}\n",
            candidate.date.format("%Y-%m-%d"),
            sign,
            candidate.amount,
            candidate.category.as_str(),
            if candidate.description.is_empty() {
                "(no description)"
            } else {
                &candidate.description
            }
        ));
        if let Some(balance) = candidate.balance {
            output.push_str(&format!("            balance {}\n", balance));
        }
    }

    let (debits, credits) = totals(candidates)?;
    output.push('\n');
    output.push_str(&format!("Total debits:  {}\n", debits));
    output.push_str(&format!("Total credits: {}\n", credits));

    Ok(output)
}

/// Sum of debit and credit amounts. Fails if either sum overflows.
pub(crate) fn totals(candidates: &[TransactionCandidate]) -> anyhow::Result<(Decimal, Decimal)> {
    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;

    for candidate in candidates {
        let (sum, label) = match candidate.kind {
            TransactionType::Debit => (&mut debits, "debit"),
            TransactionType::Credit => (&mut credits, "credit"),
        };
        *sum = sum
            .checked_add(candidate.amount)
            .ok_or_else(|| anyhow::anyhow!("Total {} amount overflows", label))?;
    }

    Ok((debits, credits))
}
