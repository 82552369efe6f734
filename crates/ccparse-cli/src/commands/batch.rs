//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ccparse_core::pipeline::{BatchEntry, check_batch_size, check_upload};
use ccparse_core::{BatchReport, ParseOutcome, StatementPipeline, UploadedFile};

use super::process::{OutputFormat, format_report};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: print the batch report to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Exit with an error if any file failed
    #[arg(long)]
    strict: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("pdf")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    check_batch_size(files.len(), &config.processing)?;
    for path in &files {
        check_upload(path, &config.processing)?;
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pipeline = StatementPipeline::from_config(&config)?;
    let upload_dir = config.processing.upload_dir();
    let uploads = files
        .iter()
        .map(|path| UploadedFile::stage(path, &upload_dir))
        .collect::<Result<Vec<_>, _>>()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Parsing {} statements...", uploads.len()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = pipeline.process_batch(uploads).await;

    pb.finish_and_clear();

    match args.output_dir {
        Some(ref output_dir) => {
            for entry in &report.results {
                if let ParseOutcome::Success(statement) = &entry.outcome {
                    let output_path = output_path(output_dir, &entry.filename, args.format);
                    fs::write(&output_path, format_report(statement, args.format)?)?;
                    debug!("Wrote {}", output_path.display());
                }
            }
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join("summary.csv");
        write_summary(&summary_path, &report.results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    info!("Batch finished in {:?}", start.elapsed());

    println!();
    println!(
        "{} Processed {} files in {:.1}s ({} successful, {} failed)",
        style("✓").green(),
        report.summary.total,
        start.elapsed().as_secs_f64(),
        style(report.summary.successful).green(),
        style(report.summary.failed).red()
    );

    print_failures(&report);

    if args.strict && report.summary.failed > 0 {
        anyhow::bail!("{} of {} files failed", report.summary.failed, report.summary.total);
    }

    Ok(())
}

fn print_failures(report: &BatchReport) {
    let failures: Vec<_> = report
        .results
        .iter()
        .filter_map(|entry| entry.outcome.failure().map(|f| (&entry.filename, f)))
        .collect();

    if failures.is_empty() {
        return;
    }

    println!("{}", style("Failed files:").red());
    for (filename, failure) in failures {
        println!("  - {}: {}", filename, failure.message);
    }
}

/// `<dir>/<file stem>.<format extension>`.
fn output_path(dir: &Path, filename: &str, format: OutputFormat) -> PathBuf {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let extension = match format {
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
        OutputFormat::Text => "txt",
    };
    dir.join(format!("{}.{}", stem, extension))
}

fn write_summary(path: &Path, results: &[BatchEntry]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "bank",
        "cardholder_name",
        "card_last_four",
        "total_amount_due",
        "payment_due_date",
        "confidence",
        "method",
        "processing_time_ms",
        "error",
    ])?;

    for entry in results {
        match &entry.outcome {
            ParseOutcome::Success(report) => {
                let data = &report.data;
                wtr.write_record([
                    entry.filename.as_str(),
                    "success",
                    report.bank.id(),
                    data.cardholder_name.as_deref().unwrap_or_default(),
                    data.card_last_four.as_deref().unwrap_or_default(),
                    data.total_amount_due.as_deref().unwrap_or_default(),
                    data.payment_due_date.as_deref().unwrap_or_default(),
                    format!("{:.2}", report.confidence).as_str(),
                    report.method.as_str(),
                    report.processing_time.to_string().as_str(),
                    "",
                ])?;
            }
            ParseOutcome::Failure(failure) => {
                let status = if failure.timeout { "timeout" } else { "error" };
                wtr.write_record([
                    entry.filename.as_str(),
                    status,
                    failure.bank,
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    failure.message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
