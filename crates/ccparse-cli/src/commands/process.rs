//! Process command - parse a single statement PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ccparse_core::pipeline::check_upload;
use ccparse_core::{ParseOutcome, StatementPipeline, StatementReport, UploadedFile};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement (PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence and method
    #[arg(long)]
    show_confidence: bool,

    /// Report missing or malformed fields
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    check_upload(&args.input, &config.processing)?;

    let pipeline = StatementPipeline::from_config(&config)?;
    let upload = UploadedFile::stage(&args.input, &config.processing.upload_dir())?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("Parsing statement...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = pipeline.process(upload).await;

    pb.finish_and_clear();

    let report = match &outcome {
        ParseOutcome::Success(report) => report.as_ref(),
        ParseOutcome::Failure(failure) if failure.timeout => {
            anyhow::bail!(
                "Processing timed out after {}s: {}",
                pipeline.timeout().as_secs(),
                args.input.display()
            );
        }
        ParseOutcome::Failure(failure) => {
            anyhow::bail!("{}: {}", failure.error, failure.message);
        }
    };

    if args.validate && !report.validation.is_complete {
        eprintln!("{}", style("Validation issues:").yellow());
        for field in &report.validation.missing_fields {
            eprintln!("  - {}", field);
        }
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&outcome)?,
        other => format_report(report, other)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}% ({})",
            style("ℹ").blue(),
            report.confidence * 100.0,
            report.method
        );
        println!(
            "{} Validation score: {}%",
            style("ℹ").blue(),
            report.validation.overall_score
        );
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            report.processing_time
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a successful report in the requested format.
pub fn format_report(report: &StatementReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &StatementReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let data = &report.data;

    wtr.write_record([
        "bank",
        "cardholder_name",
        "card_last_four",
        "statement_period",
        "total_amount_due",
        "payment_due_date",
        "previous_balance",
        "credit_limit",
        "reward_points",
        "transactions",
        "confidence",
        "method",
    ])?;

    wtr.write_record([
        report.bank.id(),
        data.cardholder_name.as_deref().unwrap_or_default(),
        data.card_last_four.as_deref().unwrap_or_default(),
        data.statement_period.as_deref().unwrap_or_default(),
        data.total_amount_due.as_deref().unwrap_or_default(),
        data.payment_due_date.as_deref().unwrap_or_default(),
        data.previous_balance.as_deref().unwrap_or_default(),
        data.credit_limit.as_deref().unwrap_or_default(),
        data.reward_points.as_deref().unwrap_or_default(),
        data.transactions.len().to_string().as_str(),
        format!("{:.2}", report.confidence).as_str(),
        report.method.as_str(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &StatementReport) -> String {
    let data = &report.data;
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    let mut output = String::new();

    output.push_str(&format!("Bank: {}\n", report.bank.display_name()));
    output.push_str(&format!("Cardholder: {}\n", field(&data.cardholder_name)));
    output.push_str(&format!("Card: **** {}\n", field(&data.card_last_four)));
    output.push_str(&format!("Period: {}\n", field(&data.statement_period)));
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!("  Total due:        {}\n", report.analytics.summary.total_due));
    output.push_str(&format!(
        "  Previous balance: {}\n",
        report.analytics.summary.previous_balance
    ));
    output.push_str(&format!("  New spending:     {}\n", report.analytics.summary.new_spending));
    output.push_str(&format!(
        "  Utilization:      {}\n",
        report.analytics.summary.credit_utilization
    ));
    output.push_str(&format!("  Payment due:      {}\n", field(&data.payment_due_date)));
    if let Some(points) = &data.reward_points {
        output.push_str(&format!("  Reward points:    {}\n", points));
    }

    if !data.transactions.is_empty() {
        output.push_str("\nTransactions:\n");
        for tx in &data.transactions {
            let category = tx.category.map(|c| c.as_str()).unwrap_or("Others");
            output.push_str(&format!(
                "  {:<12} {:<50} {:>14}  {}\n",
                tx.date, tx.description, tx.amount, category
            ));
        }
    }

    if !report.analytics.insights.is_empty() {
        output.push_str("\nInsights:\n");
        for insight in &report.analytics.insights {
            output.push_str(&format!(
                "  [{}] {}: {}\n",
                insight.kind, insight.title, insight.message
            ));
        }
    }

    output
}
