//! End-to-end statement processing: conversion, detection, parsing and
//! analysis under a per-document time budget.

use std::any::Any;
use std::fs::File;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::join_all;
use serde::Serialize;
use tempfile::TempPath;
use tracing::{error, info, warn};

use crate::analysis::{
    StatementAnalytics, ValidationReport, categorize_transactions, generate_analytics,
    validate_statement,
};
use crate::error::{PdfError, Result, StatementError};
use crate::models::config::ProcessingConfig;
use crate::models::{Bank, ExtractionMethod, ParsedStatement, ParserConfig};
use crate::pdf::{PdfTextSource, TextSource};
use crate::statement::{BankDetector, StatementParser};

/// A staged input document.
///
/// The file is deleted when the upload is processed or dropped, whichever
/// comes first.
#[derive(Debug)]
pub struct UploadedFile {
    filename: String,
    path: TempPath,
}

impl UploadedFile {
    /// Copy `source` into `upload_dir` under a unique name.
    pub fn stage(source: &Path, upload_dir: &Path) -> Result<Self> {
        let filename = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "statement.pdf".to_string());

        std::fs::create_dir_all(upload_dir)?;
        let mut staged = tempfile::Builder::new()
            .prefix("ccparse-")
            .suffix(&format!("-{}", filename))
            .tempfile_in(upload_dir)?;
        std::io::copy(&mut File::open(source)?, staged.as_file_mut())?;

        Ok(Self {
            filename,
            path: staged.into_temp_path(),
        })
    }

    /// Wrap an already staged file.
    pub fn from_temp_path(filename: impl Into<String>, path: TempPath) -> Self {
        Self {
            filename: filename.into(),
            path,
        }
    }

    /// Original file name, as supplied by the caller.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the staged file.
    pub fn cleanup(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            warn!("Failed to remove staged file {}: {}", shown, e);
        }
    }
}

/// Refuse inputs that are not PDFs or exceed the size limit.
///
/// Returns the file size in bytes.
pub fn check_upload(path: &Path, limits: &ProcessingConfig) -> Result<u64> {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        return Err(StatementError::InvalidUpload(format!(
            "Only PDF files are allowed: {}",
            path.display()
        )));
    }

    let size = std::fs::metadata(path)?.len();
    if size > limits.max_file_size {
        return Err(StatementError::InvalidUpload(format!(
            "File too large: {} ({} bytes, limit {})",
            path.display(),
            size,
            limits.max_file_size
        )));
    }

    Ok(size)
}

/// Refuse batches with more files than allowed.
pub fn check_batch_size(count: usize, limits: &ProcessingConfig) -> Result<()> {
    if count > limits.max_files {
        return Err(StatementError::InvalidUpload(format!(
            "Too many files: {} (limit {})",
            count, limits.max_files
        )));
    }
    Ok(())
}

/// Successful processing result for one statement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementReport {
    pub success: bool,
    pub bank: Bank,
    pub data: ParsedStatement,
    pub analytics: StatementAnalytics,
    pub validation: ValidationReport,
    pub confidence: f64,
    pub method: ExtractionMethod,
    pub timestamp: DateTime<Utc>,
    /// Wall-clock processing time in milliseconds.
    pub processing_time: u64,
}

/// Failed processing result for one statement.
#[derive(Debug, Clone, Serialize)]
pub struct ParseFailure {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub bank: &'static str,
    pub timeout: bool,
    pub timestamp: DateTime<Utc>,
}

impl ParseFailure {
    pub fn from_error(err: &StatementError) -> Self {
        Self {
            success: false,
            error: "Failed to parse statement".to_string(),
            message: err.to_string(),
            bank: "unknown",
            timeout: err.is_timeout(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of processing one document.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ParseOutcome {
    Success(Box<StatementReport>),
    Failure(ParseFailure),
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Failure(f) if f.timeout)
    }

    /// HTTP-style status: 200, 504 for timeouts, 500 for other failures.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure(f) if f.timeout => 504,
            Self::Failure(_) => 500,
        }
    }

    pub fn report(&self) -> Option<&StatementReport> {
        match self {
            Self::Success(report) => Some(report.as_ref()),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ParseFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// One document's entry in a batch report.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: ParseOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Results of a batch, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<BatchEntry>,
    pub summary: BatchSummary,
}

impl BatchReport {
    fn new(results: Vec<BatchEntry>) -> Self {
        let successful = results.iter().filter(|r| r.outcome.is_success()).count();
        let summary = BatchSummary {
            total: results.len(),
            successful,
            failed: results.len() - successful,
        };
        Self { results, summary }
    }
}

/// Statement processing pipeline.
pub struct StatementPipeline {
    text_source: Arc<dyn TextSource>,
    detector: BankDetector,
    parser: StatementParser,
    timeout: Duration,
}

impl StatementPipeline {
    pub fn new(text_source: Arc<dyn TextSource>, parser: StatementParser) -> Self {
        Self {
            text_source,
            detector: BankDetector::new(),
            parser,
            timeout: ProcessingConfig::default().timeout(),
        }
    }

    /// Build the production pipeline (PDF text, configured AI fallback).
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        let parser = StatementParser::from_config(config)
            .map_err(|e| StatementError::Config(e.to_string()))?;

        Ok(Self::new(Arc::new(PdfTextSource), parser).with_timeout(config.processing.timeout()))
    }

    /// Set the per-document time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Process one staged document. The upload is deleted on every path.
    ///
    /// A panic while processing is reported as a failure of this document.
    pub async fn process(&self, upload: UploadedFile) -> ParseOutcome {
        let start = Instant::now();
        info!("Processing {}", upload.filename());

        let work = AssertUnwindSafe(self.run(upload.path(), start)).catch_unwind();
        let result = match tokio::time::timeout(self.timeout, work).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(StatementError::Internal(panic_message(panic.as_ref()))),
            Err(_) => Err(StatementError::Timeout(self.timeout)),
        };

        let filename = upload.filename().to_string();
        upload.cleanup();

        match result {
            Ok(report) => {
                info!(
                    "Processed {} ({}, {}, {}ms)",
                    filename, report.bank, report.method, report.processing_time
                );
                ParseOutcome::Success(Box::new(report))
            }
            Err(e) => {
                error!("Failed to process {}: {}", filename, e);
                ParseOutcome::Failure(ParseFailure::from_error(&e))
            }
        }
    }

    /// Process documents concurrently; one failing or panicking document
    /// never fails the batch.
    pub async fn process_batch(&self, uploads: Vec<UploadedFile>) -> BatchReport {
        info!("Processing batch of {} files", uploads.len());

        let results = join_all(uploads.into_iter().map(|upload| async move {
            let filename = upload.filename().to_string();
            let outcome = self.process(upload).await;
            BatchEntry { filename, outcome }
        }))
        .await;

        let report = BatchReport::new(results);
        info!(
            "Batch complete: {} successful, {} failed",
            report.summary.successful, report.summary.failed
        );
        report
    }

    async fn run(&self, path: &Path, start: Instant) -> Result<StatementReport> {
        let text = self.text_source.extract_text(path).await?;
        if text.trim().is_empty() {
            return Err(PdfError::EmptyText.into());
        }

        let bank = self.detector.detect(&text);
        let mut data = self.parser.parse(&text, bank, path).await;
        data.transactions = categorize_transactions(&data.transactions);

        let analytics = generate_analytics(&data);
        let validation = validate_statement(&data);

        Ok(StatementReport {
            success: true,
            bank,
            confidence: data.confidence,
            method: data.method,
            data,
            analytics,
            validation,
            timestamp: Utc::now(),
            processing_time: start.elapsed().as_millis() as u64,
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "document processing panicked".to_string()
    }
}
