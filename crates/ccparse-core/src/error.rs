//! Error types for the ccparse-core library.

use std::time::Duration;

use thiserror::Error;

/// Main error type for statement processing.
///
/// Only conversion failures and timeouts reach the caller as hard failures;
/// extractor and AI faults are recovered inside the pipeline.
#[derive(Error, Debug)]
pub enum StatementError {
    /// The statement text could not be obtained.
    #[error("{0}")]
    Conversion(#[from] PdfError),

    /// The per-document processing budget was exceeded.
    #[error("Processing timeout exceeded ({}s)", .0.as_secs())]
    Timeout(Duration),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input was refused before processing (type, size or count limits).
    #[error("{0}")]
    InvalidUpload(String),

    /// Processing a document panicked.
    #[error("internal error: {0}")]
    Internal(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StatementError {
    /// Whether this error is the distinguished timeout failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Errors related to PDF text conversion.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to read the source file.
    #[error("failed to read PDF: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to open/parse the PDF file.
    #[error("Failed to extract text from PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("Failed to extract text from PDF: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Conversion succeeded but produced no text.
    #[error("Failed to extract text from PDF")]
    EmptyText,

    /// The blocking conversion task was cancelled or panicked.
    #[error("text conversion task failed: {0}")]
    Task(String),
}

/// Faults raised by a field extractor.
///
/// Missing fields are never errors; these cover unexpected extractor
/// failures, which the orchestrator converts into an AI-only attempt.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The extractor failed internally.
    #[error("extractor {bank} failed: {reason}")]
    Internal { bank: String, reason: String },
}

/// Errors from the external AI extraction service.
#[derive(Error, Debug)]
pub enum AiError {
    /// Reading the source document failed.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error.
    #[error("AI provider error: {message}")]
    Provider { message: String },

    /// The service answered with something that is not the expected JSON.
    #[error("malformed AI response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for the ccparse library.
pub type Result<T> = std::result::Result<T, StatementError>;
