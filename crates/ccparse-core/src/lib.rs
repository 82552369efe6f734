//! Core library for credit card statement parsing.
//!
//! This crate provides:
//! - PDF text conversion (lopdf + pdf-extract)
//! - Issuer detection and per-bank rule-based field extraction
//! - An AI fallback for unknown or poorly extracted statements
//! - Transaction categorization, analytics and field validation
//! - A pipeline with per-document timeouts and concurrent batches

pub mod ai;
pub mod analysis;
pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod statement;

pub use ai::{AiFallback, ExtractionService, OpenAiService, StatementFields};
pub use analysis::{StatementAnalytics, ValidationReport};
pub use error::{AiError, ExtractionError, PdfError, Result, StatementError};
pub use models::{Bank, Category, ExtractionMethod, ParsedStatement, ParserConfig, Transaction};
pub use pdf::{PdfExtractor, PdfProcessor, PdfTextSource, TextSource};
pub use pipeline::{
    BatchReport, ParseFailure, ParseOutcome, StatementPipeline, StatementReport, UploadedFile,
};
pub use statement::{BankDetector, ExtractorRegistry, StatementExtractor, StatementParser};
