//! Data models shared across the pipeline.

pub mod bank;
pub mod config;
pub mod statement;

pub use bank::Bank;
pub use config::ParserConfig;
pub use statement::{Category, ExtractionMethod, ParsedStatement, Transaction};
