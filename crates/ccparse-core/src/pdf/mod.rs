//! PDF-to-text conversion.

mod extractor;

pub use extractor::PdfExtractor;

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;
}

/// Source of plain statement text for a file on disk.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Convert the file at `path` to plain text.
    async fn extract_text(&self, path: &Path) -> Result<String>;
}

/// [`TextSource`] backed by [`PdfExtractor`], run on a blocking worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

#[async_trait]
impl TextSource for PdfTextSource {
    async fn extract_text(&self, path: &Path) -> Result<String> {
        let data = tokio::fs::read(path).await?;

        let text = tokio::task::spawn_blocking(move || {
            let mut extractor = PdfExtractor::new();
            extractor.load(&data)?;
            let text = extractor.extract_text()?;
            debug!(
                "Extracted {} pages, {} characters",
                extractor.page_count(),
                text.len()
            );
            Ok::<_, PdfError>(text)
        })
        .await
        .map_err(|e| PdfError::Task(e.to_string()))??;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let result = PdfTextSource
            .extract_text(Path::new("/nonexistent/statement.pdf"))
            .await;
        assert!(matches!(result, Err(PdfError::Read(_))));
    }

    #[tokio::test]
    async fn test_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a.pdf");
        std::fs::write(&path, b"plain text, not a pdf").unwrap();

        let result = PdfTextSource.extract_text(&path).await;
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
