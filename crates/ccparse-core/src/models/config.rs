//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the ccparse pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Rule-based extraction and fallback thresholds.
    pub extraction: ExtractionConfig,

    /// AI fallback service configuration.
    pub ai: AiConfig,

    /// Per-document processing limits.
    pub processing: ProcessingConfig,
}

/// Fallback decision thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Completeness strictly below this triggers the AI fallback.
    pub completeness_threshold: f64,

    /// Extractor confidence strictly below this triggers the AI fallback.
    pub min_confidence: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            completeness_threshold: 0.6,
            min_confidence: 0.7,
        }
    }
}

/// AI extraction service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key. Takes precedence over `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Chat completion model.
    pub model: String,

    /// API base URL.
    pub base_url: String,

    /// Maximum tokens in the model reply.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 2000,
            temperature: 0.1,
            request_timeout_secs: 45,
        }
    }
}

impl AiConfig {
    /// Resolve the credential from the config or the environment.
    ///
    /// Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Per-document processing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Wall-clock budget per document, in seconds.
    pub timeout_secs: u64,

    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,

    /// Maximum number of files in one batch.
    pub max_files: usize,

    /// Directory for staged uploads (system temp dir if unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<PathBuf>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 50,
            max_file_size: 10 * 1024 * 1024,
            max_files: 15,
            upload_dir: None,
        }
    }
}

impl ProcessingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl ParserConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
