//! CLI subcommands.

pub mod banks;
pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use ccparse_core::ParserConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ccparse")
        .join("config.json")
}

/// Load the configuration from `--config`, else the default location, else
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ParserConfig> {
    if let Some(path) = config_path {
        return Ok(ParserConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(ParserConfig::from_file(&default_path)?)
    } else {
        Ok(ParserConfig::default())
    }
}
