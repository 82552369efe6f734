//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use ccparse_core::ParserConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "processing.timeout_secs")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<ParserConfig> {
    if path.exists() {
        Ok(ParserConfig::from_file(path)?)
    } else {
        Ok(ParserConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let mut config = load_or_default(path)?;
    if config.ai.api_key.is_some() {
        config.ai.api_key = Some("********".to_string());
    }

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, default_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(default_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    ParserConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default(path)?)?;

    let mut current = &json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }

    println!("{}", serde_json::to_string_pretty(current)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;

    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    set_path(&mut json, key, parsed_value.clone())?;

    let config: ParserConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

/// Set a dotted key inside a section object.
///
/// Only leaf keys inside an existing section may be set; optional leaves
/// (`ai.api_key`, `processing.upload_dir`) are absent from the serialized
/// defaults but still accepted.
fn set_path(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (section, leaf) = key
        .rsplit_once('.')
        .ok_or_else(|| anyhow::anyhow!("Configuration key must be <section>.<key>: {}", key))?;

    let mut current = &mut *json;
    for part in section.split('.') {
        current = current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    }

    let object = current
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path: {}", key))?;

    let optional = matches!(key, "ai.api_key" | "processing.upload_dir");
    if !object.contains_key(leaf) && !optional {
        anyhow::bail!("Configuration key not found: {}", key);
    }

    object.insert(leaf.to_string(), value);
    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'ccparse config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_path_existing_key() {
        let mut value = serde_json::to_value(ParserConfig::default()).unwrap();
        set_path(&mut value, "processing.timeout_secs", json!(20)).unwrap();

        let config: ParserConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.processing.timeout_secs, 20);
    }

    #[test]
    fn test_set_path_optional_key() {
        let mut value = serde_json::to_value(ParserConfig::default()).unwrap();
        set_path(&mut value, "ai.api_key", json!("sk-local")).unwrap();

        let config: ParserConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.ai.api_key.as_deref(), Some("sk-local"));
    }

    #[test]
    fn test_set_path_rejects_unknown_key() {
        let mut value = serde_json::to_value(ParserConfig::default()).unwrap();
        assert!(set_path(&mut value, "processing.workers", json!(4)).is_err());
        assert!(set_path(&mut value, "timeout", json!(4)).is_err());
        assert!(set_path(&mut value, "cache.size", json!(4)).is_err());
    }
}
