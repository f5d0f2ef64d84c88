use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::types::Config;
use crate::config::validation;
use crate::utils::error::{PagemillError, Result};

/// Configuration file names to look for, in order of preference
pub const CONFIG_FILES: [&str; 4] = ["pagemill.yml", "pagemill.yaml", "pagemill.toml", "pagemill.json"];

/// Load site configuration.
///
/// `config_file` wins when given; otherwise the first of [`CONFIG_FILES`]
/// found in `source_dir` is used, and with none the defaults apply. Paths in
/// the result are absolute and the configuration has been validated.
pub fn load_config<P: AsRef<Path>>(source_dir: P, config_file: Option<PathBuf>) -> Result<Config> {
    let source_dir = source_dir.as_ref();

    let config_path = match config_file {
        Some(path) => Some(path),
        None => find_default_config_file(source_dir),
    };

    let mut config = match &config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            parse_config_file(path)?
        }
        None => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    config.source = source_dir.to_path_buf();
    config.resolve_paths();

    validation::validate_config(&config)?;

    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

/// Find the default configuration file
pub fn find_default_config_file(source_dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| source_dir.join(name))
        .find(|path| path.is_file())
}

/// Read and parse one configuration file, choosing the format by extension
pub fn parse_config_file(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path).map_err(|e| {
        PagemillError::Config(format!(
            "Failed to read configuration file {}: {}",
            config_path.display(),
            e
        ))
    })?;

    let ext = config_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "yml".to_string());

    match ext.as_str() {
        "yml" | "yaml" => parse_yaml_config(&content, config_path),
        "toml" => parse_toml_config(&content, config_path),
        "json" => parse_json_config(&content, config_path),
        other => Err(PagemillError::Config(format!(
            "Unsupported configuration file format: {}",
            other
        ))),
    }
}

/// Parse a YAML configuration file. An empty file gives the defaults.
fn parse_yaml_config(content: &str, path: &Path) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(content).map_err(|e| {
        PagemillError::Config(format!(
            "Failed to parse YAML configuration ({}): {}",
            path.display(),
            e
        ))
    })
}

/// Parse a TOML configuration file
fn parse_toml_config(content: &str, path: &Path) -> Result<Config> {
    toml::from_str(content).map_err(|e| {
        PagemillError::Config(format!(
            "Failed to parse TOML configuration ({}): {}",
            path.display(),
            e
        ))
    })
}

/// Parse a JSON configuration file
fn parse_json_config(content: &str, path: &Path) -> Result<Config> {
    serde_json::from_str(content).map_err(|e| {
        PagemillError::Config(format!(
            "Failed to parse JSON configuration ({}): {}",
            path.display(),
            e
        ))
    })
}
