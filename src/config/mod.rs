mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{validate_catalog, MetricCatalog};
use crate::scoring::RawValues;

/// Get the config directory path (~/.config/brand-score/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("brand-score"))
}

/// Get the default config file path (~/.config/brand-score/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/brand-score/config.yaml), and a missing default file yields
///   the default configuration.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        log::debug!(
            "No config at {}, using built-in defaults",
            config_path.display()
        );
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    log::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// A metric value as written in an input file; YAML numbers and strings
/// are both accepted, and a null value reads as empty.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputValue {
    Number(f64),
    Text(String),
}

impl InputValue {
    fn into_text(self) -> String {
        match self {
            InputValue::Number(n) => n.to_string(),
            InputValue::Text(s) => s,
        }
    }
}

/// Load raw metric values from a YAML mapping of metric key to value.
///
/// ```yaml
/// reachImpressions: 5
/// npsScore: "40"
/// clv:
/// ```
///
/// Every key and value is checked against the catalog.
pub fn load_values_file(catalog: &MetricCatalog, path: &Path) -> Result<RawValues> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read values file at {}", path.display()))?;

    let entries: IndexMap<String, Option<InputValue>> = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse values: invalid YAML in {}", path.display()))?;

    let values = RawValues::from_map(
        catalog,
        entries
            .into_iter()
            .map(|(k, v)| (k, v.map(InputValue::into_text).unwrap_or_default())),
    )?;
    log::debug!("Loaded values for {} metrics from {}", values.len(), path.display());
    Ok(values)
}

impl Config {
    /// Build the metric catalog this config describes.
    ///
    /// Returns every validation problem at once when the configured catalog
    /// is invalid.
    pub fn build_catalog(&self) -> Result<MetricCatalog, Vec<String>> {
        match self.catalog {
            None => Ok(MetricCatalog::builtin()),
            Some(ref catalog) => {
                validate_catalog(catalog)?;
                catalog.build().map_err(|e| vec![e.to_string()])
            }
        }
    }

    /// Resolve the history file location, falling back to the config dir.
    pub fn history_path(&self) -> Result<PathBuf> {
        match self.history_path {
            Some(ref p) => Ok(PathBuf::from(p)),
            None => Ok(get_config_dir()?.join("history.json")),
        }
    }
}
