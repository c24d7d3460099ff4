//! Configuration management for dmanalyzer.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use crate::render::{ChartOptions, DEFAULT_OUTPUT_FILE};
use crate::series::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CHART_TITLE: &str = "Android memory usage (PSS)";

/// Enhanced configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Output
    pub output: Option<PathBuf>,
    #[serde(alias = "json-output")]
    pub json_output: Option<PathBuf>,
    #[serde(alias = "chart-title")]
    pub chart_title: Option<String>,

    // Reconciliation
    /// "first" | "sum"
    #[serde(alias = "duplicate-policy")]
    pub duplicate_policy: Option<String>,

    // Series selection
    #[serde(alias = "include-names")]
    pub include_names: Option<Vec<String>>,
    #[serde(alias = "exclude-names")]
    pub exclude_names: Option<Vec<String>>,
    #[serde(alias = "top-n")]
    pub top_n: Option<usize>,
    #[serde(alias = "enable-system-series")]
    pub enable_system_series: Option<bool>,

    // Performance tuning
    pub parallelism: Option<usize>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: Some(PathBuf::from(DEFAULT_OUTPUT_FILE)),
            json_output: None,
            chart_title: Some(DEFAULT_CHART_TITLE.into()),
            duplicate_policy: Some("first".into()),
            include_names: None,
            exclude_names: None,
            top_n: None,
            enable_system_series: Some(true),
            parallelism: None,
            log_level: Some("info".into()),
        }
    }
}

impl Config {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE))
    }

    /// Effective duplicate policy; call after [`validate_effective_config`].
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or_default()
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            title: self
                .chart_title
                .clone()
                .unwrap_or_else(|| DEFAULT_CHART_TITLE.into()),
            include_names: self.include_names.clone(),
            exclude_names: self.exclude_names.clone(),
            top_n: self.top_n,
            system_series: self.enable_system_series.unwrap_or(true),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(policy) = cfg.duplicate_policy.as_deref() {
        policy.parse::<DuplicatePolicy>()?;
    }

    if cfg.top_n == Some(0) {
        return Err("top_n must be at least 1 (leave it unset to chart every process)".into());
    }

    if let Some(output) = &cfg.output {
        if output.as_os_str().is_empty() {
            return Err("output path must not be empty".into());
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        parse_log_level(level)
            .ok_or_else(|| format!("Invalid log_level '{}', expected off|error|warn|info|debug|trace", level))?;
    }

    Ok(())
}

/// Parses a log level name as written in config files.
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_ascii_lowercase().as_str() {
        "off" => Some(LogLevel::Off),
        "error" => Some(LogLevel::Error),
        "warn" | "warning" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        "trace" => Some(LogLevel::Trace),
        _ => None,
    }
}

fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    if let Some(json_output) = &args.json_output {
        config.json_output = Some(json_output.clone());
    }
    if let Some(policy) = &args.duplicate_policy {
        config.duplicate_policy = Some(policy.clone());
    }

    // Parse comma-separated include/exclude names
    if let Some(include_str) = &args.include_names {
        config.include_names = Some(split_names(include_str));
    }
    if let Some(exclude_str) = &args.exclude_names {
        config.exclude_names = Some(split_names(exclude_str));
    }

    if let Some(n) = args.top_n {
        config.top_n = Some(n);
    }
    if args.no_system_series {
        config.enable_system_series = Some(false);
    }
    if let Some(threads) = args.parallelism {
        config.parallelism = Some(threads);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(format!("{:?}", level).to_ascii_lowercase());
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            // Try default locations
            let defaults = ["./dmanalyzer.yaml", "./dmanalyzer.yml", "./dmanalyzer.json"];
            match defaults.iter().map(Path::new).find(|p| p.exists()) {
                Some(p) => p.to_path_buf(),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;
    let config = parse_config_str(&content, path.extension().and_then(|s| s.to_str()))?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config text; the extension picks the format, YAML otherwise.
pub fn parse_config_str(
    content: &str,
    extension: Option<&str>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match extension {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Renders configuration in requested format
pub fn render_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, format)?);
    Ok(())
}
