//! Configuration loader for the preprocessor.
//!
//! The config file is the run configuration (`inputs`, `selection`,
//! `grid`, `interpolation`, `crop`, `cache`, `variables`, `workers`,
//! `output_dir`) plus an optional `logging` section.
//!
//! Values may reference environment variables as `${VAR}` or
//! `${VAR:-default}`. Precedence, lowest first: file, `PREPROCESS_*`
//! environment variables, command line flags.

use anyhow::{Context, Result};
use preprocessing::PreprocessConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::Level;

// ============================================================================
// Configuration file
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    #[serde(flatten)]
    pub run: PreprocessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_FORMATS: [&str; 2] = ["json", "pretty"];

/// Command line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub workers: Option<usize>,
    pub output_dir: Option<std::path::PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

// ============================================================================
// Loading
// ============================================================================

/// Load, expand, override and validate a config file.
pub fn load_config<P: AsRef<Path>>(path: P, overrides: &Overrides) -> Result<PreprocessorConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;

    let mut config = parse_config(&content)
        .with_context(|| format!("Invalid config file {:?}", path))?;

    config.run.apply_env();
    apply_overrides(&mut config, overrides);
    validate_config(&config)?;

    Ok(config)
}

/// Parse config text after environment substitution.
pub fn parse_config(content: &str) -> Result<PreprocessorConfig> {
    let expanded = expand_env_vars(content)?;
    serde_yaml::from_str(&expanded).context("Failed to parse config YAML")
}

fn apply_overrides(config: &mut PreprocessorConfig, overrides: &Overrides) {
    if let Some(workers) = overrides.workers {
        config.run.workers = workers;
    }
    if let Some(dir) = &overrides.output_dir {
        config.run.output_dir = Some(dir.clone());
    }
    if let Some(level) = &overrides.log_level {
        config.logging.level = level.to_lowercase();
    }
    if let Some(format) = &overrides.log_format {
        config.logging.format = format.to_lowercase();
    }
}

/// Replace every `${...}` with its resolved value.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let body = &rest[start + 2..];

        // Find the matching brace so defaults may themselves contain braces
        let mut depth = 1;
        let mut end = None;
        for (i, c) in body.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }

        let end = match end {
            Some(end) => end,
            None => anyhow::bail!("Unclosed variable substitution: ${{{}", body),
        };
        result.push_str(&resolve_var_expr(&body[..end])?);
        rest = &body[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// `NAME` must be set; `NAME:-default` falls back when unset or empty.
fn resolve_var_expr(expr: &str) -> Result<String> {
    match expr.split_once(":-") {
        Some((name, default)) => match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        },
        None => std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr.trim())),
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_config(config: &PreprocessorConfig) -> Result<()> {
    anyhow::ensure!(
        VALID_LEVELS.contains(&config.logging.level.as_str()),
        "Invalid log level: {}. Must be one of: {:?}",
        config.logging.level,
        VALID_LEVELS
    );
    anyhow::ensure!(
        VALID_FORMATS.contains(&config.logging.format.as_str()),
        "Invalid log format: {}. Must be one of: {:?}",
        config.logging.format,
        VALID_FORMATS
    );

    config.run.validate()?;
    Ok(())
}

/// Map a validated level name to a tracing level.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
