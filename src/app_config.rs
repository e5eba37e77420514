//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use xdcc_search_core::SearchSettings;

use crate::cli::SearchArgs;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// TOML-style file configuration for search defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// xdcc.eu search endpoint.
    pub xdcc_eu_url: Option<String>,
    /// Cap on merged results.
    pub max_results: Option<u32>,
    /// Per-source time budget in seconds.
    pub source_timeout_secs: Option<u64>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(max_results) = self.max_results
            && !(1..=100_000).contains(&max_results)
        {
            bail!(
                "Invalid config value for `max_results`: {max_results}. Expected range: 1..=100000"
            );
        }
        validate_timeout_secs("source_timeout_secs", self.source_timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/xdcc-search/config.toml`
/// 2. `$HOME/.config/xdcc-search/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("xdcc-search")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("xdcc-search")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

/// Reads and parses a config file.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

/// Parses `key = value` lines; `#` starts a comment outside of strings.
pub fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "xdcc_eu_url" => {
                cfg.xdcc_eu_url = Some(parse_string_literal(value).with_context(context)?);
            }
            "max_results" => {
                let parsed = parse_integer_u64(value).with_context(context)?;
                let n = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("max_results out of range for u32"))?;
                cfg.max_results = Some(n);
            }
            "source_timeout_secs" => {
                cfg.source_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

/// HTTP client timeouts to apply before sources are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeoutSettings {
    pub connect_secs: u64,
    pub read_secs: u64,
}

/// Merges CLI flags over file config over built-in defaults.
#[must_use]
pub fn resolve_search_settings(
    args: &SearchArgs,
    file: Option<&FileConfig>,
) -> (SearchSettings, HttpTimeoutSettings) {
    let defaults = SearchSettings::default();

    let xdcc_eu_url = args
        .endpoint
        .clone()
        .or_else(|| file.and_then(|cfg| cfg.xdcc_eu_url.clone()))
        .unwrap_or(defaults.xdcc_eu_url);
    let max_results = args
        .max_results
        .or_else(|| file.and_then(|cfg| cfg.max_results))
        .map_or(defaults.max_results, |n| n as usize);
    let source_timeout = args
        .timeout
        .or_else(|| file.and_then(|cfg| cfg.source_timeout_secs))
        .map(Duration::from_secs)
        .or(defaults.source_timeout);

    let timeouts = HttpTimeoutSettings {
        connect_secs: file
            .and_then(|cfg| cfg.connect_timeout_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        read_secs: file
            .and_then(|cfg| cfg.read_timeout_secs)
            .unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
    };

    (
        SearchSettings {
            xdcc_eu_url,
            max_results,
            source_timeout,
        },
        timeouts,
    )
}
