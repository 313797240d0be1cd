//! Configuration management for herakles-proc-inspector.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use herakles_proc_inspector::InspectorOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9216;
pub const DEFAULT_CACHE_TTL: u64 = 5;
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 500;
pub const DEFAULT_WINDOW_SECONDS: f64 = 0.3;
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Target
    pub pid: Option<u32>,
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "sample-interval-ms")]
    pub sample_interval_ms: Option<u64>,
    #[serde(alias = "window-seconds")]
    pub window_seconds: Option<f64>,

    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,
    #[serde(alias = "cache-ttl")]
    pub cache_ttl: Option<u64>,

    // Feature flags
    #[serde(alias = "enable-health")]
    pub enable_health: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pid: None,
            proc_root: None,
            sample_interval_ms: Some(DEFAULT_SAMPLE_INTERVAL_MS),
            window_seconds: Some(DEFAULT_WINDOW_SECONDS),
            port: Some(DEFAULT_PORT),
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            cache_ttl: Some(DEFAULT_CACHE_TTL),
            enable_health: Some(true),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    /// Inspector options derived from this configuration.
    pub fn inspector_options(&self) -> InspectorOptions {
        let defaults = InspectorOptions::default();
        InspectorOptions {
            pid: self.pid,
            window: self.window_seconds.unwrap_or(defaults.window),
            sample_interval: self
                .sample_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.sample_interval),
            proc_root: self.proc_root.clone().unwrap_or(defaults.proc_root),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.sample_interval_ms == Some(0) {
        return Err("sample_interval_ms must be greater than 0".into());
    }

    if let Some(window) = cfg.window_seconds {
        if !window.is_finite() || window <= 0.0 {
            return Err(format!("window_seconds must be a positive number, got {}", window).into());
        }
    }

    if cfg.port == Some(0) {
        return Err("port must not be 0".into());
    }

    if let Some(bind) = cfg.bind.as_deref() {
        if bind.parse::<std::net::IpAddr>().is_err() {
            return Err(format!("Invalid bind address '{}'", bind).into());
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}', expected one of: {}",
                level,
                LOG_LEVELS.join(", ")
            )
            .into());
        }
    }

    if let Some(root) = cfg.proc_root.as_deref() {
        if !root.is_dir() {
            return Err(format!("proc_root is not a directory: {}", root.display()).into());
        }
    }

    Ok(())
}

fn log_level_name(level: &LogLevel) -> &'static str {
    match level {
        LogLevel::Off => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if args.pid.is_some() {
        config.pid = args.pid;
    }
    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(ms) = args.sample_interval_ms {
        config.sample_interval_ms = Some(ms);
    }
    if let Some(window) = args.window {
        config.window_seconds = Some(window);
    }

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }
    if let Some(cache_ttl) = args.cache_ttl {
        config.cache_ttl = Some(cache_ttl);
    }
    if args.disable_health {
        config.enable_health = Some(false);
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(log_level_name(level).to_string());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/herakles/proc-inspector.yaml",
                "/etc/herakles/proc-inspector.yml",
                "/etc/herakles/proc-inspector.json",
                "./herakles-proc-inspector.yaml",
                "./herakles-proc-inspector.yml",
                "./herakles-proc-inspector.json",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, &path)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config content, picking the format from the file extension (YAML by default).
pub fn parse_config(content: &str, path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Renders a configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: &ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, format)?);
    Ok(())
}
