//! Configuration loaded from `notebook_profiler.toml`

use std::path::Path;

use serde::Deserialize;

use crate::logging::{LogRotation, LoggingConfig};

pub const DEFAULT_CONFIG_PATH: &str = "notebook_profiler.toml";

/// External profiler invocation settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Program to run, e.g. the Python interpreter
    pub command: String,
    /// Arguments placed before the notebook path
    pub args: Vec<String>,
    /// Replaces the `.ipynb` extension to locate the report
    pub output_suffix: String,
    /// Replaces the `.ipynb` extension to locate the failure report
    pub error_suffix: String,
    pub timeout_seconds: u64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            command: "python3".to_string(),
            args: vec!["profile_notebook.py".to_string()],
            output_suffix: "_profile.json".to_string(),
            error_suffix: "_profile_error.json".to_string(),
            timeout_seconds: 600,
        }
    }
}

/// Logging configuration from the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingTomlConfig {
    pub log_dir: Option<String>,
    pub level_filter: Option<String>,
    pub rotation: Option<String>, // "daily", "hourly", or "never"
    pub console_timestamps: Option<bool>,
    pub file_json_format: Option<bool>,
    pub cleanup_days: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlConfig {
    #[serde(default)]
    pub profiler: ProfilerConfig,
    pub logging: Option<LoggingTomlConfig>,
}

/// Application configuration (converted from TOML)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub profiler: ProfilerConfig,
    pub logging_config: LoggingConfig,
    /// Days to keep rotated log files
    pub log_cleanup_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profiler: ProfilerConfig::default(),
            logging_config: LoggingConfig::default(),
            log_cleanup_days: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config_content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let toml_config: TomlConfig = toml::from_str(content)?;
        Ok(Self::from_toml_config(toml_config))
    }

    fn from_toml_config(toml_config: TomlConfig) -> Self {
        let defaults = LoggingConfig::default();
        let (logging_config, log_cleanup_days) = match toml_config.logging {
            Some(log_config) => {
                let rotation = log_config
                    .rotation
                    .map(|r| match r.as_str() {
                        "hourly" => LogRotation::Hourly,
                        "never" => LogRotation::Never,
                        _ => LogRotation::Daily,
                    })
                    .unwrap_or(LogRotation::Daily);

                let config = LoggingConfig {
                    log_dir: log_config.log_dir.unwrap_or(defaults.log_dir),
                    level_filter: log_config.level_filter.unwrap_or(defaults.level_filter),
                    rotation,
                    console_timestamps: log_config.console_timestamps.unwrap_or(true),
                    file_json_format: log_config.file_json_format.unwrap_or(true),
                };
                (config, log_config.cleanup_days.unwrap_or(30))
            }
            None => (defaults, 30),
        };

        Self {
            profiler: toml_config.profiler,
            logging_config,
            log_cleanup_days,
        }
    }
}
