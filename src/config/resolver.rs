//! Precedence resolution for configuration.
//!
//! ## Data file (highest to lowest)
//!
//! 1. `--file` CLI flag
//! 2. `QL_FILE` environment variable
//! 3. `data-file` in config.kdl
//! 4. `goals.txt` in the data directory (`QL_DATA_DIR` or `~/.local/share/questlog`)
//!
//! ## Output format
//!
//! `--human` CLI flag > `output-format` in config.kdl > JSON
//!
//! ## Action log
//!
//! `action-log` / `action-log-path` in config.kdl > enabled, `action.log` in the data directory

use crate::config::{OutputFormat, QuestConfig};
use crate::storage::{DATA_DIR_ENV, DATA_FILE_NAME};
use crate::{Error, Result};
use kdl::KdlDocument;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the goal file.
pub const DATA_FILE_ENV: &str = "QL_FILE";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "QL_CONFIG_DIR";

/// File name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.kdl";

/// File name of the action log inside the data directory.
pub const ACTION_LOG_FILE_NAME: &str = "action.log";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Path of the config file that was consulted (it may not exist)
    pub config_path: Option<PathBuf>,
    /// Goal file in use
    pub data_file: Resolved<PathBuf>,
    /// Output format preference
    pub output_format: Resolved<OutputFormat>,
    /// Whether the action log is written
    pub action_log: Resolved<bool>,
    /// Where the action log is written
    pub action_log_path: Resolved<PathBuf>,
}

impl ResolvedConfig {
    pub fn data_file(&self) -> &Path {
        &self.data_file.value
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn human(&self) -> bool {
        self.output_format.value == OutputFormat::Human
    }

    pub fn action_log_enabled(&self) -> bool {
        self.action_log.value
    }

    pub fn action_log_path(&self) -> &Path {
        &self.action_log_path.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Goal file from `--file`
    pub data_file: Option<PathBuf>,
    /// Output format from `--human`
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Environment-derived inputs to resolution.
///
/// Collected once so the precedence rules can be tested without touching
/// the process environment.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Value of `QL_FILE`, if set
    pub data_file: Option<PathBuf>,
    /// Resolved data directory and its source
    pub data_dir: Resolved<PathBuf>,
}

impl Environment {
    /// Read `QL_FILE` and `QL_DATA_DIR` from the process environment.
    pub fn from_process() -> Result<Self> {
        let data_file = non_empty_env(DATA_FILE_ENV).map(PathBuf::from);

        let data_dir = match non_empty_env(DATA_DIR_ENV) {
            Some(dir) => Resolved::new(
                PathBuf::from(dir),
                ValueSource::EnvVar(DATA_DIR_ENV.to_string()),
            ),
            None => Resolved::new(crate::storage::get_data_dir()?, ValueSource::Default),
        };

        Ok(Self {
            data_file,
            data_dir,
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get the config file path.
///
/// `$QL_CONFIG_DIR/config.kdl` if set, otherwise `<config_dir>/questlog/config.kdl`.
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(dir) = non_empty_env(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join(CONFIG_FILE_NAME));
    }
    dirs::config_dir().map(|dir| dir.join("questlog").join(CONFIG_FILE_NAME))
}

/// Read config.kdl. A missing file is an empty config.
pub fn load_config_file(path: &Path) -> Result<QuestConfig> {
    if !path.exists() {
        return Ok(QuestConfig::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

    Ok(QuestConfig::from_kdl(&doc))
}

/// Resolve configuration from the process environment and config file.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let config_path = config_file_path();
    let config = match &config_path {
        Some(path) => load_config_file(path)?,
        None => QuestConfig::new(),
    };
    let env = Environment::from_process()?;

    let mut resolved = resolve_config_with(&config, &env, overrides);
    resolved.config_path = config_path;
    Ok(resolved)
}

/// Apply the precedence rules to already-loaded inputs.
pub fn resolve_config_with(
    config: &QuestConfig,
    env: &Environment,
    overrides: &ConfigOverrides,
) -> ResolvedConfig {
    let data_file = if let Some(ref path) = overrides.data_file {
        Resolved::new(path.clone(), ValueSource::CliFlag)
    } else if let Some(ref path) = env.data_file {
        Resolved::new(path.clone(), ValueSource::EnvVar(DATA_FILE_ENV.to_string()))
    } else if let Some(ref path) = config.data_file {
        Resolved::new(path.clone(), ValueSource::ConfigFile)
    } else {
        Resolved::new(
            env.data_dir.value.join(DATA_FILE_NAME),
            env.data_dir.source.clone(),
        )
    };

    let output_format = if let Some(format) = overrides.output_format {
        Resolved::new(format, ValueSource::CliFlag)
    } else if let Some(format) = config.output_format {
        Resolved::new(format, ValueSource::ConfigFile)
    } else {
        Resolved::new(OutputFormat::Json, ValueSource::Default)
    };

    let action_log = match config.action_log {
        Some(enabled) => Resolved::new(enabled, ValueSource::ConfigFile),
        None => Resolved::new(true, ValueSource::Default),
    };

    let action_log_path = match config.action_log_path {
        Some(ref path) => Resolved::new(path.clone(), ValueSource::ConfigFile),
        None => Resolved::new(
            env.data_dir.value.join(ACTION_LOG_FILE_NAME),
            env.data_dir.source.clone(),
        ),
    };

    ResolvedConfig {
        config_path: None,
        data_file,
        output_format,
        action_log,
        action_log_path,
    }
}
