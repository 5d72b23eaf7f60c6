//! KDL schema for config.kdl.
//!
//! ```kdl
//! // Questlog preferences
//! data-file "~/Dropbox/goals.txt"
//! output-format "human"  // or "json"
//! action-log #true
//! action-log-path "~/.local/share/questlog/action.log"
//! ```
//!
//! Unknown nodes are ignored. Values of the wrong type are ignored with a
//! warning so a typo never prevents the CLI from running.

use crate::storage::expand_home;
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in config.kdl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestConfig {
    /// Goal file to use instead of the one in the data directory
    pub data_file: Option<PathBuf>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Whether commands are appended to the action log
    pub action_log: Option<bool>,

    /// Where the action log is written
    pub action_log_path: Option<PathBuf>,
}

impl QuestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from a KDL document.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(path) = doc.get("data-file").and_then(string_arg) {
            config.data_file = Some(expand_home(Path::new(path)));
        }

        if let Some(node) = doc.get("output-format") {
            match string_arg(node).and_then(OutputFormat::parse) {
                Some(format) => config.output_format = Some(format),
                None => tracing::warn!("config: output-format must be \"json\" or \"human\""),
            }
        }

        if let Some(node) = doc.get("action-log") {
            match node.entries().first().and_then(|e| e.value().as_bool()) {
                Some(enabled) => config.action_log = Some(enabled),
                None => tracing::warn!("config: action-log must be #true or #false"),
            }
        }

        if let Some(path) = doc.get("action-log-path").and_then(string_arg) {
            config.action_log_path = Some(expand_home(Path::new(path)));
        }

        config
    }
}

/// Get a string argument from a node's first entry.
fn string_arg(node: &KdlNode) -> Option<&str> {
    node.entries().first().and_then(|e| e.value().as_string())
}
