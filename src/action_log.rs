//! Action logging for Questlog commands.
//!
//! Every CLI invocation is appended to a JSONL file (one JSON object per
//! line) when the `action-log` preference is enabled, which is the default.

use crate::config::ResolvedConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Represents a single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// ISO 8601 timestamp when the action occurred
    pub timestamp: DateTime<Utc>,

    /// Goal file the command operated on
    pub data_file: String,

    /// Command name (e.g., "create", "record", "config show")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,

    /// User who executed the command
    pub user: String,
}

/// Log an action to the configured log file.
///
/// Never fails: a log that cannot be written produces a warning and the
/// command result is unaffected.
pub fn log_action(
    config: &ResolvedConfig,
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) {
    if !config.action_log_enabled() {
        return;
    }

    let entry = ActionLog {
        timestamp: Utc::now(),
        data_file: config.data_file().display().to_string(),
        command: command.to_string(),
        args,
        success,
        error,
        duration_ms,
        user: get_current_user(),
    };

    let log_path = config.action_log_path();
    if let Err(e) = write_log_entry(log_path, &entry) {
        tracing::warn!(path = %log_path.display(), error = %e, "failed to write action log");
    }
}

/// Append a log entry to the log file.
fn write_log_entry(path: &Path, entry: &ActionLog) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;

    Ok(())
}

/// Get the current user's username.
fn get_current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ConfigOverrides, Environment, QuestConfig, Resolved, ValueSource, resolve_config_with,
    };
    use crate::test_utils::TestEnv;

    fn config_for(env: &TestEnv, action_log: Option<bool>) -> ResolvedConfig {
        let file_config = QuestConfig {
            action_log,
            ..QuestConfig::default()
        };
        let environment = Environment {
            data_file: None,
            data_dir: Resolved::new(env.data_path().to_path_buf(), ValueSource::Default),
        };
        resolve_config_with(&file_config, &environment, &ConfigOverrides::new())
    }

    #[test]
    fn test_log_action_appends_jsonl() {
        let env = TestEnv::new();
        let config = config_for(&env, None);

        log_action(&config, "create", serde_json::json!({"name": "Pray"}), true, None, 3);
        log_action(
            &config,
            "record",
            serde_json::json!({"index": 7}),
            false,
            Some("Invalid goal selection 7: choose a goal from 1 to 1".to_string()),
            1,
        );

        let contents = fs::read_to_string(config.action_log_path()).unwrap();
        let entries: Vec<ActionLog> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "create");
        assert_eq!(entries[0].args["name"], "Pray");
        assert!(entries[0].success);
        assert!(entries[0].error.is_none());
        assert_eq!(entries[1].command, "record");
        assert!(!entries[1].success);
        assert!(entries[1].error.as_deref().unwrap().contains("Invalid goal selection"));
    }

    #[test]
    fn test_log_action_disabled() {
        let env = TestEnv::new();
        let config = config_for(&env, Some(false));

        log_action(&config, "list", serde_json::json!({}), true, None, 0);
        assert!(!config.action_log_path().exists());
    }

    #[test]
    fn test_error_field_omitted_on_success() {
        let entry = ActionLog {
            timestamp: Utc::now(),
            data_file: "goals.txt".to_string(),
            command: "score".to_string(),
            args: serde_json::json!({}),
            success: true,
            error: None,
            duration_ms: 0,
            user: "tester".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"error\""));
    }
}
