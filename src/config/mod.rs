//! Configuration for Questlog.
//!
//! ## config.kdl - User preferences
//!
//! Located at `~/.config/questlog/config.kdl`, or `$QL_CONFIG_DIR/config.kdl`
//! when that variable is set.
//!
//! Contains:
//! - `data-file` - Goal file to use instead of the default one
//! - `output-format` - "json" or "human"
//! - `action-log` - Whether to append every command to the action log
//! - `action-log-path` - Where the action log lives
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config.kdl > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Environment, Resolved, ResolvedConfig, ValueSource, config_file_path,
    load_config_file, resolve_config, resolve_config_with,
};
pub use schema::{OutputFormat, QuestConfig};
