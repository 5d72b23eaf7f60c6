//! Questlog - A personal goal-tracking library.
//!
//! This library provides the core functionality for the `ql` CLI tool:
//! goal definitions, scoring, and the line-oriented goal file format.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod manager;
pub mod models;
pub mod storage;

pub use manager::{EventOutcome, GoalManager, LoadReport, LoadWarning};
pub use models::{EventResult, Goal, GoalKind, GoalType, NewGoal};


/// Library-level error type for Questlog operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{}", index_out_of_range_message(.index, .len))]
    GoalIndexOutOfRange { index: usize, len: usize },

    #[error("Score overflow: recording goal {index} would take the score out of range")]
    ScoreOverflow { index: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

fn index_out_of_range_message(index: &usize, len: &usize) -> String {
    if *len == 0 {
        "No goals yet. You need to create goals before you can record an event.".to_string()
    } else {
        format!("Invalid goal selection {}: choose a goal from 1 to {}", index, len)
    }
}

/// Result type alias for Questlog operations.
pub type Result<T> = std::result::Result<T, Error>;
