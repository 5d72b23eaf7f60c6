//! CLI argument definitions for Questlog.

use crate::models::GoalType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Questlog - Track goals and earn points for keeping them.
///
/// Run `ql` with no command to see your score, then `ql create` to add goals
/// and `ql record` every time you work on one.
#[derive(Parser, Debug)]
#[command(name = "ql")]
#[command(author, version, about = "Track goals and earn points for keeping them", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Goal file to use instead of the default one.
    /// Can also be set via QL_FILE or `data-file` in config.kdl.
    #[arg(short = 'f', long = "file", global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new goal
    ///
    /// Checklist goals need --target; --bonus is awarded on the final event.
    Create {
        /// Kind of goal
        #[arg(value_enum)]
        kind: GoalType,

        /// Goal name
        name: String,

        /// Goal description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Points per recorded event (deducted for negative goals)
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        points: i64,

        /// Number of events that complete a checklist goal
        #[arg(long)]
        target: Option<u32>,

        /// Bonus points awarded when a checklist goal completes
        #[arg(long, allow_negative_numbers = true)]
        bonus: Option<i64>,
    },

    /// List goals with their completion status
    List,

    /// Record an event against a goal
    Record {
        /// Goal number as shown by `ql list` (starting at 1)
        index: usize,
    },

    /// Show the current score
    Score,

    /// Save goals and score to another file
    Save {
        /// Destination file
        path: PathBuf,
    },

    /// Load goals and score from a file, replacing the current ones
    Load {
        /// File to load
        path: PathBuf,
    },

    /// Remove every goal and reset the score to 0
    Reset,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration and where each value came from
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // This will panic if the CLI is misconfigured
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_checklist() {
        let cli = Cli::try_parse_from([
            "ql", "create", "checklist", "Exercise", "-d", "gym", "-p", "50", "--target", "3",
            "--bonus", "500",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Create {
                kind,
                name,
                description,
                points,
                target,
                bonus,
            }) => {
                assert_eq!(kind, GoalType::Checklist);
                assert_eq!(name, "Exercise");
                assert_eq!(description, "gym");
                assert_eq!(points, 50);
                assert_eq!(target, Some(3));
                assert_eq!(bonus, Some(500));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ql", "list", "-H", "-f", "/tmp/goals.txt"]).unwrap();
        assert!(cli.human_readable);
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/goals.txt")));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["ql", "create", "weekly", "Run"]).is_err());
    }

    #[test]
    fn test_parse_record_requires_number() {
        assert!(Cli::try_parse_from(["ql", "record", "first"]).is_err());
    }

    #[test]
    fn test_no_command_is_status() {
        let cli = Cli::try_parse_from(["ql"]).unwrap();
        assert!(cli.command.is_none());
    }
}
