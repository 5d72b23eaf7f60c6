//! Command implementations for the Questlog CLI.
//!
//! Every command loads the goal file, performs one operation on the
//! [`GoalManager`], writes the file back if anything changed, and returns a
//! result that can be printed as JSON or as human-readable text.

use crate::config::ResolvedConfig;
use crate::manager::{EventOutcome, GoalManager, LoadReport};
use crate::models::{Goal, NewGoal};
use crate::storage::ensure_parent_dir;
use crate::Result;
use serde::Serialize;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// Load the goal file, starting fresh if it does not exist yet.
fn open_goals(data_file: &Path) -> Result<(GoalManager, LoadReport)> {
    let mut manager = GoalManager::new();
    let report = manager.load(data_file)?;
    Ok((manager, report))
}

/// Write the goal file, creating its directory on first use.
fn persist(manager: &GoalManager, data_file: &Path) -> Result<()> {
    ensure_parent_dir(data_file)?;
    manager.save(data_file)
}

// === Status ===

#[derive(Debug, Serialize)]
pub struct StatusResult {
    pub data_file: String,
    pub score: i64,
    pub goals: usize,
    pub completed: usize,
}

impl Output for StatusResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Questlog - Current Score: {} points\n  Goals: {} ({} completed)\n  Data file: {}",
            self.score, self.goals, self.completed, self.data_file
        )
    }
}

/// Summarize the current goal file.
pub fn status(data_file: &Path) -> Result<StatusResult> {
    let (manager, _) = open_goals(data_file)?;
    Ok(StatusResult {
        data_file: data_file.display().to_string(),
        score: manager.score(),
        goals: manager.len(),
        completed: manager.completed_count(),
    })
}

// === Create ===

#[derive(Debug, Serialize)]
pub struct GoalCreated {
    /// 1-based position used to select the goal
    pub index: usize,
    pub goal: Goal,
}

impl Output for GoalCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Created {} goal {}: {}",
            self.goal.goal_type(),
            self.index,
            self.goal
        )
    }
}

/// Add a goal and save.
pub fn goal_create(data_file: &Path, new_goal: NewGoal) -> Result<GoalCreated> {
    let (mut manager, _) = open_goals(data_file)?;
    let goal = manager.add_goal(new_goal)?.clone();
    persist(&manager, data_file)?;
    Ok(GoalCreated {
        index: manager.len(),
        goal,
    })
}

// === List ===

#[derive(Debug, Serialize)]
pub struct ListedGoal {
    pub index: usize,
    pub status: String,
    pub completed: bool,
    #[serde(flatten)]
    pub goal: Goal,
}

#[derive(Debug, Serialize)]
pub struct GoalList {
    pub score: i64,
    pub count: usize,
    pub goals: Vec<ListedGoal>,
}

impl Output for GoalList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.goals.is_empty() {
            return "No goals to display. Start by creating a new goal!".to_string();
        }

        let mut lines = vec!["Your Goals:".to_string()];
        for listed in &self.goals {
            lines.push(format!("{}. {}", listed.index, listed.status));
        }
        lines.push(String::new());
        lines.push(format!("You have {} points.", self.score));
        lines.join("\n")
    }
}

/// List all goals in selection order.
pub fn goal_list(data_file: &Path) -> Result<GoalList> {
    let (manager, _) = open_goals(data_file)?;
    let goals: Vec<ListedGoal> = manager
        .goals()
        .iter()
        .zip(manager.list_goals())
        .enumerate()
        .map(|(i, (goal, status))| ListedGoal {
            index: i + 1,
            status,
            completed: goal.is_terminally_complete(),
            goal: goal.clone(),
        })
        .collect();

    Ok(GoalList {
        score: manager.score(),
        count: goals.len(),
        goals,
    })
}

// === Record ===

#[derive(Debug, Serialize)]
pub struct EventRecorded {
    pub index: usize,
    pub name: String,
    pub already_complete: bool,
    /// Points applied to the score (0 when already complete)
    pub points: i64,
    pub score: i64,
    /// Whether this event completed the goal
    pub completed: bool,
}

impl Output for EventRecorded {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.already_complete {
            return format!(
                "This goal has already been completed: {}\nYou have {} points.",
                self.name, self.score
            );
        }

        let mut lines = Vec::new();
        if self.points < 0 {
            lines.push(format!("You lost {} points.", -self.points));
        } else {
            lines.push(format!(
                "Congratulations! You have earned {} points!",
                self.points
            ));
        }
        if self.completed {
            lines.push(format!("Goal complete: {}", self.name));
        }
        lines.push(format!("You now have {} points.", self.score));
        lines.join("\n")
    }
}

/// Record an event against the goal at the 1-based `index`.
///
/// Saves only when points were applied.
pub fn goal_record(data_file: &Path, index: usize) -> Result<EventRecorded> {
    let (mut manager, _) = open_goals(data_file)?;
    let outcome = manager.record_event(index)?;
    let name = manager
        .goal(index)
        .map(|g| g.name.clone())
        .unwrap_or_default();

    match outcome {
        EventOutcome::AlreadyComplete => Ok(EventRecorded {
            index,
            name,
            already_complete: true,
            points: 0,
            score: manager.score(),
            completed: true,
        }),
        EventOutcome::Recorded {
            points,
            score,
            completed,
        } => {
            persist(&manager, data_file)?;
            Ok(EventRecorded {
                index,
                name,
                already_complete: false,
                points,
                score,
                completed,
            })
        }
    }
}

// === Score ===

#[derive(Debug, Serialize)]
pub struct ScoreResult {
    pub score: i64,
}

impl Output for ScoreResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("You have {} points.", self.score)
    }
}

pub fn score(data_file: &Path) -> Result<ScoreResult> {
    let (manager, _) = open_goals(data_file)?;
    Ok(ScoreResult {
        score: manager.score(),
    })
}

// === Save / Load ===

#[derive(Debug, Serialize)]
pub struct Saved {
    pub path: String,
    pub goals: usize,
    pub score: i64,
}

impl Output for Saved {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Goals saved to {} ({} goals, {} points)",
            self.path, self.goals, self.score
        )
    }
}

/// Write the current goals to another file.
pub fn save(data_file: &Path, target: &Path) -> Result<Saved> {
    let (manager, _) = open_goals(data_file)?;
    manager.save(target)?;
    Ok(Saved {
        path: target.display().to_string(),
        goals: manager.len(),
        score: manager.score(),
    })
}

#[derive(Debug, Serialize)]
pub struct Loaded {
    pub path: String,
    pub found: bool,
    pub loaded: usize,
    pub score: i64,
    pub warnings: Vec<String>,
}

impl Output for Loaded {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if !self.found {
            return format!(
                "No saved goals found at {}. Starting with a new quest!",
                self.path
            );
        }

        let mut lines = vec![format!(
            "Goals loaded from {} ({} goals, {} points)",
            self.path, self.loaded, self.score
        )];
        for warning in &self.warnings {
            lines.push(format!("Warning: {}", warning));
        }
        lines.join("\n")
    }
}

/// Replace the current goals with the contents of `source`.
///
/// A missing `source` starts a new, empty quest.
pub fn load(data_file: &Path, source: &Path) -> Result<Loaded> {
    let mut manager = GoalManager::new();
    let report = manager.load(source)?;
    persist(&manager, data_file)?;
    Ok(Loaded {
        path: source.display().to_string(),
        found: report.found,
        loaded: report.loaded,
        score: manager.score(),
        warnings: report.warnings.iter().map(ToString::to_string).collect(),
    })
}

// === Reset ===

#[derive(Debug, Serialize)]
pub struct ResetResult {
    pub removed: usize,
    pub previous_score: i64,
}

impl Output for ResetResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Removed {} goals ({} points). Score reset to 0.",
            self.removed, self.previous_score
        )
    }
}

/// Remove every goal and reset the score.
pub fn reset(data_file: &Path) -> Result<ResetResult> {
    let (mut manager, _) = open_goals(data_file)?;
    let result = ResetResult {
        removed: manager.len(),
        previous_score: manager.score(),
    };
    manager.reset();
    persist(&manager, data_file)?;
    Ok(result)
}

// === Config ===

#[derive(Debug, Serialize)]
pub struct ConfigShow {
    #[serde(flatten)]
    pub config: ResolvedConfig,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let config = &self.config;
        let config_path = config
            .config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        [
            format!("config file: {}", config_path),
            format!(
                "data-file: {} ({})",
                config.data_file.value.display(),
                config.data_file.source
            ),
            format!(
                "output-format: {} ({})",
                config.output_format.value, config.output_format.source
            ),
            format!(
                "action-log: {} ({})",
                config.action_log.value, config.action_log.source
            ),
            format!(
                "action-log-path: {} ({})",
                config.action_log_path.value.display(),
                config.action_log_path.source
            ),
        ]
        .join("\n")
    }
}

pub fn config_show(config: &ResolvedConfig) -> ConfigShow {
    ConfigShow {
        config: config.clone(),
    }
}
