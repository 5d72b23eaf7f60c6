//! Data models for Questlog goals.
//!
//! This module defines the core data structures:
//! - `Goal` - A trackable objective with a name, description and point value
//! - `GoalKind` - The closed set of completion behaviors (simple, eternal, checklist, negative)
//! - `NewGoal` - Validated construction parameters for a goal
//! - `EventResult` - What recording one event against a goal produced

pub mod record;

pub use record::{RecordError, DELIMITER};

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// The kind of goal, without any progress state.
///
/// Used when creating goals and as the type tag of a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Completes once, then never awards points again
    Simple,
    /// Never completes; every event awards points
    Eternal,
    /// Completes after a target number of events, with a bonus
    Checklist,
    /// Never completes; every event costs points
    Negative,
}

impl GoalType {
    /// Get the lowercase name used on the command line and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Simple => "simple",
            GoalType::Eternal => "eternal",
            GoalType::Checklist => "checklist",
            GoalType::Negative => "negative",
        }
    }

    /// Get the type tag written at the start of a persisted record.
    pub fn tag(&self) -> &'static str {
        match self {
            GoalType::Simple => "Simple",
            GoalType::Eternal => "Eternal",
            GoalType::Checklist => "Checklist",
            GoalType::Negative => "Negative",
        }
    }

    /// Look up a goal type by its record tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Simple" => Some(GoalType::Simple),
            "Eternal" => Some(GoalType::Eternal),
            "Checklist" => Some(GoalType::Checklist),
            "Negative" => Some(GoalType::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Completion behavior of a goal, together with its progress state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalKind {
    Simple {
        completed: bool,
    },
    Eternal,
    Checklist {
        completed_count: u32,
        target_count: u32,
        bonus_points: i64,
    },
    Negative,
}

impl GoalKind {
    /// Get the goal type of this kind.
    pub fn goal_type(&self) -> GoalType {
        match self {
            GoalKind::Simple { .. } => GoalType::Simple,
            GoalKind::Eternal => GoalType::Eternal,
            GoalKind::Checklist { .. } => GoalType::Checklist,
            GoalKind::Negative => GoalType::Negative,
        }
    }
}

/// Result of recording a single event against a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The event was applied; the value is the signed change to the score.
    Points(i64),
    /// The goal is terminally complete; nothing changed.
    AlreadyComplete,
    /// The points for this event do not fit in an `i64`; nothing changed.
    Overflow,
}

/// A trackable objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
    /// Display name (not required to be unique)
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Points awarded (or, for negative goals, deducted) per event
    pub points: i64,

    /// Completion behavior and progress
    #[serde(flatten)]
    pub kind: GoalKind,
}

impl Goal {
    /// Create a simple goal that has not been completed.
    pub fn simple(name: impl Into<String>, description: impl Into<String>, points: i64) -> Self {
        Self::with_kind(name, description, points, GoalKind::Simple { completed: false })
    }

    /// Create an eternal goal.
    pub fn eternal(name: impl Into<String>, description: impl Into<String>, points: i64) -> Self {
        Self::with_kind(name, description, points, GoalKind::Eternal)
    }

    /// Create a checklist goal with no events recorded yet.
    pub fn checklist(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
        target_count: u32,
        bonus_points: i64,
    ) -> Self {
        Self::with_kind(
            name,
            description,
            points,
            GoalKind::Checklist {
                completed_count: 0,
                target_count,
                bonus_points,
            },
        )
    }

    /// Create a negative goal.
    pub fn negative(name: impl Into<String>, description: impl Into<String>, points: i64) -> Self {
        Self::with_kind(name, description, points, GoalKind::Negative)
    }

    fn with_kind(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
        kind: GoalKind,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            points,
            kind,
        }
    }

    /// Get the goal type.
    pub fn goal_type(&self) -> GoalType {
        self.kind.goal_type()
    }

    /// Apply one occurrence of this goal.
    ///
    /// Returns the score delta, or `AlreadyComplete`/`Overflow` without
    /// touching any state.
    pub fn record_event(&mut self) -> EventResult {
        match &mut self.kind {
            GoalKind::Simple { completed } => {
                if *completed {
                    return EventResult::AlreadyComplete;
                }
                *completed = true;
                EventResult::Points(self.points)
            }
            GoalKind::Eternal => EventResult::Points(self.points),
            GoalKind::Checklist {
                completed_count,
                target_count,
                bonus_points,
            } => {
                if *completed_count >= *target_count {
                    return EventResult::AlreadyComplete;
                }
                let next = *completed_count + 1;
                let points = if next == *target_count {
                    match self.points.checked_add(*bonus_points) {
                        Some(points) => points,
                        None => return EventResult::Overflow,
                    }
                } else {
                    self.points
                };
                *completed_count = next;
                EventResult::Points(points)
            }
            GoalKind::Negative => match self.points.checked_neg() {
                Some(points) => EventResult::Points(points),
                None => EventResult::Overflow,
            },
        }
    }

    /// Returns true once the goal can no longer earn points.
    ///
    /// Eternal and negative goals are never complete.
    pub fn is_terminally_complete(&self) -> bool {
        match &self.kind {
            GoalKind::Simple { completed } => *completed,
            GoalKind::Checklist {
                completed_count,
                target_count,
                ..
            } => completed_count >= target_count,
            GoalKind::Eternal | GoalKind::Negative => false,
        }
    }

    /// Marker shown in front of the goal in listings.
    fn marker(&self) -> &'static str {
        match &self.kind {
            GoalKind::Eternal => "[~]",
            GoalKind::Negative => "[-]",
            _ if self.is_terminally_complete() => "[X]",
            _ => "[ ]",
        }
    }

    /// Human-readable status line, e.g. `[ ] Exercise (gym) -- Currently completed: 1/3`.
    pub fn status_text(&self) -> String {
        let mut line = format!("{} {} ({})", self.marker(), self.name, self.description);
        if let GoalKind::Checklist {
            completed_count,
            target_count,
            ..
        } = &self.kind
        {
            line.push_str(&format!(
                " -- Currently completed: {}/{}",
                completed_count, target_count
            ));
        }
        line
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_text())
    }
}

/// Parameters for creating a goal through the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub goal_type: GoalType,
    pub name: String,
    pub description: String,
    pub points: i64,
    /// Required for checklist goals, rejected for the others
    pub target_count: Option<u32>,
    /// Checklist only; defaults to 0
    pub bonus_points: Option<i64>,
}

impl NewGoal {
    /// Start building a goal of the given type with zero points and no description.
    pub fn new(goal_type: GoalType, name: impl Into<String>) -> Self {
        Self {
            goal_type,
            name: name.into(),
            description: String::new(),
            points: 0,
            target_count: None,
            bonus_points: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn points(mut self, points: i64) -> Self {
        self.points = points;
        self
    }

    pub fn target(mut self, target_count: u32) -> Self {
        self.target_count = Some(target_count);
        self
    }

    pub fn bonus(mut self, bonus_points: i64) -> Self {
        self.bonus_points = Some(bonus_points);
        self
    }

    /// Validate the parameters and build the goal.
    pub fn build(self) -> Result<Goal> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("Goal name cannot be empty".to_string()));
        }
        validate_text_field("name", &self.name)?;
        validate_text_field("description", &self.description)?;

        if self.points < 0 {
            return Err(Error::InvalidInput(format!(
                "Points must be a non-negative number, got {}",
                self.points
            )));
        }

        match self.goal_type {
            GoalType::Checklist => {
                let target_count = self.target_count.ok_or_else(|| {
                    Error::InvalidInput("Checklist goals require a target count".to_string())
                })?;
                if target_count == 0 {
                    return Err(Error::InvalidInput(
                        "Target count must be a positive number".to_string(),
                    ));
                }
                let bonus_points = self.bonus_points.unwrap_or(0);
                if bonus_points < 0 {
                    return Err(Error::InvalidInput(format!(
                        "Bonus points must be a non-negative number, got {}",
                        bonus_points
                    )));
                }
                Ok(Goal::checklist(
                    self.name,
                    self.description,
                    self.points,
                    target_count,
                    bonus_points,
                ))
            }
            other => {
                if self.target_count.is_some() || self.bonus_points.is_some() {
                    return Err(Error::InvalidInput(format!(
                        "Target count and bonus points only apply to checklist goals, not {} goals",
                        other
                    )));
                }
                Ok(match other {
                    GoalType::Simple => Goal::simple(self.name, self.description, self.points),
                    GoalType::Eternal => Goal::eternal(self.name, self.description, self.points),
                    _ => Goal::negative(self.name, self.description, self.points),
                })
            }
        }
    }
}

/// Reject characters that would break the line-oriented record format.
fn validate_text_field(field: &str, value: &str) -> Result<()> {
    if value.contains(DELIMITER) {
        return Err(Error::InvalidInput(format!(
            "Goal {} cannot contain '{}'",
            field, DELIMITER
        )));
    }
    if value.contains(['\n', '\r']) {
        return Err(Error::InvalidInput(format!(
            "Goal {} cannot contain line breaks",
            field
        )));
    }
    Ok(())
}
