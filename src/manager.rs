//! Goal collection and score management.
//!
//! `GoalManager` owns the ordered list of goals and the cumulative score.
//! It validates new goals, routes events to the selected goal by 1-based
//! index, and reads/writes the persisted goal file:
//!
//! ```text
//! 725
//! Simple|Read scriptures|daily|100|True
//! Checklist|Exercise|gym|50|3|500|3
//! Eternal|Pray|daily|25
//! ```
//!
//! The first line is the score; every following line is one goal record
//! (see [`crate::models::record`]).

use crate::models::{EventResult, Goal, NewGoal, RecordError};
use crate::storage::{FileBackend, StorageBackend};
use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// Outcome of recording an event through the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Points were applied to the score.
    Recorded {
        /// Signed change applied to the score
        points: i64,
        /// Score after the event
        score: i64,
        /// Whether this event made the goal terminally complete
        completed: bool,
    },
    /// The goal was already complete; score and goal are unchanged.
    AlreadyComplete,
}

/// A persisted line that was skipped during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// 1-based line number in the resource
    pub line: usize,
    pub reason: LoadIssue,
}

/// Why a line was skipped or defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// The first line was not an integer; the score was reset to 0.
    InvalidScore(String),
    /// A goal record could not be decoded and was skipped.
    Record(RecordError),
    /// A goal record was not valid UTF-8 and was skipped.
    InvalidUtf8,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            LoadIssue::InvalidScore(value) => write!(
                f,
                "line {}: invalid score '{}', starting from 0",
                self.line, value
            ),
            LoadIssue::Record(err) => write!(f, "line {}: skipped record: {}", self.line, err),
            LoadIssue::InvalidUtf8 => {
                write!(f, "line {}: skipped record: not valid UTF-8", self.line)
            }
        }
    }
}

/// Summary of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether the resource existed
    pub found: bool,
    /// Number of goals loaded
    pub loaded: usize,
    /// Lines that were skipped or defaulted
    pub warnings: Vec<LoadWarning>,
}

/// Owns the goal collection and the score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalManager {
    goals: Vec<Goal>,
    score: i64,
}

impl GoalManager {
    /// Create an empty manager with a score of 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Get a goal by its 1-based position.
    pub fn goal(&self, index: usize) -> Option<&Goal> {
        index.checked_sub(1).and_then(|i| self.goals.get(i))
    }

    /// Number of goals that can no longer earn points.
    pub fn completed_count(&self) -> usize {
        self.goals
            .iter()
            .filter(|g| g.is_terminally_complete())
            .count()
    }

    /// Validate and append a new goal.
    ///
    /// Returns the appended goal. On error nothing is added.
    pub fn add_goal(&mut self, new_goal: NewGoal) -> Result<&Goal> {
        let goal = new_goal.build()?;
        tracing::info!(name = %goal.name, kind = %goal.goal_type(), "goal created");
        self.goals.push(goal);
        Ok(&self.goals[self.goals.len() - 1])
    }

    /// Status lines for all goals, in selection order.
    pub fn list_goals(&self) -> Vec<String> {
        self.goals.iter().map(Goal::status_text).collect()
    }

    /// Record one event against the goal at the 1-based `index`.
    ///
    /// If the resulting score would not fit in an `i64` the event is
    /// rejected and neither the goal nor the score changes.
    pub fn record_event(&mut self, index: usize) -> Result<EventOutcome> {
        let len = self.goals.len();
        let slot = index
            .checked_sub(1)
            .and_then(|i| self.goals.get_mut(i))
            .ok_or(Error::GoalIndexOutOfRange { index, len })?;

        let mut goal = slot.clone();
        match goal.record_event() {
            EventResult::AlreadyComplete => {
                tracing::debug!(index, name = %goal.name, "goal already complete");
                Ok(EventOutcome::AlreadyComplete)
            }
            EventResult::Overflow => {
                tracing::warn!(index, name = %goal.name, "goal points overflow");
                Err(Error::ScoreOverflow { index })
            }
            EventResult::Points(points) => {
                let score = self
                    .score
                    .checked_add(points)
                    .ok_or(Error::ScoreOverflow { index })?;
                let completed = goal.is_terminally_complete();
                *slot = goal;
                self.score = score;
                tracing::info!(index, points, score, "event recorded");
                Ok(EventOutcome::Recorded {
                    points,
                    score,
                    completed,
                })
            }
        }
    }

    /// Clear all goals and the score.
    pub fn reset(&mut self) {
        self.goals.clear();
        self.score = 0;
    }

    /// Encode the full state as lines: the score, then one record per goal.
    pub fn to_lines(&self) -> Vec<String> {
        std::iter::once(self.score.to_string())
            .chain(self.goals.iter().map(Goal::to_record))
            .collect()
    }

    /// Write the current state to a file, replacing its contents.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.save_to(&mut FileBackend::new(path))
    }

    /// Write the current state to a backend. In-memory state is never modified.
    pub fn save_to<B: StorageBackend + ?Sized>(&self, backend: &mut B) -> Result<()> {
        backend.write_lines(&self.to_lines())?;
        tracing::debug!(
            location = %backend.location(),
            goals = self.goals.len(),
            score = self.score,
            "saved goals"
        );
        Ok(())
    }

    /// Replace the current state with the contents of a file.
    pub fn load(&mut self, path: &Path) -> Result<LoadReport> {
        self.load_from(&FileBackend::new(path))
    }

    /// Replace the current state with the contents of a backend.
    ///
    /// A missing resource yields an empty manager. Bad records are skipped
    /// and reported. If the backend fails, the manager is left empty and
    /// the error is returned.
    pub fn load_from<B: StorageBackend + ?Sized>(&mut self, backend: &B) -> Result<LoadReport> {
        let lines = match backend.read_lines() {
            Ok(lines) => lines,
            Err(e) => {
                tracing::error!(location = %backend.location(), error = %e, "failed to load goals");
                self.reset();
                return Err(e);
            }
        };

        let Some(lines) = lines else {
            tracing::debug!(location = %backend.location(), "no saved goals, starting fresh");
            self.reset();
            return Ok(LoadReport::default());
        };

        let (manager, report) = Self::from_lines(&lines);
        for warning in &report.warnings {
            tracing::warn!(location = %backend.location(), "{}", warning);
        }
        *self = manager;
        tracing::debug!(
            location = %backend.location(),
            goals = report.loaded,
            score = self.score,
            "loaded goals"
        );
        Ok(report)
    }

    /// Decode a manager from persisted lines, collecting warnings for bad lines.
    ///
    /// Lines are raw bytes; each one is decoded as UTF-8 on its own.
    pub fn from_lines<S: AsRef<[u8]>>(lines: &[S]) -> (Self, LoadReport) {
        let mut manager = Self::new();
        let mut report = LoadReport {
            found: true,
            ..LoadReport::default()
        };

        let mut lines = lines.iter().map(<S as AsRef<[u8]>>::as_ref).enumerate();

        if let Some((_, first)) = lines.next() {
            match std::str::from_utf8(first).ok().map(|s| s.trim().parse::<i64>()) {
                Some(Ok(score)) => manager.score = score,
                _ => report.warnings.push(LoadWarning {
                    line: 1,
                    reason: LoadIssue::InvalidScore(String::from_utf8_lossy(first).into_owned()),
                }),
            }
        }

        for (i, bytes) in lines {
            let Ok(line) = std::str::from_utf8(bytes) else {
                report.warnings.push(LoadWarning {
                    line: i + 1,
                    reason: LoadIssue::InvalidUtf8,
                });
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }
            match Goal::from_record(line) {
                Ok(goal) => manager.goals.push(goal),
                Err(err) => report.warnings.push(LoadWarning {
                    line: i + 1,
                    reason: LoadIssue::Record(err),
                }),
            }
        }

        report.loaded = manager.goals.len();
        (manager, report)
    }
}
