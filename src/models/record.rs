//! Line-oriented record format for persisted goals.
//!
//! Each goal is written as a type tag followed by its fields, separated by `|`:
//!
//! ```text
//! Simple|name|description|points|completed
//! Eternal|name|description|points
//! Checklist|name|description|points|targetCount|bonusPoints|completedCount
//! Negative|name|description|points
//! ```
//!
//! Booleans are written as `True`/`False` and read case-insensitively.

use super::{Goal, GoalKind, GoalType};
use std::str::FromStr;

/// Field separator inside a record.
pub const DELIMITER: char = '|';

/// Why a single record could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("unknown goal type '{0}'")]
    UnknownType(String),

    #[error("{tag} record needs {expected} fields, found {found}")]
    FieldCount {
        tag: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("goal name is empty")]
    EmptyName,

    #[error("checklist target count must be positive")]
    ZeroTarget,

    #[error("checklist completed count {completed} exceeds target {target}")]
    CountExceedsTarget { completed: u32, target: u32 },
}

impl Goal {
    /// Encode this goal as a single record line (without trailing newline).
    pub fn to_record(&self) -> String {
        let mut fields = vec![
            self.goal_type().tag().to_string(),
            self.name.clone(),
            self.description.clone(),
            self.points.to_string(),
        ];
        match &self.kind {
            GoalKind::Simple { completed } => fields.push(format_bool(*completed).to_string()),
            GoalKind::Checklist {
                completed_count,
                target_count,
                bonus_points,
            } => {
                fields.push(target_count.to_string());
                fields.push(bonus_points.to_string());
                fields.push(completed_count.to_string());
            }
            GoalKind::Eternal | GoalKind::Negative => {}
        }
        fields.join(&DELIMITER.to_string())
    }

    /// Decode a record line produced by [`Goal::to_record`].
    pub fn from_record(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        let goal_type = GoalType::from_tag(fields[0])
            .ok_or_else(|| RecordError::UnknownType(fields[0].to_string()))?;

        let expected = field_count(goal_type);
        if fields.len() != expected {
            return Err(RecordError::FieldCount {
                tag: goal_type.tag(),
                expected,
                found: fields.len(),
            });
        }

        let name = fields[1];
        if name.trim().is_empty() {
            return Err(RecordError::EmptyName);
        }
        let description = fields[2];
        let points: i64 = parse_number("points", fields[3])?;

        let kind = match goal_type {
            GoalType::Simple => GoalKind::Simple {
                completed: parse_bool(fields[4])?,
            },
            GoalType::Eternal => GoalKind::Eternal,
            GoalType::Checklist => {
                let target_count: u32 = parse_number("target count", fields[4])?;
                let bonus_points: i64 = parse_number("bonus points", fields[5])?;
                let completed_count: u32 = parse_number("completed count", fields[6])?;
                if target_count == 0 {
                    return Err(RecordError::ZeroTarget);
                }
                if completed_count > target_count {
                    return Err(RecordError::CountExceedsTarget {
                        completed: completed_count,
                        target: target_count,
                    });
                }
                GoalKind::Checklist {
                    completed_count,
                    target_count,
                    bonus_points,
                }
            }
            GoalType::Negative => GoalKind::Negative,
        };

        Ok(Goal {
            name: name.to_string(),
            description: description.to_string(),
            points,
            kind,
        })
    }
}

/// Number of `|`-separated fields (including the tag) for each goal type.
fn field_count(goal_type: GoalType) -> usize {
    match goal_type {
        GoalType::Simple => 5,
        GoalType::Eternal | GoalType::Negative => 4,
        GoalType::Checklist => 7,
    }
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, RecordError> {
    value.trim().parse().map_err(|_| RecordError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn parse_bool(value: &str) -> Result<bool, RecordError> {
    match value.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(RecordError::InvalidValue {
            field: "completed",
            value: value.to_string(),
        }),
    }
}

fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_each_type() {
        assert_eq!(
            Goal::simple("Read scriptures", "daily", 100).to_record(),
            "Simple|Read scriptures|daily|100|False"
        );
        assert_eq!(
            Goal::eternal("Pray", "daily", 25).to_record(),
            "Eternal|Pray|daily|25"
        );
        assert_eq!(
            Goal::checklist("Exercise", "gym", 50, 3, 500).to_record(),
            "Checklist|Exercise|gym|50|3|500|0"
        );
        assert_eq!(
            Goal::negative("Snooze", "", 10).to_record(),
            "Negative|Snooze||10"
        );
    }

    #[test]
    fn test_decode_preserves_progress() {
        let goal = Goal::from_record("Checklist|Exercise|gym|50|3|500|2").unwrap();
        assert_eq!(
            goal.kind,
            GoalKind::Checklist {
                completed_count: 2,
                target_count: 3,
                bonus_points: 500,
            }
        );

        let goal = Goal::from_record("Simple|Run|5k|20|True").unwrap();
        assert!(goal.is_terminally_complete());
    }

    #[test]
    fn test_decode_bool_is_case_insensitive() {
        let goal = Goal::from_record("Simple|Run|5k|20|true").unwrap();
        assert_eq!(goal.kind, GoalKind::Simple { completed: true });
        let goal = Goal::from_record("Simple|Run|5k|20|FALSE").unwrap();
        assert_eq!(goal.kind, GoalKind::Simple { completed: false });
    }

    #[test]
    fn test_negative_points_round_trip() {
        let goal = Goal::eternal("Odd", "legacy data", -15);
        let decoded = Goal::from_record(&goal.to_record()).unwrap();
        assert_eq!(decoded, goal);
        assert_eq!(decoded.points, -15);
    }

    #[test]
    fn test_decode_unknown_type() {
        assert_eq!(
            Goal::from_record("Weekly|name|desc|5"),
            Err(RecordError::UnknownType("Weekly".to_string()))
        );
        assert!(matches!(
            Goal::from_record(""),
            Err(RecordError::UnknownType(_))
        ));
    }

    #[test]
    fn test_decode_wrong_field_count() {
        assert_eq!(
            Goal::from_record("Eternal|Pray|daily|25|extra"),
            Err(RecordError::FieldCount {
                tag: "Eternal",
                expected: 4,
                found: 5,
            })
        );
        assert!(matches!(
            Goal::from_record("Checklist|Exercise|gym|50|3|500"),
            Err(RecordError::FieldCount { expected: 7, .. })
        ));
    }

    #[test]
    fn test_decode_invalid_values() {
        assert!(matches!(
            Goal::from_record("Eternal|Pray|daily|lots"),
            Err(RecordError::InvalidValue { field: "points", .. })
        ));
        assert!(matches!(
            Goal::from_record("Simple|Run|5k|20|yes"),
            Err(RecordError::InvalidValue { field: "completed", .. })
        ));
        assert!(matches!(
            Goal::from_record("Checklist|Exercise|gym|50|-3|500|0"),
            Err(RecordError::InvalidValue { field: "target count", .. })
        ));
        assert_eq!(
            Goal::from_record("Eternal||daily|25"),
            Err(RecordError::EmptyName)
        );
    }

    #[test]
    fn test_decode_rejects_inconsistent_checklist() {
        assert_eq!(
            Goal::from_record("Checklist|Exercise|gym|50|0|500|0"),
            Err(RecordError::ZeroTarget)
        );
        assert_eq!(
            Goal::from_record("Checklist|Exercise|gym|50|3|500|4"),
            Err(RecordError::CountExceedsTarget {
                completed: 4,
                target: 3,
            })
        );
    }
}
