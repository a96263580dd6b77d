// Round configuration table.
//
// Built once at startup (reference table or `ROUNDS_CONFIG` JSON file), then shared
// read-only through `Arc<RoundTable>`. Never mutated at runtime.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDefinition {
    pub ordinal: u32,
    pub name: String,
    pub difficulty: String,
    /// Minimum average score (0–10) needed to pass the round.
    pub pass_threshold: f64,
    pub focus: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum RoundTableError {
    #[error("round table must contain at least one round")]
    Empty,

    #[error("round ordinals must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },

    #[error("round {ordinal} has pass threshold {threshold}, expected a value within 0..=10")]
    ThresholdOutOfRange { ordinal: u32, threshold: f64 },
}

#[derive(Debug, Clone)]
pub struct RoundTable {
    rounds: Vec<RoundDefinition>,
}

impl RoundTable {
    /// Validates and orders the rounds. Ordinals must run 1..=N with no gaps.
    pub fn new(mut rounds: Vec<RoundDefinition>) -> Result<Self, RoundTableError> {
        if rounds.is_empty() {
            return Err(RoundTableError::Empty);
        }
        rounds.sort_by_key(|r| r.ordinal);

        for (expected, round) in (1u32..).zip(&rounds) {
            if round.ordinal != expected {
                return Err(RoundTableError::NonContiguous {
                    expected,
                    found: round.ordinal,
                });
            }
            if !(0.0..=10.0).contains(&round.pass_threshold) {
                return Err(RoundTableError::ThresholdOutOfRange {
                    ordinal: round.ordinal,
                    threshold: round.pass_threshold,
                });
            }
        }

        for pair in rounds.windows(2) {
            if pair[1].pass_threshold < pair[0].pass_threshold {
                warn!(
                    "Round {} threshold {} is lower than round {} threshold {}",
                    pair[1].ordinal, pair[1].pass_threshold, pair[0].ordinal, pair[0].pass_threshold
                );
            }
        }

        Ok(Self { rounds })
    }

    /// Foundation → Application → Strategy, with rising thresholds.
    pub fn reference() -> Self {
        Self {
            rounds: vec![
                RoundDefinition {
                    ordinal: 1,
                    name: "Foundation".to_string(),
                    difficulty: "Easy".to_string(),
                    pass_threshold: 6.0,
                    focus: "core concepts, fundamentals and the work listed on the resume"
                        .to_string(),
                },
                RoundDefinition {
                    ordinal: 2,
                    name: "Application".to_string(),
                    difficulty: "Medium".to_string(),
                    pass_threshold: 7.0,
                    focus: "applying skills to realistic scenarios, problem solving and past decisions"
                        .to_string(),
                },
                RoundDefinition {
                    ordinal: 3,
                    name: "Strategy".to_string(),
                    difficulty: "Hard".to_string(),
                    pass_threshold: 8.0,
                    focus: "system-level thinking, trade-offs, leadership and long-term impact"
                        .to_string(),
                },
            ],
        }
    }

    /// Loads a JSON array of round definitions.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read round config {}", path.display()))?;
        let rounds: Vec<RoundDefinition> = serde_json::from_str(&raw)
            .with_context(|| format!("Round config {} is not valid JSON", path.display()))?;
        Self::new(rounds).with_context(|| format!("Round config {} is invalid", path.display()))
    }

    pub fn get(&self, ordinal: u32) -> Option<&RoundDefinition> {
        ordinal
            .checked_sub(1)
            .and_then(|idx| self.rounds.get(idx as usize))
    }

    pub fn rounds(&self) -> &[RoundDefinition] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn max_ordinal(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn is_last(&self, ordinal: u32) -> bool {
        ordinal == self.max_ordinal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn round(ordinal: u32, threshold: f64) -> RoundDefinition {
        RoundDefinition {
            ordinal,
            name: format!("Round {ordinal}"),
            difficulty: "Medium".to_string(),
            pass_threshold: threshold,
            focus: "anything".to_string(),
        }
    }

    #[test]
    fn test_reference_table_is_valid() {
        let reference = RoundTable::reference();
        let rebuilt = RoundTable::new(reference.rounds().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), 3);
        assert_eq!(rebuilt.get(2).unwrap().pass_threshold, 7.0);
        assert!(rebuilt.is_last(3));
        assert!(!rebuilt.is_last(2));
    }

    #[test]
    fn test_get_rejects_unconfigured_ordinals() {
        let table = RoundTable::reference();
        assert!(table.get(0).is_none());
        assert!(table.get(4).is_none());
        assert_eq!(table.get(1).unwrap().name, "Foundation");
    }

    #[test]
    fn test_new_sorts_by_ordinal() {
        let table = RoundTable::new(vec![round(2, 7.0), round(1, 6.0)]).unwrap();
        assert_eq!(table.rounds()[0].ordinal, 1);
        assert_eq!(table.max_ordinal(), 2);
    }

    #[test]
    fn test_new_rejects_gaps() {
        let err = RoundTable::new(vec![round(1, 6.0), round(3, 8.0)]).unwrap_err();
        assert_eq!(
            err,
            RoundTableError::NonContiguous {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_new_rejects_empty_and_bad_threshold() {
        assert_eq!(RoundTable::new(vec![]).unwrap_err(), RoundTableError::Empty);
        assert!(matches!(
            RoundTable::new(vec![round(1, 11.0)]).unwrap_err(),
            RoundTableError::ThresholdOutOfRange { ordinal: 1, .. }
        ));
    }

    #[test]
    fn test_decreasing_thresholds_are_allowed() {
        assert!(RoundTable::new(vec![round(1, 8.0), round(2, 5.0)]).is_ok());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"ordinal": 1, "name": "Screen", "difficulty": "Easy", "passThreshold": 5, "focus": "basics"}},
                {{"ordinal": 2, "name": "Onsite", "difficulty": "Hard", "passThreshold": 7.5, "focus": "depth"}}
            ]"#
        )
        .unwrap();

        let table = RoundTable::from_json_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(2).unwrap().pass_threshold, 7.5);
    }
}
