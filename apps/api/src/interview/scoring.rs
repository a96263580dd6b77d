// Deterministic round and report aggregates. Pure functions of their inputs.

use serde::Serialize;

use crate::interview::models::{HiringVerdict, RoundResult};
use crate::interview::rounds::{RoundDefinition, RoundTable};

/// Rounds to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean rounded to one decimal. `None` for an empty slice.
pub fn average_score(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().sum();
    Some(round_to_tenth(sum / scores.len() as f64))
}

/// A score exactly at the threshold passes.
pub fn question_passed(score: f64, pass_threshold: f64) -> bool {
    score >= pass_threshold
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundOutcome {
    pub average_score: f64,
    pub round_passed: bool,
    pub is_last_round: bool,
    pub can_proceed: bool,
    pub next_round: Option<u32>,
}

/// `None` when `scores` is empty.
pub fn compute_round_outcome(
    round: &RoundDefinition,
    table: &RoundTable,
    scores: &[f64],
) -> Option<RoundOutcome> {
    let average_score = average_score(scores)?;
    let round_passed = average_score >= round.pass_threshold;
    let is_last_round = table.is_last(round.ordinal);
    let can_proceed = round_passed && !is_last_round;

    Some(RoundOutcome {
        average_score,
        round_passed,
        is_last_round,
        can_proceed,
        next_round: can_proceed.then_some(round.ordinal + 1),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAggregates {
    pub overall_score: f64,
    pub rounds_passed: usize,
    pub total_rounds: usize,
    pub all_passed: bool,
}

impl FinalAggregates {
    /// Verdict used when the model does not supply a recognizable one.
    pub fn default_verdict(&self) -> HiringVerdict {
        if self.all_passed {
            HiringVerdict::Hire
        } else if self.rounds_passed > 0 {
            HiringVerdict::Consider
        } else {
            HiringVerdict::Reject
        }
    }
}

/// `None` when no rounds were supplied.
pub fn compute_final_aggregates(rounds: &[RoundResult]) -> Option<FinalAggregates> {
    let averages: Vec<f64> = rounds.iter().map(|r| r.average_score).collect();
    let overall_score = average_score(&averages)?;
    let rounds_passed = rounds.iter().filter(|r| r.round_passed).count();

    Some(FinalAggregates {
        overall_score,
        rounds_passed,
        total_rounds: rounds.len(),
        all_passed: rounds_passed == rounds.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::InterviewStage;

    fn round_result(ordinal: u32, average: f64, passed: bool) -> RoundResult {
        RoundResult {
            round_number: ordinal,
            round_name: String::new(),
            average_score: average,
            pass_threshold: 7.0,
            round_passed: passed,
            can_proceed: false,
            next_round: None,
            next_stage: InterviewStage::AllRoundsComplete,
            feedback: String::new(),
            score_breakdown: Vec::new(),
        }
    }

    #[test]
    fn test_average_is_mean_rounded_to_tenth() {
        assert_eq!(average_score(&[6.0, 7.0, 8.0, 7.0, 6.0]), Some(6.8));
        assert_eq!(average_score(&[7.0, 8.0, 7.0, 9.0, 7.0]), Some(7.6));
        assert_eq!(average_score(&[7.0, 8.0, 8.0]), Some(7.7));
        assert_eq!(average_score(&[10.0]), Some(10.0));
    }

    #[test]
    fn test_average_of_empty_is_none() {
        assert_eq!(average_score(&[]), None);
    }

    #[test]
    fn test_question_passed_boundaries() {
        let threshold = 7.0;
        for score in 0..=10u8 {
            assert_eq!(
                question_passed(f64::from(score), threshold),
                score >= 7,
                "score {score}"
            );
        }
    }

    #[test]
    fn test_round_two_below_threshold_stops() {
        let table = RoundTable::reference();
        let round = table.get(2).unwrap();
        let outcome =
            compute_round_outcome(round, &table, &[6.0, 7.0, 8.0, 7.0, 6.0]).unwrap();

        assert_eq!(outcome.average_score, 6.8);
        assert!(!outcome.round_passed);
        assert!(!outcome.can_proceed);
        assert_eq!(outcome.next_round, None);
    }

    #[test]
    fn test_round_two_above_threshold_proceeds_to_three() {
        let table = RoundTable::reference();
        let round = table.get(2).unwrap();
        let outcome =
            compute_round_outcome(round, &table, &[7.0, 8.0, 7.0, 9.0, 7.0]).unwrap();

        assert_eq!(outcome.average_score, 7.6);
        assert!(outcome.round_passed);
        assert!(!outcome.is_last_round);
        assert!(outcome.can_proceed);
        assert_eq!(outcome.next_round, Some(3));
    }

    #[test]
    fn test_average_equal_to_threshold_passes() {
        let table = RoundTable::reference();
        let round = table.get(2).unwrap();
        let outcome = compute_round_outcome(round, &table, &[7.0, 7.0, 7.0]).unwrap();
        assert!(outcome.round_passed);
        assert_eq!(outcome.next_round, Some(3));
    }

    #[test]
    fn test_last_round_never_proceeds() {
        let table = RoundTable::reference();
        let round = table.get(3).unwrap();
        let outcome = compute_round_outcome(round, &table, &[10.0, 9.0, 10.0]).unwrap();
        assert!(outcome.round_passed);
        assert!(outcome.is_last_round);
        assert!(!outcome.can_proceed);
        assert_eq!(outcome.next_round, None);
    }

    #[test]
    fn test_round_outcome_of_empty_scores_is_none() {
        let table = RoundTable::reference();
        assert!(compute_round_outcome(table.get(1).unwrap(), &table, &[]).is_none());
    }

    #[test]
    fn test_final_aggregates_all_passed() {
        let rounds = vec![
            round_result(1, 8.0, true),
            round_result(2, 7.0, true),
            round_result(3, 9.0, true),
        ];
        let agg = compute_final_aggregates(&rounds).unwrap();
        assert_eq!(agg.overall_score, 8.0);
        assert_eq!(agg.rounds_passed, 3);
        assert_eq!(agg.total_rounds, 3);
        assert!(agg.all_passed);
        assert_eq!(agg.default_verdict(), HiringVerdict::Hire);
    }

    #[test]
    fn test_final_aggregates_partial() {
        let rounds = vec![round_result(1, 7.5, true), round_result(2, 6.3, false)];
        let agg = compute_final_aggregates(&rounds).unwrap();
        assert_eq!(agg.rounds_passed, 1);
        assert!(!agg.all_passed);
        assert_eq!(agg.overall_score, 6.9);
        assert_eq!(agg.default_verdict(), HiringVerdict::Consider);
    }

    #[test]
    fn test_final_aggregates_none_passed_rejects() {
        let agg = compute_final_aggregates(&[round_result(1, 3.0, false)]).unwrap();
        assert_eq!(agg.default_verdict(), HiringVerdict::Reject);
    }

    #[test]
    fn test_final_aggregates_of_empty_is_none() {
        assert!(compute_final_aggregates(&[]).is_none());
    }
}
