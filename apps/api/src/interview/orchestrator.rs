// Interview orchestrator. Drives a candidate through the interview rounds.
//
// Flow: analyze → generate_questions → evaluate_answer (×N) → submit_round →
//       (generate_questions for the next round | final_report).
//
// No session is kept here. Every call receives the full state the caller has
// accumulated and returns the next fragment; structural values (averages,
// thresholds, progression) are pure functions of the inputs. Each call makes at
// most one completion request, and no call is retried.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::interview::models::{
    AnswerEvaluation, CandidateProfile, FinalReport, InterviewStage, QuestionSet,
    ReportNarrative, RoundResult, ScoreBreakdownEntry,
};
use crate::interview::prompts::{
    build_evaluation_prompt, build_final_report_prompt, build_profile_prompt,
    build_questions_prompt, build_round_summary_prompt, Rubric, TranscriptEntry,
    QUESTIONS_PER_ROUND,
};
use crate::interview::rounds::{RoundDefinition, RoundTable};
use crate::interview::scoring::{
    compute_final_aggregates, compute_round_outcome, question_passed,
};
use crate::llm_client::response::{extract_json_object, extract_numbered_list};
use crate::llm_client::{CompletionGateway, LlmError};

const PROFILE_MAX_TOKENS: u32 = 1500;
const QUESTIONS_MAX_TOKENS: u32 = 1000;
const EVALUATION_MAX_TOKENS: u32 = 600;
const ROUND_SUMMARY_MAX_TOKENS: u32 = 400;
const FINAL_REPORT_MAX_TOKENS: u32 = 800;

const STAGE_ANALYZE: &str = "analyze the resume";
const STAGE_QUESTIONS: &str = "generate questions";
const STAGE_EVALUATE: &str = "evaluate the answer";
const STAGE_SUMMARY: &str = "summarize the round";
const STAGE_REPORT: &str = "write the final report";

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Round {0} is not configured")]
    InvalidRound(u32),

    #[error("Cannot score a round with no scores")]
    EmptyScoreSet,

    #[error("Failed to extract candidate profile: {0}")]
    ProfileExtraction(String),

    #[error("Failed to {stage}: model response could not be parsed ({reason})")]
    UnparsableResponse { stage: &'static str, reason: String },

    #[error("Failed to {stage}: {source}")]
    Gateway {
        stage: &'static str,
        source: LlmError,
    },
}

/// Everything the caller has collected for one round.
#[derive(Debug, Clone)]
pub struct RoundSubmission {
    pub profile: CandidateProfile,
    pub round: u32,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    pub scores: Vec<f64>,
}

#[derive(Clone)]
pub struct Interviewer {
    gateway: Arc<dyn CompletionGateway>,
    rounds: Arc<RoundTable>,
    rubric: Rubric,
}

impl Interviewer {
    pub fn new(gateway: Arc<dyn CompletionGateway>, rounds: Arc<RoundTable>, rubric: Rubric) -> Self {
        Self {
            gateway,
            rounds,
            rubric,
        }
    }

    pub fn rounds(&self) -> &RoundTable {
        &self.rounds
    }

    fn round(&self, ordinal: u32) -> Result<&RoundDefinition, InterviewError> {
        self.rounds
            .get(ordinal)
            .ok_or(InterviewError::InvalidRound(ordinal))
    }

    async fn complete(
        &self,
        stage: &'static str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, InterviewError> {
        self.gateway
            .complete(prompt, max_tokens)
            .await
            .map_err(|source| {
                warn!("Completion failed while trying to {stage}: {source}");
                InterviewError::Gateway { stage, source }
            })
    }

    /// AwaitingResume → ProfileReady.
    pub async fn analyze(&self, resume_text: &str) -> Result<CandidateProfile, InterviewError> {
        if resume_text.trim().is_empty() {
            return Err(InterviewError::InvalidInput(
                "resume text cannot be empty".to_string(),
            ));
        }

        let prompt = build_profile_prompt(resume_text, &self.rounds);
        let response = self
            .complete(STAGE_ANALYZE, &prompt, PROFILE_MAX_TOKENS)
            .await?;

        let map = extract_json_object(&response)
            .map_err(|e| InterviewError::ProfileExtraction(e.to_string()))?;
        let mut profile = CandidateProfile::from_model_output(&map, &self.rounds)
            .map_err(InterviewError::ProfileExtraction)?;
        profile.interview_id = Some(Uuid::new_v4());

        info!(
            "Profile ready: interview={:?}, role={}, level={}, themes={}/{}",
            profile.interview_id,
            profile.role,
            profile.experience_level.label(),
            profile.round_themes.len(),
            self.rounds.len()
        );
        Ok(profile)
    }

    /// ProfileReady | RoundComplete → QuestionsReady(round).
    pub async fn generate_questions(
        &self,
        profile: &CandidateProfile,
        ordinal: u32,
    ) -> Result<QuestionSet, InterviewError> {
        let round = self.round(ordinal)?;

        let prompt = build_questions_prompt(profile, round, self.rounds.len());
        let response = self
            .complete(STAGE_QUESTIONS, &prompt, QUESTIONS_MAX_TOKENS)
            .await?;

        let questions = extract_numbered_list(&response);
        if questions.is_empty() {
            return Err(InterviewError::UnparsableResponse {
                stage: STAGE_QUESTIONS,
                reason: "no questions found in model output".to_string(),
            });
        }
        // Fewer than requested is accepted as-is; the caller sees the shorter list.
        if questions.len() < QUESTIONS_PER_ROUND {
            warn!(
                "Round {} produced {} of {} questions for interview {:?}",
                ordinal,
                questions.len(),
                QUESTIONS_PER_ROUND,
                profile.interview_id
            );
        }

        info!(
            "Questions ready: interview={:?}, round={} ({}), count={}",
            profile.interview_id,
            ordinal,
            round.name,
            questions.len()
        );

        Ok(QuestionSet {
            round: round.clone(),
            total_rounds: self.rounds.len(),
            questions,
            stage: InterviewStage::QuestionsReady,
        })
    }

    /// Scores one answer. Stateless; the caller invokes it once per question.
    pub async fn evaluate_answer(
        &self,
        profile: &CandidateProfile,
        ordinal: u32,
        question: &str,
        answer: &str,
    ) -> Result<AnswerEvaluation, InterviewError> {
        if question.trim().is_empty() {
            return Err(InterviewError::InvalidInput(
                "question cannot be empty".to_string(),
            ));
        }
        if answer.trim().is_empty() {
            return Err(InterviewError::InvalidInput(
                "answer cannot be empty".to_string(),
            ));
        }
        let round = self.round(ordinal)?;

        let prompt = build_evaluation_prompt(question, answer, profile, round, self.rubric);
        let response = self
            .complete(STAGE_EVALUATE, &prompt, EVALUATION_MAX_TOKENS)
            .await?;

        let map = extract_json_object(&response).map_err(|e| {
            InterviewError::UnparsableResponse {
                stage: STAGE_EVALUATE,
                reason: e.to_string(),
            }
        })?;
        let evaluation = AnswerEvaluation::from_model_output(&map, round).map_err(|reason| {
            InterviewError::UnparsableResponse {
                stage: STAGE_EVALUATE,
                reason,
            }
        })?;

        info!(
            "Answer evaluated: interview={:?}, round={}, score={}, passed={}",
            profile.interview_id, ordinal, evaluation.score, evaluation.passed_this_question
        );
        Ok(evaluation)
    }

    /// Evaluating(round) → QuestionsReady(round + 1) | AllRoundsComplete.
    ///
    /// Input is validated before the model is called; the model only writes the
    /// narrative feedback.
    pub async fn submit_round(
        &self,
        submission: &RoundSubmission,
    ) -> Result<RoundResult, InterviewError> {
        let round = self.round(submission.round)?;
        validate_submission(submission)?;

        let outcome = compute_round_outcome(round, &self.rounds, &submission.scores)
            .ok_or(InterviewError::EmptyScoreSet)?;

        let transcript: Vec<TranscriptEntry<'_>> = submission
            .questions
            .iter()
            .zip(&submission.answers)
            .zip(&submission.scores)
            .map(|((question, answer), score)| TranscriptEntry {
                question,
                answer,
                score: *score,
            })
            .collect();

        let prompt = build_round_summary_prompt(
            &submission.profile,
            round,
            &transcript,
            outcome.average_score,
            outcome.round_passed,
        );
        let feedback = self
            .complete(STAGE_SUMMARY, &prompt, ROUND_SUMMARY_MAX_TOKENS)
            .await?
            .trim()
            .to_string();

        let score_breakdown = submission
            .questions
            .iter()
            .zip(&submission.scores)
            .enumerate()
            .map(|(i, (question, score))| ScoreBreakdownEntry {
                question_number: i + 1,
                question: question.clone(),
                score: *score,
                passed: question_passed(*score, round.pass_threshold),
            })
            .collect();

        let next_stage = if outcome.can_proceed {
            InterviewStage::QuestionsReady
        } else {
            InterviewStage::AllRoundsComplete
        };

        info!(
            "Round complete: interview={:?}, round={}, average={}, passed={}, last={}, next={:?}",
            submission.profile.interview_id,
            round.ordinal,
            outcome.average_score,
            outcome.round_passed,
            outcome.is_last_round,
            outcome.next_round
        );

        Ok(RoundResult {
            round_number: round.ordinal,
            round_name: round.name.clone(),
            average_score: outcome.average_score,
            pass_threshold: round.pass_threshold,
            round_passed: outcome.round_passed,
            can_proceed: outcome.can_proceed,
            next_round: outcome.next_round,
            next_stage,
            feedback,
            score_breakdown,
        })
    }

    /// AllRoundsComplete → ReportReady.
    ///
    /// Numeric fields are computed here and injected into the prompt; whatever the
    /// model writes for them is discarded.
    pub async fn final_report(
        &self,
        profile: &CandidateProfile,
        rounds: &[RoundResult],
    ) -> Result<FinalReport, InterviewError> {
        let aggregates = compute_final_aggregates(rounds).ok_or_else(|| {
            InterviewError::InvalidInput("at least one round result is required".to_string())
        })?;

        let prompt = build_final_report_prompt(profile, rounds, &aggregates);
        let response = self
            .complete(STAGE_REPORT, &prompt, FINAL_REPORT_MAX_TOKENS)
            .await?;

        let map = extract_json_object(&response).map_err(|e| {
            InterviewError::UnparsableResponse {
                stage: STAGE_REPORT,
                reason: e.to_string(),
            }
        })?;
        let narrative = ReportNarrative::from_model_output(&map);
        let overall_verdict = narrative
            .verdict
            .unwrap_or_else(|| aggregates.default_verdict());

        info!(
            "Final report: interview={:?}, verdict={:?}, overall={}, passed={}/{}",
            profile.interview_id,
            overall_verdict,
            aggregates.overall_score,
            aggregates.rounds_passed,
            aggregates.total_rounds
        );

        Ok(FinalReport {
            interview_id: profile.interview_id,
            candidate_name: profile.name.clone(),
            role: profile.role.clone(),
            overall_verdict,
            overall_score: aggregates.overall_score,
            rounds_passed: aggregates.rounds_passed,
            total_rounds: aggregates.total_rounds,
            all_passed: aggregates.all_passed,
            top_strengths: narrative.top_strengths,
            areas_to_improve: narrative.areas_to_improve,
            recommendation: narrative.recommendation,
            next_steps: narrative.next_steps,
            stage: InterviewStage::ReportReady,
            generated_at: Utc::now(),
        })
    }
}

fn validate_submission(submission: &RoundSubmission) -> Result<(), InterviewError> {
    if submission.scores.is_empty() {
        return Err(InterviewError::EmptyScoreSet);
    }
    let count = submission.scores.len();
    if submission.questions.len() != count || submission.answers.len() != count {
        return Err(InterviewError::InvalidInput(format!(
            "questions ({}), answers ({}) and scores ({}) must have the same length",
            submission.questions.len(),
            submission.answers.len(),
            count
        )));
    }
    if let Some(bad) = submission
        .scores
        .iter()
        .find(|s| !s.is_finite() || !(0.0..=10.0).contains(*s))
    {
        return Err(InterviewError::InvalidInput(format!(
            "score {bad} is outside the 0-10 range"
        )));
    }
    Ok(())
}
