// Axum route handlers for the Interview API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::models::{
    AnswerEvaluation, CandidateProfile, FinalReport, InterviewStage, QuestionSet, RoundResult,
};
use crate::interview::orchestrator::RoundSubmission;
use crate::interview::resume_text::{extract_resume_text, is_pdf_upload, ResumeTextError};
use crate::interview::rounds::RoundDefinition;
use crate::state::AppState;

/// Multipart field carrying the résumé PDF.
const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub profile: CandidateProfile,
    pub total_rounds: usize,
    pub stage: InterviewStage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    pub profile: CandidateProfile,
    pub round: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateAnswerRequest {
    pub profile: CandidateProfile,
    pub round: u32,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateAnswerResponse {
    #[serde(flatten)]
    pub evaluation: AnswerEvaluation,
    pub stage: InterviewStage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRoundRequest {
    pub profile: CandidateProfile,
    pub round: u32,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub scores: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReportRequest {
    pub profile: CandidateProfile,
    #[serde(default)]
    pub round_results: Vec<RoundResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundsResponse {
    pub rounds: Vec<RoundDefinition>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-resume
///
/// Multipart upload with a `resume` PDF field. Text is extracted before any model
/// call; extraction failures never reach the model.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        if !is_pdf_upload(field.file_name(), field.content_type()) {
            return Err(AppError::Validation(
                "Only PDF resumes are supported".to_string(),
            ));
        }
        upload = Some(field.bytes().await?);
        break;
    }

    let data = upload.ok_or_else(|| {
        AppError::Validation(format!("Missing '{RESUME_FIELD}' file in upload"))
    })?;
    info!("Received resume upload ({} bytes)", data.len());

    let resume_text = extract_resume_text(data).await.map_err(|e| {
        warn!("Resume extraction failed: {e}");
        match e {
            ResumeTextError::TempFile(io) => AppError::Internal(io.into()),
            other => AppError::Extraction(other.to_string()),
        }
    })?;

    let profile = state.interviewer.analyze(&resume_text).await?;

    Ok(Json(AnalyzeResponse {
        profile,
        total_rounds: state.interviewer.rounds().len(),
        stage: InterviewStage::ProfileReady,
    }))
}

/// POST /api/generate-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<QuestionSet>, AppError> {
    let questions = state
        .interviewer
        .generate_questions(&request.profile, request.round)
        .await?;
    Ok(Json(questions))
}

/// POST /api/evaluate-answer
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Json(request): Json<EvaluateAnswerRequest>,
) -> Result<Json<EvaluateAnswerResponse>, AppError> {
    let evaluation = state
        .interviewer
        .evaluate_answer(
            &request.profile,
            request.round,
            &request.question,
            &request.answer,
        )
        .await?;
    Ok(Json(EvaluateAnswerResponse {
        evaluation,
        stage: InterviewStage::Evaluating,
    }))
}

/// POST /api/submit-round
pub async fn handle_submit_round(
    State(state): State<AppState>,
    Json(request): Json<SubmitRoundRequest>,
) -> Result<Json<RoundResult>, AppError> {
    let submission = RoundSubmission {
        profile: request.profile,
        round: request.round,
        questions: request.questions,
        answers: request.answers,
        scores: request.scores,
    };
    let result = state.interviewer.submit_round(&submission).await?;
    Ok(Json(result))
}

/// POST /api/final-report
pub async fn handle_final_report(
    State(state): State<AppState>,
    Json(request): Json<FinalReportRequest>,
) -> Result<Json<FinalReport>, AppError> {
    let report = state
        .interviewer
        .final_report(&request.profile, &request.round_results)
        .await?;
    Ok(Json(report))
}

/// GET /api/rounds
pub async fn handle_list_rounds(State(state): State<AppState>) -> Json<RoundsResponse> {
    Json(RoundsResponse {
        rounds: state.interviewer.rounds().rounds().to_vec(),
    })
}
