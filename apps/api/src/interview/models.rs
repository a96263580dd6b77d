// Interview data model.
//
// Every entity is built fresh per request from caller-supplied JSON plus at most one
// model response. Entities parsed from model output go through `from_model_output`,
// which applies the defaulting rules; entities echoed back by the caller use serde.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::interview::rounds::{RoundDefinition, RoundTable};

pub const MAX_SKILLS: usize = 10;
pub const MAX_TOP_SKILLS: usize = 3;
pub const MAX_HIGHLIGHTS: usize = 3;
const DEFAULT_FIELD: &str = "General";

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Unrecognized labels fall back to `MidLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ExperienceLevel {
    Fresher,
    Junior,
    #[default]
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Senior,
    Expert,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Fresher => "Fresher",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-Level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Expert => "Expert",
        }
    }
}

impl From<String> for ExperienceLevel {
    fn from(raw: String) -> Self {
        match normalize_label(&raw).as_str() {
            "fresher" | "entry" | "entrylevel" | "intern" | "graduate" => ExperienceLevel::Fresher,
            "junior" => ExperienceLevel::Junior,
            "senior" | "lead" => ExperienceLevel::Senior,
            "expert" | "staff" | "principal" => ExperienceLevel::Expert,
            _ => ExperienceLevel::MidLevel,
        }
    }
}

/// Unrecognized styles fall back to `Mixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum InterviewStyle {
    Technical,
    Behavioral,
    #[default]
    Mixed,
}

impl From<String> for InterviewStyle {
    fn from(raw: String) -> Self {
        match normalize_label(&raw).as_str() {
            "technical" => InterviewStyle::Technical,
            "behavioral" | "behavioural" => InterviewStyle::Behavioral,
            _ => InterviewStyle::Mixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerVerdict {
    Strong,
    Adequate,
    Weak,
}

impl AnswerVerdict {
    fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "strong" => Some(AnswerVerdict::Strong),
            "adequate" => Some(AnswerVerdict::Adequate),
            "weak" => Some(AnswerVerdict::Weak),
            _ => None,
        }
    }

    /// Verdict implied by a score when the model omits or garbles the label.
    pub fn from_score(score: u8) -> Self {
        match score {
            8..=u8::MAX => AnswerVerdict::Strong,
            5..=7 => AnswerVerdict::Adequate,
            _ => AnswerVerdict::Weak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HiringVerdict {
    Hire,
    Consider,
    Reject,
}

impl HiringVerdict {
    fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "hire" => Some(HiringVerdict::Hire),
            "consider" => Some(HiringVerdict::Consider),
            "reject" => Some(HiringVerdict::Reject),
            _ => None,
        }
    }
}

/// Position in the interview flow. The service keeps no session, so this is
/// reported back to the caller with every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStage {
    ProfileReady,
    QuestionsReady,
    Evaluating,
    AllRoundsComplete,
    ReportReady,
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate profile
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default)]
    pub interview_id: Option<Uuid>,
    pub name: String,
    pub role: String,
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub top_skills: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub interview_style: InterviewStyle,
    #[serde(default)]
    pub summary: String,
    /// Round ordinal → theme the questions of that round should explore.
    #[serde(default)]
    pub round_themes: BTreeMap<u32, String>,
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

impl CandidateProfile {
    /// Builds a profile from the analysis response. `name` and `role` are required;
    /// every other field degrades to its default.
    ///
    /// Themes are read from `round{N}Theme` keys, or from a `roundThemes` object.
    pub fn from_model_output(map: &Map<String, Value>, rounds: &RoundTable) -> Result<Self, String> {
        let name = required_text(map, "name")?;
        let role = required_text(map, "role")?;

        let nested_themes = map.get("roundThemes").and_then(Value::as_object);
        let round_themes = rounds
            .rounds()
            .iter()
            .filter_map(|round| {
                let key = format!("round{}Theme", round.ordinal);
                map.get(&key)
                    .or_else(|| nested_themes.and_then(|t| t.get(&round.ordinal.to_string())))
                    .map(text_value)
                    .filter(|theme| !theme.is_empty())
                    .map(|theme| (round.ordinal, theme))
            })
            .collect();

        Ok(CandidateProfile {
            interview_id: None,
            name,
            role,
            field: optional_text(map, "field").unwrap_or_else(default_field),
            experience_level: optional_text(map, "experienceLevel")
                .map(ExperienceLevel::from)
                .unwrap_or_default(),
            skills: capped_list(map.get("skills"), MAX_SKILLS),
            top_skills: capped_list(map.get("topSkills"), MAX_TOP_SKILLS),
            highlights: capped_list(map.get("highlights"), MAX_HIGHLIGHTS),
            interview_style: optional_text(map, "interviewStyle")
                .map(InterviewStyle::from)
                .unwrap_or_default(),
            summary: optional_text(map, "summary").unwrap_or_default(),
            round_themes,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Question set
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    pub round: RoundDefinition,
    pub total_rounds: usize,
    pub questions: Vec<String>,
    pub stage: InterviewStage,
}

// ────────────────────────────────────────────────────────────────────────────
// Answer evaluation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
    pub score: u8,
    pub verdict: AnswerVerdict,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement: String,
    pub highlight: String,
    pub round_threshold: f64,
    pub passed_this_question: bool,
}

impl AnswerEvaluation {
    /// Builds an evaluation from the scoring response. `score` is required.
    pub fn from_model_output(map: &Map<String, Value>, round: &RoundDefinition) -> Result<Self, String> {
        let score = map
            .get("score")
            .and_then(parse_score)
            .ok_or_else(|| "response has no numeric 'score' field".to_string())?;

        let verdict = map
            .get("verdict")
            .and_then(Value::as_str)
            .and_then(AnswerVerdict::from_label)
            .unwrap_or_else(|| AnswerVerdict::from_score(score));

        Ok(AnswerEvaluation {
            score,
            verdict,
            strengths: string_list(map.get("strengths")),
            weaknesses: string_list(map.get("weaknesses")),
            improvement: optional_text(map, "improvement").unwrap_or_default(),
            highlight: optional_text(map, "highlight").unwrap_or_default(),
            round_threshold: round.pass_threshold,
            passed_this_question: crate::interview::scoring::question_passed(
                f64::from(score),
                round.pass_threshold,
            ),
        })
    }
}

/// Accepts integers, floats and numeric strings ("7", "7.5", "7/10"); rounds and
/// clamps to 0..=10.
pub fn parse_score(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.split('/').next()?.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 10.0) as u8)
}

// ────────────────────────────────────────────────────────────────────────────
// Round result
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdownEntry {
    pub question_number: usize,
    pub question: String,
    pub score: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub round_number: u32,
    #[serde(default)]
    pub round_name: String,
    pub average_score: f64,
    #[serde(default)]
    pub pass_threshold: f64,
    pub round_passed: bool,
    #[serde(default)]
    pub can_proceed: bool,
    #[serde(default)]
    pub next_round: Option<u32>,
    #[serde(default = "default_next_stage")]
    pub next_stage: InterviewStage,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub score_breakdown: Vec<ScoreBreakdownEntry>,
}

fn default_next_stage() -> InterviewStage {
    InterviewStage::AllRoundsComplete
}

// ────────────────────────────────────────────────────────────────────────────
// Final report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub interview_id: Option<Uuid>,
    pub candidate_name: String,
    pub role: String,
    pub overall_verdict: HiringVerdict,
    pub overall_score: f64,
    pub rounds_passed: usize,
    pub total_rounds: usize,
    pub all_passed: bool,
    pub top_strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub recommendation: String,
    pub next_steps: String,
    pub stage: InterviewStage,
    pub generated_at: DateTime<Utc>,
}

/// The qualitative half of the final report, as written by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportNarrative {
    pub verdict: Option<HiringVerdict>,
    pub top_strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub recommendation: String,
    pub next_steps: String,
}

impl ReportNarrative {
    /// Any numeric fields in the response are ignored; they are computed locally.
    pub fn from_model_output(map: &Map<String, Value>) -> Self {
        ReportNarrative {
            verdict: map
                .get("overallVerdict")
                .or_else(|| map.get("verdict"))
                .and_then(Value::as_str)
                .and_then(HiringVerdict::from_label),
            top_strengths: string_list(map.get("topStrengths")),
            areas_to_improve: string_list(map.get("areasToImprove")),
            recommendation: optional_text(map, "recommendation").unwrap_or_default(),
            next_steps: optional_text(map, "nextSteps").unwrap_or_default(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field helpers
// ────────────────────────────────────────────────────────────────────────────

fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Strings are trimmed; arrays of strings are joined with spaces.
fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

fn optional_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).map(text_value).filter(|s| !s.is_empty())
}

fn required_text(map: &Map<String, Value>, key: &str) -> Result<String, String> {
    optional_text(map, key).ok_or_else(|| format!("response is missing required field '{key}'"))
}

/// Normalizes a list field: arrays keep their non-empty strings, a bare string
/// becomes a one-element list, anything else is empty.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn capped_list(value: Option<&Value>, cap: usize) -> Vec<String> {
    let mut items = string_list(value);
    items.truncate(cap);
    items
}
