// Interview prompt templates.
// All prompts for the interview flow are defined here; builders fill the
// `{placeholders}` and never call the model themselves.

use std::str::FromStr;

use thiserror::Error;

use crate::interview::models::{CandidateProfile, InterviewStyle, RoundResult};
use crate::interview::rounds::{RoundDefinition, RoundTable};
use crate::interview::scoring::FinalAggregates;
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NUMBERED_LIST_INSTRUCTION};

/// Résumé text beyond this many characters is not sent to the model.
pub const MAX_RESUME_PROMPT_CHARS: usize = 6000;
pub const QUESTIONS_PER_ROUND: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Scoring rubric
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rubric {
    #[default]
    Standard,
    Strict,
}

#[derive(Debug, Error)]
#[error("unknown rubric '{0}'")]
pub struct UnknownRubric(String);

impl FromStr for Rubric {
    type Err = UnknownRubric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Rubric::Standard),
            "strict" => Ok(Rubric::Strict),
            other => Err(UnknownRubric(other.to_string())),
        }
    }
}

impl Rubric {
    fn text(&self) -> &'static str {
        match self {
            Rubric::Standard => STANDARD_RUBRIC,
            Rubric::Strict => STRICT_RUBRIC,
        }
    }
}

const STANDARD_RUBRIC: &str = "\
- 0-3: off-topic, incorrect or missing the point of the question
- 4-5: weak; touches the topic but lacks substance or accuracy
- 6-7: decent; correct and relevant with some depth
- 8-9: strong; accurate, specific, well-structured, with concrete examples
- 10: exceptional; expert-level insight beyond what was asked";

const STRICT_RUBRIC: &str = "\
- Gibberish, random characters or no real attempt: score 0
- Off-topic or unrelated to the question: score at most 2
- Related but shows no domain knowledge: score at most 4
- Correct but with no depth, examples or reasoning: score at most 6
- Only answers with real depth and concrete examples score 7 or above
- Do NOT reward length, confidence or buzzwords on their own";

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

/// Replace: {resume_text}, {theme_fields}, {json_only}
const PROFILE_PROMPT_TEMPLATE: &str = r#"You are an expert technical recruiter. Analyze the resume below and build a structured candidate profile for a multi-round mock interview.

RESUME:
{resume_text}

Return a JSON object with EXACTLY these fields:
{
  "name": "candidate full name",
  "role": "most suitable job title for this candidate",
  "field": "industry or domain, e.g. Software, Finance, Healthcare",
  "experienceLevel": "Fresher" | "Junior" | "Mid-Level" | "Senior" | "Expert",
  "skills": ["up to 10 skills, most relevant first"],
  "topSkills": ["the 3 strongest skills"],
  "highlights": ["up to 3 notable achievements or projects"],
  "interviewStyle": "technical" | "behavioral" | "mixed",
  "summary": "2-3 sentence professional summary",
{theme_fields}
}

Each round theme must be a short phrase naming what that round should probe, grounded in the resume.

{json_only}"#;

/// Replace: {round_number}, {total_rounds}, {round_name}, {difficulty}, {focus},
///          {theme}, {style_guidance}, {name}, {role}, {field}, {experience_level},
///          {skills}, {highlights}, {summary}, {question_count}, {list_only}
const QUESTIONS_PROMPT_TEMPLATE: &str = r#"You are interviewing a candidate for the role of {role} ({field}). This is round {round_number} of {total_rounds}: {round_name} (difficulty: {difficulty}).

ROUND FOCUS: {focus}
ROUND THEME: {theme}
INTERVIEW STYLE: {style_guidance}

CANDIDATE PROFILE:
- Name: {name}
- Experience level: {experience_level}
- Skills: {skills}
- Highlights: {highlights}
- Summary: {summary}

Write exactly {question_count} interview questions for this round.

RULES:
1. Every question must reference something specific from the candidate's profile (a skill, project or achievement)
2. Match the difficulty to the round ({difficulty}) and to a {experience_level} candidate
3. Each question must be self-contained and answerable in a few paragraphs
4. Do NOT repeat questions or ask multi-part questionnaires

{list_only}"#;

/// Replace: {role}, {experience_level}, {round_number}, {round_name}, {difficulty},
///          {pass_threshold}, {question}, {answer}, {rubric}, {json_only}
const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are a strict but fair interviewer scoring one answer from a {experience_level} candidate interviewing for {role}. Round {round_number}: {round_name} (difficulty: {difficulty}, pass mark {pass_threshold}/10).

QUESTION:
{question}

CANDIDATE ANSWER:
{answer}

SCORING RUBRIC (integer 0-10):
{rubric}

Return a JSON object with EXACTLY these fields:
{
  "score": 0,
  "verdict": "STRONG" | "ADEQUATE" | "WEAK",
  "strengths": ["what the answer did well"],
  "weaknesses": ["what the answer missed or got wrong"],
  "improvement": "one concrete suggestion to improve this answer",
  "highlight": "the single best point in the answer, or an empty string"
}

{json_only}"#;

/// Replace: {name}, {role}, {round_number}, {round_name}, {average_score},
///          {pass_threshold}, {outcome}, {transcript}
const ROUND_SUMMARY_PROMPT_TEMPLATE: &str = r#"You are an interviewer writing feedback for {name}, a candidate for {role}, after round {round_number} ({round_name}).

Average score: {average_score}/10 (pass mark {pass_threshold}). Outcome: {outcome}.

TRANSCRIPT:
{transcript}

Write a 3-4 sentence summary of the candidate's performance in this round: what went well, what was missing, and what to practise next. Address the candidate directly. Plain text only, no lists, no headings."#;

/// Replace: {name}, {role}, {experience_level}, {round_summaries},
///          {overall_score}, {rounds_passed}, {total_rounds}, {json_only}
const FINAL_REPORT_PROMPT_TEMPLATE: &str = r#"You are a hiring manager writing the final assessment for {name}, a {experience_level} candidate for {role}, after a multi-round mock interview.

ROUND RESULTS:
{round_summaries}

The numbers below are final and already computed. Copy them exactly:
overallScore = {overall_score}, roundsPassed = {rounds_passed}, totalRounds = {total_rounds}

Return a JSON object with EXACTLY these fields:
{
  "overallVerdict": "HIRE" | "CONSIDER" | "REJECT",
  "overallScore": {overall_score},
  "roundsPassed": {rounds_passed},
  "totalRounds": {total_rounds},
  "topStrengths": ["up to 3 strengths shown across rounds"],
  "areasToImprove": ["up to 3 areas to improve"],
  "recommendation": "2-3 sentence hiring recommendation",
  "nextSteps": "concrete next steps for the candidate"
}

{json_only}"#;

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

pub fn build_profile_prompt(resume_text: &str, rounds: &RoundTable) -> String {
    let theme_fields = rounds
        .rounds()
        .iter()
        .map(|r| {
            format!(
                "  \"round{}Theme\": \"theme for round {} ({}: {})\"",
                r.ordinal, r.ordinal, r.name, r.focus
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    PROFILE_PROMPT_TEMPLATE
        .replace("{theme_fields}", &theme_fields)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", truncate_chars(resume_text, MAX_RESUME_PROMPT_CHARS))
}

pub fn build_questions_prompt(
    profile: &CandidateProfile,
    round: &RoundDefinition,
    total_rounds: usize,
) -> String {
    QUESTIONS_PROMPT_TEMPLATE
        .replace("{round_number}", &round.ordinal.to_string())
        .replace("{total_rounds}", &total_rounds.to_string())
        .replace("{round_name}", &round.name)
        .replace("{difficulty}", &round.difficulty)
        .replace("{focus}", &round.focus)
        .replace("{theme}", &round_theme(profile, round))
        .replace("{style_guidance}", style_guidance(profile.interview_style))
        .replace("{question_count}", &QUESTIONS_PER_ROUND.to_string())
        .replace("{list_only}", NUMBERED_LIST_INSTRUCTION)
        .replace("{experience_level}", profile.experience_level.label())
        .replace("{skills}", &join_or_none(&profile.skills))
        .replace("{highlights}", &join_or_none(&profile.highlights))
        .replace("{summary}", or_none(&profile.summary))
        .replace("{field}", &profile.field)
        .replace("{role}", &profile.role)
        .replace("{name}", &profile.name)
}

pub fn build_evaluation_prompt(
    question: &str,
    answer: &str,
    profile: &CandidateProfile,
    round: &RoundDefinition,
    rubric: Rubric,
) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{experience_level}", profile.experience_level.label())
        .replace("{round_number}", &round.ordinal.to_string())
        .replace("{round_name}", &round.name)
        .replace("{difficulty}", &round.difficulty)
        .replace("{pass_threshold}", &round.pass_threshold.to_string())
        .replace("{rubric}", rubric.text())
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{role}", &profile.role)
        .replace("{question}", question.trim())
        .replace("{answer}", answer.trim())
}

/// One `(question, answer, score)` triple per asked question.
pub struct TranscriptEntry<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub score: f64,
}

pub fn build_round_summary_prompt(
    profile: &CandidateProfile,
    round: &RoundDefinition,
    transcript: &[TranscriptEntry<'_>],
    average_score: f64,
    round_passed: bool,
) -> String {
    let transcript = transcript
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "Q{n}: {q}\nA{n}: {a}\nScore: {s}/10",
                n = i + 1,
                q = entry.question.trim(),
                a = entry.answer.trim(),
                s = entry.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let outcome = if round_passed { "PASSED" } else { "NOT PASSED" };

    ROUND_SUMMARY_PROMPT_TEMPLATE
        .replace("{round_number}", &round.ordinal.to_string())
        .replace("{round_name}", &round.name)
        .replace("{average_score}", &average_score.to_string())
        .replace("{pass_threshold}", &round.pass_threshold.to_string())
        .replace("{outcome}", outcome)
        .replace("{role}", &profile.role)
        .replace("{name}", &profile.name)
        .replace("{transcript}", &transcript)
}

pub fn build_final_report_prompt(
    profile: &CandidateProfile,
    rounds: &[RoundResult],
    aggregates: &FinalAggregates,
) -> String {
    let round_summaries = rounds
        .iter()
        .map(|r| {
            let name = if r.round_name.is_empty() {
                format!("Round {}", r.round_number)
            } else {
                format!("Round {} ({})", r.round_number, r.round_name)
            };
            format!(
                "- {name}: average {}/10, {}. Feedback: {}",
                r.average_score,
                if r.round_passed { "passed" } else { "not passed" },
                or_none(&r.feedback)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    FINAL_REPORT_PROMPT_TEMPLATE
        .replace("{experience_level}", profile.experience_level.label())
        .replace("{overall_score}", &aggregates.overall_score.to_string())
        .replace("{rounds_passed}", &aggregates.rounds_passed.to_string())
        .replace("{total_rounds}", &aggregates.total_rounds.to_string())
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{role}", &profile.role)
        .replace("{name}", &profile.name)
        .replace("{round_summaries}", &round_summaries)
}

/// The profile's theme for this round, or a generic one built from the round itself.
pub fn round_theme(profile: &CandidateProfile, round: &RoundDefinition) -> String {
    profile
        .round_themes
        .get(&round.ordinal)
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .unwrap_or_else(|| format!("{} of the candidate's experience as a {}", round.focus, profile.role))
}

pub fn style_guidance(style: InterviewStyle) -> &'static str {
    match style {
        InterviewStyle::Technical => {
            "Technical: ask about tools, implementation details, debugging and design decisions."
        }
        InterviewStyle::Behavioral => {
            "Behavioral: ask about situations, teamwork, conflicts and outcomes (STAR format)."
        }
        InterviewStyle::Mixed => {
            "Mixed: balance technical depth with behavioral questions about past situations."
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "not specified".to_string()
    } else {
        items.join(", ")
    }
}

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "not specified"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::ExperienceLevel;

    fn profile() -> CandidateProfile {
        CandidateProfile {
            interview_id: None,
            name: "Ada Lovelace".to_string(),
            role: "Data Engineer".to_string(),
            field: "Analytics".to_string(),
            experience_level: ExperienceLevel::MidLevel,
            skills: vec!["Python".to_string(), "Airflow".to_string()],
            top_skills: vec!["Python".to_string()],
            highlights: vec!["Built nightly ETL for 2TB".to_string()],
            interview_style: InterviewStyle::Technical,
            summary: String::new(),
            round_themes: [(1, "Pipeline basics".to_string())].into_iter().collect(),
        }
    }

    #[test]
    fn test_profile_prompt_lists_every_round_theme() {
        let prompt = build_profile_prompt("Ada Lovelace\nData Engineer", &RoundTable::reference());
        assert!(prompt.contains("\"round1Theme\""));
        assert!(prompt.contains("\"round3Theme\""));
        assert!(prompt.contains("Ada Lovelace\nData Engineer"));
        assert!(!prompt.contains("{theme_fields}"));
    }

    #[test]
    fn test_profile_prompt_truncates_long_resume() {
        let resume = "é".repeat(MAX_RESUME_PROMPT_CHARS + 100);
        let prompt = build_profile_prompt(&resume, &RoundTable::reference());
        let kept = prompt.matches('é').count();
        assert_eq!(kept, MAX_RESUME_PROMPT_CHARS);
    }

    #[test]
    fn test_questions_prompt_uses_profile_theme() {
        let table = RoundTable::reference();
        let prompt = build_questions_prompt(&profile(), table.get(1).unwrap(), table.len());
        assert!(prompt.contains("ROUND THEME: Pipeline basics"));
        assert!(prompt.contains("round 1 of 3"));
        assert!(prompt.contains("Technical:"));
        assert!(prompt.contains("exactly 5 interview questions"));
        assert!(!prompt.contains("{role}"));
    }

    #[test]
    fn test_round_theme_falls_back_when_missing() {
        let table = RoundTable::reference();
        let theme = round_theme(&profile(), table.get(2).unwrap());
        assert!(theme.contains("Data Engineer"));
        assert!(theme.starts_with("applying skills"));
    }

    #[test]
    fn test_evaluation_prompt_switches_rubric() {
        let table = RoundTable::reference();
        let round = table.get(2).unwrap();
        let standard = build_evaluation_prompt("Q?", "A.", &profile(), round, Rubric::Standard);
        let strict = build_evaluation_prompt("Q?", "A.", &profile(), round, Rubric::Strict);
        assert!(standard.contains("10: exceptional"));
        assert!(strict.contains("Gibberish"));
        assert!(strict.contains("pass mark 7/10"));
    }

    #[test]
    fn test_round_summary_prompt_embeds_every_triple() {
        let table = RoundTable::reference();
        let transcript = vec![
            TranscriptEntry { question: "What is Airflow?", answer: "A scheduler.", score: 6.0 },
            TranscriptEntry { question: "How do you backfill?", answer: "Carefully.", score: 4.0 },
        ];
        let prompt =
            build_round_summary_prompt(&profile(), table.get(1).unwrap(), &transcript, 5.0, false);
        assert!(prompt.contains("Q1: What is Airflow?\nA1: A scheduler.\nScore: 6/10"));
        assert!(prompt.contains("Q2: How do you backfill?"));
        assert!(prompt.contains("NOT PASSED"));
    }

    #[test]
    fn test_final_prompt_injects_computed_numbers() {
        let aggregates = FinalAggregates {
            overall_score: 8.0,
            rounds_passed: 3,
            total_rounds: 3,
            all_passed: true,
        };
        let prompt = build_final_report_prompt(&profile(), &[], &aggregates);
        assert!(prompt.contains("\"overallScore\": 8,"));
        assert!(prompt.contains("roundsPassed = 3"));
    }

    #[test]
    fn test_rubric_from_str() {
        assert_eq!("Strict".parse::<Rubric>().unwrap(), Rubric::Strict);
        assert_eq!(" standard ".parse::<Rubric>().unwrap(), Rubric::Standard);
        assert!("lenient".parse::<Rubric>().is_err());
    }
}
