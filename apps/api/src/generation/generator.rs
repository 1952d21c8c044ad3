//! Generation pipelines: CV, cover letter, ATS analysis and interview Q&A.
//!
//! Every call goes through a [`ContentProvider`]; nothing here talks HTTP.
//! CV flow: prompt → provider → clean → page limit → keyword bolding.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::generation::cleanup::{bold_keywords_in_work_exp, clean_cv_content, strip_markdown_emphasis};
use crate::generation::keywords::extract_keywords_from_text;
use crate::generation::prompts::{
    ATS_PROMPT_TEMPLATE, COVER_LETTER_PROMPT_TEMPLATE, CV_PROMPT_TEMPLATE,
    INTERVIEW_PROMPT_TEMPLATE,
};
use crate::layout::page_limit::trim_content_to_pages;
use crate::llm_client::prompts::{JSON_ONLY_RULE, PLAIN_TEXT_RULE};
use crate::llm_client::{generate_json, ContentProvider, GenerateOptions, LlmError};

pub const DEFAULT_TARGET_MATCH: u8 = 90;
pub const TARGET_MATCH_RANGE: std::ops::RangeInclusive<u8> = 60..=100;
pub const DEFAULT_QUANTITATIVE_FOCUS: u8 = 60;

// ────────────────────────────────────────────────────────────────────────────
// Generation settings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbIntensity {
    Moderate,
    #[default]
    High,
    VeryHigh,
}

impl VerbIntensity {
    fn instruction(self) -> &'static str {
        match self {
            VerbIntensity::Moderate => "moderate use of action verbs",
            VerbIntensity::High => "strong emphasis on action verbs",
            VerbIntensity::VeryHigh => "maximum use of powerful action verbs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatching {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl KeywordMatching {
    fn instruction(self) -> &'static str {
        match self {
            KeywordMatching::Conservative => "maintain authenticity while incorporating key terms",
            KeywordMatching::Balanced => "strategically integrate job description keywords",
            KeywordMatching::Aggressive => "maximize keyword density and exact phrase matching",
        }
    }
}

pub fn default_sections() -> Vec<String> {
    [
        "Professional Summary",
        "Key Skills",
        "Work Experience",
        "Education",
        "Certifications",
        "Projects",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_target_match() -> u8 {
    DEFAULT_TARGET_MATCH
}

fn default_quantitative_focus() -> u8 {
    DEFAULT_QUANTITATIVE_FOCUS
}

/// Input for [`generate_cv`].
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCvRequest {
    pub resume_text: String,
    pub job_description: String,
    /// Minimum ATS match the prompt asks for, 60 to 100.
    #[serde(default = "default_target_match")]
    pub target_match: u8,
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
    /// Share of bullets, in percent, that should carry a metric.
    #[serde(default = "default_quantitative_focus")]
    pub quantitative_focus: u8,
    #[serde(default)]
    pub action_verb_intensity: VerbIntensity,
    #[serde(default)]
    pub keyword_matching: KeywordMatching,
}

impl GenerateCvRequest {
    pub fn new(resume_text: impl Into<String>, job_description: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_description: job_description.into(),
            target_match: DEFAULT_TARGET_MATCH,
            sections: default_sections(),
            quantitative_focus: DEFAULT_QUANTITATIVE_FOCUS,
            action_verb_intensity: VerbIntensity::default(),
            keyword_matching: KeywordMatching::default(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

pub fn build_cv_prompt(request: &GenerateCvRequest) -> String {
    let quantitative = format!(
        "use quantifiable metrics in at least {}% of bullet points",
        request.quantitative_focus.min(100)
    );
    CV_PROMPT_TEMPLATE
        .replace("{target_match}", &request.target_match.to_string())
        .replace("{sections}", &request.sections.join(", "))
        .replace("{quantitative_focus}", &quantitative)
        .replace("{verb_intensity}", request.action_verb_intensity.instruction())
        .replace("{keyword_matching}", request.keyword_matching.instruction())
        .replace("{plain_text_rule}", PLAIN_TEXT_RULE)
        .replace("{resume_text}", &request.resume_text)
        .replace("{job_description}", &request.job_description)
}

fn fill(template: &str, first: (&str, &str), second: (&str, &str)) -> String {
    template
        .replace("{plain_text_rule}", PLAIN_TEXT_RULE)
        .replace(first.0, first.1)
        .replace(second.0, second.1)
}

// ────────────────────────────────────────────────────────────────────────────
// Pipelines
// ────────────────────────────────────────────────────────────────────────────

/// Generates an optimized CV limited to `max_pages`, with JD keywords bolded
/// in WORK EXPERIENCE.
pub async fn generate_cv(
    provider: &dyn ContentProvider,
    request: &GenerateCvRequest,
    max_pages: usize,
) -> Result<String, LlmError> {
    let prompt = build_cv_prompt(request);
    let raw = provider.generate(&prompt, &GenerateOptions::default()).await?;

    let cleaned = clean_cv_content(&raw);
    let limited = trim_content_to_pages(&cleaned, max_pages);
    let keywords = extract_keywords_from_text(&request.job_description);
    let cv = bold_keywords_in_work_exp(&limited, &keywords);

    info!(
        raw_chars = raw.len(),
        chars = cv.len(),
        keywords = keywords.len(),
        "Generated CV"
    );
    Ok(cv.trim().to_string())
}

pub async fn generate_cover_letter(
    provider: &dyn ContentProvider,
    resume_text: &str,
    job_description: &str,
) -> Result<String, LlmError> {
    let prompt = fill(
        COVER_LETTER_PROMPT_TEMPLATE,
        ("{resume_text}", resume_text),
        ("{job_description}", job_description),
    );
    let letter = provider.generate(&prompt, &GenerateOptions::default()).await?;
    Ok(strip_markdown_emphasis(&letter))
}

pub async fn generate_interview_qa(
    provider: &dyn ContentProvider,
    resume_text: &str,
    job_description: &str,
) -> Result<String, LlmError> {
    let prompt = fill(
        INTERVIEW_PROMPT_TEMPLATE,
        ("{resume_text}", resume_text),
        ("{job_description}", job_description),
    );
    let text = provider.generate(&prompt, &GenerateOptions::default()).await?;
    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(text.trim().to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// ATS analysis
// ────────────────────────────────────────────────────────────────────────────

/// Model-judged ATS compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    pub score: u32,
    pub keyword_match: u32,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AtsReport {
    fn failed(error: &LlmError) -> Self {
        Self {
            score: 0,
            keyword_match: 0,
            missing_keywords: vec![],
            suggestions: vec![format!("Error analyzing CV: {error}")],
        }
    }
}

/// Provider JSON; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AtsResponse {
    #[serde(deserialize_with = "number_or_numeric_string")]
    ats_score: f64,
    #[serde(deserialize_with = "number_or_numeric_string")]
    keyword_match: f64,
    missing_keywords: Vec<String>,
    suggestions: Vec<String>,
}

/// Models sometimes quote scores (`"85"`, `"85%"`).
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(f64),
        Text(String),
    }

    match Score::deserialize(deserializer)? {
        Score::Number(value) => Ok(value),
        Score::Text(text) => text
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("score is not a number: {text:?}"))),
    }
}

fn percent(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

/// Scores `cv_content` against the JD. Never fails: provider or parse errors
/// produce a zero report carrying the error as its only suggestion.
pub async fn analyze_cv_ats_score(
    provider: &dyn ContentProvider,
    cv_content: &str,
    job_description: &str,
) -> AtsReport {
    let prompt = ATS_PROMPT_TEMPLATE
        .replace("{json_only_rule}", JSON_ONLY_RULE)
        .replace("{cv_content}", cv_content)
        .replace("{job_description}", job_description);

    match generate_json::<AtsResponse>(provider, &prompt).await {
        Ok(parsed) => AtsReport {
            score: percent(parsed.ats_score),
            keyword_match: percent(parsed.keyword_match),
            missing_keywords: parsed.missing_keywords,
            suggestions: parsed.suggestions,
        },
        Err(e) => {
            warn!(error = %e, "ATS analysis failed, returning zero report");
            AtsReport::failed(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Returns a canned answer and records what it was asked.
    struct CannedProvider {
        answer: Result<String, u16>,
        seen: Mutex<Vec<(String, GenerateOptions)>>,
    }

    impl CannedProvider {
        fn ok(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                seen: Mutex::new(vec![]),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                answer: Err(status),
                seen: Mutex::new(vec![]),
            }
        }

        fn last_prompt(&self) -> String {
            self.seen.lock().unwrap().last().unwrap().0.clone()
        }

        fn last_options(&self) -> GenerateOptions {
            self.seen.lock().unwrap().last().unwrap().1
        }
    }

    #[async_trait]
    impl ContentProvider for CannedProvider {
        async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push((prompt.to_string(), *options));
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    const JD: &str = "Data Engineer building Spark and Kafka pipelines. Spark required.";

    #[test]
    fn test_cv_prompt_carries_settings() {
        let mut request = GenerateCvRequest::new("My resume", JD);
        request.target_match = 85;
        request.sections = vec!["Key Skills".to_string(), "Education".to_string()];
        request.action_verb_intensity = VerbIntensity::VeryHigh;
        request.keyword_matching = KeywordMatching::Aggressive;

        let prompt = build_cv_prompt(&request);
        assert!(prompt.contains("minimum 85% ATS score"));
        assert!(prompt.contains("Key Skills, Education"));
        assert!(prompt.contains("maximum use of powerful action verbs"));
        assert!(prompt.contains("maximize keyword density"));
        assert!(prompt.contains("at least 60% of bullet points"));
        assert!(prompt.contains("My resume"));
        for placeholder in ["{target_match}", "{sections}", "{plain_text_rule}", "{job_description}"] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: GenerateCvRequest =
            serde_json::from_str(r#"{"resume_text":"r","job_description":"j"}"#).unwrap();
        assert_eq!(request.target_match, 90);
        assert_eq!(request.quantitative_focus, 60);
        assert_eq!(request.sections.len(), 6);
        assert_eq!(request.action_verb_intensity, VerbIntensity::High);
        assert_eq!(request.keyword_matching, KeywordMatching::Balanced);
    }

    #[test]
    fn test_settings_parse_snake_case() {
        let intensity: VerbIntensity = serde_json::from_str(r#""very_high""#).unwrap();
        assert_eq!(intensity, VerbIntensity::VeryHigh);
    }

    #[tokio::test]
    async fn test_generate_cv_cleans_and_bolds_work_experience() {
        let provider = CannedProvider::ok(
            "**Jane Doe**\njane@example.com\nKEY SKILLS:\nSpark, Kafka\n\
             WORK EXPERIENCE:\nAcme | Engineer | 2020\n• Built Spark pipelines",
        );
        let cv = generate_cv(&provider, &GenerateCvRequest::new("resume", JD), 2)
            .await
            .unwrap();

        assert!(cv.starts_with("Jane Doe\njane@example.com"));
        assert!(cv.contains("\n\nKEY SKILLS:\nSpark, Kafka\n"));
        assert!(cv.contains("Acme | **Engineer** | 2020"));
        assert!(cv.contains("• Built **Spark** **pipelines**"));
        assert_eq!(provider.last_options().temperature, 0.2);
        assert!(!provider.last_options().json_mode);
    }

    #[tokio::test]
    async fn test_generate_cv_propagates_provider_error() {
        let provider = CannedProvider::failing(500);
        let result = generate_cv(&provider, &GenerateCvRequest::new("r", JD), 2).await;
        assert!(matches!(result, Err(LlmError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_cover_letter_strips_emphasis() {
        let provider = CannedProvider::ok("Hello Hiring Manager,\n\nI am **excited** to *apply*.\n");
        let letter = generate_cover_letter(&provider, "resume", JD).await.unwrap();
        assert_eq!(letter, "Hello Hiring Manager,\n\nI am excited to apply.");
        assert!(provider.last_prompt().contains("Hello Hiring Manager"));
        assert!(provider.last_prompt().contains(JD));
    }

    #[tokio::test]
    async fn test_interview_qa_rejects_blank_output() {
        let provider = CannedProvider::ok("   \n");
        let result = generate_interview_qa(&provider, "resume", JD).await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_interview_qa_returns_text() {
        let provider = CannedProvider::ok("Q1: Why?\nA1:\n- Because\n");
        let qa = generate_interview_qa(&provider, "resume", JD).await.unwrap();
        assert_eq!(qa, "Q1: Why?\nA1:\n- Because");
        assert!(provider.last_prompt().contains("exactly 20 interview questions"));
    }

    #[tokio::test]
    async fn test_ats_analysis_parses_json_mode_answer() {
        let provider = CannedProvider::ok(
            r#"{"ats_score": 82.6, "keyword_match": 75, "missing_keywords": ["Flink"], "suggestions": ["Add Flink"]}"#,
        );
        let report = analyze_cv_ats_score(&provider, "cv", JD).await;
        assert_eq!(
            report,
            AtsReport {
                score: 83,
                keyword_match: 75,
                missing_keywords: vec!["Flink".to_string()],
                suggestions: vec!["Add Flink".to_string()],
            }
        );
        assert!(provider.last_options().json_mode);
    }

    #[tokio::test]
    async fn test_ats_analysis_accepts_quoted_scores() {
        let provider = CannedProvider::ok(
            r#"{"ats_score": "85", "keyword_match": " 70% ", "missing_keywords": [], "suggestions": ["Add Go"]}"#,
        );
        let report = analyze_cv_ats_score(&provider, "cv", JD).await;
        assert_eq!(report.score, 85);
        assert_eq!(report.keyword_match, 70);
        assert_eq!(report.suggestions, vec!["Add Go".to_string()]);
    }

    #[tokio::test]
    async fn test_ats_analysis_degrades_on_bad_json() {
        let provider = CannedProvider::ok("not json");
        let report = analyze_cv_ats_score(&provider, "cv", JD).await;
        assert_eq!(report.score, 0);
        assert_eq!(report.keyword_match, 0);
        assert_eq!(report.suggestions.len(), 1);
        assert!(report.suggestions[0].starts_with("Error analyzing CV: "));
    }

    #[tokio::test]
    async fn test_ats_analysis_degrades_on_provider_error() {
        let provider = CannedProvider::failing(503);
        let report = analyze_cv_ats_score(&provider, "cv", JD).await;
        assert_eq!(report.score, 0);
        assert!(report.suggestions[0].contains("503"));
    }
}
