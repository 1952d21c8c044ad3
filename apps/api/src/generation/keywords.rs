//! Deterministic keyword and metric helpers.
//!
//! No LLM involved: keywords are frequency-ranked job-description terms with
//! stop-words removed, matched against CV text as whole words, case-insensitively.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Keywords kept from a job description.
pub const MAX_KEYWORDS: usize = 20;

/// Shortest term counted as a keyword.
const MIN_KEYWORD_LEN: usize = 3;

/// Points per metric in the quantification score.
const POINTS_PER_METRIC: usize = 5;

const STOP_WORDS: &[&str] = &[
    "about", "above", "across", "after", "all", "also", "and", "any", "are", "able", "ability",
    "be", "been", "being", "both", "but", "can", "candidate", "candidates", "company", "could",
    "day", "do", "does", "each", "etc", "experience", "for", "from", "good", "great", "has",
    "have", "help", "how", "including", "into", "its", "job", "join", "just", "knowledge", "like",
    "looking", "make", "more", "most", "must", "new", "not", "our", "out", "over", "own",
    "plus", "preferred", "required", "requirements", "responsibilities", "role", "should",
    "skills", "strong", "such", "team", "than", "that", "the", "their", "them", "there",
    "these", "they", "this", "those", "through", "using", "very", "want", "was", "way", "we",
    "well", "were", "what", "when", "where", "which", "while", "who", "will", "with", "within",
    "work", "working", "would", "year", "years", "you", "your",
];

/// A word: starts with a letter, may carry `+ # . -` (`C++`, `C#`, `Node.js`, `A/B` stays split).
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9+#.\-]*").expect("token pattern is a valid regex"));

/// Numbers, percentages and magnitudes: `40%`, `1.5M`, `10+`, `1,200`.
static METRIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?(?:%|K|M|B|k|m|b|\+|,\d+)*)").expect("metric pattern is a valid regex")
});

/// Extracts up to [`MAX_KEYWORDS`] lower-cased terms from `text`, most
/// frequent first; ties keep first-occurrence order.
pub fn extract_keywords_from_text(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    for (position, m) in TOKEN.find_iter(text).enumerate() {
        let term = m.as_str().trim_end_matches(['.', '-']).to_lowercase();
        if term.len() < MIN_KEYWORD_LEN || STOP_WORDS.contains(&term.as_str()) {
            continue;
        }
        counts.entry(term).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(term, _, _)| term)
        .collect()
}

/// Builds one case-insensitive regex matching any of `keywords` as a whole
/// word. Longer keywords win at the same position. `None` when empty.
pub fn keyword_regex(keywords: &[String]) -> Option<Regex> {
    let mut sorted: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));
    sorted.dedup();

    let alternatives: Vec<String> = sorted.into_iter().map(word_pattern).collect();
    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).ok()
}

/// `\b` only works next to word characters, so `C++` gets no trailing boundary.
fn word_pattern(keyword: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(keyword.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(keyword.chars().last()) { r"\b" } else { "" };
    format!("{lead}{}{tail}", regex::escape(keyword))
}

/// Deterministic keyword coverage of a CV against a job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatchReport {
    /// Percentage of job-description keywords present in the CV, 0 to 100.
    pub keyword_match: u32,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

pub fn keyword_match_report(cv_content: &str, job_description: &str) -> KeywordMatchReport {
    let keywords = extract_keywords_from_text(job_description);
    let (matched, missing): (Vec<String>, Vec<String>) = keywords
        .into_iter()
        .partition(|kw| keyword_regex(std::slice::from_ref(kw)).is_some_and(|re| re.is_match(cv_content)));

    let total = matched.len() + missing.len();
    let keyword_match = if total == 0 {
        0
    } else {
        ((matched.len() as f64 / total as f64) * 100.0).round() as u32
    };

    KeywordMatchReport {
        keyword_match,
        matched_keywords: matched,
        missing_keywords: missing,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub total_metrics: usize,
    pub metrics_found: Vec<String>,
    /// `min(100, 5 × total_metrics)`.
    pub quantification_score: usize,
}

pub fn extract_key_metrics(cv_content: &str) -> KeyMetrics {
    let metrics_found: Vec<String> = METRIC
        .find_iter(cv_content)
        .map(|m| m.as_str().to_string())
        .collect();
    let total_metrics = metrics_found.len();

    KeyMetrics {
        total_metrics,
        metrics_found,
        quantification_score: (total_metrics * POINTS_PER_METRIC).min(100),
    }
}
