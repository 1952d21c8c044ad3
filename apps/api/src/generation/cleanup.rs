//! Post-processing of generated text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{classify_lines, SourceLine};
use crate::document::lines::SectionKind;
use crate::generation::keywords::keyword_regex;

/// Returned in place of an empty generation.
pub const EMPTY_CONTENT_MESSAGE: &str = "Error: No content received from AI";

static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("newline pattern is a valid regex"));

static HTML_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is a valid regex"));

static CAPS_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([A-Z][A-Z ]+):").expect("caps heading pattern is a valid regex"));

static ASTERISKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*{1,2}").expect("asterisk pattern is a valid regex"));

/// Normalizes raw CV text from the provider.
///
/// Drops `**` and `__` markers and `<!-- -->` comments, collapses runs of
/// blank lines, and puts a blank line before each all-caps `HEADING:`.
pub fn clean_cv_content(content: &str) -> String {
    if content.trim().is_empty() {
        return EMPTY_CONTENT_MESSAGE.to_string();
    }

    let text = content.replace("**", "").replace("__", "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = HTML_COMMENT.replace_all(&text, "");
    let text = CAPS_HEADING.replace_all(&text, "\n$1:");
    text.trim().to_string()
}

/// Wraps JD keywords in `**` on the bullet and `|` row lines of the WORK
/// EXPERIENCE section. Other sections are left alone. Sections are found the
/// same way the parser finds them, delimited format included.
pub fn bold_keywords_in_work_exp(cv_text: &str, keywords: &[String]) -> String {
    let Some(pattern) = keyword_regex(keywords) else {
        return cv_text.to_string();
    };

    let (_, classified) = classify_lines(cv_text);
    let mut in_work_experience = false;
    let lines: Vec<String> = cv_text
        .lines()
        .zip(classified)
        .map(|(line, class)| match class {
            SourceLine::Heading(name) => {
                in_work_experience = SectionKind::of(&name) == SectionKind::WorkExperience;
                line.to_string()
            }
            SourceLine::Content(content)
                if in_work_experience && (content.starts_with('•') || content.contains('|')) =>
            {
                pattern.replace_all(line, "**$0**").into_owned()
            }
            _ => line.to_string(),
        })
        .collect();

    lines.join("\n")
}

/// Removes `*` and `**` emphasis markers and trims.
pub fn strip_markdown_emphasis(text: &str) -> String {
    ASTERISKS.replace_all(text, "").trim().to_string()
}
