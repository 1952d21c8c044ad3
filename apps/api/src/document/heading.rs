//! Section heading detection.
//!
//! One predicate decides what a heuristic heading is. Consumers do not call
//! it directly: the parser, the Word exporter and the keyword bolder all go
//! through [`crate::document::classify_lines`], which applies it unless the
//! text uses the delimited format. A heading is a capitalised run of letters
//! and spaces terminated by a colon, e.g. `WORK EXPERIENCE:` or `Key Skills:`.
//!
//! This is a heuristic. Generated text is not obliged to follow it, and a
//! content line such as `ACME CORP:` is indistinguishable from a heading.
//! Text that needs a guarantee should use the delimited format in
//! [`crate::document::parser`].

use once_cell::sync::Lazy;
use regex::Regex;

/// `^[A-Z][A-Za-z ]{2,}:\s*$`, applied to a trimmed line.
static HEADING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z ]{2,}:\s*$").expect("heading pattern is a valid regex")
});

/// Returns true if `line` is a section heading.
///
/// Leading and trailing whitespace is ignored.
pub fn is_section_heading(line: &str) -> bool {
    HEADING_PATTERN.is_match(line.trim())
}

/// Canonical storage form of a heading line: trimmed and colon-terminated.
pub fn normalize_heading(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.ends_with(':') {
        trimmed.to_string()
    } else {
        format!("{trimmed}:")
    }
}

/// Lower-cased heading without its trailing colon (`"WORK EXPERIENCE:"` → `"work experience"`).
pub fn heading_key(heading: &str) -> String {
    heading
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_upper_case_heading() {
        assert!(is_section_heading("WORK EXPERIENCE:"));
    }

    #[test]
    fn test_accepts_mixed_case_heading() {
        assert!(is_section_heading("Key Skills:"));
    }

    #[test]
    fn test_accepts_trailing_whitespace_and_indent() {
        assert!(is_section_heading("  EDUCATION:   "));
    }

    #[test]
    fn test_rejects_colon_mid_line() {
        assert!(!is_section_heading("Note: see below"));
    }

    #[test]
    fn test_rejects_bulleted_line_with_colon() {
        assert!(!is_section_heading("• Led migration: moved 40 services to Kubernetes"));
        assert!(!is_section_heading("• Highlights:"));
    }

    #[test]
    fn test_rejects_lower_case_start_and_short_names() {
        assert!(!is_section_heading("skills:"));
        assert!(!is_section_heading("AB:"));
        assert!(!is_section_heading("WORK EXPERIENCE"));
    }

    #[test]
    fn test_rejects_digits_and_punctuation() {
        assert!(!is_section_heading("Q1: What is Rust?"));
        assert!(!is_section_heading("Acme | Engineer | 2020-2023:"));
    }

    #[test]
    fn test_all_caps_company_name_is_misclassified() {
        // Known limitation of the heuristic.
        assert!(is_section_heading("ACME CORP:"));
    }

    #[test]
    fn test_normalize_heading_adds_colon_once() {
        assert_eq!(normalize_heading(" PROJECTS "), "PROJECTS:");
        assert_eq!(normalize_heading("PROJECTS:"), "PROJECTS:");
    }

    #[test]
    fn test_heading_key() {
        assert_eq!(heading_key("WORK EXPERIENCE:"), "work experience");
        assert_eq!(heading_key("Projects:"), "projects");
    }
}
