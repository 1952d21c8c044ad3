//! Page-count enforcement on raw generated text.
//!
//! This is separate from the section trimmer in [`crate::layout::budget`]: it
//! runs on the generator's output before the text is returned to the client,
//! estimates pages from the raw line count, and when over the limit rebuilds
//! the text from a fixed section priority list. The renderer never calls it.

use std::collections::HashSet;

use tracing::info;

use crate::document::parser::contract_marker;
use crate::document::{parse_document, ParseMode};

/// Non-blank lines assumed to fill one page.
pub const LINES_PER_PAGE: usize = 50;

/// Default page limit for generated CVs.
pub const DEFAULT_MAX_PAGES: usize = 2;

/// Sections kept when rebuilding over-long text, in output order.
pub const PAGE_PRIORITY: &[&str] = &[
    "Professional Summary",
    "Key Skills",
    "Work Experience",
    "Education",
    "Certifications",
    "Projects",
    "Awards",
    "Languages",
    "Hobbies",
];

/// Rough page estimate: `max(1, non_blank_lines / 50)`.
pub fn estimate_page_count(content: &str) -> usize {
    let lines = content.lines().filter(|l| !l.trim().is_empty()).count();
    (lines / LINES_PER_PAGE).max(1)
}

/// Returns `content` unchanged when it fits in `max_pages`; otherwise rebuilds
/// it from the header block followed by the first section matching each
/// [`PAGE_PRIORITY`] entry. Sections not on the list are dropped. Delimited
/// text keeps its marker and `## NAME` headings.
pub fn trim_content_to_pages(content: &str, max_pages: usize) -> String {
    let estimated = estimate_page_count(content);
    if estimated <= max_pages {
        return content.to_string();
    }

    let document = parse_document(content);
    let mut rebuilt: Vec<String> = Vec::new();
    let mut emitted: HashSet<&str> = HashSet::new();

    if document.mode == ParseMode::Delimited {
        rebuilt.push(contract_marker());
    }
    if let Some(header) = document.header() {
        rebuilt.extend(header.lines.iter().cloned());
    }

    for wanted in PAGE_PRIORITY {
        let wanted = wanted.to_lowercase();
        let found = document.sections().iter().find(|s| {
            !s.is_header()
                && !emitted.contains(s.name.as_str())
                && s.name.to_lowercase().contains(&wanted)
        });
        if let Some(section) = found {
            emitted.insert(section.name.as_str());
            rebuilt.push(document.heading_line(&section.name));
            rebuilt.extend(section.lines.iter().cloned());
        }
    }

    let dropped: Vec<&str> = document
        .sections()
        .iter()
        .filter(|s| !s.is_header() && !emitted.contains(s.name.as_str()))
        .map(|s| s.name.as_str())
        .collect();
    info!(
        estimated_pages = estimated,
        max_pages,
        dropped = ?dropped,
        "Rebuilt generated text to fit page limit"
    );

    rebuilt.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(n: usize) -> String {
        (1..=n).map(|i| format!("• achievement {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_estimate_page_count_floors_at_one() {
        assert_eq!(estimate_page_count(""), 1);
        assert_eq!(estimate_page_count("a\nb\n\n"), 1);
        assert_eq!(estimate_page_count(&filler(99)), 1);
        assert_eq!(estimate_page_count(&filler(100)), 2);
        assert_eq!(estimate_page_count(&filler(150)), 3);
    }

    #[test]
    fn test_blank_lines_do_not_count() {
        let text = format!("{}\n\n\n\n", filler(50));
        assert_eq!(estimate_page_count(&text), 1);
    }

    #[test]
    fn test_within_limit_is_returned_verbatim() {
        let text = "Jane Doe\n\nHOBBIES:\nChess\n";
        assert_eq!(trim_content_to_pages(text, 2), text);
    }

    #[test]
    fn test_over_limit_keeps_priority_sections_in_priority_order() {
        let text = format!(
            "Jane Doe\nHOBBIES:\nChess\nWORK EXPERIENCE:\n{}\nVOLUNTEERING:\nFood bank\nPROFESSIONAL SUMMARY:\nEngineer",
            filler(160)
        );

        let trimmed = trim_content_to_pages(&text, 2);
        let headings: Vec<&str> = trimmed
            .lines()
            .filter(|l| crate::document::heading::is_section_heading(l))
            .collect();

        assert_eq!(
            headings,
            vec!["PROFESSIONAL SUMMARY:", "WORK EXPERIENCE:", "HOBBIES:"]
        );
        assert!(trimmed.starts_with("Jane Doe\n"));
        assert!(!trimmed.contains("Food bank"));
    }

    #[test]
    fn test_section_is_emitted_once() {
        let text = format!("KEY SKILLS:\n{}", filler(200));
        let trimmed = trim_content_to_pages(&text, 1);
        assert_eq!(trimmed.matches("KEY SKILLS:").count(), 1);
    }

    #[test]
    fn test_delimited_text_stays_delimited_after_rebuild() {
        let text = format!(
            "#! cv-sections/1\nJane Doe\n## HOBBIES\nChess\n## WORK EXPERIENCE\nACME CORP:\n{}\n## VOLUNTEERING\nFood bank",
            filler(160)
        );
        let before = parse_document(&text);
        assert_eq!(before.mode, ParseMode::Delimited);

        let trimmed = trim_content_to_pages(&text, 2);
        assert!(trimmed.starts_with("#! cv-sections/1\nJane Doe\n## WORK EXPERIENCE\nACME CORP:\n"));
        assert!(!trimmed.contains("Food bank"));

        let after = parse_document(&trimmed);
        assert_eq!(after.mode, ParseMode::Delimited);
        assert_eq!(
            after.names().collect::<Vec<_>>(),
            vec!["HEADER", "WORK EXPERIENCE:", "HOBBIES:"]
        );
        assert_eq!(
            after.get("WORK EXPERIENCE:").and_then(|s| s.lines.first()).map(String::as_str),
            Some("ACME CORP:")
        );
    }
}
