//! Splits generated text into an ordered [`Document`].
//!
//! # Formats
//! - **Heuristic** (default): headings are lines accepted by
//!   [`is_section_heading`]. Lines before the first heading form `HEADER`.
//! - **Delimited v1**: the first non-blank line is `#! cv-sections/1` and
//!   headings are written `## NAME`. Colon-terminated content lines are then
//!   safe from being mistaken for headings.
//!
//! # Fallback policy
//! A text that announces a delimiter format but does not follow it (unknown
//! version, or no `## ` heading at all) is parsed heuristically and marked
//! [`ParseMode::DelimitedFallback`]. Parsing never fails.
//!
//! Blank lines are dropped in every mode, so the original blank-line layout
//! cannot be reconstructed from a `Document`.

use tracing::{debug, warn};

use crate::document::heading::{is_section_heading, normalize_heading};
use crate::document::{Document, ParseMode, HEADER};

/// Marker prefix announcing the delimited format.
pub const CONTRACT_MARKER_PREFIX: &str = "#! cv-sections/";
/// The delimited format version this parser understands.
pub const CONTRACT_VERSION: &str = "1";
/// Heading prefix in the delimited format.
pub const DELIMITED_HEADING_PREFIX: &str = "## ";

/// One source line as read under the text's format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine<'a> {
    Blank,
    /// The `#! cv-sections/N` line announcing a delimiter format.
    Marker,
    /// A heading, in stored form (`WORK EXPERIENCE:`).
    Heading(String),
    /// A trimmed content line.
    Content(&'a str),
}

/// Full marker line for the supported delimiter version.
pub fn contract_marker() -> String {
    format!("{CONTRACT_MARKER_PREFIX}{CONTRACT_VERSION}")
}

/// Decides the format of `text` and classifies every line of it.
///
/// The result has one entry per `text.lines()` item, so callers that rewrite
/// the text line by line can zip the two. Every consumer that needs to know
/// where sections start goes through here.
pub fn classify_lines(text: &str) -> (ParseMode, Vec<SourceLine<'_>>) {
    let mode = detect_mode(text);
    let mut marker_pending = mode != ParseMode::Heuristic;

    let lines = text
        .lines()
        .map(|raw| {
            let line = raw.trim();
            if line.is_empty() {
                return SourceLine::Blank;
            }
            if std::mem::take(&mut marker_pending) {
                return SourceLine::Marker;
            }
            let heading = match mode {
                ParseMode::Delimited => delimited_heading(line),
                ParseMode::Heuristic | ParseMode::DelimitedFallback => {
                    is_section_heading(line).then(|| normalize_heading(line))
                }
            };
            match heading {
                Some(name) => SourceLine::Heading(name),
                None => SourceLine::Content(line),
            }
        })
        .collect();

    (mode, lines)
}

fn detect_mode(text: &str) -> ParseMode {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let Some(version) = lines
        .next()
        .and_then(|first| first.strip_prefix(CONTRACT_MARKER_PREFIX))
    else {
        return ParseMode::Heuristic;
    };

    if version.trim() != CONTRACT_VERSION {
        warn!(
            version = version.trim(),
            "Unsupported section contract version, falling back to heuristic parsing"
        );
        return ParseMode::DelimitedFallback;
    }

    if !lines.any(|l| delimited_heading(l).is_some()) {
        warn!("Section contract declared but no '## ' headings found, falling back to heuristic parsing");
        return ParseMode::DelimitedFallback;
    }

    ParseMode::Delimited
}

/// `## Work Experience` → `Work Experience:`.
fn delimited_heading(line: &str) -> Option<String> {
    line.strip_prefix(DELIMITED_HEADING_PREFIX)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(normalize_heading)
}

/// Parses raw text into a [`Document`].
pub fn parse_document(text: &str) -> Document {
    let (mode, lines) = classify_lines(text);

    let mut document = Document::new(mode);
    let mut header_block: Vec<String> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in lines {
        match line {
            SourceLine::Blank | SourceLine::Marker => {}
            SourceLine::Heading(name) => {
                match current.take() {
                    Some((prev, content)) => document.insert(prev, content),
                    None if !header_block.is_empty() => {
                        document.insert(HEADER, std::mem::take(&mut header_block))
                    }
                    None => {}
                }
                current = Some((name, Vec::new()));
            }
            SourceLine::Content(line) => match current.as_mut() {
                Some((_, content)) => content.push(line.to_string()),
                None => header_block.push(line.to_string()),
            },
        }
    }

    match current {
        Some((name, content)) => document.insert(name, content),
        // No heading at all: everything is the synthetic HEADER section.
        None if !header_block.is_empty() => document.insert(HEADER, header_block),
        None => {}
    }

    debug!(
        sections = document.sections().len(),
        lines = document.total_lines(),
        mode = ?document.mode,
        "Parsed document"
    );

    document
}
