//! The parsed résumé: an ordered set of named sections.
//!
//! A `Document` is built fresh for every render from the current text and
//! owned exclusively by that render. Nothing here is cached or persisted.

pub mod heading;
pub mod lines;
pub mod parser;

use serde::{Deserialize, Serialize};

pub use parser::{classify_lines, parse_document, SourceLine};

use parser::{contract_marker, DELIMITED_HEADING_PREFIX};

/// Name of the implicit section holding the lines before the first heading
/// (name and contact block).
pub const HEADER: &str = "HEADER";

/// A named, ordered group of content lines.
///
/// `lines` are trimmed and never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub lines: Vec<String>,
}

impl Section {
    pub fn is_header(&self) -> bool {
        self.name == HEADER
    }
}

/// How the text was split into sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Headings found with [`heading::is_section_heading`].
    Heuristic,
    /// Text declared the `cv-sections/1` delimiter format and followed it.
    Delimited,
    /// Text declared a delimiter format but broke it; parsed heuristically.
    DelimitedFallback,
}

/// Ordered mapping from section name to section, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    sections: Vec<Section>,
    pub mode: ParseMode,
}

impl Document {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            sections: Vec::new(),
            mode,
        }
    }

    /// Stores `lines` under `name`.
    ///
    /// A repeated name replaces the earlier content but keeps the section's
    /// original position.
    pub fn insert(&mut self, name: impl Into<String>, lines: Vec<String>) {
        let name = name.into();
        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.lines = lines,
            None => self.sections.push(Section { name, lines }),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn header(&self) -> Option<&Section> {
        self.get(HEADER)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of non-blank content lines across every section, HEADER included.
    pub fn total_lines(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.lines.iter().filter(|l| !l.trim().is_empty()).count())
            .sum()
    }

    /// Heading line for `name` in this document's format: `## NAME` for a
    /// delimited document, the stored `NAME:` otherwise.
    pub fn heading_line(&self, name: &str) -> String {
        match self.mode {
            ParseMode::Delimited => format!(
                "{DELIMITED_HEADING_PREFIX}{}",
                name.trim_end_matches(':').trim_end()
            ),
            ParseMode::Heuristic | ParseMode::DelimitedFallback => name.to_string(),
        }
    }

    /// Re-serializes to plain text: the format marker for a delimited
    /// document, header lines, then each heading followed by its lines.
    /// Blank lines from the source are not restored.
    pub fn to_text(&self) -> String {
        let mut out: Vec<String> = Vec::new();
        if self.mode == ParseMode::Delimited {
            out.push(contract_marker());
        }
        if let Some(header) = self.header() {
            out.extend(header.lines.iter().cloned());
        }
        for section in self.sections.iter().filter(|s| !s.is_header()) {
            out.push(self.heading_line(&section.name));
            out.extend(section.lines.iter().cloned());
        }
        out.join("\n")
    }
}
