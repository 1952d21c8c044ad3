//! Line classification shared by the PDF and Word renderers.

use crate::document::heading::heading_key;

/// Leading glyphs that mark a line as a bullet point: `•` plus the template
/// marker glyphs, so rendered output reads back the same. A leading `-` is
/// ordinary text.
pub const BULLET_GLYPHS: &[char] = &['•', '▪', '◆'];

/// The sections that carry special typographic rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    WorkExperience,
    Projects,
    Skills,
    Other,
}

impl SectionKind {
    /// Classifies a section by its heading (`"WORK EXPERIENCE:"`, `"Projects:"`, ...).
    pub fn of(heading: &str) -> Self {
        let key = heading_key(heading);
        if key == "work experience" {
            SectionKind::WorkExperience
        } else if key == "projects" {
            SectionKind::Projects
        } else if key.contains("skill") {
            SectionKind::Skills
        } else {
            SectionKind::Other
        }
    }
}

/// True if the trimmed line starts with one of [`BULLET_GLYPHS`].
pub fn is_bullet_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| BULLET_GLYPHS.contains(&c))
}

/// Removes a leading bullet glyph and the whitespace after it.
pub fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.chars().next() {
        Some(c) if BULLET_GLYPHS.contains(&c) => trimmed[c.len_utf8()..].trim_start(),
        _ => trimmed,
    }
}

/// A `Company | Role | Dates` row: has a pipe separator and no leading bullet.
pub fn is_role_row(line: &str) -> bool {
    line.contains('|') && !is_bullet_line(line)
}

/// Decides whether a content line of `kind` is rendered bold as a whole.
///
/// Work-experience role rows and non-bulleted project lines are bold.
pub fn is_emphasized_row(kind: SectionKind, line: &str) -> bool {
    match kind {
        SectionKind::WorkExperience => is_role_row(line),
        SectionKind::Projects => !is_bullet_line(line),
        _ => false,
    }
}
