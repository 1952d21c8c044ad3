//! Flow model and the résumé block builder.
//!
//! A [`Flow`] is a vertical sequence of paragraphs, rules and spacers with
//! every style already resolved. The PDF layout engine only understands
//! flows; [`build_resume_flow`] is where the template rules live.

use crate::document::lines::{is_emphasized_row, is_role_row, strip_bullet, SectionKind};
use crate::document::Document;
use crate::render::emphasis::{parse_emphasis, strip_emphasis, Span};
use crate::render::template::{HeadingDecoration, Marker, ParagraphStyle, Rgb, TemplateStyle};

// ────────────────────────────────────────────────────────────────────────────
// Flow model
// ────────────────────────────────────────────────────────────────────────────

/// Stroked box drawn around a paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub thickness: f32,
    pub padding: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub marker: Option<Marker>,
    pub spans: Vec<Span>,
    pub border: Option<Border>,
}

impl Paragraph {
    pub fn new(style: ParagraphStyle, spans: Vec<Span>) -> Self {
        Self {
            style,
            marker: None,
            spans,
            border: None,
        }
    }

    /// Plain text without markers, as it will read on the page.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// True when every non-blank span renders in a bold face.
    #[cfg(test)]
    pub fn is_bold(&self) -> bool {
        self.style.bold || self.spans.iter().all(|s| s.bold || s.text.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Paragraph(Paragraph),
    /// Full-width horizontal line.
    Rule {
        thickness: f32,
        color: Rgb,
        space_before: f32,
        space_after: f32,
    },
    Spacer(f32),
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé builder
// ────────────────────────────────────────────────────────────────────────────

/// Converts a parsed document into a flow for `style`.
///
/// - HEADER lines become title paragraphs, followed by the title gap.
/// - Each other section gets a heading (plus its rule or box), its lines, and
///   the section gap.
/// - `Company | Role | Dates` rows in work experience and non-bullet project
///   lines are bold as a whole and carry no marker.
/// - Other lines get the template marker (replacing any bullet glyph already
///   present) and `**` spans rendered bold.
/// - Templates with `join_skills` render a skills section as one line.
pub fn build_resume_flow(document: &Document, style: &TemplateStyle) -> Vec<Flow> {
    let mut flow = Vec::new();

    if let Some(header) = document.header() {
        for line in &header.lines {
            flow.push(Flow::Paragraph(Paragraph::new(
                style.title,
                vec![Span::regular(strip_emphasis(line))],
            )));
        }
        if !header.lines.is_empty() {
            flow.push(Flow::Spacer(style.title_gap));
        }
    }

    for section in document.sections().iter().filter(|s| !s.is_header()) {
        push_heading(&mut flow, &section.name, style);

        let kind = SectionKind::of(&section.name);
        if style.join_skills && kind == SectionKind::Skills {
            let joined = section
                .lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" | ");
            if !joined.is_empty() {
                flow.push(Flow::Paragraph(Paragraph::new(style.body, parse_emphasis(&joined))));
            }
        } else {
            for line in section.lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
                push_body_line(&mut flow, kind, line, style);
            }
        }

        flow.push(Flow::Spacer(style.section_gap));
    }

    flow
}

fn push_heading(flow: &mut Vec<Flow>, name: &str, style: &TemplateStyle) {
    let mut heading = Paragraph::new(style.heading, vec![Span::regular(name)]);
    match style.heading_decoration {
        HeadingDecoration::None => flow.push(Flow::Paragraph(heading)),
        HeadingDecoration::Box { thickness, padding } => {
            heading.border = Some(Border {
                thickness,
                padding,
                color: style.heading.color,
            });
            flow.push(Flow::Paragraph(heading));
        }
        HeadingDecoration::Rule {
            thickness,
            space_before,
            space_after,
        } => {
            flow.push(Flow::Paragraph(heading));
            flow.push(Flow::Rule {
                thickness,
                color: style.heading.color,
                space_before,
                space_after,
            });
        }
    }
}

fn push_body_line(flow: &mut Vec<Flow>, kind: SectionKind, line: &str, style: &TemplateStyle) {
    if kind == SectionKind::WorkExperience && is_role_row(line) {
        flow.push(Flow::Spacer(style.role_row_gap));
    }

    if is_emphasized_row(kind, line) {
        flow.push(Flow::Paragraph(Paragraph::new(
            style.body,
            vec![Span::bold(strip_emphasis(line))],
        )));
        return;
    }

    let text = if style.marker.is_some() {
        strip_bullet(line)
    } else {
        line
    };
    let mut paragraph = Paragraph::new(style.body, parse_emphasis(text));
    paragraph.marker = style.marker;
    flow.push(Flow::Paragraph(paragraph));
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
