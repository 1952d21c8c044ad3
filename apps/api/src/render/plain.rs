//! Cover letter and interview Q&A exports: one paragraph per non-blank line.

use serde::{Deserialize, Serialize};

use crate::render::blocks::{Flow, Paragraph};
use crate::render::docx::{DocxBuilder, DocxParagraph, Justification, PageMargins};
use crate::render::emphasis::parse_emphasis;
use crate::render::pdf::{render_flow, PageSetup, RenderedPdf};
use crate::render::template::{Align, PageSize, ParagraphStyle, Rgb, INCH};
use crate::render::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    CoverLetter,
    Interview,
}

impl ExportKind {
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "cover-letter" => Some(ExportKind::CoverLetter),
            "interview" => Some(ExportKind::Interview),
            _ => None,
        }
    }

    fn file_stem(self) -> &'static str {
        match self {
            ExportKind::CoverLetter => "cover_letter",
            ExportKind::Interview => "interview_qa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "pdf" => Some(ExportFormat::Pdf),
            "docx" => Some(ExportFormat::Docx),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

/// An export ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Exports `text` as `kind` in `format`.
pub fn export_plain(
    kind: ExportKind,
    format: ExportFormat,
    text: &str,
) -> Result<ExportedFile, RenderError> {
    let bytes = match (kind, format) {
        (ExportKind::CoverLetter, ExportFormat::Pdf) => cover_letter_pdf(text).bytes,
        (ExportKind::CoverLetter, ExportFormat::Docx) => cover_letter_docx(text)?,
        (ExportKind::Interview, ExportFormat::Pdf) => interview_pdf(text).bytes,
        (ExportKind::Interview, ExportFormat::Docx) => interview_docx(text)?,
    };
    Ok(ExportedFile {
        bytes,
        content_type: format.content_type(),
        file_name: format!("{}.{}", kind.file_stem(), format.extension()),
    })
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.trim().lines().map(str::trim).filter(|l| !l.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

/// Letter, 50pt margins, justified Helvetica 11 on 16pt leading, 0.2in after
/// each paragraph.
pub fn cover_letter_pdf(text: &str) -> RenderedPdf {
    let (width, height) = PageSize::Letter.dimensions();
    let setup = PageSetup {
        width,
        height,
        margin_x: 50.0,
        margin_y: 50.0,
    };
    let style = ParagraphStyle {
        font_size: 11.0,
        leading: 16.0,
        color: Rgb::BLACK,
        align: Align::Justify,
        space_before: 0.0,
        space_after: 0.0,
        bold: false,
    };

    let mut flow = Vec::new();
    for line in non_blank_lines(text) {
        flow.push(Flow::Paragraph(Paragraph::new(style, parse_emphasis(line))));
        flow.push(Flow::Spacer(0.2 * INCH));
    }

    render_flow(&flow, setup, Some("Cover Letter"))
}

/// Calibri 11, one justified paragraph per line.
pub fn cover_letter_docx(text: &str) -> Result<Vec<u8>, RenderError> {
    let mut doc = DocxBuilder::new(PageMargins::DEFAULT).title("Cover Letter");
    for line in non_blank_lines(text) {
        let mut paragraph = DocxParagraph::text(parse_emphasis(line));
        paragraph.justification = Justification::Both;
        doc.push(paragraph);
    }
    doc.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Interview Q&A
// ────────────────────────────────────────────────────────────────────────────

/// A4, 72pt margins, Helvetica 10 on 12pt leading, 12pt after each line.
pub fn interview_pdf(text: &str) -> RenderedPdf {
    let (width, height) = PageSize::A4.dimensions();
    let setup = PageSetup {
        width,
        height,
        margin_x: 72.0,
        margin_y: 72.0,
    };
    let style = ParagraphStyle {
        font_size: 10.0,
        leading: 12.0,
        color: Rgb::BLACK,
        align: Align::Left,
        space_before: 0.0,
        space_after: 0.0,
        bold: false,
    };

    let mut flow = Vec::new();
    for line in non_blank_lines(text) {
        flow.push(Flow::Paragraph(Paragraph::new(style, parse_emphasis(line))));
        flow.push(Flow::Spacer(12.0));
    }

    render_flow(&flow, setup, Some("Interview Questions & Answers"))
}

pub fn interview_docx(text: &str) -> Result<Vec<u8>, RenderError> {
    let mut doc = DocxBuilder::new(PageMargins::DEFAULT).title("Interview Questions & Answers");
    for line in non_blank_lines(text) {
        doc.push(DocxParagraph::text(parse_emphasis(line)));
    }
    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    const LETTER: &str = "\nDear Hiring Manager,\n\nI am excited to apply.\n\nSincerely,\nJane\n";

    fn document_xml(bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name("word/document.xml").unwrap();
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_cover_letter_pdf_is_single_page() {
        let pdf = cover_letter_pdf(LETTER);
        assert!(pdf.bytes.starts_with(b"%PDF-"));
        assert_eq!(pdf.page_count, 1);
    }

    #[test]
    fn test_cover_letter_docx_one_justified_paragraph_per_line() {
        let xml = document_xml(&cover_letter_docx(LETTER).unwrap());
        assert_eq!(xml.matches("<w:p>").count(), 4);
        assert_eq!(xml.matches(r#"<w:jc w:val="both"/>"#).count(), 4);
        assert!(xml.contains("Dear Hiring Manager,"));
    }

    #[test]
    fn test_interview_pdf_paginates_long_text() {
        let text: String = (1..=80)
            .map(|i| format!("Q{i}: Describe a system you designed.\nA: I built a queue.\n"))
            .collect();
        let pdf = interview_pdf(&text);
        assert!(pdf.page_count > 1);
    }

    #[test]
    fn test_interview_docx_is_left_aligned() {
        let xml = document_xml(&interview_docx("Q1: Why Rust?\nA: Safety.").unwrap());
        assert_eq!(xml.matches("<w:p>").count(), 2);
        assert!(!xml.contains("<w:jc"));
    }

    #[test]
    fn test_export_plain_names_and_types() {
        let file = export_plain(ExportKind::Interview, ExportFormat::Docx, "Q1: Why?").unwrap();
        assert_eq!(file.file_name, "interview_qa.docx");
        assert!(file.content_type.contains("wordprocessingml"));

        let file = export_plain(ExportKind::CoverLetter, ExportFormat::Pdf, LETTER).unwrap();
        assert_eq!(file.file_name, "cover_letter.pdf");
        assert_eq!(file.content_type, "application/pdf");
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(ExportKind::from_path("cover-letter"), Some(ExportKind::CoverLetter));
        assert_eq!(ExportKind::from_path("resume"), None);
        assert_eq!(ExportFormat::from_path("docx"), Some(ExportFormat::Docx));
        assert_eq!(ExportFormat::from_path("odt"), None);
    }
}
