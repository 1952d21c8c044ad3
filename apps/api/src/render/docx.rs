//! Word (DOCX) export.
//!
//! [`DocxBuilder`] writes a minimal WordprocessingML package (content types,
//! relationships, document, styles, core properties) into a zip container.
//! [`export_cv_docx`] applies the résumé rules on top of it, reading headings
//! through the same line classifier as the section parser.

use std::io::{Cursor, Write};

use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::{classify_lines, SourceLine};
use crate::document::lines::{is_bullet_line, is_role_row, SectionKind};
use crate::render::emphasis::{parse_emphasis, strip_emphasis, Span};
use crate::render::RenderError;

/// Twips per point.
const TWIPS_PER_PT: u32 = 20;

// ────────────────────────────────────────────────────────────────────────────
// Paragraph model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Both,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocxParagraph {
    pub runs: Vec<Span>,
    pub bottom_border: bool,
    /// Space after, in twips. `None` keeps the style default.
    pub space_after: Option<u32>,
    /// Exact single line spacing.
    pub single_spacing: bool,
    pub justification: Justification,
}

impl DocxParagraph {
    pub fn text(runs: Vec<Span>) -> Self {
        Self {
            runs,
            bottom_border: false,
            space_after: None,
            single_spacing: false,
            justification: Justification::Left,
        }
    }

    pub fn empty() -> Self {
        Self::text(Vec::new())
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from("<w:p>");

        let mut ppr = String::new();
        if self.bottom_border {
            ppr.push_str(
                r#"<w:pBdr><w:bottom w:val="single" w:sz="12" w:space="1" w:color="auto"/></w:pBdr>"#,
            );
        }
        match (self.space_after, self.single_spacing) {
            (Some(after), true) => ppr.push_str(&format!(
                r#"<w:spacing w:after="{after}" w:line="240" w:lineRule="auto"/>"#
            )),
            (Some(after), false) => ppr.push_str(&format!(r#"<w:spacing w:after="{after}"/>"#)),
            (None, true) => ppr.push_str(r#"<w:spacing w:line="240" w:lineRule="auto"/>"#),
            (None, false) => {}
        }
        if self.justification == Justification::Both {
            ppr.push_str(r#"<w:jc w:val="both"/>"#);
        }
        if !ppr.is_empty() {
            xml.push_str("<w:pPr>");
            xml.push_str(&ppr);
            xml.push_str("</w:pPr>");
        }

        for run in self.runs.iter().filter(|r| !r.text.is_empty()) {
            xml.push_str("<w:r>");
            if run.bold {
                xml.push_str("<w:rPr><w:b/></w:rPr>");
            }
            xml.push_str(r#"<w:t xml:space="preserve">"#);
            xml.push_str(&escape(run.text.as_str()));
            xml.push_str("</w:t></w:r>");
        }

        xml.push_str("</w:p>");
        xml
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Package builder
// ────────────────────────────────────────────────────────────────────────────

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl PageMargins {
    /// Word's default one-inch margins.
    pub const DEFAULT: PageMargins = PageMargins {
        top: 1440,
        bottom: 1440,
        left: 1440,
        right: 1440,
    };

    /// 0.5in top/bottom, 0.4in left/right.
    pub const NARROW: PageMargins = PageMargins {
        top: 720,
        bottom: 720,
        left: 576,
        right: 576,
    };
}

pub struct DocxBuilder {
    paragraphs: Vec<DocxParagraph>,
    margins: PageMargins,
    font: &'static str,
    /// Base font size in points.
    font_size: u32,
    title: Option<String>,
}

impl DocxBuilder {
    /// Calibri 11pt on a US Letter page.
    pub fn new(margins: PageMargins) -> Self {
        Self {
            paragraphs: Vec::new(),
            margins,
            font: "Calibri",
            font_size: 11,
            title: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn push(&mut self, paragraph: DocxParagraph) {
        self.paragraphs.push(paragraph);
    }

    /// Writes the zip package.
    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts: [(&str, String); 6] = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
            ("word/styles.xml", self.styles_xml()),
            ("word/document.xml", self.document_xml()),
            ("docProps/core.xml", self.core_xml()),
        ];
        for (name, body) in &parts {
            zip.start_file(*name, options)?;
            zip.write_all(body.as_bytes())?;
        }

        let bytes = zip.finish()?.into_inner();
        debug!(
            paragraphs = self.paragraphs.len(),
            bytes = bytes.len(),
            "Wrote DOCX"
        );
        Ok(bytes)
    }

    fn document_xml(&self) -> String {
        let body: String = self.paragraphs.iter().map(DocxParagraph::to_xml).collect();
        let m = self.margins;
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                "<w:body>{body}",
                r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/>"#,
                r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="720" w:footer="720" w:gutter="0"/>"#,
                "</w:sectPr></w:body></w:document>"
            ),
            body = body,
            top = m.top,
            right = m.right,
            bottom = m.bottom,
            left = m.left,
        )
    }

    fn styles_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
                r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/>"#,
                r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#,
                r#"</w:rPr></w:rPrDefault></w:docDefaults>"#,
                r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/>"#,
                r#"<w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:style>"#,
                "</w:styles>"
            ),
            font = self.font,
            size = self.font_size * 2,
        )
    }

    fn core_xml(&self) -> String {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let title = self.title.as_deref().map(|t| escape(t)).unwrap_or_default();
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "<dc:title>{title}</dc:title><dc:creator>{creator}</dc:creator>",
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>"#,
                "</cp:coreProperties>"
            ),
            title = title,
            creator = env!("CARGO_PKG_NAME"),
            now = now,
        )
    }
}

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    "</Types>"
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    "</Relationships>"
);

const DOCUMENT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    "</Relationships>"
);

// ────────────────────────────────────────────────────────────────────────────
// Résumé export
// ────────────────────────────────────────────────────────────────────────────

fn body_paragraph(runs: Vec<Span>) -> DocxParagraph {
    DocxParagraph {
        runs,
        bottom_border: false,
        space_after: Some(2 * TWIPS_PER_PT),
        single_spacing: true,
        justification: Justification::Both,
    }
}

/// Renders optimized CV text to DOCX bytes.
///
/// Works line by line on the raw text, skipping the delimited-format marker:
/// - a heading gets an empty paragraph before it and is written bold with a
///   bottom border;
/// - work-experience `Company | Role | Dates` rows get a 1pt spacer paragraph
///   before them and are bold;
/// - non-bullet project lines are bold;
/// - anywhere else `**x**` becomes a bold run and the markers are dropped.
///
/// Every written line is justified with 2pt after and single spacing.
pub fn export_cv_docx(content: &str) -> Result<Vec<u8>, RenderError> {
    let mut doc = DocxBuilder::new(PageMargins::NARROW).title("Curriculum Vitae");
    let mut kind = SectionKind::Other;

    let (_, lines) = classify_lines(content);
    for line in lines {
        let line = match line {
            SourceLine::Blank | SourceLine::Marker => continue,
            SourceLine::Heading(name) => {
                kind = SectionKind::of(&name);
                doc.push(DocxParagraph::empty());
                let mut heading = body_paragraph(vec![Span::bold(name)]);
                heading.bottom_border = true;
                doc.push(heading);
                continue;
            }
            SourceLine::Content(line) => line,
        };

        if kind == SectionKind::WorkExperience && is_role_row(line) {
            let mut spacer = DocxParagraph::empty();
            spacer.space_after = Some(TWIPS_PER_PT);
            doc.push(spacer);
            doc.push(body_paragraph(vec![Span::bold(strip_emphasis(line))]));
        } else if kind == SectionKind::Projects && !is_bullet_line(line) {
            doc.push(body_paragraph(vec![Span::bold(strip_emphasis(line))]));
        } else {
            doc.push(body_paragraph(parse_emphasis(line)));
        }
    }

    doc.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    const CV: &str = "\
Jane Doe
WORK EXPERIENCE:
Acme | Engineer | 2020-2023
• Tuned **Spark** jobs
Projects:
Search Engine
• Indexed <1M> docs & more
";

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = export_cv_docx(CV).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "docProps/core.xml",
        ] {
            assert!(names.contains(&part), "missing {part}");
        }
    }

    #[test]
    fn test_heading_has_bottom_border_and_bold() {
        let xml = read_part(&export_cv_docx(CV).unwrap(), "word/document.xml");
        assert!(xml.contains(
            r#"<w:pBdr><w:bottom w:val="single" w:sz="12" w:space="1" w:color="auto"/></w:pBdr>"#
        ));
        assert!(xml.contains(
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">WORK EXPERIENCE:</w:t></w:r>"#
        ));
    }

    #[test]
    fn test_mixed_case_heading_uses_shared_predicate() {
        let xml = read_part(&export_cv_docx(CV).unwrap(), "word/document.xml");
        assert_eq!(xml.matches("<w:pBdr>").count(), 2, "Projects: is a heading too");
        assert!(xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Search Engine</w:t>"#));
    }

    #[test]
    fn test_company_row_is_bold_with_spacer() {
        let xml = read_part(&export_cv_docx(CV).unwrap(), "word/document.xml");
        assert!(xml.contains(
            r#"<w:p><w:pPr><w:spacing w:after="20"/></w:pPr></w:p><w:p><w:pPr><w:spacing w:after="40" w:line="240" w:lineRule="auto"/><w:jc w:val="both"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Acme | Engineer | 2020-2023</w:t>"#
        ));
    }

    #[test]
    fn test_emphasis_markers_become_bold_runs() {
        let xml = read_part(&export_cv_docx(CV).unwrap(), "word/document.xml");
        assert!(!xml.contains("**"));
        assert!(xml.contains(r#"<w:t xml:space="preserve">• Tuned </w:t></w:r>"#));
        assert!(xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Spark</w:t>"#));
    }

    #[test]
    fn test_text_is_xml_escaped() {
        let xml = read_part(&export_cv_docx(CV).unwrap(), "word/document.xml");
        assert!(xml.contains("• Indexed &lt;1M&gt; docs &amp; more"));
    }

    #[test]
    fn test_margins_and_base_font() {
        let bytes = export_cv_docx(CV).unwrap();
        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains(r#"w:top="720" w:right="576" w:bottom="720" w:left="576""#));
        let styles = read_part(&bytes, "word/styles.xml");
        assert!(styles.contains(r#"w:ascii="Calibri""#));
        assert!(styles.contains(r#"<w:sz w:val="22"/>"#));
    }

    #[test]
    fn test_delimited_headings_match_parser() {
        let text = "#! cv-sections/1\nJane Doe\n## WORK EXPERIENCE\nACME CORP:\nAcme | Engineer | 2020\n• Shipped";
        let xml = read_part(&export_cv_docx(text).unwrap(), "word/document.xml");

        assert_eq!(xml.matches("<w:pBdr>").count(), 1);
        assert!(!xml.contains("cv-sections"));
        assert!(!xml.contains("##"));
        assert!(xml.contains(
            r#"<w:pBdr><w:bottom w:val="single" w:sz="12" w:space="1" w:color="auto"/></w:pBdr><w:spacing w:after="40" w:line="240" w:lineRule="auto"/><w:jc w:val="both"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">WORK EXPERIENCE:</w:t>"#
        ));
        // Content line, not a heading: plain run, no border.
        assert!(xml.contains(r#"<w:r><w:t xml:space="preserve">ACME CORP:</w:t></w:r>"#));
        assert!(xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Acme | Engineer | 2020</w:t>"#));
    }

    #[test]
    fn test_empty_content_is_valid_package() {
        let bytes = export_cv_docx("").unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains("<w:body><w:sectPr>"));
    }
}
