//! CV render pipeline: parse → line budget → template blocks → PDF.
//!
//! The budget stage runs for every template with the caller's budget.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::{parse_document, ParseMode};
use crate::layout::budget::{trim_sections_to_fit, TrimReport, DEFAULT_LINE_BUDGET};
use crate::render::blocks::build_resume_flow;
use crate::render::pdf::{render_flow, PageSetup, RenderedPdf};
use crate::render::template::TemplateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub template: TemplateId,
    pub line_budget: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            template: TemplateId::Professional,
            line_budget: DEFAULT_LINE_BUDGET,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedCv {
    pub pdf: RenderedPdf,
    pub trim: TrimReport,
    pub mode: ParseMode,
}

/// Renders CV text to a PDF with the chosen template.
pub fn render_cv_pdf(content: &str, options: &RenderOptions) -> RenderedCv {
    let document = parse_document(content);
    if document.is_empty() {
        debug!("No sections found, rendering a blank page");
    }
    let mode = document.mode;
    let (document, trim) = trim_sections_to_fit(document, options.line_budget);

    let style = options.template.style();
    let flow = build_resume_flow(&document, &style);
    let pdf = render_flow(&flow, PageSetup::from(&style), Some("Curriculum Vitae"));

    info!(
        template = %options.template,
        mode = ?mode,
        lines_before = trim.lines_before,
        lines_after = trim.lines_after,
        within_budget = trim.within_budget,
        pages = pdf.page_count,
        "Rendered CV"
    );

    RenderedCv { pdf, trim, mode }
}
