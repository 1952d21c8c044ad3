//! Document endpoints: template catalog, parsing, rendering, export and
//! text extraction. Rendering runs on the blocking pool.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::document::{parse_document, Document};
use crate::errors::AppError;
use crate::extract::extract_resume_text;
use crate::render::template::TemplateInfo;
use crate::render::{
    catalog, export_cv_docx, export_plain, render_cv_pdf, ExportFormat, ExportKind, RenderOptions,
    TemplateId,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderPdfRequest {
    pub content: String,
    /// Template name; professional when absent.
    pub template: Option<String>,
    /// Overrides the configured line budget.
    pub line_budget: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub document: Document,
    pub total_lines: usize,
    /// The document re-serialized: header lines, then each heading and its lines.
    pub normalized: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: String,
    pub text: String,
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(catalog())
}

/// POST /api/v1/documents/parse
pub async fn handle_parse(Json(request): Json<ContentRequest>) -> Json<ParseResponse> {
    let document = parse_document(&request.content);
    debug!(
        mode = ?document.mode,
        sections = ?document.names().collect::<Vec<_>>(),
        "Parsed document"
    );
    Json(ParseResponse {
        total_lines: document.total_lines(),
        normalized: document.to_text(),
        document,
    })
}

/// POST /api/v1/render/pdf
///
/// Parses, trims to the line budget and renders with the chosen template.
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(request): Json<RenderPdfRequest>,
) -> Result<Response, AppError> {
    let template = match request.template.as_deref() {
        None => TemplateId::Professional,
        Some(name) => TemplateId::from_name(name).ok_or_else(|| {
            AppError::Validation(format!(
                "Unknown template '{name}'. Expected one of: {}",
                TemplateId::ALL.map(|t| t.as_str()).join(", ")
            ))
        })?,
    };
    let options = RenderOptions {
        template,
        line_budget: request.line_budget.unwrap_or(state.config.line_budget),
    };

    let render_id = Uuid::new_v4();
    let span = info_span!("render_pdf", %render_id, template = %template);
    let content = request.content;
    let rendered = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        render_cv_pdf(&content, &options)
    })
    .await?;

    let trimmed = rendered.trim.lines_before - rendered.trim.lines_after;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment(&format!("cv_{template}.pdf")),
            ),
            (HeaderName::from_static("x-page-count"), rendered.pdf.page_count.to_string()),
            (HeaderName::from_static("x-render-id"), render_id.to_string()),
            (HeaderName::from_static("x-lines-trimmed"), trimmed.to_string()),
        ],
        rendered.pdf.bytes,
    )
        .into_response())
}

/// POST /api/v1/render/docx
pub async fn handle_render_docx(Json(request): Json<ContentRequest>) -> Result<Response, AppError> {
    let content = request.content;
    let bytes = tokio::task::spawn_blocking(move || export_cv_docx(&content)).await??;
    info!(bytes = bytes.len(), "Exported CV to DOCX");

    Ok((
        [
            (header::CONTENT_TYPE, ExportFormat::Docx.content_type().to_string()),
            (header::CONTENT_DISPOSITION, attachment("cv.docx")),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/v1/export/:kind/:format
///
/// `kind` is `cover-letter` or `interview`; `format` is `pdf` or `docx`.
pub async fn handle_export(
    Path((kind, format)): Path<(String, String)>,
    Json(request): Json<ContentRequest>,
) -> Result<Response, AppError> {
    let kind = ExportKind::from_path(&kind)
        .ok_or_else(|| AppError::NotFound(format!("Unknown export kind '{kind}'")))?;
    let format = ExportFormat::from_path(&format)
        .ok_or_else(|| AppError::NotFound(format!("Unknown export format '{format}'")))?;
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let content = request.content;
    let file = tokio::task::spawn_blocking(move || export_plain(kind, format, &content)).await??;

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, attachment(&file.file_name)),
        ],
        file.bytes,
    )
        .into_response())
}

/// POST /api/v1/extract (multipart, field `file`)
///
/// Unsupported or unreadable files yield empty text rather than an error.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;

        let name = file_name.clone();
        let text = tokio::task::spawn_blocking(move || extract_resume_text(&name, &bytes)).await?;
        info!(file_name = %file_name, chars = text.len(), "Extracted upload text");

        return Ok(Json(ExtractResponse { file_name, text }));
    }

    Err(AppError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}
