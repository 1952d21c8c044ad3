// Document rendering: five PDF résumé templates, the Word exporter and the
// plain cover-letter / interview exports. All functions are synchronous and
// CPU-bound; HTTP handlers call them from spawn_blocking.

pub mod blocks;
pub mod docx;
pub mod emphasis;
pub mod pdf;
pub mod pipeline;
pub mod plain;
pub mod template;

use thiserror::Error;

pub use docx::export_cv_docx;
pub use pipeline::{render_cv_pdf, RenderOptions};
pub use plain::{export_plain, ExportFormat, ExportKind};
pub use template::{catalog, TemplateId};

/// Errors from writing a document container.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
