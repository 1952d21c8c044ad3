//! Text source: plain text from an uploaded résumé.
//!
//! `.pdf` goes through `pdf-extract`; `.docx` is read straight from the zip
//! container by collecting the `w:t` runs of each `w:p` paragraph. Anything
//! else, and any extraction failure, yields an empty string.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Supported upload types, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Docx,
}

impl SourceKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(SourceKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(SourceKind::Docx)
        } else {
            None
        }
    }
}

/// Extracts plain text, or returns an empty string for unsupported types and
/// unreadable files.
pub fn extract_resume_text(file_name: &str, bytes: &[u8]) -> String {
    let Some(kind) = SourceKind::from_file_name(file_name) else {
        debug!(file_name, "Unsupported upload type, no text extracted");
        return String::new();
    };

    match try_extract(kind, bytes) {
        Ok(text) => {
            debug!(file_name, chars = text.len(), "Extracted resume text");
            text
        }
        Err(e) => {
            warn!(file_name, error = %e, "Resume text extraction failed");
            String::new()
        }
    }
}

pub fn try_extract(kind: SourceKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        // pdf-extract panics on some malformed files instead of returning Err.
        SourceKind::Pdf => std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| ExtractError::Pdf("parser panicked on malformed input".to_string()))?
            .map_err(|e| ExtractError::Pdf(e.to_string())),
        SourceKind::Docx => docx_text(bytes),
    }
}

/// Non-empty paragraph texts of `word/document.xml`, joined with `\n`.
fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
