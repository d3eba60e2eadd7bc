//! Text extraction — uploaded document bytes → cleaned plain text.
//!
//! `AppState` holds an `Arc<dyn TextExtractor>`, created once at startup.
//! Default: `DocumentTextExtractor` (PDF via `pdf-extract`, DOCX via `zip` +
//! `quick-xml`, plain text).

use std::io::{Cursor, Read};

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;

pub const PDF: &str = "application/pdf";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_TEXT: &str = "text/plain";

static INLINE_WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\u{a0}\u{0c}]+").expect("inline whitespace regex"));

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Could not read document: {0}")]
    Corrupt(String),

    #[error("No text could be extracted from the document")]
    Empty,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Returns cleaned text (see `clean_text`) for a document of the given
    /// MIME type.
    async fn extract(&self, bytes: Bytes, content_type: &str) -> Result<String, ExtractionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// DocumentTextExtractor
// ────────────────────────────────────────────────────────────────────────────

pub struct DocumentTextExtractor;

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, bytes: Bytes, content_type: &str) -> Result<String, ExtractionError> {
        let raw = match essence(content_type).as_str() {
            PDF => extract_pdf(bytes).await?,
            DOCX => extract_docx(bytes).await?,
            PLAIN_TEXT => String::from_utf8(bytes.to_vec())
                .map_err(|e| ExtractionError::Corrupt(format!("text is not valid UTF-8: {e}")))?,
            other => {
                warn!(content_type = other, "Rejected upload with unsupported type");
                return Err(ExtractionError::Unsupported(other.to_string()));
            }
        };

        let text = clean_text(&raw);
        if text.is_empty() {
            return Err(ExtractionError::Empty);
        }
        debug!(chars = text.len(), "Extracted document text");
        Ok(text)
    }
}

/// PDF parsing is CPU-bound and may panic on malformed input; both are
/// kept off the async executor.
async fn extract_pdf(bytes: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::Corrupt(format!("PDF parser aborted: {e}")))?
        .map_err(|e| ExtractionError::Corrupt(e.to_string()))
}

async fn extract_docx(bytes: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || docx_text(&bytes))
        .await
        .map_err(|e| ExtractionError::Corrupt(format!("DOCX reader aborted: {e}")))?
}

/// Text of `word/document.xml`: `w:t` runs joined, one line per `w:p`
/// paragraph, `w:br` as a line break and `w:tab` as a space.
fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let corrupt = |e: &dyn std::fmt::Display| ExtractionError::Corrupt(format!("invalid DOCX: {e}"));

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| corrupt(&e))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| corrupt(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| corrupt(&e))?;

    let mut reader = Reader::from_str(&xml);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(|e| corrupt(&e))? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => lines.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push(' '),
                b"w:br" | b"w:cr" => lines.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Text(t) if in_run_text => current.push_str(&t.unescape().map_err(|e| corrupt(&e))?),
            Event::Eof => break,
            _ => {}
        }
    }
    lines.push(current);

    Ok(lines.join("\n"))
}

/// `"text/plain; charset=utf-8"` → `"text/plain"`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// MIME type for an upload: the declared type unless it is missing or
/// generic, in which case the file extension decides.
pub fn resolve_content_type(declared: Option<&str>, file_name: Option<&str>) -> String {
    let declared = declared.map(essence).unwrap_or_default();
    if !declared.is_empty() && declared != "application/octet-stream" {
        return declared;
    }

    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => PDF.to_string(),
        Some("docx") => DOCX.to_string(),
        Some("txt") | Some("text") => PLAIN_TEXT.to_string(),
        _ => declared,
    }
}

/// Normalises line endings, collapses runs of spaces and tabs, trims each
/// line and drops blank ones. Line breaks are kept.
pub fn clean_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(|line| INLINE_WHITESPACE_RE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
