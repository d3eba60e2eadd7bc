//! Structured CV → display text and document-writer sections.

pub mod content;
pub mod document;

pub use content::format_cv;
pub use document::{to_document_sections, DocumentSection};
