//! Axum route handlers for the CV API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::resolve_content_type;
use crate::formatting::{format_cv, to_document_sections, DocumentSection};
use crate::models::cv::StructuredCv;
use crate::models::review::{CvReview, ReviewHints};
use crate::state::AppState;
use crate::structuring::{generate_ats_friendly_cv, structure_cv, AtsFriendlyCv};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRequest {
    #[serde(default)]
    pub raw_text: String,
    /// Full review object; flattened into hints when `hints` is absent.
    pub review: Option<CvReview>,
    pub hints: Option<ReviewHints>,
}

impl StructureRequest {
    fn resolved_hints(&self) -> Option<ReviewHints> {
        self.hints
            .clone()
            .or_else(|| self.review.as_ref().map(ReviewHints::from))
    }
}

#[derive(Debug, Serialize)]
pub struct StructureResponse {
    pub cv: StructuredCv,
    pub sections: Vec<DocumentSection>,
}

#[derive(Debug, Serialize)]
pub struct FormatResponse {
    pub content: String,
    pub sections: Vec<DocumentSection>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// Fields of a `multipart/form-data` CV upload.
#[derive(Debug, Default)]
struct CvUpload {
    file: Option<UploadedFile>,
    review: Option<String>,
}

#[derive(Debug)]
struct UploadedFile {
    bytes: Bytes,
    content_type: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/structure
///
/// Structures already-extracted CV text using the review's hints.
pub async fn handle_structure(
    Json(request): Json<StructureRequest>,
) -> Result<Json<StructureResponse>, AppError> {
    let hints = request.resolved_hints();
    let cv = structure_cv(&request.raw_text, hints.as_ref())?;
    let sections = to_document_sections(&cv);

    Ok(Json(StructureResponse { cv, sections }))
}

/// POST /api/v1/cv/format
///
/// Re-renders an edited CV. Any `content` sent by the client is discarded.
pub async fn handle_format(Json(cv): Json<StructuredCv>) -> Json<FormatResponse> {
    Json(FormatResponse {
        content: format_cv(&cv),
        sections: to_document_sections(&cv),
    })
}

/// POST /api/v1/cv/extract
///
/// Multipart `file` → cleaned plain text.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let text = extract_upload_text(&state, upload.file).await?;

    Ok(Json(ExtractResponse { text }))
}

/// POST /api/v1/cv/ats
///
/// Multipart `file` + `review` (JSON) → ATS-friendly CV with both renderings.
pub async fn handle_ats(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AtsFriendlyCv>, AppError> {
    let upload = read_upload(multipart).await?;
    let hints = upload
        .review
        .as_deref()
        .map(parse_review_hints)
        .transpose()?;
    let text = extract_upload_text(&state, upload.file).await?;

    let ats = generate_ats_friendly_cv(&text, hints.as_ref())?;
    info!(
        experience = ats.cv.experience.len(),
        skills = ats.cv.skills.len(),
        "Generated ATS-friendly CV"
    );
    Ok(Json(ats))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart) -> Result<CvUpload, AppError> {
    let mut upload = CvUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = resolve_content_type(field.content_type(), field.file_name());
                let bytes = field.bytes().await?;
                upload.file = Some(UploadedFile {
                    bytes,
                    content_type,
                });
            }
            "review" => upload.review = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(upload)
}

async fn extract_upload_text(
    state: &AppState,
    file: Option<UploadedFile>,
) -> Result<String, AppError> {
    let file = file.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    Ok(state.extractor.extract(file.bytes, &file.content_type).await?)
}

/// Accepts either the full review object or the flat hints shape.
fn parse_review_hints(raw: &str) -> Result<ReviewHints, AppError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| AppError::Validation(format!("review is not valid JSON: {e}")))?;

    let is_full_review = ["dynamicContent", "atsOptimization", "skillGapAnalysis", "score"]
        .iter()
        .any(|key| value.get(key).is_some());
    if is_full_review {
        let review: CvReview = serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("invalid review: {e}")))?;
        Ok(ReviewHints::from(&review))
    } else {
        serde_json::from_value(value).map_err(|e| AppError::Validation(format!("invalid review hints: {e}")))
    }
}
