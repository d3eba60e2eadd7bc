//! CV Structurer — turns raw document text plus review hints into a
//! `StructuredCv`.
//!
//! Pure and synchronous: no I/O, no shared state. Every stage tolerates
//! absence (missing section, missing field) and resolves it to an empty
//! default; the only failure is having nothing to work from.

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::formatting::content::format_cv;
use crate::formatting::document::{to_document_sections, DocumentSection};
use crate::models::cv::{SkillBucket, SkillSet, StructuredCv};
use crate::models::review::ReviewHints;
use crate::structuring::classifier::{split_skill_tokens, ExplicitSubsection, FieldClassifier};
use crate::structuring::patterns::{is_placeholder, trim_bullet};
use crate::structuring::personal::extract_personal_info;
use crate::structuring::section::extract_section;
use crate::structuring::segmenter::{segment_education, segment_experience};

pub const EXPERIENCE_HEADINGS: &[&str] = &[
    "EXPERIENCE",
    "WORK EXPERIENCE",
    "PROFESSIONAL EXPERIENCE",
    "EMPLOYMENT HISTORY",
    "EMPLOYMENT",
];

pub const EDUCATION_HEADINGS: &[&str] =
    &["EDUCATION", "ACADEMIC BACKGROUND", "ACADEMIC QUALIFICATIONS"];

pub const SUMMARY_HEADINGS: &[&str] = &[
    "PROFESSIONAL SUMMARY",
    "SUMMARY",
    "PROFILE",
    "OBJECTIVE",
    "ABOUT ME",
];

const TECHNICAL_SKILL_HEADINGS: &[&str] = &["TECHNICAL SKILLS", "PROGRAMMING SKILLS"];
const SOFT_SKILL_HEADINGS: &[&str] = &["SOFT SKILLS", "INTERPERSONAL SKILLS", "PERSONAL SKILLS"];
const OTHER_SKILL_HEADINGS: &[&str] = &[
    "OTHER SKILLS",
    "ADDITIONAL SKILLS",
    "CERTIFICATIONS",
    "LANGUAGES",
];
const GENERAL_SKILL_HEADINGS: &[&str] = &["SKILLS", "COMPETENCIES", "CORE COMPETENCIES", "KEY SKILLS"];

const ACHIEVEMENT_HEADINGS: &[&str] = &[
    "ACHIEVEMENTS",
    "KEY ACHIEVEMENTS",
    "ACCOMPLISHMENTS",
    "AWARDS",
    "HONORS",
    "RECOGNITION",
];

const MIN_ACHIEVEMENT_CHARS: usize = 10;

static ACHIEVEMENT_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:key\s+)?(?:achievements?|accomplishments?|awards?|honou?rs?|recognition)$")
        .expect("achievement header regex")
});

#[derive(Debug, Error, PartialEq)]
pub enum StructureError {
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
}

/// Builds a structured CV from extracted document text and review hints.
///
/// Fails only when the text is blank or the hints object is absent.
pub fn structure_cv(
    raw_text: &str,
    hints: Option<&ReviewHints>,
) -> Result<StructuredCv, StructureError> {
    let text = normalize_line_endings(raw_text);
    if text.trim().is_empty() {
        return Err(StructureError::EmptyInput("CV text cannot be empty"));
    }
    let hints = hints.ok_or(StructureError::EmptyInput("CV review data is required"))?;

    let mut cv = StructuredCv {
        personal_info: extract_personal_info(&text),
        professional_summary: extract_summary(&text, hints),
        skills: collect_skills(&text, hints),
        experience: extract_section(&text, EXPERIENCE_HEADINGS)
            .map(|s| segment_experience(s.body))
            .unwrap_or_default(),
        education: extract_section(&text, EDUCATION_HEADINGS)
            .map(|s| segment_education(s.body))
            .unwrap_or_default(),
        achievements: collect_achievements(&text, hints),
        ..Default::default()
    };
    cv.content = format_cv(&cv);

    debug!(
        skills = cv.skills.len(),
        experience = cv.experience.len(),
        education = cv.education.len(),
        achievements = cv.achievements.len(),
        "Structured CV"
    );
    Ok(cv)
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Summary paragraph from the document, else the one suggested by the review.
fn extract_summary(text: &str, hints: &ReviewHints) -> String {
    extract_section(text, SUMMARY_HEADINGS)
        .map(|s| s.body.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| hints.professional_summary.trim().to_string())
}

fn collect_skills(text: &str, hints: &ReviewHints) -> SkillSet {
    let explicit: Vec<ExplicitSubsection> = [
        (SkillBucket::Technical, TECHNICAL_SKILL_HEADINGS),
        (SkillBucket::Soft, SOFT_SKILL_HEADINGS),
        (SkillBucket::Other, OTHER_SKILL_HEADINGS),
    ]
    .into_iter()
    .filter_map(|(bucket, names)| {
        extract_section(text, names).map(|s| ExplicitSubsection::new(bucket, s.span.start, s.body))
    })
    .collect();

    let mut candidates: Vec<String> = if explicit.is_empty() {
        extract_section(text, GENERAL_SKILL_HEADINGS)
            .map(|s| split_skill_tokens(s.body))
            .unwrap_or_default()
    } else {
        [TECHNICAL_SKILL_HEADINGS, SOFT_SKILL_HEADINGS, OTHER_SKILL_HEADINGS]
            .into_iter()
            .filter_map(|names| extract_section(text, names))
            .flat_map(|s| split_skill_tokens(s.body))
            .collect()
    };
    candidates.extend(hints.missing_keywords.iter().cloned());
    candidates.extend(hints.missing_skills.iter().cloned());

    FieldClassifier::new(explicit).classify_all(candidates)
}

/// Achievement lines from the document merged with review suggestions,
/// deduplicated case-insensitively and ordered longest first.
fn collect_achievements(text: &str, hints: &ReviewHints) -> Vec<String> {
    let from_cv: Vec<String> = extract_section(text, ACHIEVEMENT_HEADINGS)
        .map(|s| {
            s.body
                .split(['\n', '•'])
                .map(trim_bullet)
                .filter(|l| {
                    l.chars().count() >= MIN_ACHIEVEMENT_CHARS && !ACHIEVEMENT_HEADER_RE.is_match(l)
                })
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let from_hints = hints
        .key_achievements
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty() && !is_placeholder(a))
        .map(String::from);

    let mut seen = std::collections::HashSet::new();
    let mut achievements: Vec<String> = from_cv
        .into_iter()
        .chain(from_hints)
        .filter(|a| seen.insert(a.to_lowercase()))
        .collect();
    achievements.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    achievements
}

// ────────────────────────────────────────────────────────────────────────────
// ATS export
// ────────────────────────────────────────────────────────────────────────────

/// Everything the client needs to show and export an ATS-friendly CV.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsFriendlyCv {
    pub original_cv: String,
    pub improved_cv: String,
    pub cv: StructuredCv,
    pub sections: Vec<DocumentSection>,
    /// Review-suggested experience lines, surfaced only when no experience
    /// entry could be recovered from the document.
    pub tailored_experience: Vec<String>,
    pub generated_on: NaiveDate,
}

pub fn generate_ats_friendly_cv(
    raw_text: &str,
    hints: Option<&ReviewHints>,
) -> Result<AtsFriendlyCv, StructureError> {
    let cv = structure_cv(raw_text, hints)?;
    let tailored_experience = match hints {
        Some(h) if cv.experience.is_empty() => h.tailored_experience.clone(),
        _ => Vec::new(),
    };

    Ok(AtsFriendlyCv {
        original_cv: raw_text.to_string(),
        improved_cv: cv.content.clone(),
        sections: to_document_sections(&cv),
        cv,
        tailored_experience,
        generated_on: Utc::now().date_naive(),
    })
}
