//! Review objects produced by the external AI review service.
//!
//! `CvReview` mirrors the full payload the review service returns; the
//! structuring core only ever sees the flattened `ReviewHints`.

use serde::{Deserialize, Serialize};

/// Which upstream model produced the review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ReviewProvider {
    #[default]
    Gemini,
    DeepSeek,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGapAnalysis {
    pub missing_skills: Vec<String>,
    pub trending_skills: Vec<String>,
    pub skill_match_score: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtsOptimization {
    pub compatibility_score: f64,
    pub missing_keywords: Vec<String>,
    pub content_optimization: String,
    pub formatting_tips: Vec<String>,
    pub ats_friendly_format: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamicContent {
    pub professional_summary: String,
    pub key_achievements: Vec<String>,
    pub skills_section: String,
    pub tailored_experience: Vec<String>,
}

/// Full review object. Every field tolerates being absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvReview {
    pub score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub structure_feedback: String,
    pub grammar_feedback: String,
    pub suggestions: Vec<String>,
    pub provider: ReviewProvider,
    pub ats_score: f64,
    pub ats_feedback: String,
    pub skill_gap_analysis: Option<SkillGapAnalysis>,
    pub ats_optimization: Option<AtsOptimization>,
    pub dynamic_content: Option<DynamicContent>,
}

/// Flat hints consumed by the CV structurer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewHints {
    pub missing_keywords: Vec<String>,
    pub missing_skills: Vec<String>,
    pub key_achievements: Vec<String>,
    pub professional_summary: String,
    pub tailored_experience: Vec<String>,
}

impl From<&CvReview> for ReviewHints {
    fn from(review: &CvReview) -> Self {
        let dynamic = review.dynamic_content.clone().unwrap_or_default();
        Self {
            missing_keywords: review
                .ats_optimization
                .as_ref()
                .map(|a| a.missing_keywords.clone())
                .unwrap_or_default(),
            missing_skills: review
                .skill_gap_analysis
                .as_ref()
                .map(|s| s.missing_skills.clone())
                .unwrap_or_default(),
            key_achievements: dynamic.key_achievements,
            professional_summary: dynamic.professional_summary,
            tailored_experience: dynamic.tailored_experience,
        }
    }
}
