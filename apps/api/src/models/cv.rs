//! Structured CV record — rebuilt from scratch for every structuring request.
//!
//! Field names serialize in camelCase because the browser client and the
//! document-writer templates consume them under those names.

use serde::{Deserialize, Serialize};

/// Contact block. Absent values are empty strings, never `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

/// The three skill buckets a token can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillBucket {
    Technical,
    Soft,
    Other,
}

impl SkillBucket {
    pub const ALL: [SkillBucket; 3] = [SkillBucket::Technical, SkillBucket::Soft, SkillBucket::Other];

    /// Label used on the rendered "SKILLS & COMPETENCIES" lines.
    pub fn label(self) -> &'static str {
        match self {
            SkillBucket::Technical => "Technical Skills",
            SkillBucket::Soft => "Soft Skills",
            SkillBucket::Other => "Additional Skills",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSet {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub other: Vec<String>,
}

impl SkillSet {
    pub fn bucket(&self, bucket: SkillBucket) -> &[String] {
        match bucket {
            SkillBucket::Technical => &self.technical,
            SkillBucket::Soft => &self.soft,
            SkillBucket::Other => &self.other,
        }
    }

    pub fn bucket_mut(&mut self, bucket: SkillBucket) -> &mut Vec<String> {
        match bucket {
            SkillBucket::Technical => &mut self.technical,
            SkillBucket::Soft => &mut self.soft,
            SkillBucket::Other => &mut self.other,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty() && self.other.is_empty()
    }

    /// Total number of skills across all buckets.
    pub fn len(&self) -> usize {
        self.technical.len() + self.soft.len() + self.other.len()
    }
}

/// One job. `points` is empty, not absent, when no bullet lines were found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub date: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredCv {
    /// Flattened plain-text rendering. Always regenerated from the fields
    /// below; see `formatting::content::format_cv`.
    pub content: String,
    pub personal_info: PersonalInfo,
    pub professional_summary: String,
    pub skills: SkillSet,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub achievements: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_cv_serializes_camel_case() {
        let cv = StructuredCv {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                ..Default::default()
            },
            professional_summary: "Engineer".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&cv).unwrap();
        assert_eq!(json["personalInfo"]["name"], "Jane Doe");
        assert_eq!(json["professionalSummary"], "Engineer");
        assert!(json["skills"]["technical"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cv: StructuredCv =
            serde_json::from_str(r#"{"personalInfo":{"name":"Jane"},"experience":[{"title":"Dev"}]}"#)
                .unwrap();
        assert_eq!(cv.personal_info.email, "");
        assert!(cv.experience[0].points.is_empty());
        assert!(cv.education.is_empty());
    }

    #[test]
    fn test_education_details_omitted_when_none() {
        let entry = EducationEntry {
            degree: "BSc".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_skill_set_bucket_access() {
        let mut skills = SkillSet::default();
        skills.bucket_mut(SkillBucket::Soft).push("Leadership".to_string());
        assert_eq!(skills.bucket(SkillBucket::Soft), ["Leadership".to_string()]);
        assert_eq!(skills.len(), 1);
        assert!(!skills.is_empty());
    }
}
