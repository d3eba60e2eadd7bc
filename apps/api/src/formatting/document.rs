//! Typed section stream for the document writer (DOCX/RTF templates).
//!
//! Mirrors the plain-text layout of `format_cv` block for block, so both
//! renderings of one CV always agree on what is shown.

use serde::{Deserialize, Serialize};

use crate::formatting::content::{
    ACHIEVEMENTS_HEADING, EDUCATION_HEADING, EXPERIENCE_HEADING, SKILLS_HEADING, SUMMARY_HEADING,
};
use crate::models::cv::{SkillBucket, StructuredCv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Bullet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub kind: SectionKind,
    pub text: String,
}

impl DocumentSection {
    fn new(kind: SectionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

pub fn to_document_sections(cv: &StructuredCv) -> Vec<DocumentSection> {
    let mut out = Vec::new();
    let info = &cv.personal_info;

    push_nonempty(&mut out, SectionKind::Heading1, &info.name);
    let contact = [&info.email, &info.phone, &info.location]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    push_nonempty(&mut out, SectionKind::Paragraph, &contact);

    if !cv.professional_summary.trim().is_empty() {
        out.push(DocumentSection::new(SectionKind::Heading2, SUMMARY_HEADING));
        push_nonempty(&mut out, SectionKind::Paragraph, &cv.professional_summary);
    }

    if !cv.skills.is_empty() {
        out.push(DocumentSection::new(SectionKind::Heading2, SKILLS_HEADING));
        for bucket in SkillBucket::ALL {
            let skills = cv.skills.bucket(bucket);
            if !skills.is_empty() {
                out.push(DocumentSection::new(
                    SectionKind::Paragraph,
                    format!("{}: {}", bucket.label(), skills.join(", ")),
                ));
            }
        }
    }

    if !cv.experience.is_empty() {
        out.push(DocumentSection::new(SectionKind::Heading2, EXPERIENCE_HEADING));
        for job in &cv.experience {
            push_nonempty(&mut out, SectionKind::Heading3, &job.title);
            push_nonempty(&mut out, SectionKind::Paragraph, &dash_join(&job.company, &job.date));
            for point in &job.points {
                push_nonempty(&mut out, SectionKind::Bullet, point);
            }
        }
    }

    if !cv.education.is_empty() {
        out.push(DocumentSection::new(SectionKind::Heading2, EDUCATION_HEADING));
        for edu in &cv.education {
            push_nonempty(&mut out, SectionKind::Heading3, &edu.degree);
            push_nonempty(&mut out, SectionKind::Paragraph, &dash_join(&edu.school, &edu.date));
            if let Some(details) = &edu.details {
                push_nonempty(&mut out, SectionKind::Paragraph, details);
            }
        }
    }

    if cv.achievements.iter().any(|a| !a.trim().is_empty()) {
        out.push(DocumentSection::new(SectionKind::Heading2, ACHIEVEMENTS_HEADING));
        for achievement in &cv.achievements {
            push_nonempty(&mut out, SectionKind::Bullet, achievement);
        }
    }

    out
}

fn push_nonempty(out: &mut Vec<DocumentSection>, kind: SectionKind, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        out.push(DocumentSection::new(kind, text));
    }
}

/// `"Acme Inc. - 2020 - Present"`, or whichever half is present.
fn dash_join(left: &str, right: &str) -> String {
    match (left.trim(), right.trim()) {
        ("", r) => r.to_string(),
        (l, "") => l.to_string(),
        (l, r) => format!("{l} - {r}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{EducationEntry, ExperienceEntry, PersonalInfo, SkillSet};

    fn kinds(sections: &[DocumentSection]) -> Vec<SectionKind> {
        sections.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_full_cv_section_stream() {
        let cv = StructuredCv {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: "555-123-4567".to_string(),
                location: "Austin, TX".to_string(),
            },
            skills: SkillSet {
                soft: vec!["Leadership".to_string()],
                ..Default::default()
            },
            experience: vec![ExperienceEntry {
                title: "Software Engineer".to_string(),
                company: "Acme Inc.".to_string(),
                date: "2020 - Present".to_string(),
                points: vec!["Built APIs".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "BSc Computer Science".to_string(),
                school: "State University".to_string(),
                date: String::new(),
                details: None,
            }],
            ..Default::default()
        };

        let sections = to_document_sections(&cv);
        use SectionKind::*;
        assert_eq!(
            kinds(&sections),
            vec![
                Heading1, Paragraph, Heading2, Paragraph, Heading2, Heading3, Paragraph, Bullet,
                Heading2, Heading3, Paragraph,
            ]
        );
        assert_eq!(sections[1].text, "jane@x.com | 555-123-4567 | Austin, TX");
        assert_eq!(sections[3].text, "Soft Skills: Leadership");
        assert_eq!(sections[6].text, "Acme Inc. - 2020 - Present");
        assert_eq!(sections[10].text, "State University");
    }

    #[test]
    fn test_empty_cv_has_no_sections() {
        assert!(to_document_sections(&StructuredCv::default()).is_empty());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_value(DocumentSection::new(SectionKind::Heading2, "EDUCATION")).unwrap();
        assert_eq!(json["kind"], "heading2");
        assert_eq!(json["text"], "EDUCATION");
    }
}
