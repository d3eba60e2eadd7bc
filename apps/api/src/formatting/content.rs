//! Content Formatter — canonical plain-text layout of a `StructuredCv`.
//!
//! The output is shown to the user as-is and handed to the document
//! writer verbatim, so it must stay deterministic.

use crate::models::cv::{EducationEntry, ExperienceEntry, SkillBucket, StructuredCv};

pub const SUMMARY_HEADING: &str = "PROFESSIONAL SUMMARY";
pub const SKILLS_HEADING: &str = "SKILLS & COMPETENCIES";
pub const EXPERIENCE_HEADING: &str = "PROFESSIONAL EXPERIENCE";
pub const EDUCATION_HEADING: &str = "EDUCATION";
pub const ACHIEVEMENTS_HEADING: &str = "KEY ACHIEVEMENTS";

const BULLET: &str = "• ";

/// Renders the CV as plain text. Blocks without content are left out
/// entirely, heading included; blocks are separated by one blank line.
///
/// `cv.content` is ignored: the output is derived from the typed fields only.
pub fn format_cv(cv: &StructuredCv) -> String {
    let blocks = [
        header_block(cv),
        summary_block(&cv.professional_summary),
        skills_block(cv),
        experience_block(&cv.experience),
        education_block(&cv.education),
        achievements_block(&cv.achievements),
    ];

    blocks
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

fn header_block(cv: &StructuredCv) -> Option<String> {
    let info = &cv.personal_info;
    let lines: Vec<String> = [
        ("", info.name.trim()),
        ("Email: ", info.email.trim()),
        ("Phone: ", info.phone.trim()),
        ("Location: ", info.location.trim()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("{label}{value}"))
    .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn summary_block(summary: &str) -> Option<String> {
    let summary = summary.trim();
    (!summary.is_empty()).then(|| format!("{SUMMARY_HEADING}\n{summary}"))
}

fn skills_block(cv: &StructuredCv) -> Option<String> {
    let lines: Vec<String> = SkillBucket::ALL
        .into_iter()
        .filter(|bucket| !cv.skills.bucket(*bucket).is_empty())
        .map(|bucket| format!("{}: {}", bucket.label(), cv.skills.bucket(bucket).join(", ")))
        .collect();

    (!lines.is_empty()).then(|| format!("{SKILLS_HEADING}\n{}", lines.join("\n")))
}

fn experience_block(entries: &[ExperienceEntry]) -> Option<String> {
    let rendered: Vec<String> = entries.iter().filter_map(render_experience).collect();
    (!rendered.is_empty()).then(|| format!("{EXPERIENCE_HEADING}\n{}", rendered.join("\n\n")))
}

fn render_experience(entry: &ExperienceEntry) -> Option<String> {
    let mut lines: Vec<String> = [&entry.title, &entry.company, &entry.date]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    lines.extend(
        entry
            .points
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| format!("{BULLET}{p}")),
    );
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn education_block(entries: &[EducationEntry]) -> Option<String> {
    let rendered: Vec<String> = entries.iter().filter_map(render_education).collect();
    (!rendered.is_empty()).then(|| format!("{EDUCATION_HEADING}\n{}", rendered.join("\n\n")))
}

fn render_education(entry: &EducationEntry) -> Option<String> {
    let details = entry.details.as_deref().unwrap_or_default();
    let lines: Vec<&str> = [entry.degree.as_str(), entry.school.as_str(), entry.date.as_str(), details]
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn achievements_block(achievements: &[String]) -> Option<String> {
    let lines: Vec<String> = achievements
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(|a| format!("{BULLET}{a}"))
        .collect();
    (!lines.is_empty()).then(|| format!("{ACHIEVEMENTS_HEADING}\n{}", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{PersonalInfo, SkillSet};

    fn sample() -> StructuredCv {
        StructuredCv {
            content: "stale".to_string(),
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: "555-123-4567".to_string(),
                location: String::new(),
            },
            professional_summary: "Backend engineer.".to_string(),
            skills: SkillSet {
                technical: vec!["Docker".to_string(), "Rust".to_string()],
                soft: vec![],
                other: vec!["Spanish".to_string()],
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
                date: "2019".to_string(),
                details: Some("GPA: 3.8".to_string()),
            }],
            achievements: vec!["Shipped v2 ahead of schedule".to_string()],
        }
    }

    #[test]
    fn test_canonical_layout() {
        let expected = "Jane Doe\nEmail: jane@x.com\nPhone: 555-123-4567\n\n\
PROFESSIONAL SUMMARY\nBackend engineer.\n\n\
SKILLS & COMPETENCIES\nTechnical Skills: Docker, Rust\nAdditional Skills: Spanish\n\n\
PROFESSIONAL EXPERIENCE\nSoftware Engineer\nAcme Inc.\n2020 - Present\n• Built APIs\n\n\
EDUCATION\nBSc Computer Science\nState University\n2019\nGPA: 3.8\n\n\
KEY ACHIEVEMENTS\n• Shipped v2 ahead of schedule";
        assert_eq!(format_cv(&sample()), expected);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let cv = sample();
        assert_eq!(format_cv(&cv), format_cv(&cv));

        let mut regenerated = cv.clone();
        regenerated.content = format_cv(&cv);
        assert_eq!(format_cv(&regenerated), format_cv(&cv));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let cv = StructuredCv {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(format_cv(&cv), "Jane Doe");
        assert_eq!(format_cv(&StructuredCv::default()), "");
    }

    #[test]
    fn test_multiple_entries_separated_by_blank_line() {
        let mut cv = StructuredCv::default();
        cv.experience = vec![
            ExperienceEntry {
                title: "Lead".to_string(),
                company: "Hooli".to_string(),
                ..Default::default()
            },
            ExperienceEntry {
                title: "Engineer".to_string(),
                points: vec!["Wrote tests".to_string()],
                ..Default::default()
            },
        ];
        assert_eq!(
            format_cv(&cv),
            "PROFESSIONAL EXPERIENCE\nLead\nHooli\n\nEngineer\n• Wrote tests"
        );
    }
}
