//! Field Classifier — sorts candidate skill tokens into technical / soft / other.
//!
//! Classification is an ordered list of `ClassificationRule`s; the first rule
//! that returns a bucket wins:
//! 1. explicit subsection the token was found in ("SOFT SKILLS: ...")
//! 2. technical keyword pattern or well-known language/tool
//! 3. soft-skill pattern
//! 4. other

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::cv::{SkillBucket, SkillSet};
use crate::structuring::patterns::trim_bullet;

const MIN_SKILL_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    "and", "the", "or", "in", "on", "at", "to", "for", "of", "with", "by", "etc", "using",
    "including", "various", "other",
];

/// Matched per word. Entries shorter than `MIN_SKILL_CHARS` ("c", "go")
/// only fire inside multi-word tokens such as "Go microservices".
const KNOWN_TOOLS: &[&str] = &[
    "java", "python", "c", "c++", "c#", "javascript", "typescript", "ruby", "php", "swift",
    "kotlin", "go", "golang", "rust", "scala", "perl", "bash", "sql", "nosql", "html", "css",
    "react", "react.js", "angular", "vue", "vue.js", "node", "node.js", "express", "django",
    "flask", "spring", "docker", "kubernetes", "k8s", "git", "aws", "azure", "gcp", "terraform",
    "ansible", "jenkins", "linux", "graphql", "postgresql", "postgres", "mysql", "mongodb",
    "redis", "kafka", "spark", "hadoop", "tensorflow", "pytorch", "excel", "tableau",
];

static TECHNICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)programming|software|development|engineering|database|cloud|devops|front[- ]?end|back[- ]?end|full[- ]?stack|\bdata\b|security|\bweb\b|mobile|testing|automation|machine learning|\bapis?\b",
    )
    .expect("technical skill regex")
});

static SOFT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)leadership|communication|team ?work|management|problem[- ]solving|analytical|organi[sz]ation|interpersonal|collaboration|adaptability|creativity|critical[- ]thinking|mentoring|negotiation|presentation|public speaking",
    )
    .expect("soft skill regex")
});

// ────────────────────────────────────────────────────────────────────────────
// Candidate tokens
// ────────────────────────────────────────────────────────────────────────────

/// Splits a skills-like block into candidate tokens. A leading `Label:`
/// ("Frameworks: React") is dropped.
pub fn split_skill_tokens(body: &str) -> Vec<String> {
    body.split([',', ';', '|', '\n', '•'])
        .map(|raw| {
            let token = trim_bullet(raw);
            let token = match token.split_once(':') {
                Some((_, rest)) if !rest.trim().is_empty() => rest.trim(),
                _ => token,
            };
            token.trim_end_matches('.').trim().to_string()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Drops tokens that cannot be skills: too short, stopwords, pure numbers,
/// template placeholders.
pub fn is_valid_skill(token: &str) -> bool {
    let token = token.trim();
    token.chars().count() >= MIN_SKILL_CHARS
        && !STOPWORDS.iter().any(|w| w.eq_ignore_ascii_case(token))
        && !token.chars().all(|c| c.is_ascii_digit())
        && !token.starts_with('[')
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || matches!(c, '/' | '(' | ')' | ','))
        .map(|w| w.trim_end_matches('.').to_lowercase())
        .filter(|w| !w.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// One step of the classification precedence list.
pub trait ClassificationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, skill: &str) -> Option<SkillBucket>;
}

/// Body of an explicitly labelled skills subsection found in the document.
#[derive(Debug, Clone)]
pub struct ExplicitSubsection {
    pub bucket: SkillBucket,
    /// Byte offset of the subsection heading; lower comes first.
    pub position: usize,
    body_lower: String,
    tokens: HashSet<String>,
}

impl ExplicitSubsection {
    pub fn new(bucket: SkillBucket, position: usize, body: &str) -> Self {
        Self {
            bucket,
            position,
            body_lower: body.to_lowercase(),
            tokens: split_skill_tokens(body)
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    fn has_token(&self, skill_lower: &str) -> bool {
        self.tokens.contains(skill_lower)
    }

    fn mentions(&self, skill_lower: &str) -> bool {
        self.body_lower.contains(skill_lower)
    }
}

/// Explicit subsections beat patterns. A subsection listing the skill as a
/// whole token wins over one that only contains it as a substring; among
/// equals, the one earliest in the document wins.
pub struct ExplicitSectionRule {
    subsections: Vec<ExplicitSubsection>,
}

impl ExplicitSectionRule {
    pub fn new(mut subsections: Vec<ExplicitSubsection>) -> Self {
        subsections.sort_by_key(|s| s.position);
        Self { subsections }
    }
}

impl ClassificationRule for ExplicitSectionRule {
    fn name(&self) -> &'static str {
        "explicit_section"
    }

    fn classify(&self, skill: &str) -> Option<SkillBucket> {
        let lower = skill.to_lowercase();
        self.subsections
            .iter()
            .find(|s| s.has_token(&lower))
            .or_else(|| self.subsections.iter().find(|s| s.mentions(&lower)))
            .map(|s| s.bucket)
    }
}

pub struct TechnicalPatternRule;

impl ClassificationRule for TechnicalPatternRule {
    fn name(&self) -> &'static str {
        "technical_pattern"
    }

    fn classify(&self, skill: &str) -> Option<SkillBucket> {
        let known_tool = words(skill).any(|w| KNOWN_TOOLS.contains(&w.as_str()));
        (known_tool || TECHNICAL_RE.is_match(skill)).then_some(SkillBucket::Technical)
    }
}

pub struct SoftPatternRule;

impl ClassificationRule for SoftPatternRule {
    fn name(&self) -> &'static str {
        "soft_pattern"
    }

    fn classify(&self, skill: &str) -> Option<SkillBucket> {
        SOFT_RE.is_match(skill).then_some(SkillBucket::Soft)
    }
}

pub struct FallbackRule;

impl ClassificationRule for FallbackRule {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn classify(&self, _skill: &str) -> Option<SkillBucket> {
        Some(SkillBucket::Other)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classifier
// ────────────────────────────────────────────────────────────────────────────

pub struct FieldClassifier {
    rules: Vec<Box<dyn ClassificationRule>>,
}

impl FieldClassifier {
    /// Default precedence list seeded with the document's explicit subsections.
    pub fn new(explicit: Vec<ExplicitSubsection>) -> Self {
        Self::with_rules(vec![
            Box::new(ExplicitSectionRule::new(explicit)),
            Box::new(TechnicalPatternRule),
            Box::new(SoftPatternRule),
            Box::new(FallbackRule),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn ClassificationRule>>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, skill: &str) -> SkillBucket {
        self.rules
            .iter()
            .find_map(|rule| rule.classify(skill))
            .unwrap_or(SkillBucket::Other)
    }

    /// Filters, deduplicates (case-insensitively, first casing kept),
    /// classifies and alphabetically sorts the candidates.
    pub fn classify_all<I>(&self, candidates: I) -> SkillSet
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let mut skills = SkillSet::default();

        for candidate in candidates {
            let candidate = candidate.trim().to_string();
            if !is_valid_skill(&candidate) || !seen.insert(candidate.to_lowercase()) {
                continue;
            }
            let bucket = self.classify(&candidate);
            skills.bucket_mut(bucket).push(candidate);
        }

        for bucket in SkillBucket::ALL {
            skills
                .bucket_mut(bucket)
                .sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        }

        debug!(
            technical = skills.technical.len(),
            soft = skills.soft.len(),
            other = skills.other.len(),
            rules = ?self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            "Classified skills"
        );
        skills
    }
}
