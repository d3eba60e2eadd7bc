//! Shared text patterns: dates, bullets, company suffixes, degrees, schools.
//!
//! Compiled once and reused by the section extractor, the entry segmenter
//! and the personal-info passes.

use once_cell::sync::Lazy;
use regex::{Match, Regex};

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

/// A single date token: `MM/YYYY`, `MM/YY`, `Month YYYY` or a bare year.
fn date_token() -> String {
    format!(r"(?:\b\d{{1,2}}/(?:\d{{4}}|\d{{2}})\b|\b{MONTH}\s+\d{{4}}\b|\b(?:19|20)\d{{2}}\b)")
}

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    let token = date_token();
    Regex::new(&format!(
        r"(?i){token}(?:\s*(?:-|–|—|\bto\b|\buntil\b)\s*(?:{token}|\bpresent\b|\bcurrent\b|\bnow\b|\btoday\b))?"
    ))
    .expect("date range regex")
});

static LEADING_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^\s*{}", date_token())).expect("leading date regex")
});

static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[•●▪◦‣∙·\-\*–]\s*|\d{1,2}[.)]\s+)").expect("bullet regex")
});

static COMPANY_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(?:Inc\.?|LLC|Ltd\.?|Limited|Corporation|Corp\.?|Company|Co\.|LLP|GmbH|PLC)(?:$|[\s,;|)])")
        .expect("company suffix regex")
});

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?i:bachelor|master|doctor(?:ate)?|associate|diploma)\b|\b(?:PhD|BSc|MSc|BEng|MEng|MBA|MD|BA|BS|MA|MS)\b|(?:B\.\s?A\.|B\.\s?S\.|M\.\s?A\.|M\.\s?S\.|M\.\s?B\.\s?A\.|Ph\.\s?D\.)",
    )
    .expect("degree regex")
});

static SCHOOL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:University|College|Institute|School|Academy|Polytechnic)\b").expect("school regex")
});

static GPA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bGPA\b:?\s*\d+(?:\.\d+)?|\d+\.\d+\s*GPA\b").expect("gpa regex")
});

static COURSEWORK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:courses|coursework|major|minor|thesis)\s*:").expect("coursework regex")
});

static HONORS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:honou?rs?|honou?r's|awards?|awarded|dean'?s list|cum laude|scholarship)\b")
        .expect("honors regex")
});

static LABELLED_DETAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{Lu}[\p{L}&/ ]{1,30}:[ \t]*\S").expect("labelled detail regex"));

static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence regex"));

/// First date or date range in `text`, e.g. `Jan 2020 - Present`.
pub fn find_date_range(text: &str) -> Option<Match<'_>> {
    DATE_RANGE_RE.find(text)
}

/// True when the line opens with a date token.
pub fn starts_with_date(line: &str) -> bool {
    LEADING_DATE_RE.is_match(line)
}

/// Returns the text after a bullet glyph or ordinal marker, or `None` when
/// the line is not a bullet line.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let m = BULLET_RE.find(line)?;
    let rest = line[m.end()..].trim();
    (!rest.is_empty()).then_some(rest)
}

/// Removes a leading bullet marker when present.
pub fn trim_bullet(line: &str) -> &str {
    strip_bullet(line).unwrap_or_else(|| line.trim())
}

pub fn has_company_suffix(line: &str) -> bool {
    COMPANY_SUFFIX_RE.is_match(line)
}

pub fn has_degree(line: &str) -> bool {
    DEGREE_RE.is_match(line)
}

pub fn has_school(line: &str) -> bool {
    SCHOOL_RE.is_match(line)
}

/// GPA, coursework or honours line, kept in an education `details` field.
pub fn is_education_detail(line: &str) -> bool {
    GPA_RE.is_match(line) || COURSEWORK_RE.is_match(line) || HONORS_RE.is_match(line)
}

/// `Label: value` line inside an entry, e.g. `Technologies: React, Node`.
pub fn is_labelled_detail(line: &str) -> bool {
    LABELLED_DETAIL_RE.is_match(line) && !has_company_suffix(line)
}

/// Template placeholder such as `[Your job title]`.
pub fn is_placeholder(text: &str) -> bool {
    let t = text.trim();
    t.starts_with('[') && t.ends_with(']')
}

/// Splits prose into sentence-like fragments. Trailing text without
/// terminal punctuation is kept as its own fragment.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut consumed = 0;
    for m in SENTENCE_RE.find_iter(text) {
        let fragment = m.as_str().trim();
        if !fragment.is_empty() {
            fragments.push(fragment.to_string());
        }
        consumed = m.end();
    }
    let rest = text[consumed..].trim();
    if !rest.is_empty() {
        fragments.push(rest.to_string());
    }
    fragments
}
