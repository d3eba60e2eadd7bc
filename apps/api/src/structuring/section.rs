//! Section Extractor — locates a named heading block inside raw CV text.
//!
//! A section runs from the first heading-like occurrence of any synonym to
//! the next heading-like occurrence of a reserved heading, or to the end of
//! the document. Absence is the common case and is reported as `None`.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Headings that terminate any section body.
pub const RESERVED_HEADINGS: &[&str] = &[
    "EDUCATION",
    "EXPERIENCE",
    "SKILLS",
    "CERTIFICATIONS",
    "LANGUAGES",
    "REFERENCES",
];

/// Words that may precede a heading on the same line ("SOFT SKILLS",
/// "WORK EXPERIENCE") and belong to it.
const HEADING_QUALIFIERS: &[&str] = &[
    "TECHNICAL",
    "SOFT",
    "OTHER",
    "ADDITIONAL",
    "PROGRAMMING",
    "INTERPERSONAL",
    "PERSONAL",
    "CORE",
    "KEY",
    "WORK",
    "PROFESSIONAL",
    "RELEVANT",
    "ACADEMIC",
    "LANGUAGE",
];

static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    heading_pattern(RESERVED_HEADINGS).expect("reserved heading regex")
});

/// A located section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    /// The heading text as written in the document.
    pub heading: &'a str,
    /// Trimmed body between the heading and the next reserved heading.
    pub body: &'a str,
    /// Byte span of `body` inside the source text.
    pub span: Range<usize>,
}

/// Finds the section introduced by any of `names`.
///
/// Matching is case-insensitive; names are escaped before compilation.
/// Returns `None` when no heading matches or the body is empty.
pub fn extract_section<'a>(text: &'a str, names: &[&str]) -> Option<Section<'a>> {
    let pattern = heading_pattern(names)?;
    let heading = pattern
        .find_iter(text)
        .find(|m| is_heading_like(text, m.start(), m.end()))?;

    let body_start = skip_separator(text, heading.end());
    let body_end = next_boundary(text, body_start).unwrap_or(text.len());
    let raw = &text[body_start..body_end];
    let body = raw.trim();
    if body.is_empty() {
        return None;
    }

    let offset = body_start + (raw.len() - raw.trim_start().len());
    Some(Section {
        heading: heading.as_str(),
        body,
        span: offset..offset + body.len(),
    })
}

/// Builds `(?i)(?:NAME_1|NAME_2|...)` with the longest names first so the
/// longest synonym wins at a shared position.
fn heading_pattern(names: &[&str]) -> Option<Regex> {
    let mut names: Vec<&str> = names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()).collect();
    if names.is_empty() {
        return None;
    }
    names.sort_by(|a, b| b.len().cmp(&a.len()));

    let alternatives: Vec<String> = names
        .iter()
        .map(|name| {
            let lead = if name.starts_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
            let tail = if name.ends_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
            format!("{lead}{}{tail}", regex::escape(name))
        })
        .collect();

    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).ok()
}

/// A heading is either written in upper case, or opens its line (after
/// optional qualifier words) and is followed only by a colon or line end.
fn is_heading_like(text: &str, start: usize, end: usize) -> bool {
    let matched = &text[start..end];
    if !matched.chars().any(char::is_lowercase) {
        return true;
    }

    let phrase_start = qualifier_start(text, start);
    let line_start = text[..phrase_start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if !text[line_start..phrase_start].trim().is_empty() {
        return false;
    }

    let after = text[end..].trim_start_matches([' ', '\t']);
    after.is_empty() || after.starts_with([':', '\n', '\r'])
}

/// Walks back over qualifier words separated from `start` by spaces only.
fn qualifier_start(text: &str, start: usize) -> usize {
    let mut start = start;
    loop {
        let before = &text[..start];
        let trimmed = before.trim_end_matches([' ', '\t']);
        if trimmed.len() == before.len() {
            return start;
        }
        let word_start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| !c.is_alphabetic())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let word = &trimmed[word_start..];
        let is_qualifier = !word.is_empty()
            && HEADING_QUALIFIERS
                .iter()
                .any(|q| q.eq_ignore_ascii_case(word));
        if !is_qualifier {
            return start;
        }
        start = word_start;
    }
}

fn skip_separator(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    let skipped = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    from + (rest.len() - skipped.len())
}

fn next_boundary(text: &str, from: usize) -> Option<usize> {
    BOUNDARY_RE
        .find_iter(&text[from..])
        .map(|m| (from + m.start(), from + m.end()))
        .find(|&(start, end)| is_heading_like(text, start, end))
        .map(|(start, _)| qualifier_start(text, start).max(from))
}
