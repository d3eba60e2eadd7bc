//! Entry Segmenter — splits a section body into jobs or degrees.
//!
//! Lines are classified (bullet / `Label:` detail / date / heading-like /
//! prose) and folded into a draft entry slot by slot. A boundary cue
//! (leading date, heading line, company suffix, degree) opens a new entry
//! only when the draft already holds body lines or already filled the slot
//! the cue targets, so a `title / company / date` header block stays one
//! entry. After a body, a plain heading-like line opens an entry only when a
//! date or company line completes its header; otherwise it is description.
//!
//! Drafts with neither a title nor a company (school nor degree) are
//! discarded: a garbled entry is worse than a missing one.

use tracing::debug;

use crate::models::cv::{EducationEntry, ExperienceEntry};
use crate::structuring::patterns::{
    find_date_range, has_company_suffix, has_degree, has_school, is_education_detail,
    is_labelled_detail, is_placeholder, split_sentences, starts_with_date, strip_bullet, trim_bullet,
};

const MAX_HEADING_WORDS: usize = 8;

/// Separators between a title and a company on one line, most specific first.
const TITLE_CONNECTORS: &[&str] = &[" at ", " @ ", " | ", " – ", " — ", " - ", ", "];

const SCHOOL_CONNECTORS: &[&str] = &[", ", " | ", " – ", " — ", " - ", " at ", " from "];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Line<'a> {
    Bullet(&'a str),
    /// `Label: value` line, kept whole as a point.
    Detail(&'a str),
    Date(&'a str),
    Heading(&'a str),
    Text(&'a str),
}

/// Splits a body into trimmed, non-empty lines. Inline bullet glyphs
/// (`a • b • c`) start new lines so whitespace-collapsed text still segments.
pub fn split_lines(body: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    for line in body.lines() {
        let mut start = 0;
        for (idx, _) in line.match_indices('•') {
            let piece = line[start..idx].trim();
            if !piece.is_empty() {
                lines.push(piece);
            }
            start = idx;
        }
        let piece = line[start..].trim();
        if !piece.is_empty() {
            lines.push(piece);
        }
    }
    lines
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = strip_bullet(line) {
        return Line::Bullet(rest);
    }
    if is_labelled_detail(line) {
        return Line::Detail(line);
    }
    if starts_with_date(line) {
        return if take_date(line).1.is_empty() {
            Line::Date(line)
        } else {
            Line::Heading(line)
        };
    }
    if looks_like_heading(line) {
        Line::Heading(line)
    } else {
        Line::Text(line)
    }
}

/// Short capitalized line that does not read as a sentence.
fn looks_like_heading(line: &str) -> bool {
    let starts_upper = line.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper || line.split_whitespace().count() > MAX_HEADING_WORDS {
        return false;
    }
    !line.ends_with(['.', '!', '?']) || has_company_suffix(line) || has_degree(line)
}

fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, ',' | '|' | '-' | '–' | '—' | '(' | ')' | ':' | ';')
    })
}

/// Pulls the first date range out of `line`; returns `(date, remainder)`.
fn take_date(line: &str) -> (String, String) {
    match find_date_range(line) {
        Some(m) => {
            let rest = format!("{} {}", &line[..m.start()], &line[m.end()..]);
            (m.as_str().trim().to_string(), trim_separators(&rest).to_string())
        }
        None => (String::new(), trim_separators(line).to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct ExperienceHeader {
    title: String,
    company: String,
    date: String,
}

impl ExperienceHeader {
    fn parse(line: &str) -> Self {
        let (date, rest) = take_date(line);
        let (title, company) = split_title_company(&rest);
        Self {
            title,
            company,
            date,
        }
    }

    /// Title-only line with no company or date cue.
    fn is_plain(&self) -> bool {
        self.company.is_empty() && self.date.is_empty()
    }
}

fn split_title_company(text: &str) -> (String, String) {
    for connector in TITLE_CONNECTORS {
        let Some((left, right)) = text.split_once(connector) else {
            continue;
        };
        let (left, right) = (trim_separators(left), trim_separators(right));
        if left.is_empty() || right.is_empty() {
            continue;
        }
        if *connector == ", " && has_company_suffix(left) {
            // "Acme Inc., Springfield": the tail is a location
            return (String::new(), left.to_string());
        }
        if has_company_suffix(left) && !has_company_suffix(right) {
            return (right.to_string(), left.to_string());
        }
        return (left.to_string(), right.to_string());
    }

    if has_company_suffix(text) {
        (String::new(), text.to_string())
    } else {
        (text.to_string(), String::new())
    }
}

#[derive(Debug, Default)]
struct ExperienceDraft {
    title: String,
    company: String,
    date: String,
    points: Vec<String>,
    prose: Vec<String>,
    details: Vec<String>,
}

impl ExperienceDraft {
    fn has_body(&self) -> bool {
        !self.points.is_empty() || !self.prose.is_empty() || !self.details.is_empty()
    }

    fn is_blank(&self) -> bool {
        self.title.is_empty() && self.company.is_empty() && self.date.is_empty() && !self.has_body()
    }

    fn push_point(&mut self, text: &str) {
        if !is_placeholder(text) {
            self.points.push(text.to_string());
        }
    }

    fn apply_header(
        &mut self,
        header: ExperienceHeader,
        cue_follows: bool,
        entries: &mut Vec<ExperienceEntry>,
    ) {
        if header.title.is_empty() && header.company.is_empty() && header.date.is_empty() {
            return;
        }

        if header.is_plain() {
            if !self.has_body() && self.title.is_empty() {
                self.title = header.title;
            } else if !self.has_body() && self.company.is_empty() {
                self.company = header.title;
            } else if cue_follows {
                self.flush_into(entries);
                self.title = header.title;
            } else {
                self.prose.push(header.title);
            }
            return;
        }

        let conflict = self.has_body()
            || (!header.title.is_empty() && !self.title.is_empty())
            || (!header.company.is_empty() && !self.company.is_empty())
            || (!header.date.is_empty() && !self.date.is_empty());
        if conflict {
            self.flush_into(entries);
        }

        if self.title.is_empty() {
            self.title = header.title;
        }
        if self.company.is_empty() {
            self.company = header.company;
        }
        if self.date.is_empty() {
            self.date = header.date;
        }
    }

    fn flush_into(&mut self, entries: &mut Vec<ExperienceEntry>) {
        if let Some(entry) = std::mem::take(self).finish() {
            entries.push(entry);
        }
    }

    fn finish(self) -> Option<ExperienceEntry> {
        if self.title.is_empty() && self.company.is_empty() {
            if !self.is_blank() {
                debug!(
                    points = self.points.len(),
                    prose = self.prose.len(),
                    "Discarding experience entry without title or company"
                );
            }
            return None;
        }

        let mut points: Vec<String> = if self.points.is_empty() {
            prose_fragments(&self.prose)
                .iter()
                .flat_map(|fragment| split_sentences(fragment))
                .filter(|p| !is_placeholder(p))
                .collect()
        } else {
            self.points
        };
        points.extend(self.details);

        Some(ExperienceEntry {
            title: self.title,
            company: self.company,
            date: self.date,
            points,
        })
    }
}

/// Rejoins wrapped prose: a line continues the previous one only when that
/// one has no terminal punctuation and this one starts lowercase.
fn prose_fragments(prose: &[String]) -> Vec<String> {
    let mut fragments: Vec<String> = Vec::new();
    for line in prose {
        let continues = line.chars().next().is_some_and(char::is_lowercase);
        match fragments.last_mut() {
            Some(last) if continues && !last.ends_with(['.', '!', '?']) => {
                last.push(' ');
                last.push_str(line);
            }
            _ => fragments.push(line.clone()),
        }
    }
    fragments
}

/// A plain line opens a new job only when the header it starts is completed
/// right after it: by a date or company-only line, or by one more plain line
/// and then a date.
fn header_cue_follows(lines: &[Line], i: usize) -> bool {
    let completes_header = |line: Option<&Line>| match line {
        Some(Line::Date(_)) => true,
        Some(Line::Heading(text)) => {
            let next = ExperienceHeader::parse(text);
            next.title.is_empty() && !next.company.is_empty()
        }
        _ => false,
    };
    let next_is_plain = matches!(
        lines.get(i + 1),
        Some(Line::Heading(text)) if ExperienceHeader::parse(text).is_plain()
    );
    completes_header(lines.get(i + 1))
        || (next_is_plain && matches!(lines.get(i + 2), Some(Line::Date(_))))
}

/// Segments an experience section body into jobs, in document order.
pub fn segment_experience(body: &str) -> Vec<ExperienceEntry> {
    let lines: Vec<Line> = split_lines(body).into_iter().map(classify).collect();
    let mut entries = Vec::new();
    let mut draft = ExperienceDraft::default();

    for (i, line) in lines.iter().enumerate() {
        match *line {
            Line::Bullet(text) => draft.push_point(text),
            Line::Detail(text) => draft.details.push(text.to_string()),
            Line::Date(text) => {
                if !draft.date.is_empty() || draft.has_body() {
                    draft.flush_into(&mut entries);
                }
                draft.date = take_date(text).0;
            }
            Line::Heading(text) => {
                let header = ExperienceHeader::parse(text);
                let cue_follows = header.is_plain() && header_cue_follows(&lines, i);
                draft.apply_header(header, cue_follows, &mut entries);
            }
            Line::Text(text) => draft.prose.push(text.to_string()),
        }
    }
    draft.flush_into(&mut entries);

    entries
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct EducationDraft {
    degree: String,
    school: String,
    date: String,
    details: Vec<String>,
}

impl EducationDraft {
    fn flush_into(&mut self, entries: &mut Vec<EducationEntry>) {
        let draft = std::mem::take(self);
        if draft.degree.is_empty() && draft.school.is_empty() {
            if !draft.details.is_empty() || !draft.date.is_empty() {
                debug!(
                    details = draft.details.len(),
                    "Discarding education entry without degree or school"
                );
            }
            return;
        }
        entries.push(EducationEntry {
            degree: draft.degree,
            school: draft.school,
            date: draft.date,
            details: (!draft.details.is_empty()).then(|| draft.details.join(" | ")),
        });
    }

    fn set_date(&mut self, date: String) {
        if self.date.is_empty() && !date.is_empty() {
            self.date = date;
        }
    }
}

/// "BSc Physics, State University" → degree and school halves.
fn split_degree_school(text: &str) -> (String, Option<String>) {
    for connector in SCHOOL_CONNECTORS {
        let Some((left, right)) = text.split_once(connector) else {
            continue;
        };
        let (left, right) = (trim_separators(left), trim_separators(right));
        if has_degree(left) && has_school(right) {
            return (left.to_string(), Some(right.to_string()));
        }
        if has_school(left) && has_degree(right) {
            return (right.to_string(), Some(left.to_string()));
        }
    }
    (text.to_string(), None)
}

/// Segments an education section body into degrees, in document order.
pub fn segment_education(body: &str) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    let mut draft = EducationDraft::default();

    for raw in split_lines(body) {
        let line = trim_bullet(raw);
        if is_placeholder(line) {
            continue;
        }

        let (date, rest) = take_date(line);
        if rest.is_empty() {
            if !draft.date.is_empty() {
                draft.flush_into(&mut entries);
            }
            draft.set_date(date);
            continue;
        }

        let is_detail = is_education_detail(&rest);
        if has_degree(&rest) && (draft.degree.is_empty() || !is_detail) {
            if !draft.degree.is_empty() {
                draft.flush_into(&mut entries);
            }
            let (degree, school) = split_degree_school(&rest);
            draft.degree = degree;
            if let Some(school) = school {
                if draft.school.is_empty() {
                    draft.school = school;
                }
            }
            draft.set_date(date);
        } else if has_school(&rest) && !is_detail {
            if !draft.school.is_empty() {
                draft.flush_into(&mut entries);
            }
            draft.school = rest;
            draft.set_date(date);
        } else if !is_detail
            && !draft.degree.is_empty()
            && draft.school.is_empty()
            && looks_like_heading(&rest)
        {
            draft.school = rest;
            draft.set_date(date);
        } else {
            draft.details.push(line.to_string());
        }
    }
    draft.flush_into(&mut entries);

    entries
}
