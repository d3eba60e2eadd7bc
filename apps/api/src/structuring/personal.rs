//! Personal-info passes. Each field is extracted independently; a miss
//! leaves the field empty.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::cv::PersonalInfo;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}\b").expect("phone regex")
});

/// First line opening with two to four capitalized words.
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(\p{Lu}[\p{Ll}']+(?:[ \t-]\p{Lu}[\p{Ll}']+){1,3})").expect("name regex")
});

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(?:location|address)[ \t]*:|based in\b[ \t]*:?)[ \t]*([^,\n]*(?:,[^,\n]*){0,2})")
        .expect("location regex")
});

pub fn extract_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn extract_phone(text: &str) -> String {
    PHONE_RE
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

pub fn extract_name(text: &str) -> String {
    NAME_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn extract_location(text: &str) -> String {
    LOCATION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

pub fn extract_personal_info(text: &str) -> PersonalInfo {
    PersonalInfo {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        location: extract_location(text),
    }
}
