//! Place-name normalization.
//!
//! Canonical names carry prefixes and qualifiers that publisher sites drop
//! ("City of Springfield", "Washington Charter Township (Wayne County)").
//! The rules below reduce a name to the part a publisher is likely to show.
//! They run in a fixed order over the lowercased name.

use std::sync::LazyLock;

use regex::Regex;

/// A single normalization step.
pub type NormalizeRule = fn(&str) -> String;

/// Rules in application order.
pub const RULES: &[(&str, NormalizeRule)] = &[
    ("strip_of_prefix", strip_of_prefix),
    ("strip_parentheses", strip_parentheses),
    ("keep_quoted", keep_quoted),
    ("truncate_township", truncate_township),
];

static OF_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*?of\s+").expect("of-prefix pattern should compile")
});

static PARENTHESES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^()]*\)").expect("parentheses pattern should compile")
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]*)".*$"#).expect("quoted pattern should compile"));

static TOWNSHIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(charter township|chrtr township|metro township|township).*$")
        .expect("township pattern should compile")
});

/// Drop everything up to and including the first "of" followed by whitespace.
///
/// Only the first occurrence is considered, so "Borough of the District of
/// X" becomes "the district of x".
pub fn strip_of_prefix(name: &str) -> String {
    OF_PREFIX.replace(name, "").into_owned()
}

/// Remove parenthesized qualifiers such as "(Town)".
pub fn strip_parentheses(name: &str) -> String {
    PARENTHESES.replace_all(name, "").into_owned()
}

/// `"Name", suffix` becomes `Name`.
pub fn keep_quoted(name: &str) -> String {
    QUOTED.replace(name, "$1").into_owned()
}

/// Cut the name at the first township keyword.
pub fn truncate_township(name: &str) -> String {
    TOWNSHIP.replace(name, "").into_owned()
}

/// Lowercase a place name and run every rule over it.
pub fn normalize_place_name(name: &str) -> String {
    let mut normalized = name.to_lowercase();
    for (_, rule) in RULES {
        normalized = rule(&normalized);
    }
    normalized.trim().to_string()
}

/// Word-boundary pattern for a normalized name.
///
/// Returns `None` for an empty name; an empty pattern would match any text.
pub fn name_pattern(normalized: &str) -> Result<Option<Regex>, regex::Error> {
    if normalized.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!(r"\b{}\b", regex::escape(normalized))).map(Some)
}
