//! Scraped publisher links.

use serde::{Deserialize, Serialize};

/// A link extracted from a publisher listing page, before preparation.
///
/// This is the shape scrapers write out: the publisher and state may be
/// missing and `href` may still be relative to `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLink {
    pub url: String,
    pub href: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A prepared link, ready for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    /// Listing page the link was scraped from.
    pub url: String,
    /// Link to the place's legal-code page.
    pub href: Option<String>,
    /// Anchor text, usually the place's display name on the publisher site.
    pub text: Option<String>,
    /// Publisher identifier, e.g. `municode`.
    pub source: String,
    /// Two-letter state code, `None` when it could not be derived.
    pub state_code: Option<String>,
}

impl SourceLink {
    pub fn new(url: &str, href: &str, text: &str, source: &str, state_code: &str) -> Self {
        Self {
            url: url.to_string(),
            href: Some(href.to_string()),
            text: Some(text.to_string()),
            source: source.to_string(),
            state_code: Some(state_code.to_string()),
        }
    }

    /// State codes compare case-insensitively.
    pub fn in_state(&self, state_code: &str) -> bool {
        self.state_code
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(state_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_state_ignores_case() {
        let link = SourceLink::new(
            "https://library.municode.com/al",
            "https://library.municode.com/al/coker",
            "Coker",
            "municode",
            "al",
        );
        assert!(link.in_state("AL"));
        assert!(!link.in_state("GA"));

        let stateless = SourceLink {
            state_code: None,
            ..link
        };
        assert!(!stateless.in_state("AL"));
    }
}
