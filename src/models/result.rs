//! Matcher output records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::PlaceRecord;

/// One link that satisfied the name test for a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub href: String,
    pub source: String,
}

/// Which link(s) a place was assigned to.
///
/// Multiple candidates are kept in candidate order. Hrefs and sources are
/// stored pairwise so the two lists can never diverge in length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "candidates", rename_all = "snake_case")]
pub enum Assignment {
    #[default]
    Unmatched,
    Single(Candidate),
    Multiple(Vec<Candidate>),
}

impl Assignment {
    /// Build an assignment from every matching candidate.
    pub fn from_candidates(mut candidates: Vec<Candidate>) -> Self {
        match candidates.len() {
            0 => Self::Unmatched,
            1 => Self::Single(candidates.remove(0)),
            _ => Self::Multiple(candidates),
        }
    }

    pub fn hrefs(&self) -> Vec<&str> {
        self.candidates().map(|c| c.href.as_str()).collect()
    }

    pub fn sources(&self) -> Vec<&str> {
        self.candidates().map(|c| c.source.as_str()).collect()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        let slice: &[Candidate] = match self {
            Self::Unmatched => &[],
            Self::Single(c) => std::slice::from_ref(c),
            Self::Multiple(cs) => cs,
        };
        slice.iter()
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched)
    }

    /// True for a multi-match whose hrefs repeat, which points at a
    /// place-name collision or duplicated scrape rather than real ambiguity.
    pub fn has_duplicate_hrefs(&self) -> bool {
        match self {
            Self::Multiple(cs) => {
                let unique: HashSet<&str> = cs.iter().map(|c| c.href.as_str()).collect();
                unique.len() < cs.len()
            }
            _ => false,
        }
    }

    /// Single matches and multi-matches over distinct hrefs.
    pub fn is_usable(&self) -> bool {
        match self {
            Self::Unmatched => false,
            Self::Single(_) => true,
            Self::Multiple(_) => !self.has_duplicate_hrefs(),
        }
    }

    /// CSV cell for the href column: empty, the URL, or a JSON array.
    pub fn href_cell(&self) -> String {
        cell(self.hrefs())
    }

    /// CSV cell for the source column, shaped like [`Self::href_cell`].
    pub fn source_cell(&self) -> String {
        cell(self.sources())
    }
}

fn cell(values: Vec<&str>) -> String {
    match values.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        _ => serde_json::to_string(&values).unwrap_or_default(),
    }
}

/// The assignment for one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub gnis: i64,
    pub place_name: String,
    pub state_code: String,
    pub assignment: Assignment,
}

impl MatchResult {
    pub fn new(place: &PlaceRecord, place_name: &str, assignment: Assignment) -> Self {
        Self {
            gnis: place.gnis,
            place_name: place_name.to_string(),
            state_code: place.state_code.clone(),
            assignment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(href: &str, source: &str) -> Candidate {
        Candidate {
            href: href.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_from_candidates_shapes() {
        assert_eq!(Assignment::from_candidates(vec![]), Assignment::Unmatched);

        let single = Assignment::from_candidates(vec![candidate("a", "municode")]);
        assert_eq!(single, Assignment::Single(candidate("a", "municode")));

        let multiple = Assignment::from_candidates(vec![
            candidate("a", "municode"),
            candidate("b", "general_code"),
        ]);
        assert_eq!(multiple.hrefs(), vec!["a", "b"]);
        assert_eq!(multiple.sources(), vec!["municode", "general_code"]);
    }

    #[test]
    fn test_usable() {
        assert!(!Assignment::Unmatched.is_usable());
        assert!(Assignment::Single(candidate("a", "municode")).is_usable());

        let distinct = Assignment::Multiple(vec![
            candidate("a", "municode"),
            candidate("b", "municode"),
        ]);
        assert!(distinct.is_usable());
        assert!(!distinct.has_duplicate_hrefs());

        let duplicated = Assignment::Multiple(vec![
            candidate("a", "municode"),
            candidate("a", "general_code"),
        ]);
        assert!(!duplicated.is_usable());
        assert!(duplicated.has_duplicate_hrefs());
    }

    #[test]
    fn test_cells() {
        assert_eq!(Assignment::Unmatched.href_cell(), "");
        assert_eq!(
            Assignment::Single(candidate("https://x.test/a", "municode")).href_cell(),
            "https://x.test/a"
        );
        let multiple = Assignment::Multiple(vec![
            candidate("https://x.test/a", "municode"),
            candidate("https://x.test/b", "general_code"),
        ]);
        assert_eq!(
            multiple.href_cell(),
            r#"["https://x.test/a","https://x.test/b"]"#
        );
        assert_eq!(multiple.source_cell(), r#"["municode","general_code"]"#);
    }
}
