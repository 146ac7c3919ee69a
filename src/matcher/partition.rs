//! Confidence partitions over matcher output.

use crate::models::{Assignment, MatchResult, SourceLink};

use super::MatchOutcome;

/// Named diagnostic view, one CSV file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    /// Every result, regardless of confidence.
    Output,
    NonPlaces,
    Matched,
    Unmatched,
    MultipleSources,
    MultipleMatches,
}

impl Partition {
    pub const ALL: [Partition; 6] = [
        Self::Output,
        Self::NonPlaces,
        Self::Matched,
        Self::Unmatched,
        Self::MultipleSources,
        Self::MultipleMatches,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::NonPlaces => "non_places",
            Self::Matched => "matched",
            Self::Unmatched => "unmatched",
            Self::MultipleSources => "multiple_sources",
            Self::MultipleMatches => "multiple_matches",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }

    /// Which result partition an assignment belongs to.
    pub fn of(assignment: &Assignment) -> Self {
        match assignment {
            Assignment::Unmatched => Self::Unmatched,
            Assignment::Single(_) => Self::Matched,
            Assignment::Multiple(_) if assignment.has_duplicate_hrefs() => Self::MultipleMatches,
            Assignment::Multiple(_) => Self::MultipleSources,
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matcher output split by confidence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitions {
    pub output: Vec<MatchResult>,
    pub non_places: Vec<SourceLink>,
    pub matched: Vec<MatchResult>,
    pub unmatched: Vec<MatchResult>,
    pub multiple_sources: Vec<MatchResult>,
    pub multiple_matches: Vec<MatchResult>,
}

impl Partitions {
    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        let mut partitions = Self {
            output: outcome.results.clone(),
            non_places: outcome.non_places.clone(),
            ..Default::default()
        };

        for result in &outcome.results {
            let bucket = match Partition::of(&result.assignment) {
                Partition::Matched => &mut partitions.matched,
                Partition::Unmatched => &mut partitions.unmatched,
                Partition::MultipleSources => &mut partitions.multiple_sources,
                _ => &mut partitions.multiple_matches,
            };
            bucket.push(result.clone());
        }

        partitions
    }

    /// Results for a result partition; empty for [`Partition::NonPlaces`].
    pub fn results(&self, partition: Partition) -> &[MatchResult] {
        match partition {
            Partition::Output => &self.output,
            Partition::NonPlaces => &[],
            Partition::Matched => &self.matched,
            Partition::Unmatched => &self.unmatched,
            Partition::MultipleSources => &self.multiple_sources,
            Partition::MultipleMatches => &self.multiple_matches,
        }
    }

    /// Number of rows the partition would write.
    pub fn len(&self, partition: Partition) -> usize {
        match partition {
            Partition::NonPlaces => self.non_places.len(),
            other => self.results(other).len(),
        }
    }

    /// Results safe for downstream use without review.
    pub fn usable(&self) -> Vec<MatchResult> {
        self.output
            .iter()
            .filter(|r| r.assignment.is_usable())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;

    fn result(gnis: i64, hrefs: &[&str]) -> MatchResult {
        let candidates = hrefs
            .iter()
            .map(|h| Candidate {
                href: h.to_string(),
                source: "municode".to_string(),
            })
            .collect();
        MatchResult {
            gnis,
            place_name: format!("Place {}", gnis),
            state_code: "AL".to_string(),
            assignment: Assignment::from_candidates(candidates),
        }
    }

    #[test]
    fn test_partition_of() {
        assert_eq!(Partition::of(&result(1, &[]).assignment), Partition::Unmatched);
        assert_eq!(Partition::of(&result(1, &["a"]).assignment), Partition::Matched);
        assert_eq!(
            Partition::of(&result(1, &["a", "b"]).assignment),
            Partition::MultipleSources
        );
        assert_eq!(
            Partition::of(&result(1, &["a", "b", "a"]).assignment),
            Partition::MultipleMatches
        );
    }

    #[test]
    fn test_from_outcome_covers_every_result_once() {
        let outcome = MatchOutcome {
            results: vec![
                result(1, &[]),
                result(2, &["a"]),
                result(3, &["a", "b"]),
                result(4, &["c", "c"]),
                result(5, &["d"]),
            ],
            non_places: vec![],
        };
        let partitions = Partitions::from_outcome(&outcome);

        assert_eq!(partitions.len(Partition::Output), 5);
        assert_eq!(partitions.len(Partition::Unmatched), 1);
        assert_eq!(partitions.len(Partition::Matched), 2);
        assert_eq!(partitions.len(Partition::MultipleSources), 1);
        assert_eq!(partitions.len(Partition::MultipleMatches), 1);

        let usable: Vec<i64> = partitions.usable().iter().map(|r| r.gnis).collect();
        assert_eq!(usable, vec![2, 3, 5]);
    }

    #[test]
    fn test_file_names() {
        let names: Vec<String> = Partition::ALL.iter().map(|p| p.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "output.csv",
                "non_places.csv",
                "matched.csv",
                "unmatched.csv",
                "multiple_sources.csv",
                "multiple_matches.csv",
            ]
        );
    }
}
