//! Place-to-URL matching engine.
//!
//! Takes scraped publisher links and canonical place records and works out
//! which link belongs to which place. Places and links are split into a
//! city bucket and a county bucket, then matched state by state with a
//! brute-force name test. Ambiguity is never resolved here: a place that
//! matches several links keeps all of them and lands in a diagnostic
//! partition for review.
//!
//! ```text
//! Matcher::new(links, places, reporter)
//!     └─ compute()          -> MatchOutcome      (pure)
//!         └─ Partitions::from_outcome()          (pure)
//!             └─ persist(writer)                 (I/O, non-fatal)
//! ```

pub mod classify;
pub mod export;
pub mod normalize;
pub mod partition;
pub mod report;

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use regex::Regex;
use thiserror::Error;

use crate::models::{Assignment, Candidate, MatchResult, PlaceRecord, SourceLink};

pub use export::{
    persist, CsvPartitionWriter, ExportError, ExportTable, MemoryPartitionWriter,
    PartitionWriter, PersistReport,
};
pub use partition::{Partition, Partitions};
pub use report::{RecordingReporter, Reporter, TracingReporter};

/// Errors that stop a matching run.
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("{table} input is empty")]
    EmptyInput { table: &'static str },
    #[error("{table} row {row} is missing required field '{field}'")]
    MissingField {
        table: &'static str,
        row: usize,
        field: &'static str,
    },
    #[error("places input has more than one row with gnis {gnis}")]
    DuplicateGnis { gnis: i64 },
    #[error("failed to match {gov_type} place {gnis} in {state_code}: {reason}")]
    Record {
        gnis: i64,
        state_code: String,
        gov_type: &'static str,
        reason: String,
    },
}

/// Government-type bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovType {
    Cities,
    Counties,
}

impl GovType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cities => "cities",
            Self::Counties => "counties",
        }
    }
}

/// Result of [`Matcher::compute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// One result per input place.
    pub results: Vec<MatchResult>,
    /// Links dropped before matching.
    pub non_places: Vec<SourceLink>,
}

/// A prepared matching run over one pair of input tables.
pub struct Matcher<'r> {
    cities: Vec<PlaceRecord>,
    counties: Vec<PlaceRecord>,
    non_places: Vec<SourceLink>,
    s_cities: Vec<SourceLink>,
    s_counties: Vec<SourceLink>,
    reporter: &'r dyn Reporter,
}

impl<'r> Matcher<'r> {
    /// Validate the inputs and bucket places and links.
    pub fn new(
        links: Vec<SourceLink>,
        places: Vec<PlaceRecord>,
        reporter: &'r dyn Reporter,
    ) -> Result<Self, MatcherError> {
        if places.is_empty() {
            return Err(MatcherError::EmptyInput { table: "places" });
        }
        if links.is_empty() {
            return Err(MatcherError::EmptyInput { table: "sources" });
        }
        let mut seen = HashSet::with_capacity(places.len());
        if let Some(place) = places.iter().find(|p| !seen.insert(p.gnis)) {
            return Err(MatcherError::DuplicateGnis { gnis: place.gnis });
        }
        for (row, link) in links.iter().enumerate() {
            if link.href.is_none() {
                return Err(MatcherError::MissingField {
                    table: "sources",
                    row,
                    field: "href",
                });
            }
            if link.text.is_none() {
                return Err(MatcherError::MissingField {
                    table: "sources",
                    row,
                    field: "text",
                });
            }
        }

        let (counties, cities): (Vec<_>, Vec<_>) =
            places.into_iter().partition(PlaceRecord::is_county);

        let (non_places, retained): (Vec<_>, Vec<_>) = links
            .into_iter()
            .partition(|l| classify::is_non_place(link_text(l)));

        let (s_counties, s_cities): (Vec<_>, Vec<_>) = retained
            .into_iter()
            .partition(|l| classify::is_county_link(link_href(l), link_text(l)));

        reporter.debug(&format!(
            "{} cities, {} counties, {} city links, {} county links, {} non-places",
            cities.len(),
            counties.len(),
            s_cities.len(),
            s_counties.len(),
            non_places.len()
        ));

        Ok(Self {
            cities,
            counties,
            non_places,
            s_cities,
            s_counties,
            reporter,
        })
    }

    pub fn cities(&self) -> &[PlaceRecord] {
        &self.cities
    }

    pub fn counties(&self) -> &[PlaceRecord] {
        &self.counties
    }

    pub fn non_places(&self) -> &[SourceLink] {
        &self.non_places
    }

    pub fn city_links(&self) -> &[SourceLink] {
        &self.s_cities
    }

    pub fn county_links(&self) -> &[SourceLink] {
        &self.s_counties
    }

    /// Match every place, cities first, then counties.
    pub fn compute(&self) -> Result<MatchOutcome, MatcherError> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(self.cities.len() + self.counties.len());

        for gov_type in [GovType::Cities, GovType::Counties] {
            let (places, links) = match gov_type {
                GovType::Cities => (&self.cities, &self.s_cities),
                GovType::Counties => (&self.counties, &self.s_counties),
            };

            for (state, state_places) in group_by_state(places) {
                self.reporter
                    .info(&format!("Processing {} in {}", gov_type.as_str(), state));

                let candidates: Vec<&SourceLink> =
                    links.iter().filter(|l| l.in_state(state)).collect();

                let mut failed_to_match = 0;
                for place in &state_places {
                    let result = self.match_place(place, &candidates, gov_type)?;
                    if result.assignment.is_unmatched() {
                        failed_to_match += 1;
                    }
                    results.push(result);
                }

                self.reporter.info(&format!(
                    "Failed to match {} out of {} {} in {}",
                    failed_to_match,
                    state_places.len(),
                    gov_type.as_str(),
                    state
                ));
            }
        }

        self.reporter.info(&format!(
            "Matching took {:.2} seconds over {} places",
            start.elapsed().as_secs_f64(),
            results.len()
        ));

        Ok(MatchOutcome {
            results,
            non_places: self.non_places.clone(),
        })
    }

    /// Compute, write every partition through `writer`, and return the
    /// usable results.
    pub fn match_places(
        &self,
        writer: &dyn PartitionWriter,
    ) -> Result<Vec<MatchResult>, MatcherError> {
        let outcome = self.compute()?;
        let partitions = Partitions::from_outcome(&outcome);

        let report = persist(&partitions, writer, self.reporter);
        if !report.is_complete() {
            self.reporter.warn(&format!(
                "{} of {} diagnostic files could not be written",
                report.failed.len(),
                Partition::ALL.len()
            ));
        }

        Ok(partitions.usable())
    }

    fn match_place(
        &self,
        place: &PlaceRecord,
        candidates: &[&SourceLink],
        gov_type: GovType,
    ) -> Result<MatchResult, MatcherError> {
        let record_error = |reason: String| {
            let err = MatcherError::Record {
                gnis: place.gnis,
                state_code: place.state_code.clone(),
                gov_type: gov_type.as_str(),
                reason,
            };
            self.reporter
                .error(&format!("{} (place: {:?})", err, place));
            err
        };

        let place_name = place
            .place_name
            .as_deref()
            .ok_or_else(|| record_error("place_name is null".to_string()))?;

        let normalized = normalize::normalize_place_name(place_name);
        let pattern = normalize::name_pattern(&normalized)
            .map_err(|e| record_error(format!("invalid name pattern: {}", e)))?;

        let Some(pattern) = pattern else {
            self.reporter.warn(&format!(
                "Place {} '{}' normalizes to an empty name; leaving it unmatched",
                place.gnis, place_name
            ));
            return Ok(MatchResult::new(place, place_name, Assignment::Unmatched));
        };

        let matches: Vec<Candidate> = candidates
            .iter()
            .filter(|link| self.is_match(&pattern, &normalized, place, link))
            .map(|link| Candidate {
                href: link_href(link).to_string(),
                source: link.source.clone(),
            })
            .collect();

        Ok(MatchResult::new(
            place,
            place_name,
            Assignment::from_candidates(matches),
        ))
    }

    fn is_match(
        &self,
        pattern: &Regex,
        normalized: &str,
        place: &PlaceRecord,
        link: &SourceLink,
    ) -> bool {
        let text = link_text(link).to_lowercase();
        let href = link_href(link).to_lowercase();
        let matched = pattern.is_match(&text) || pattern.is_match(&href);
        if matched {
            self.reporter.debug(&format!(
                "'{}' in '{}' / '{}' with county={}",
                normalized,
                text,
                href,
                place.is_county()
            ));
        }
        matched
    }
}

// Checked non-null in Matcher::new.
fn link_text(link: &SourceLink) -> &str {
    link.text.as_deref().unwrap_or_default()
}

fn link_href(link: &SourceLink) -> &str {
    link.href.as_deref().unwrap_or_default()
}

/// Group places by state, states in sorted order, places in input order.
fn group_by_state(places: &[PlaceRecord]) -> BTreeMap<&str, Vec<&PlaceRecord>> {
    let mut groups: BTreeMap<&str, Vec<&PlaceRecord>> = BTreeMap::new();
    for place in places {
        groups
            .entry(place.state_code.as_str())
            .or_default()
            .push(place);
    }
    groups
}
