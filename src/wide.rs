//! Long-to-wide pivot of usable results.
//!
//! The `sources` table stores one row per place with a column per
//! publisher. This turns matcher results into that shape.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{MatchResult, Publisher};

static AMLEGAL_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"regions/[a-z]{2}/").expect("amlegal region pattern should compile")
});

/// One place with its per-publisher code URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WideRow {
    pub gnis: i64,
    pub place_name: String,
    pub state_code: String,
    pub source_municode: Option<String>,
    pub source_general_code: Option<String>,
    pub source_american_legal: Option<String>,
    pub source_code_publishing_co: Option<String>,
}

impl WideRow {
    fn slot(&mut self, publisher: Publisher) -> Option<&mut Option<String>> {
        match publisher {
            Publisher::Municode => Some(&mut self.source_municode),
            Publisher::GeneralCode => Some(&mut self.source_general_code),
            Publisher::AmericanLegal => Some(&mut self.source_american_legal),
            Publisher::CodePublishingCo => Some(&mut self.source_code_publishing_co),
            Publisher::PlaceDomain => None,
        }
    }

    pub fn has_any_source(&self) -> bool {
        self.source_municode.is_some()
            || self.source_general_code.is_some()
            || self.source_american_legal.is_some()
            || self.source_code_publishing_co.is_some()
    }
}

/// American Legal listing links carry a `regions/xx/` segment that the
/// code pages themselves do not.
pub fn clean_amlegal_href(href: &str) -> String {
    if href.contains("amlegal") {
        AMLEGAL_REGION.replace(href, "").into_owned()
    } else {
        href.to_string()
    }
}

/// Pivot results to one row per place, dropping places with no publisher URL.
pub fn pivot(results: &[MatchResult]) -> Vec<WideRow> {
    let mut rows = Vec::with_capacity(results.len());

    for result in results {
        let mut row = WideRow {
            gnis: result.gnis,
            place_name: result.place_name.clone(),
            state_code: result.state_code.clone(),
            ..Default::default()
        };

        for candidate in result.assignment.candidates() {
            let Some(publisher) = Publisher::from_str(&candidate.source) else {
                tracing::warn!(
                    "Unknown source '{}' for place {}",
                    candidate.source,
                    result.gnis
                );
                continue;
            };
            let Some(slot) = row.slot(publisher) else {
                continue;
            };
            if let Some(existing) = slot.as_deref() {
                tracing::warn!(
                    "Place {} already has {} URL '{}'; ignoring '{}'",
                    result.gnis,
                    publisher,
                    existing,
                    candidate.href
                );
                continue;
            }
            *slot = Some(clean_amlegal_href(&candidate.href));
        }

        if row.has_any_source() {
            rows.push(row);
        }
    }

    let dropped = results.len() - rows.len();
    if dropped > 0 {
        tracing::info!("Dropped {} places with no publisher URL", dropped);
    }
    rows
}
