//! Preparing scraped links for matching.
//!
//! Scrapers write one CSV per publisher with `url,href,text[,source]`.
//! Before matching, each link needs a publisher, a state code and an
//! absolute href.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::input::{read_raw_links_csv, InputError};
use crate::models::{Publisher, RawLink, SourceLink};

/// Two-letter path segment, e.g. `https://library.municode.com/in`.
static STATE_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([a-z]{2})(?:/|$)").expect("state segment pattern should compile")
});

/// Derive the state a listing page covers.
///
/// Municode and American Legal put the state in the path; General Code and
/// Code Publishing list states through a `state=` query parameter. Links
/// on a place's own domain carry no state.
pub fn derive_state_code(publisher: Publisher, url: &str) -> Option<String> {
    match publisher {
        Publisher::Municode | Publisher::AmericanLegal => {
            let lower = url.to_lowercase();
            // Match against the path only
            let path = Url::parse(&lower)
                .map(|u| u.path().to_string())
                .unwrap_or(lower);
            STATE_SEGMENT
                .captures(&path)
                .map(|c| c[1].to_uppercase())
        }
        Publisher::GeneralCode | Publisher::CodePublishingCo => Url::parse(url)
            .ok()?
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.to_string())
            .filter(|value| value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()))
            .map(|value| value.to_uppercase()),
        Publisher::PlaceDomain => None,
    }
}

/// Resolve a root-relative href against the listing page it came from.
///
/// Absolute hrefs, and hrefs that cannot be joined, are returned unchanged.
pub fn resolve_href(url: &str, href: &str) -> String {
    if !href.starts_with('/') {
        return href.to_string();
    }
    match Url::parse(url).and_then(|base| base.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            tracing::warn!("Could not resolve href '{}' against '{}': {}", href, url, e);
            href.to_string()
        }
    }
}

/// Attribute, locate and resolve a single raw link.
pub fn prepare_link(raw: RawLink) -> SourceLink {
    let href = raw.href.map(|h| resolve_href(&raw.url, &h));

    let publisher = raw
        .source
        .as_deref()
        .and_then(Publisher::from_str)
        .unwrap_or_else(|| Publisher::attribute(&raw.url, href.as_deref().unwrap_or_default()));

    let state_code = derive_state_code(publisher, &raw.url);
    if state_code.is_none() && publisher != Publisher::PlaceDomain {
        tracing::warn!(
            "No state code found for '{}' ({}); it will not be matched",
            raw.url,
            publisher
        );
    }

    SourceLink {
        url: raw.url,
        href,
        text: raw.text,
        source: publisher.as_str().to_string(),
        state_code,
    }
}

pub fn prepare_links(raw: Vec<RawLink>) -> Vec<SourceLink> {
    raw.into_iter().map(prepare_link).collect()
}

/// Concatenate several raw result files. Missing files are skipped.
pub fn merge_link_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RawLink>, InputError> {
    let mut merged = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("Skipping missing link file '{}'", path.display());
            continue;
        }
        let links = read_raw_links_csv(path)?;
        tracing::info!("Got {} links from '{}'", links.len(), path.display());
        merged.extend(links);
    }
    Ok(merged)
}
