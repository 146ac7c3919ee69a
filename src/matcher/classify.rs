//! Link predicates used to bucket scraped links before matching.

/// Anchor-text fragments that mark a link as something other than a city
/// or county: special districts, tribal governments, courts, boards.
pub const NON_PLACE_TERMS: &[&str] = &[
    "district",
    "tribe",
    "code",
    "commission",
    "jury",
    "system",
    "council",
    "association",
    "corporation",
    "authority",
    "civil service",
    "university of",
    "air park",
    "examiner",
    "children's",
    "rules and appeals",
    "clerk of court",
    "seminole nation",
    "prairie band potawatomi nation",
    "samish indian nation",
    "osage nation",
];

/// County equivalents, in the spaced form used in anchor text and the
/// underscored forms publishers use in URL slugs.
pub const COUNTY_TERMS: &[&str] = &[
    "county",
    "county_",
    "_county",
    "_county_",
    "borough",
    "borough_",
    "_borough",
    "_borough_",
    "parish",
    "parish_",
    "_parish",
    "_parish_",
    "census area",
    "census_area",
    "_census_area",
    "_census_area_",
    "municipality",
    "municipality_",
    "_municipality",
    "_municipality_",
    "city and borough",
    "city_and_borough",
    "_city_and_borough",
    "_city_and_borough_",
    "consolidated government",
    "consolidated_government",
    "_consolidated_government",
    "_consolidated_government_",
    "metropolitan government",
    "metropolitan_government",
    "_metropolitan_government",
    "_metropolitan_government_",
    "unified government",
    "unified_government",
    "_unified_government",
    "_unified_government_",
    "city-county",
    "city_county",
    "_city_county",
    "_city_county_",
];

/// True if the link text names something that is not a place.
pub fn is_non_place(text: &str) -> bool {
    let text = text.to_lowercase();
    NON_PLACE_TERMS.iter().any(|term| text.contains(term))
}

/// True if either the href or the text mentions a county equivalent.
pub fn is_county_link(href: &str, text: &str) -> bool {
    let href = href.to_lowercase();
    let text = text.to_lowercase();
    COUNTY_TERMS
        .iter()
        .any(|term| href.contains(term) || text.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_place() {
        assert!(is_non_place("Coker Water DISTRICT"));
        assert!(is_non_place("Seminole Nation of Oklahoma"));
        assert!(is_non_place("Children's Services Council"));
        assert!(is_non_place("Unified Development Code"));
        assert!(!is_non_place("Town of Coker"));
        assert!(!is_non_place("Franklin County"));
    }

    #[test]
    fn test_county_link_text() {
        assert!(is_county_link("https://x.test/a", "Franklin County"));
        assert!(is_county_link("https://x.test/a", "Orleans Parish"));
        assert!(is_county_link("https://x.test/a", "Nome Census Area"));
        assert!(is_county_link("https://x.test/a", "City and Borough of Juneau"));
        assert!(is_county_link("https://x.test/a", "Athens-Clarke Unified Government"));
    }

    #[test]
    fn test_county_link_href() {
        assert!(is_county_link(
            "https://library.municode.com/oh/franklin_county",
            "Franklin"
        ));
        assert!(is_county_link(
            "https://library.municode.com/tn/metro_government/nashville_metropolitan_government",
            "Nashville"
        ));
    }

    #[test]
    fn test_city_link() {
        assert!(!is_county_link(
            "https://library.municode.com/al/coker",
            "Town of Coker"
        ));
    }
}
