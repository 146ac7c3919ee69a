//! Legal-code publishers.

use serde::{Deserialize, Serialize};

/// Site that indexes a place's municipal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Publisher {
    Municode,
    AmericanLegal,
    GeneralCode,
    CodePublishingCo,
    /// The place's own website.
    PlaceDomain,
}

impl Publisher {
    pub const ALL: [Publisher; 5] = [
        Self::Municode,
        Self::AmericanLegal,
        Self::GeneralCode,
        Self::CodePublishingCo,
        Self::PlaceDomain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Municode => "municode",
            Self::AmericanLegal => "american_legal",
            Self::GeneralCode => "general_code",
            Self::CodePublishingCo => "code_publishing_co",
            Self::PlaceDomain => "place_domain",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "municode" => Some(Self::Municode),
            "american_legal" => Some(Self::AmericanLegal),
            "general_code" => Some(Self::GeneralCode),
            "code_publishing_co" => Some(Self::CodePublishingCo),
            "place_domain" => Some(Self::PlaceDomain),
            _ => None,
        }
    }

    /// Guess the publisher of a scraped link from its listing URL and href.
    ///
    /// Anything not recognisably American Legal, Municode or Code Publishing
    /// is assumed to come from General Code (ecode360).
    pub fn attribute(url: &str, href: &str) -> Self {
        if url.contains("amlegal") {
            Self::AmericanLegal
        } else if url.contains("municode") {
            Self::Municode
        } else if href.contains("codepublishing") {
            Self::CodePublishingCo
        } else {
            Self::GeneralCode
        }
    }

    /// Column in the wide `sources` table, if the publisher has one.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::Municode => Some("source_municode"),
            Self::GeneralCode => Some("source_general_code"),
            Self::AmericanLegal => Some("source_american_legal"),
            Self::CodePublishingCo => Some("source_code_publishing_co"),
            Self::PlaceDomain => None,
        }
    }
}

impl std::fmt::Display for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_roundtrip() {
        for publisher in Publisher::ALL {
            assert_eq!(Publisher::from_str(publisher.as_str()), Some(publisher));
        }
        assert_eq!(Publisher::from_str("lexisnexis"), None);
    }

    #[test]
    fn test_attribute() {
        assert_eq!(
            Publisher::attribute(
                "https://codelibrary.amlegal.com/regions/al",
                "/codes/mobile/latest/overview"
            ),
            Publisher::AmericanLegal
        );
        assert_eq!(
            Publisher::attribute("https://library.municode.com/al", "/al/coker"),
            Publisher::Municode
        );
        assert_eq!(
            Publisher::attribute(
                "https://www.generalcode.com/source-library/?state=WA",
                "https://www.codepublishing.com/WA/Bothell/"
            ),
            Publisher::CodePublishingCo
        );
        assert_eq!(
            Publisher::attribute(
                "https://www.generalcode.com/source-library/?state=VA",
                "https://ecode360.com/WA1232"
            ),
            Publisher::GeneralCode
        );
    }

    #[test]
    fn test_column() {
        assert_eq!(Publisher::Municode.column(), Some("source_municode"));
        assert_eq!(Publisher::PlaceDomain.column(), None);
    }
}
