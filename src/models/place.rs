//! Canonical place records.

use serde::{Deserialize, Serialize};

/// A governmental unit from the canonical places table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// GNIS identifier, unique per place.
    pub gnis: i64,
    /// Display name, e.g. "Town of Coker". Nullable in the source table.
    pub place_name: Option<String>,
    /// Jurisdiction class code. Codes containing `H` are counties.
    pub class_code: String,
    /// Two-letter state abbreviation.
    pub state_code: String,
}

impl PlaceRecord {
    pub fn new(gnis: i64, place_name: &str, class_code: &str, state_code: &str) -> Self {
        Self {
            gnis,
            place_name: Some(place_name.to_string()),
            class_code: class_code.to_string(),
            state_code: state_code.to_string(),
        }
    }

    /// County-level entities carry an `H` somewhere in their class code.
    pub fn is_county(&self) -> bool {
        self.class_code.contains('H')
    }
}
