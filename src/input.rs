//! Loading input tables from CSV.
//!
//! Required columns are checked against the header row before any record
//! is read, so a malformed file fails before matching starts.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{PlaceRecord, RawLink, SourceLink};

pub const PLACE_COLUMNS: &[&str] = &["gnis", "place_name", "class_code", "state_code"];
pub const LINK_COLUMNS: &[&str] = &["url", "href", "text", "source", "state_code"];
pub const RAW_LINK_COLUMNS: &[&str] = &["url", "href", "text"];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{path} is missing required columns: {}", columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
    #[error("Failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn read_table<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>, InputError> {
    let csv_err = |source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?;
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InputError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Read canonical places (`gnis,place_name,class_code,state_code`).
pub fn read_places_csv(path: &Path) -> Result<Vec<PlaceRecord>, InputError> {
    read_table(path, PLACE_COLUMNS)
}

/// Read prepared links (`url,href,text,source,state_code`).
pub fn read_links_csv(path: &Path) -> Result<Vec<SourceLink>, InputError> {
    read_table(path, LINK_COLUMNS)
}

/// Read raw scraper output (`url,href,text` and optionally `source`).
pub fn read_raw_links_csv(path: &Path) -> Result<Vec<RawLink>, InputError> {
    read_table(path, RAW_LINK_COLUMNS)
}

/// Write prepared links in the layout [`read_links_csv`] expects.
pub fn write_links_csv(path: &Path, links: &[SourceLink]) -> Result<(), InputError> {
    let csv_err = |source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(csv_err)?;
    for link in links {
        writer.serialize(link).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| csv_err(csv::Error::from(e)))?;
    Ok(())
}
