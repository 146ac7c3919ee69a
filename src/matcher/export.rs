//! Persisting partitions for operator review.
//!
//! Partition computation is pure; writing happens here, through a
//! [`PartitionWriter`] so the destination can be swapped out.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use crate::models::{MatchResult, SourceLink};

use super::partition::{Partition, Partitions};
use super::report::Reporter;

/// Errors writing a single partition.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A header plus string rows, ready to be written as CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub const RESULT_HEADERS: [&'static str; 5] =
        ["gnis", "place_name", "state_code", "href", "source"];
    pub const LINK_HEADERS: [&'static str; 5] = ["url", "href", "text", "source", "state_code"];

    pub fn from_results(results: &[MatchResult]) -> Self {
        Self {
            headers: Self::RESULT_HEADERS.to_vec(),
            rows: results
                .iter()
                .map(|r| {
                    vec![
                        r.gnis.to_string(),
                        r.place_name.clone(),
                        r.state_code.clone(),
                        r.assignment.href_cell(),
                        r.assignment.source_cell(),
                    ]
                })
                .collect(),
        }
    }

    pub fn from_links(links: &[SourceLink]) -> Self {
        Self {
            headers: Self::LINK_HEADERS.to_vec(),
            rows: links
                .iter()
                .map(|l| {
                    vec![
                        l.url.clone(),
                        l.href.clone().unwrap_or_default(),
                        l.text.clone().unwrap_or_default(),
                        l.source.clone(),
                        l.state_code.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
        }
    }

    pub fn for_partition(partitions: &Partitions, partition: Partition) -> Self {
        match partition {
            Partition::NonPlaces => Self::from_links(&partitions.non_places),
            other => Self::from_results(partitions.results(other)),
        }
    }
}

/// Destination for partition tables.
pub trait PartitionWriter: Send + Sync {
    /// Write one partition; returns where it went.
    fn write(&self, partition: Partition, table: &ExportTable) -> Result<PathBuf, ExportError>;
}

/// Writes `{partition}.csv` files into a directory.
#[derive(Debug, Clone)]
pub struct CsvPartitionWriter {
    output_dir: PathBuf,
}

impl CsvPartitionWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl PartitionWriter for CsvPartitionWriter {
    fn write(&self, partition: Partition, table: &ExportTable) -> Result<PathBuf, ExportError> {
        let path = self.output_dir.join(partition.file_name());
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };
        let csv_err = |source| ExportError::Csv {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.output_dir).map_err(io_err)?;
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&path)
            .map_err(csv_err)?;

        writer.write_record(&table.headers).map_err(csv_err)?;
        for row in &table.rows {
            writer.write_record(row).map_err(csv_err)?;
        }
        writer.flush().map_err(io_err)?;

        Ok(path)
    }
}

/// Keeps written tables in memory, keyed by partition.
#[derive(Debug, Default)]
pub struct MemoryPartitionWriter {
    tables: Mutex<BTreeMap<Partition, ExportTable>>,
}

impl MemoryPartitionWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, partition: Partition) -> Option<ExportTable> {
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&partition)
            .cloned()
    }
}

impl PartitionWriter for MemoryPartitionWriter {
    fn write(&self, partition: Partition, table: &ExportTable) -> Result<PathBuf, ExportError> {
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(partition, table.clone());
        Ok(PathBuf::from(partition.file_name()))
    }
}

/// What [`persist`] managed to write.
#[derive(Debug, Default)]
pub struct PersistReport {
    pub written: Vec<(Partition, PathBuf)>,
    pub failed: Vec<(Partition, String)>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write every partition. A failed file is logged and skipped.
pub fn persist(
    partitions: &Partitions,
    writer: &dyn PartitionWriter,
    reporter: &dyn Reporter,
) -> PersistReport {
    let mut report = PersistReport::default();

    for partition in Partition::ALL {
        reporter.info(&format!(
            "{} places were in {}",
            partitions.len(partition),
            partition
        ));

        let table = ExportTable::for_partition(partitions, partition);
        match writer.write(partition, &table) {
            Ok(path) => {
                reporter.info(&format!(
                    "Saved {} to '{}'",
                    partition.file_name(),
                    path.display()
                ));
                report.written.push((partition, path));
            }
            Err(e) => {
                reporter.warn(&format!(
                    "Could not save {}: {}",
                    partition.file_name(),
                    e
                ));
                report.failed.push((partition, e.to_string()));
            }
        }
    }

    report
}
