//! Matched publisher URLs stored in the wide `sources` table.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::Result;
use crate::wide::WideRow;

/// SQLite-backed repository for per-place publisher URLs.
pub struct SourceAssignmentRepository {
    db_path: PathBuf,
}

impl SourceAssignmentRepository {
    pub fn new(db_path: &Path) -> Result<Self> {
        let repo = Self {
            db_path: db_path.to_path_buf(),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    fn connect(&self) -> Result<Connection> {
        super::connect(&self.db_path)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sources (
                gnis INTEGER PRIMARY KEY,
                place_name TEXT NOT NULL,
                state_code TEXT NOT NULL,
                source_municode TEXT,
                source_general_code TEXT,
                source_american_legal TEXT,
                source_code_publishing_co TEXT,
                updated_at TEXT NOT NULL
            );
        "#,
        )?;
        Ok(())
    }

    /// Upsert rows. On conflict only the publisher columns change.
    pub fn upsert_all(&self, rows: &[WideRow]) -> Result<usize> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO sources (
                    gnis, place_name, state_code,
                    source_municode, source_general_code,
                    source_american_legal, source_code_publishing_co,
                    updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(gnis) DO UPDATE SET
                    source_municode = excluded.source_municode,
                    source_general_code = excluded.source_general_code,
                    source_american_legal = excluded.source_american_legal,
                    source_code_publishing_co = excluded.source_code_publishing_co,
                    updated_at = excluded.updated_at
                "#,
            )?;
            for row in rows {
                stmt.execute(params![
                    row.gnis,
                    row.place_name,
                    row.state_code,
                    row.source_municode,
                    row.source_general_code,
                    row.source_american_legal,
                    row.source_code_publishing_co,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    pub fn get(&self, gnis: i64) -> Result<Option<WideRow>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                r#"
                SELECT gnis, place_name, state_code, source_municode, source_general_code,
                       source_american_legal, source_code_publishing_co
                FROM sources WHERE gnis = ?1
                "#,
                params![gnis],
                |row| {
                    Ok(WideRow {
                        gnis: row.get("gnis")?,
                        place_name: row.get("place_name")?,
                        state_code: row.get("state_code")?,
                        source_municode: row.get("source_municode")?,
                        source_general_code: row.get("source_general_code")?,
                        source_american_legal: row.get("source_american_legal")?,
                        source_code_publishing_co: row.get("source_code_publishing_co")?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sources", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(gnis: i64, municode: Option<&str>, general_code: Option<&str>) -> WideRow {
        WideRow {
            gnis,
            place_name: "Town of Pinedale".to_string(),
            state_code: "WY".to_string(),
            source_municode: municode.map(String::from),
            source_general_code: general_code.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SourceAssignmentRepository::new(&dir.path().join("placematch.db")).unwrap();

        let written = repo
            .upsert_all(&[row(2413134, None, Some("https://ecode360.com/PI2813"))])
            .unwrap();
        assert_eq!(written, 1);

        let stored = repo.get(2413134).unwrap().unwrap();
        assert_eq!(
            stored.source_general_code.as_deref(),
            Some("https://ecode360.com/PI2813")
        );
        assert!(repo.get(1).unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_publisher_columns() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SourceAssignmentRepository::new(&dir.path().join("placematch.db")).unwrap();

        repo.upsert_all(&[row(7, Some("https://library.municode.com/wy/a"), None)])
            .unwrap();
        repo.upsert_all(&[row(7, None, Some("https://ecode360.com/X"))])
            .unwrap();

        let stored = repo.get(7).unwrap().unwrap();
        assert_eq!(stored.source_municode, None);
        assert_eq!(stored.source_general_code.as_deref(), Some("https://ecode360.com/X"));
        assert_eq!(repo.count().unwrap(), 1);
    }
}
