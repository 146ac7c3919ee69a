//! Canonical places stored in `locations`.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::Result;
use crate::models::PlaceRecord;

/// SQLite-backed place repository.
pub struct PlaceRepository {
    db_path: PathBuf,
}

impl PlaceRepository {
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
            CREATE TABLE IF NOT EXISTS locations (
                gnis INTEGER PRIMARY KEY,
                place_name TEXT,
                class_code TEXT NOT NULL,
                state_code TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_locations_state ON locations(state_code);
        "#,
        )?;
        Ok(())
    }

    /// All places, ordered by GNIS.
    pub fn get_all(&self) -> Result<Vec<PlaceRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT gnis, place_name, class_code, state_code FROM locations ORDER BY gnis",
        )?;

        let places = stmt
            .query_map([], |row| {
                Ok(PlaceRecord {
                    gnis: row.get("gnis")?,
                    place_name: row.get("place_name")?,
                    class_code: row.get("class_code")?,
                    state_code: row.get("state_code")?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(places)
    }

    /// Insert or replace places in one transaction. Returns rows written.
    pub fn save_all(&self, places: &[PlaceRecord]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO locations (gnis, place_name, class_code, state_code)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(gnis) DO UPDATE SET
                    place_name = excluded.place_name,
                    class_code = excluded.class_code,
                    state_code = excluded.state_code
                "#,
            )?;
            for place in places {
                stmt.execute(params![
                    place.gnis,
                    place.place_name,
                    place.class_code,
                    place.state_code
                ])?;
            }
        }
        tx.commit()?;
        Ok(places.len())
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_get_all() {
        let dir = tempfile::tempdir().unwrap();
        let repo = PlaceRepository::new(&dir.path().join("placematch.db")).unwrap();

        let mut unnamed = PlaceRecord::new(3, "", "C1", "AR");
        unnamed.place_name = None;
        let places = vec![
            PlaceRecord::new(2, "Haines", "H1", "AK"),
            PlaceRecord::new(1, "Town of Coker", "C1", "AL"),
            unnamed,
        ];
        assert_eq!(repo.save_all(&places).unwrap(), 3);

        let loaded = repo.get_all().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0], places[1]);
        assert_eq!(loaded[2].place_name, None);
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_save_all_upserts() {
        let dir = tempfile::tempdir().unwrap();
        let repo = PlaceRepository::new(&dir.path().join("placematch.db")).unwrap();

        repo.save_all(&[PlaceRecord::new(1, "Coker", "C1", "AL")])
            .unwrap();
        repo.save_all(&[PlaceRecord::new(1, "Town of Coker", "C1", "AL")])
            .unwrap();

        let loaded = repo.get_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].place_name.as_deref(), Some("Town of Coker"));
    }
}
