use std::fs;
use std::path::Path;

use rusqlite::{Connection, Params};
use tracing::{debug, info};

use crate::error::{storage, PlaceError, Result};

/// Name of the single table holding every place.
pub(crate) const TABLE: &str = "place";

const PROBE_SQL: &str = "SELECT 1 FROM place LIMIT 1";

const RECREATE_SQL: &str = "DROP TABLE IF EXISTS place;
    CREATE TABLE place (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        latitude FLOAT,
        longitude FLOAT,
        description TEXT,
        title TEXT,
        isFavorite BOOLEAN
    );";

/// An open connection whose schema has not been checked yet. The only thing
/// it can do is become a [`PlaceStore`] through [`Database::initialize`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the SQLite file at `path`, including any
    /// missing parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PlaceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(storage("open SQLite database"))?;
        debug!(path = %path.display(), "opened place database");
        Ok(Self { conn })
    }

    /// Private in-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage("open in-memory database"))?;
        Ok(Self { conn })
    }

    /// Make sure the `place` table exists and hand back a ready store.
    /// With `force_reset` the table is dropped and recreated, discarding
    /// every row.
    pub fn initialize(self, force_reset: bool) -> Result<PlaceStore> {
        let store = PlaceStore { conn: self.conn };
        store.initialize(force_reset)?;
        Ok(store)
    }
}

/// Outcome of a single parameterized statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Rows inserted, updated, or deleted.
    pub changes: usize,
    /// Row id of the most recent successful insert on this connection.
    pub last_insert_id: i64,
}

/// Sole owner of the `place` table. Every statement against it goes through
/// this type.
pub struct PlaceStore {
    pub(crate) conn: Connection,
}

impl PlaceStore {
    /// Re-run schema setup. A no-op when the table exists and `force_reset`
    /// is false.
    pub fn initialize(&self, force_reset: bool) -> Result<()> {
        if !force_reset && self.table_exists() {
            debug!("place table present, skipping schema creation");
            return Ok(());
        }

        self.conn
            .execute_batch(RECREATE_SQL)
            .map_err(storage("create place table"))?;
        info!(force_reset, "recreated {TABLE} table");
        Ok(())
    }

    /// Drop every row by recreating the table.
    pub fn reset(&self) -> Result<()> {
        self.initialize(true)
    }

    /// Lightweight probe: any failure to read the table means it is absent.
    fn table_exists(&self) -> bool {
        self.conn
            .prepare(PROBE_SQL)
            .and_then(|mut stmt| stmt.exists([]))
            .map(|_| true)
            .unwrap_or(false)
    }

    /// Execute one parameterized statement against the table. Values are
    /// always bound, never spliced into `sql`.
    pub fn run<P: Params>(&self, action: &'static str, sql: &str, params: P) -> Result<RunOutcome> {
        let changes = self.conn.execute(sql, params).map_err(storage(action))?;
        let last_insert_id = self.conn.last_insert_rowid();
        debug!(action, changes, "statement executed");
        Ok(RunOutcome {
            changes,
            last_insert_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::params;

    use super::*;

    #[test]
    fn initialize_creates_missing_table() {
        let store = Database::open_in_memory()
            .and_then(|db| db.initialize(false))
            .expect("store");
        assert!(store.table_exists());
    }

    #[test]
    fn initialize_without_reset_keeps_rows() {
        let store = Database::open_in_memory()
            .and_then(|db| db.initialize(false))
            .expect("store");
        store
            .run(
                "insert place",
                "INSERT INTO place (title, description, latitude, longitude, isFavorite) VALUES (?1, '', 0, 0, 0)",
                params!["Kept"],
            )
            .expect("insert");

        store.initialize(false).expect("second initialize");

        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM place", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn run_reports_changes_and_insert_id() {
        let store = Database::open_in_memory()
            .and_then(|db| db.initialize(true))
            .expect("store");
        let outcome = store
            .run(
                "insert place",
                "INSERT INTO place (title) VALUES (?1)",
                params!["x'); DROP TABLE place; --"],
            )
            .expect("insert");
        assert_eq!(outcome.changes, 1);
        assert_eq!(outcome.last_insert_id, 1);
        assert!(store.table_exists());
    }
}
