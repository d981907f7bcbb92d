//! Shared application state.
//!
//! One instance wrapped in `Arc` serves every request. SQLite
//! connections are opened per operation; WAL mode keeps concurrent
//! readers cheap and the busy timeout covers writer overlap, so no
//! connection pool is needed at admission-season load.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rusqlite::Connection;

use crate::allocator::AllocationPlan;
use crate::db::{self, DatabaseError};

pub struct AppState {
    /// SQLite file backing the registry and counters.
    db_path: PathBuf,
    /// Active allocation plan for this admission year.
    pub plan: AllocationPlan,
    /// Process start, reported as uptime by the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>, plan: AllocationPlan) -> Self {
        Self {
            db_path: db_path.into(),
            plan,
            started_at: Instant::now(),
        }
    }

    /// Open a database connection. Migrations are verified on every
    /// open, which is a single version query once the schema exists.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_creates_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let state = AppState::new(
            tmp.path().join("admission.db"),
            AllocationPlan::bundled().unwrap(),
        );

        let conn = state.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 3);

        // A second connection sees the same file
        let again = state.open_db().unwrap();
        let version: i64 = again
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }
}
