//! Named monotonic counters.
//!
//! Every sequential identifier in the system (application IDs, exam IDs,
//! seat numbers) is derived from a counter row in this table. The
//! increment is a single UPSERT with RETURNING, so it is atomic under
//! SQLite's write locking: two writers can never observe the same value
//! for one key, no matter how many connections or processes are involved.

use rusqlite::Connection;

use crate::db::DatabaseError;

/// Increment the counter for `key` and return the new value.
///
/// The counter is created lazily: the first allocation for an absent key
/// returns 1. Counters only ever grow; nothing in the system decrements
/// or resets them.
pub fn allocate(conn: &Connection, key: &str) -> Result<i64, DatabaseError> {
    let value = conn.query_row(
        "INSERT INTO counters (key, value, updated_at)
         VALUES (?1, 1, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
             value = value + 1,
             updated_at = datetime('now')
         RETURNING value",
        [key],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(value)
}

/// Read the current value for `key` without incrementing (0 if absent).
pub fn peek(conn: &Connection, key: &str) -> Result<i64, DatabaseError> {
    let mut stmt = conn.prepare("SELECT value FROM counters WHERE key = ?1")?;
    match stmt.query_row([key], |row| row.get::<_, i64>(0)) {
        Ok(value) => Ok(value),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// List all counters (admin diagnostics).
pub fn list(conn: &Connection) -> Result<Vec<(String, i64)>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT key, value FROM counters ORDER BY key")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
