//! Storage for activity entries flushed by the tracker.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use devpulse::db::{db::Db, time_entries::{TimeEntries, TimeEntryStore}};
//! use devpulse::libs::activity::ActivityEntry;
//! use chrono::Utc;
//!
//! let entries = TimeEntries::new(&Db::new()?);
//! entries.insert(&ActivityEntry::new(Utc::now(), Some("api"), Some("src/main.rs"), 60))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::db::Db;
use crate::libs::activity::{format_timestamp, ActivityEntry};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

const INSERT_ENTRY: &str = "INSERT INTO time_entries (timestamp, project, file, duration_seconds, is_idle, synced) VALUES (?1, ?2, ?3, ?4, ?5, 0)";
const SELECT_RANGE: &str =
    "SELECT id, timestamp, project, file, duration_seconds, is_idle FROM time_entries WHERE timestamp >= ?1 AND timestamp < ?2 ORDER BY timestamp, id";
const SELECT_ALL: &str = "SELECT id, timestamp, project, file, duration_seconds, is_idle FROM time_entries ORDER BY timestamp, id";
const COUNT_ENTRIES: &str = "SELECT COUNT(*) FROM time_entries";

/// Write side used by the activity tracker.
pub trait TimeEntryStore {
    /// Persists one entry and returns its row id.
    fn insert(&self, entry: &ActivityEntry) -> Result<i64>;
}

/// SQLite repository for the `time_entries` table.
#[derive(Clone)]
pub struct TimeEntries {
    db: Db,
}

impl TimeEntries {
    pub fn new(db: &Db) -> Self {
        Self { db: db.clone() }
    }

    /// Entries with `from <= timestamp < to`, oldest first.
    pub fn fetch_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<ActivityEntry>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(SELECT_RANGE)?;
        let rows = stmt.query_map(params![format_timestamp(&from), format_timestamp(&to)], map_entry)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn fetch_all(&self) -> Result<Vec<ActivityEntry>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], map_entry)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.db.conn().query_row(COUNT_ENTRIES, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl TimeEntryStore for TimeEntries {
    fn insert(&self, entry: &ActivityEntry) -> Result<i64> {
        let conn = self.db.conn();
        conn.execute(
            INSERT_ENTRY,
            params![
                format_timestamp(&entry.timestamp),
                entry.project,
                entry.file,
                entry.duration_seconds as i64,
                entry.is_idle,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<ActivityEntry> {
    let raw: String = row.get(1)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)))?;
    let duration: i64 = row.get(4)?;

    Ok(ActivityEntry {
        id: Some(row.get(0)?),
        timestamp,
        project: row.get(2)?,
        file: row.get(3)?,
        duration_seconds: duration.max(0) as u64,
        is_idle: row.get(5)?,
    })
}
