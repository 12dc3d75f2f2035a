//! Database schema migration management and versioning.
//!
//! Every schema change is a numbered migration applied inside a transaction
//! and recorded in the `migrations` table, so opening an existing database
//! only runs what is missing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use devpulse::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("devpulse.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Tables owned by devpulse, reported by `devpulse migrations status`.
pub const DATA_TABLES: [&str; 3] = ["time_entries", "pomodoro_config", "pomodoro_sessions"];

/// A single schema change.
#[derive(Debug, Clone)]
struct Migration {
    /// Unique version number for ordering and tracking
    version: u32,
    /// Human-readable name describing the migration's purpose
    name: &'static str,
    /// Applies the schema changes within a transaction
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: per-file activity entries written by the tracker
        self.add_migration(1, "create_time_entries", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS time_entries (
                    id INTEGER PRIMARY KEY,
                    timestamp TEXT NOT NULL,
                    project TEXT NOT NULL,
                    file TEXT NOT NULL,
                    duration_seconds INTEGER NOT NULL,
                    is_idle INTEGER NOT NULL DEFAULT 0,
                    synced INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_time_entries_timestamp ON time_entries(timestamp)", [])?;
            Ok(())
        });

        // Version 2: Pomodoro settings (single row) and session history
        self.add_migration(2, "create_pomodoro_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS pomodoro_config (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    focus_duration INTEGER NOT NULL,
                    short_break_duration INTEGER NOT NULL,
                    long_break_duration INTEGER NOT NULL,
                    sessions_until_long_break INTEGER NOT NULL,
                    daily_goal_sessions INTEGER NOT NULL,
                    auto_start_breaks INTEGER NOT NULL,
                    auto_start_focus INTEGER NOT NULL,
                    enable_sound_alerts INTEGER NOT NULL,
                    enable_desktop_notifications INTEGER NOT NULL,
                    enable_status_bar_timer INTEGER NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS pomodoro_sessions (
                    id INTEGER PRIMARY KEY,
                    session_type TEXT NOT NULL,
                    planned_duration INTEGER NOT NULL,
                    actual_duration INTEGER,
                    start_time INTEGER NOT NULL,
                    end_time INTEGER,
                    was_completed INTEGER NOT NULL DEFAULT 0,
                    was_interrupted INTEGER NOT NULL DEFAULT 0,
                    associated_activity TEXT,
                    productivity_rating INTEGER,
                    notes TEXT
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_pomodoro_sessions_start ON pomodoro_sessions(start_time)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded schema version.
    ///
    /// All pending migrations share one transaction: a failure rolls the
    /// whole batch back and the error is propagated to the caller.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Registered migrations newer than the database's version.
    pub fn pending(&self, conn: &Connection) -> Result<Vec<(u32, &'static str)>> {
        let current = get_db_version(conn)?;
        Ok(self
            .migrations
            .iter()
            .filter(|m| m.version > current)
            .map(|m| (m.version, m.name))
            .collect())
    }

    /// Returns `(version, name, applied_at)` for every applied migration.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies all pending migrations to `conn`.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

/// Current schema version, `0` for a fresh database.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    conn.execute(MIGRATIONS_TABLE, [])?;
    MigrationManager::new().get_current_version(conn)
}

/// Row count per data table, `None` for tables not created yet.
pub fn table_row_counts(conn: &Connection) -> Result<Vec<(&'static str, Option<i64>)>> {
    DATA_TABLES
        .iter()
        .map(|&table| -> Result<(&'static str, Option<i64>)> {
            let exists: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Ok((table, None));
            }
            // Table names come from DATA_TABLES, never from input.
            let rows: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
            Ok((table, Some(rows)))
        })
        .collect()
}
