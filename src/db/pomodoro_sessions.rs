//! Storage for Pomodoro focus and break sessions.
//!
//! Sessions are inserted when their countdown starts and updated by id as
//! they complete, get interrupted, extended or annotated.

use crate::db::db::Db;
use crate::libs::error::ConfigError;
use crate::libs::session::{PomodoroSession, SessionType};
use anyhow::{anyhow, Result};
use rusqlite::{params, OptionalExtension, Row};

const INSERT_SESSION: &str = "INSERT INTO pomodoro_sessions (session_type, planned_duration, actual_duration, start_time, end_time,
    was_completed, was_interrupted, associated_activity, productivity_rating, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const UPDATE_SESSION: &str = "UPDATE pomodoro_sessions SET session_type = ?1, planned_duration = ?2, actual_duration = ?3, start_time = ?4,
    end_time = ?5, was_completed = ?6, was_interrupted = ?7, associated_activity = ?8, productivity_rating = ?9, notes = ?10
    WHERE id = ?11";
const SELECT_COLUMNS: &str = "SELECT id, session_type, planned_duration, actual_duration, start_time, end_time, was_completed,
    was_interrupted, associated_activity, productivity_rating, notes FROM pomodoro_sessions";
const COUNT_COMPLETED_FOCUS: &str =
    "SELECT COUNT(*) FROM pomodoro_sessions WHERE session_type = 'focus' AND was_completed = 1 AND start_time >= ?1";

/// Persistence used by the Pomodoro state machine.
pub trait SessionStore {
    /// Inserts a new session and returns its id.
    fn insert(&self, session: &PomodoroSession) -> Result<i64>;
    /// Overwrites the stored row with the same id.
    fn update(&self, session: &PomodoroSession) -> Result<()>;
    /// Completed focus sessions that started at or after `since` (epoch seconds).
    fn count_completed_focus_since(&self, since: i64) -> Result<u32>;
}

#[derive(Clone)]
pub struct PomodoroSessions {
    db: Db,
}

impl PomodoroSessions {
    pub fn new(db: &Db) -> Self {
        Self { db: db.clone() }
    }

    pub fn get(&self, id: i64) -> Result<Option<PomodoroSession>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let session = self.db.conn().query_row(&sql, params![id], map_session).optional()?;
        Ok(session)
    }

    /// Sessions whose `start_time` falls in `[from, to)`, oldest first.
    pub fn fetch_range(&self, from: i64, to: i64) -> Result<Vec<PomodoroSession>> {
        let sql = format!("{} WHERE start_time >= ?1 AND start_time < ?2 ORDER BY start_time, id", SELECT_COLUMNS);
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![from, to], map_session)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn fetch_all(&self) -> Result<Vec<PomodoroSession>> {
        let sql = format!("{} ORDER BY start_time, id", SELECT_COLUMNS);
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_session)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Attaches a rating, notes or an activity label to a stored session.
    ///
    /// Fields passed as `None` keep their stored value.
    pub fn annotate(&self, id: i64, rating: Option<u8>, notes: Option<String>, activity: Option<String>) -> Result<PomodoroSession> {
        if let Some(rating) = rating {
            if !(1..=10).contains(&rating) {
                return Err(ConfigError::RatingOutOfRange(rating).into());
            }
        }

        let mut session = self.get(id)?.ok_or_else(|| anyhow!("session {} not found", id))?;
        if rating.is_some() {
            session.productivity_rating = rating;
        }
        if notes.is_some() {
            session.notes = notes;
        }
        if activity.is_some() {
            session.associated_activity = activity;
        }
        self.update(&session)?;
        Ok(session)
    }
}

impl SessionStore for PomodoroSessions {
    fn insert(&self, session: &PomodoroSession) -> Result<i64> {
        let conn = self.db.conn();
        conn.execute(
            INSERT_SESSION,
            params![
                session.session_type.as_str(),
                session.planned_duration_seconds,
                session.actual_duration_seconds,
                session.start_time,
                session.end_time,
                session.was_completed,
                session.was_interrupted,
                session.associated_activity,
                session.productivity_rating,
                session.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, session: &PomodoroSession) -> Result<()> {
        let id = session.id.ok_or_else(|| anyhow!("cannot update a session that was never inserted"))?;
        let changed = self.db.conn().execute(
            UPDATE_SESSION,
            params![
                session.session_type.as_str(),
                session.planned_duration_seconds,
                session.actual_duration_seconds,
                session.start_time,
                session.end_time,
                session.was_completed,
                session.was_interrupted,
                session.associated_activity,
                session.productivity_rating,
                session.notes,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(anyhow!("session {} not found", id));
        }
        Ok(())
    }

    fn count_completed_focus_since(&self, since: i64) -> Result<u32> {
        let count: u32 = self.db.conn().query_row(COUNT_COMPLETED_FOCUS, params![since], |row| row.get(0))?;
        Ok(count)
    }
}

fn map_session(row: &Row<'_>) -> rusqlite::Result<PomodoroSession> {
    let kind: String = row.get(1)?;
    let session_type = kind
        .parse::<SessionType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into()))?;

    Ok(PomodoroSession {
        id: Some(row.get(0)?),
        session_type,
        planned_duration_seconds: row.get(2)?,
        actual_duration_seconds: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        was_completed: row.get(6)?,
        was_interrupted: row.get(7)?,
        associated_activity: row.get(8)?,
        productivity_rating: row.get(9)?,
        notes: row.get(10)?,
    })
}
