//! SQLite Database
//!
//! A single connection shared behind a mutex. Every store call holds the lock
//! for one statement (or one read query), so each write is atomic on its own.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT NOT NULL,
        title TEXT,
        bio TEXT,
        avatar_url TEXT,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS skills (
        user_id TEXT NOT NULL,
        skill_name TEXT NOT NULL,
        proficiency_level INTEGER NOT NULL,
        category TEXT NOT NULL,
        PRIMARY KEY (user_id, skill_name)
    );
    CREATE INDEX IF NOT EXISTS idx_skills_name ON skills(skill_name);

    CREATE TABLE IF NOT EXISTS mentorships (
        id TEXT PRIMARY KEY,
        mentor_id TEXT NOT NULL,
        mentee_id TEXT NOT NULL,
        skill_focus TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_mentorships_mentor ON mentorships(mentor_id);
    CREATE INDEX IF NOT EXISTS idx_mentorships_mentee ON mentorships(mentee_id);

    CREATE TABLE IF NOT EXISTS achievements (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        badge_name TEXT,
        icon_url TEXT,
        earned_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_achievements_user ON achievements(user_id);

    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        skills_used TEXT NOT NULL,
        github_url TEXT,
        demo_url TEXT,
        image_url TEXT,
        start_date TEXT,
        endorsements INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_projects_user ON projects(user_id);

    CREATE TABLE IF NOT EXISTS notifications (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id);

    CREATE TABLE IF NOT EXISTS user_settings (
        user_id TEXT PRIMARY KEY,
        notifications TEXT,
        privacy TEXT
    );
";

/// Shared handle to the platform database
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a file-backed database and initialize the schema
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        log::info!("[DB] Opened database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Create an in-memory database for testing
    pub fn in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Lock the connection for one unit of work
    pub fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Cheap liveness query for the health endpoint
    pub fn ping(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

/// Parse an RFC 3339 timestamp column inside a row mapper
pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Build a conversion error for a text column holding an unexpected value
pub(crate) fn invalid_column(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// Upper bound on ids bound into one `IN (...)` clause; longer lists are
/// split into batches to stay under SQLite's host parameter limit
pub(crate) const ID_BATCH: usize = 500;

/// `?first, ... ?(first + count - 1)` for an `IN (...)` clause
pub(crate) fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}
