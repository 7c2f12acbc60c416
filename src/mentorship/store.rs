//! Mentorship Store
//!
//! Pure persistence of mentorship records. No policy lives here: status
//! legality belongs to the lifecycle manager. Every method runs under one
//! lock; `count_by_mentor` splits long id lists into batches.

use super::types::{Mentorship, MentorshipStatus};
use crate::db::{invalid_column, parse_timestamp, placeholders, Database, StoreResult, ID_BATCH};
use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, OptionalExtension, Row};
use std::collections::HashMap;

pub trait MentorshipStore: Send + Sync {
    fn create(&self, mentorship: &Mentorship) -> StoreResult<()>;

    fn get(&self, id: &str) -> StoreResult<Option<Mentorship>>;

    /// Relationships where the user is the mentee (`as_mentee`) or the mentor,
    /// newest first
    fn list_for_user(&self, user_id: &str, as_mentee: bool) -> StoreResult<Vec<Mentorship>>;

    /// Overwrite the status; `None` when the id is absent
    fn update_status(
        &self,
        id: &str,
        status: MentorshipStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Mentorship>>;

    /// `true` if a record was removed
    fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Number of records per mentor id, optionally restricted to some statuses.
    /// Mentors with no records are absent from the map.
    fn count_by_mentor(
        &self,
        mentor_ids: &[String],
        statuses: Option<&[MentorshipStatus]>,
    ) -> StoreResult<HashMap<String, usize>>;
}

/// SQLite-backed mentorship store
#[derive(Clone)]
pub struct SqliteMentorshipStore {
    db: Database,
}

const COLUMNS: &str = "id, mentor_id, mentee_id, skill_focus, status, created_at, updated_at";

impl SqliteMentorshipStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl MentorshipStore for SqliteMentorshipStore {
    fn create(&self, mentorship: &Mentorship) -> StoreResult<()> {
        let conn = self.db.conn()?;
        conn.execute(
            &format!("INSERT INTO mentorships ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                mentorship.id,
                mentorship.mentor_id,
                mentorship.mentee_id,
                mentorship.skill_focus,
                mentorship.status.as_str(),
                mentorship.created_at.to_rfc3339(),
                mentorship.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Mentorship>> {
        let conn = self.db.conn()?;
        let mentorship = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM mentorships WHERE id = ?1"),
                [id],
                map_row,
            )
            .optional()?;
        Ok(mentorship)
    }

    fn list_for_user(&self, user_id: &str, as_mentee: bool) -> StoreResult<Vec<Mentorship>> {
        let column = if as_mentee { "mentee_id" } else { "mentor_id" };
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM mentorships WHERE {column} = ?1 ORDER BY created_at DESC, id"
        ))?;
        let rows = stmt.query_map([user_id], map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn update_status(
        &self,
        id: &str,
        status: MentorshipStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Mentorship>> {
        let conn = self.db.conn()?;
        let mentorship = conn
            .query_row(
                &format!(
                    "UPDATE mentorships SET status = ?1, updated_at = ?2 WHERE id = ?3 RETURNING {COLUMNS}"
                ),
                params![status.as_str(), updated_at.to_rfc3339(), id],
                map_row,
            )
            .optional()?;
        Ok(mentorship)
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let removed = conn.execute("DELETE FROM mentorships WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    fn count_by_mentor(
        &self,
        mentor_ids: &[String],
        statuses: Option<&[MentorshipStatus]>,
    ) -> StoreResult<HashMap<String, usize>> {
        if mentor_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let status_strs: Vec<&'static str> = statuses
            .unwrap_or(&[])
            .iter()
            .map(|s| s.as_str())
            .collect();

        // An empty status filter matches nothing
        if statuses.is_some() && status_strs.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.db.conn()?;
        let mut counts = HashMap::with_capacity(mentor_ids.len());
        for batch in mentor_ids.chunks(ID_BATCH) {
            let mut sql = format!(
                "SELECT mentor_id, COUNT(*) FROM mentorships WHERE mentor_id IN ({})",
                placeholders(1, batch.len())
            );
            if statuses.is_some() {
                sql.push_str(&format!(
                    " AND status IN ({})",
                    placeholders(batch.len() + 1, status_strs.len())
                ));
            }
            sql.push_str(" GROUP BY mentor_id");

            let mut bind: Vec<&dyn ToSql> = Vec::with_capacity(batch.len() + status_strs.len());
            bind.extend(batch.iter().map(|id| id as &dyn ToSql));
            bind.extend(status_strs.iter().map(|s| s as &dyn ToSql));

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(bind.as_slice(), |row| {
                let mentor_id: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((mentor_id, count as usize))
            })?;
            for row in rows {
                let (mentor_id, count) = row?;
                counts.insert(mentor_id, count);
            }
        }
        Ok(counts)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Mentorship> {
    let status: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Mentorship {
        id: row.get(0)?,
        mentor_id: row.get(1)?,
        mentee_id: row.get(2)?,
        skill_focus: row.get(3)?,
        status: MentorshipStatus::from_str(&status)
            .ok_or_else(|| invalid_column(4, format!("unknown mentorship status '{}'", status)))?,
        created_at: parse_timestamp(5, &created_at)?,
        updated_at: parse_timestamp(6, &updated_at)?,
    })
}
