//! Notifications
//!
//! Every query is scoped to the owning user: an id that belongs to someone
//! else behaves exactly like a missing one.

use super::{require_text, ProfileError};
use crate::db::{parse_timestamp, placeholders, Database, StoreResult, ID_BATCH};
use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    /// e.g. "mentorship", "achievement"
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    /// Items in this page
    pub total_count: usize,
    pub unread_count: usize,
}

/// A validated window over a user's notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    pub fn new(skip: Option<u32>, limit: Option<u32>) -> Result<Self, ProfileError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ProfileError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self {
            skip: skip.unwrap_or(0),
            limit,
        })
    }
}

const COLUMNS: &str = "id, user_id, kind, title, message, is_read, created_at";

#[derive(Clone)]
pub struct NotificationStore {
    db: Database,
}

impl NotificationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(
        &self,
        user_id: &str,
        kind: &str,
        title: &str,
        message: &str,
    ) -> Result<Notification, ProfileError> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind: require_text("kind", kind)?,
            title: require_text("title", title)?,
            message: message.to_string(),
            is_read: false,
            created_at: Utc::now(),
        };

        let conn = self.db.conn()?;
        conn.execute(
            &format!("INSERT INTO notifications ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                notification.id,
                notification.user_id,
                notification.kind,
                notification.title,
                notification.message,
                notification.is_read,
                notification.created_at.to_rfc3339(),
            ],
        )?;

        log::debug!("[PROFILE] Notification {} ({}) for {}", notification.id, kind, user_id);
        Ok(notification)
    }

    /// Newest first
    pub fn list(&self, user_id: &str, page: Page) -> StoreResult<NotificationList> {
        let notifications = {
            let conn = self.db.conn()?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM notifications WHERE user_id = ?1 \
                 ORDER BY created_at DESC, id LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt.query_map(params![user_id, page.limit, page.skip], map_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok(NotificationList {
            total_count: notifications.len(),
            unread_count: self.unread_count(user_id)?,
            notifications,
        })
    }

    pub fn unread_count(&self, user_id: &str) -> StoreResult<usize> {
        let conn = self.db.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn mark_read(&self, id: &str, user_id: &str) -> Result<Notification, ProfileError> {
        let conn = self.db.conn()?;
        let notification = conn
            .query_row(
                &format!(
                    "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2 RETURNING {COLUMNS}"
                ),
                params![id, user_id],
                map_row,
            )
            .optional()?
            .ok_or_else(not_found)?;
        Ok(notification)
    }

    /// Mark the listed notifications read; ids owned by other users are
    /// ignored. Returns how many rows changed.
    pub fn mark_many_read(&self, user_id: &str, ids: &[String]) -> StoreResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;
        let mut changed = 0;
        for batch in ids.chunks(ID_BATCH) {
            let sql = format!(
                "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0 AND id IN ({})",
                placeholders(2, batch.len())
            );

            let mut bind: Vec<&dyn ToSql> = Vec::with_capacity(batch.len() + 1);
            bind.push(&user_id);
            bind.extend(batch.iter().map(|id| id as &dyn ToSql));

            changed += tx.execute(&sql, bind.as_slice())?;
        }
        tx.commit()?;
        log::info!("[PROFILE] Marked {} notification(s) read for {}", changed, user_id);
        Ok(changed)
    }

    pub fn delete(&self, id: &str, user_id: &str) -> Result<(), ProfileError> {
        let conn = self.db.conn()?;
        let removed = conn.execute(
            "DELETE FROM notifications WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if removed == 0 {
            return Err(not_found());
        }
        log::info!("[PROFILE] Notification {} deleted", id);
        Ok(())
    }
}

fn not_found() -> ProfileError {
    ProfileError::NotFound("Notification not found".to_string())
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let created_at: String = row.get(6)?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        title: row.get(3)?,
        message: row.get(4)?,
        is_read: row.get(5)?,
        created_at: parse_timestamp(6, &created_at)?,
    })
}
