//! Achievements
//!
//! Badges earned by a user. Only the owner may read or delete one.

use super::{ensure_owner, require_text, ProfileError};
use crate::db::{parse_timestamp, Database, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub badge_name: Option<String>,
    pub icon_url: Option<String>,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NewAchievement {
    pub title: String,
    pub description: Option<String>,
    pub badge_name: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementList {
    pub achievements: Vec<Achievement>,
    pub total_count: usize,
}

impl From<Vec<Achievement>> for AchievementList {
    fn from(achievements: Vec<Achievement>) -> Self {
        Self {
            total_count: achievements.len(),
            achievements,
        }
    }
}

const COLUMNS: &str = "id, user_id, title, description, badge_name, icon_url, earned_at";

#[derive(Clone)]
pub struct AchievementStore {
    db: Database,
}

impl AchievementStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, user_id: &str, input: NewAchievement) -> Result<Achievement, ProfileError> {
        let achievement = Achievement {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: require_text("title", &input.title)?,
            description: input.description,
            badge_name: input.badge_name,
            icon_url: input.icon_url,
            earned_at: Utc::now(),
        };

        let conn = self.db.conn()?;
        conn.execute(
            &format!("INSERT INTO achievements ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                achievement.id,
                achievement.user_id,
                achievement.title,
                achievement.description,
                achievement.badge_name,
                achievement.icon_url,
                achievement.earned_at.to_rfc3339(),
            ],
        )?;

        log::info!("[PROFILE] Achievement {} created for {}", achievement.id, user_id);
        Ok(achievement)
    }

    pub fn get(&self, id: &str, caller_id: &str) -> Result<Achievement, ProfileError> {
        let achievement = self
            .find(id)?
            .ok_or_else(|| ProfileError::NotFound("Achievement not found".to_string()))?;
        ensure_owner(&achievement.user_id, caller_id)?;
        Ok(achievement)
    }

    /// Newest first
    pub fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<Achievement>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM achievements WHERE user_id = ?1 ORDER BY earned_at DESC, id"
        ))?;
        let rows = stmt.query_map([user_id], map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn delete(&self, id: &str, caller_id: &str) -> Result<(), ProfileError> {
        self.get(id, caller_id)?;
        let conn = self.db.conn()?;
        conn.execute("DELETE FROM achievements WHERE id = ?1", [id])?;
        log::info!("[PROFILE] Achievement {} deleted", id);
        Ok(())
    }

    fn find(&self, id: &str) -> StoreResult<Option<Achievement>> {
        let conn = self.db.conn()?;
        let achievement = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM achievements WHERE id = ?1"),
                [id],
                map_row,
            )
            .optional()?;
        Ok(achievement)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Achievement> {
    let earned_at: String = row.get(6)?;
    Ok(Achievement {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        badge_name: row.get(4)?,
        icon_url: row.get(5)?,
        earned_at: parse_timestamp(6, &earned_at)?,
    })
}
