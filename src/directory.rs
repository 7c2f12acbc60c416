//! User Directory
//!
//! Users and their skills. The mentorship subsystem only reads from here
//! (through the [`UserDirectory`] trait); registration and skill edits are
//! inherent methods on the SQLite implementation used by the profile API.

use crate::db::{parse_timestamp, Database, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const MIN_PROFICIENCY: u8 = 1;
pub const MAX_PROFICIENCY: u8 = 10;

/// A skill attached to a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skill {
    pub skill_name: String,
    /// 1 (beginner) to 10 (expert)
    pub proficiency_level: u8,
    pub category: String,
}

impl Skill {
    pub fn new(skill_name: &str, proficiency_level: u8, category: &str) -> Self {
        Self {
            skill_name: skill_name.to_string(),
            proficiency_level,
            category: category.to_string(),
        }
    }
}

/// A platform user with fully loaded skills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub skills: Vec<Skill>,
    pub created_at: DateTime<Utc>,
}

/// Fields for registering a new user
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("{0}")]
    Validation(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read access to users, as needed by the mentorship subsystem
pub trait UserDirectory: Send + Sync {
    /// Load one user with skills
    fn get(&self, user_id: &str) -> StoreResult<Option<User>>;

    fn exists(&self, user_id: &str) -> StoreResult<bool>;

    /// All users holding a skill with exactly this name (case-sensitive),
    /// ordered by full name then id, each with all of their skills.
    fn users_with_skill(&self, skill_name: &str) -> StoreResult<Vec<User>>;
}

/// SQLite-backed user directory
#[derive(Clone)]
pub struct SqliteUserDirectory {
    db: Database,
}

const USER_COLUMNS: &str =
    "u.id, u.email, u.full_name, u.title, u.bio, u.avatar_url, u.created_at, \
     s.skill_name, s.proficiency_level, s.category";

impl SqliteUserDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a new user profile
    pub fn register(&self, new_user: NewUser) -> Result<User, DirectoryError> {
        let full_name = new_user.full_name.trim();
        let email = new_user.email.trim();
        if full_name.is_empty() {
            return Err(DirectoryError::Validation("full_name must not be empty".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(DirectoryError::Validation("email must be a valid address".to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            title: new_user.title,
            bio: new_user.bio,
            avatar_url: new_user.avatar_url,
            skills: Vec::new(),
            created_at: Utc::now(),
        };

        let conn = self.db.conn()?;
        let taken: bool = conn
            .query_row("SELECT 1 FROM users WHERE email = ?1", [&user.email], |_| Ok(()))
            .optional()
            .map_err(StoreError::from)?
            .is_some();
        if taken {
            return Err(DirectoryError::Validation(format!(
                "email '{}' is already registered",
                user.email
            )));
        }

        conn.execute(
            "INSERT INTO users (id, email, full_name, title, bio, avatar_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id,
                user.email,
                user.full_name,
                user.title,
                user.bio,
                user.avatar_url,
                user.created_at.to_rfc3339(),
            ],
        )
        .map_err(StoreError::from)?;

        log::info!("[DIRECTORY] Registered user {}", user.id);
        Ok(user)
    }

    /// Add a skill to a user, replacing any existing skill with the same name
    pub fn add_skill(&self, user_id: &str, skill: Skill) -> Result<User, DirectoryError> {
        let skill_name = skill.skill_name.trim();
        if skill_name.is_empty() {
            return Err(DirectoryError::Validation("skill_name must not be empty".to_string()));
        }
        if !(MIN_PROFICIENCY..=MAX_PROFICIENCY).contains(&skill.proficiency_level) {
            return Err(DirectoryError::Validation(format!(
                "proficiency_level must be between {} and {}",
                MIN_PROFICIENCY, MAX_PROFICIENCY
            )));
        }
        if !self.exists(user_id)? {
            return Err(DirectoryError::NotFound(user_id.to_string()));
        }

        self.db
            .conn()?
            .execute(
                "INSERT INTO skills (user_id, skill_name, proficiency_level, category)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id, skill_name)
                 DO UPDATE SET proficiency_level = excluded.proficiency_level, category = excluded.category",
                params![user_id, skill_name, skill.proficiency_level, skill.category],
            )
            .map_err(StoreError::from)?;

        self.get(user_id)?
            .ok_or_else(|| DirectoryError::NotFound(user_id.to_string()))
    }
}

impl UserDirectory for SqliteUserDirectory {
    fn get(&self, user_id: &str) -> StoreResult<Option<User>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS}
             FROM users u LEFT JOIN skills s ON s.user_id = u.id
             WHERE u.id = ?1
             ORDER BY s.skill_name"
        ))?;
        let rows = stmt
            .query_map([user_id], map_user_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(group_users(rows).into_iter().next())
    }

    fn exists(&self, user_id: &str) -> StoreResult<bool> {
        let conn = self.db.conn()?;
        let found = conn
            .query_row("SELECT 1 FROM users WHERE id = ?1", [user_id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn users_with_skill(&self, skill_name: &str) -> StoreResult<Vec<User>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS}
             FROM users u JOIN skills s ON s.user_id = u.id
             WHERE u.id IN (SELECT user_id FROM skills WHERE skill_name = ?1)
             ORDER BY u.full_name, u.id, s.skill_name"
        ))?;
        let rows = stmt
            .query_map([skill_name], map_user_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(group_users(rows))
    }
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<(User, Option<Skill>)> {
    let created_at: String = row.get(6)?;
    let user = User {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        title: row.get(3)?,
        bio: row.get(4)?,
        avatar_url: row.get(5)?,
        skills: Vec::new(),
        created_at: parse_timestamp(6, &created_at)?,
    };

    let skill = match row.get::<_, Option<String>>(7)? {
        Some(skill_name) => Some(Skill {
            skill_name,
            proficiency_level: row.get(8)?,
            category: row.get(9)?,
        }),
        None => None,
    };

    Ok((user, skill))
}

/// Fold ordered (user, skill) rows into users; rows of one user are adjacent
fn group_users(rows: Vec<(User, Option<Skill>)>) -> Vec<User> {
    let mut users: Vec<User> = Vec::new();
    for (user, skill) in rows {
        let same_user = users.last().map(|u| u.id == user.id).unwrap_or(false);
        if !same_user {
            users.push(user);
        }
        if let (Some(skill), Some(current)) = (skill, users.last_mut()) {
            current.skills.push(skill);
        }
    }
    users
}
