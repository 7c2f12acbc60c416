//! Portfolio Projects
//!
//! Any signed-in user may view or endorse a project; only its owner may
//! change or remove it.

use super::{ensure_owner, require_text, ProfileError};
use crate::db::{invalid_column, parse_timestamp, Database, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub skills_used: Vec<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub image_url: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub endorsements: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub skills_used: Vec<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub image_url: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills_used: Option<Vec<String>>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub image_url: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectList {
    pub projects: Vec<Project>,
    pub total_count: usize,
}

impl From<Vec<Project>> for ProjectList {
    fn from(projects: Vec<Project>) -> Self {
        Self {
            total_count: projects.len(),
            projects,
        }
    }
}

const COLUMNS: &str = "id, user_id, title, description, skills_used, github_url, demo_url, \
                       image_url, start_date, endorsements, created_at";

#[derive(Clone)]
pub struct ProjectStore {
    db: Database,
}

impl ProjectStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, user_id: &str, input: NewProject) -> Result<Project, ProfileError> {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: require_text("title", &input.title)?,
            description: input.description,
            skills_used: input.skills_used,
            github_url: input.github_url,
            demo_url: input.demo_url,
            image_url: input.image_url,
            start_date: input.start_date,
            endorsements: 0,
            created_at: Utc::now(),
        };

        let skills_json = serde_json::to_string(&project.skills_used)
            .map_err(StoreError::from)?;
        let conn = self.db.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO projects ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                project.id,
                project.user_id,
                project.title,
                project.description,
                skills_json,
                project.github_url,
                project.demo_url,
                project.image_url,
                project.start_date.map(|d| d.to_rfc3339()),
                project.endorsements,
                project.created_at.to_rfc3339(),
            ],
        )?;

        log::info!("[PROFILE] Project {} created for {}", project.id, user_id);
        Ok(project)
    }

    /// Visible to every caller
    pub fn get(&self, id: &str) -> Result<Project, ProfileError> {
        self.find(id)?.ok_or_else(not_found)
    }

    /// Newest first
    pub fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<Project>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM projects WHERE user_id = ?1 ORDER BY created_at DESC, id"
        ))?;
        let rows = stmt.query_map([user_id], map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Writes only the columns present in `changes`, so concurrent edits of
    /// different fields do not overwrite each other
    pub fn update(
        &self,
        id: &str,
        caller_id: &str,
        changes: ProjectUpdate,
    ) -> Result<Project, ProfileError> {
        let current = self.get(id)?;
        ensure_owner(&current.user_id, caller_id)?;

        let mut columns: Vec<(&str, String)> = Vec::new();
        if let Some(title) = changes.title {
            columns.push(("title", require_text("title", &title)?));
        }
        if let Some(description) = changes.description {
            columns.push(("description", description));
        }
        if let Some(skills_used) = changes.skills_used {
            let skills_json = serde_json::to_string(&skills_used).map_err(StoreError::from)?;
            columns.push(("skills_used", skills_json));
        }
        if let Some(github_url) = changes.github_url {
            columns.push(("github_url", github_url));
        }
        if let Some(demo_url) = changes.demo_url {
            columns.push(("demo_url", demo_url));
        }
        if let Some(image_url) = changes.image_url {
            columns.push(("image_url", image_url));
        }
        if let Some(start_date) = changes.start_date {
            columns.push(("start_date", start_date.to_rfc3339()));
        }

        if columns.is_empty() {
            return Ok(current);
        }

        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE projects SET {} WHERE id = ?{} RETURNING {COLUMNS}",
            assignments,
            columns.len() + 1
        );

        let mut bind: Vec<&dyn ToSql> = columns.iter().map(|(_, v)| v as &dyn ToSql).collect();
        bind.push(&id);

        let conn = self.db.conn()?;
        let updated = conn
            .query_row(&sql, bind.as_slice(), map_row)
            .optional()?
            .ok_or_else(not_found)?;

        let changed: Vec<&str> = columns.iter().map(|(column, _)| *column).collect();
        log::info!("[PROFILE] Project {} updated: {}", id, changed.join(", "));
        Ok(updated)
    }

    pub fn delete(&self, id: &str, caller_id: &str) -> Result<(), ProfileError> {
        let project = self.get(id)?;
        ensure_owner(&project.user_id, caller_id)?;

        let conn = self.db.conn()?;
        conn.execute("DELETE FROM projects WHERE id = ?1", [id])?;
        log::info!("[PROFILE] Project {} deleted", id);
        Ok(())
    }

    /// Add one endorsement; open to any caller, owner included
    pub fn endorse(&self, id: &str, endorser_id: &str) -> Result<Project, ProfileError> {
        let conn = self.db.conn()?;
        let project = conn
            .query_row(
                &format!(
                    "UPDATE projects SET endorsements = endorsements + 1 WHERE id = ?1 RETURNING {COLUMNS}"
                ),
                [id],
                map_row,
            )
            .optional()?
            .ok_or_else(not_found)?;

        log::info!("[PROFILE] Project {} endorsed by {}", id, endorser_id);
        Ok(project)
    }

    fn find(&self, id: &str) -> StoreResult<Option<Project>> {
        let conn = self.db.conn()?;
        let project = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"),
                [id],
                map_row,
            )
            .optional()?;
        Ok(project)
    }
}

fn not_found() -> ProfileError {
    ProfileError::NotFound("Project not found".to_string())
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let skills_json: String = row.get(4)?;
    let start_date: Option<String> = row.get(8)?;
    let created_at: String = row.get(10)?;

    Ok(Project {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        skills_used: serde_json::from_str(&skills_json)
            .map_err(|e| invalid_column(4, format!("skills_used: {}", e)))?,
        github_url: row.get(5)?,
        demo_url: row.get(6)?,
        image_url: row.get(7)?,
        start_date: start_date
            .map(|raw| parse_timestamp(8, &raw))
            .transpose()?,
        endorsements: row.get(9)?,
        created_at: parse_timestamp(10, &created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ProjectStore {
        ProjectStore::new(Database::in_memory().unwrap())
    }

    fn portfolio_app() -> NewProject {
        NewProject {
            title: "Portfolio".to_string(),
            skills_used: vec!["Rust".to_string(), "SQL".to_string()],
            github_url: Some("https://github.com/alice/portfolio".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_get_by_anyone() {
        let store = store();
        let p = store.create("alice", portfolio_app()).unwrap();

        let loaded = store.get(&p.id).unwrap();
        assert_eq!(loaded, p);
        assert_eq!(loaded.skills_used, vec!["Rust", "SQL"]);
        assert_eq!(loaded.endorsements, 0);
        assert!(matches!(store.get("missing"), Err(ProfileError::NotFound(_))));
    }

    #[test]
    fn test_partial_update_by_owner_only() {
        let store = store();
        let p = store.create("alice", portfolio_app()).unwrap();

        let changes = ProjectUpdate {
            description: Some("Personal site".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(&p.id, "bob", changes.clone()),
            Err(ProfileError::Forbidden(_))
        ));

        let updated = store.update(&p.id, "alice", changes).unwrap();
        assert_eq!(updated.description.as_deref(), Some("Personal site"));
        assert_eq!(updated.title, "Portfolio");
        assert_eq!(updated.skills_used, p.skills_used);
        assert_eq!(updated.github_url, p.github_url);
    }

    #[test]
    fn test_update_leaves_other_columns_alone() {
        let store = store();
        let p = store.create("alice", portfolio_app()).unwrap();

        // Another writer renames the project after this edit was prepared
        let stale = ProjectUpdate {
            demo_url: Some("https://alice.dev".to_string()),
            ..Default::default()
        };
        store
            .update(&p.id, "alice", ProjectUpdate { title: Some("Renamed".to_string()), ..Default::default() })
            .unwrap();
        let updated = store.update(&p.id, "alice", stale).unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.demo_url.as_deref(), Some("https://alice.dev"));

        let untouched = store.update(&p.id, "alice", ProjectUpdate::default()).unwrap();
        assert_eq!(untouched, updated);
        assert!(matches!(
            store.update(&p.id, "alice", ProjectUpdate { title: Some("  ".to_string()), ..Default::default() }),
            Err(ProfileError::Validation(_))
        ));
    }

    #[test]
    fn test_endorse_increments() {
        let store = store();
        let p = store.create("alice", portfolio_app()).unwrap();

        store.endorse(&p.id, "bob").unwrap();
        let p2 = store.endorse(&p.id, "carol").unwrap();
        assert_eq!(p2.endorsements, 2);

        // An owner edit keeps endorsements
        let edited = store
            .update(&p.id, "alice", ProjectUpdate { title: Some("Site".to_string()), ..Default::default() })
            .unwrap();
        assert_eq!(edited.endorsements, 2);

        assert!(matches!(store.endorse("missing", "bob"), Err(ProfileError::NotFound(_))));
    }

    #[test]
    fn test_delete_by_owner_only() {
        let store = store();
        let p = store.create("alice", portfolio_app()).unwrap();

        assert!(matches!(store.delete(&p.id, "bob"), Err(ProfileError::Forbidden(_))));
        store.delete(&p.id, "alice").unwrap();
        assert!(store.list_for_user("alice").unwrap().is_empty());
        assert!(matches!(store.delete(&p.id, "alice"), Err(ProfileError::NotFound(_))));
    }
}
