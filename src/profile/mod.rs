//! Profile Module - Portfolio, Achievements, Notifications & Settings
//!
//! Per-user records owned by a single user. Ownership is checked here, in the
//! store methods, so the HTTP layer only forwards the caller id.

pub mod achievements;
pub mod notifications;
pub mod projects;
pub mod settings;

pub use achievements::{Achievement, AchievementList, AchievementStore, NewAchievement};
pub use notifications::{Notification, NotificationList, NotificationStore, Page};
pub use projects::{NewProject, Project, ProjectList, ProjectStore, ProjectUpdate};
pub use settings::{NotificationSettings, PrivacySettings, SettingsStore, UserSettings};

use crate::db::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for ProfileError {
    fn from(err: rusqlite::Error) -> Self {
        ProfileError::Store(StoreError::from(err))
    }
}

pub(crate) fn ensure_owner(owner_id: &str, caller_id: &str) -> Result<(), ProfileError> {
    if owner_id == caller_id {
        Ok(())
    } else {
        Err(ProfileError::Forbidden("Access denied".to_string()))
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<String, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
