//! User Settings
//!
//! Notification and privacy preferences, stored as JSON text per user.
//! Users who never saved a section get the all-enabled defaults.

use crate::db::{Database, StoreResult};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationSettings {
    #[serde(default = "enabled")]
    pub email_achievements: bool,
    #[serde(default = "enabled")]
    pub email_mentorship: bool,
    #[serde(default = "enabled")]
    pub email_courses: bool,
    #[serde(default = "enabled")]
    pub email_connections: bool,
    #[serde(default = "enabled")]
    pub push_enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_achievements: true,
            email_mentorship: true,
            email_courses: true,
            email_connections: true,
            push_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivacySettings {
    #[serde(default = "enabled")]
    pub profile_public: bool,
    #[serde(default = "enabled")]
    pub show_achievements: bool,
    #[serde(default = "enabled")]
    pub show_projects: bool,
    #[serde(default = "enabled")]
    pub show_skills: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_public: true,
            show_achievements: true,
            show_projects: true,
            show_skills: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
}

#[derive(Clone)]
pub struct SettingsStore {
    db: Database,
}

impl SettingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get(&self, user_id: &str) -> StoreResult<UserSettings> {
        let row: Option<(Option<String>, Option<String>)> = {
            let conn = self.db.conn()?;
            conn.query_row(
                "SELECT notifications, privacy FROM user_settings WHERE user_id = ?1",
                [user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
        };

        let (notifications, privacy) = row.unwrap_or((None, None));
        Ok(UserSettings {
            notifications: match notifications {
                Some(json) => serde_json::from_str(&json)?,
                None => NotificationSettings::default(),
            },
            privacy: match privacy {
                Some(json) => serde_json::from_str(&json)?,
                None => PrivacySettings::default(),
            },
        })
    }

    /// Replace the notification section; the privacy section is untouched
    pub fn set_notifications(
        &self,
        user_id: &str,
        settings: NotificationSettings,
    ) -> StoreResult<NotificationSettings> {
        let json = serde_json::to_string(&settings)?;
        let conn = self.db.conn()?;
        conn.execute(
            "INSERT INTO user_settings (user_id, notifications) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET notifications = excluded.notifications",
            params![user_id, json],
        )?;
        log::info!("[PROFILE] Notification settings saved for {}", user_id);
        Ok(settings)
    }

    /// Replace the privacy section; the notification section is untouched
    pub fn set_privacy(&self, user_id: &str, settings: PrivacySettings) -> StoreResult<PrivacySettings> {
        let json = serde_json::to_string(&settings)?;
        let conn = self.db.conn()?;
        conn.execute(
            "INSERT INTO user_settings (user_id, privacy) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET privacy = excluded.privacy",
            params![user_id, json],
        )?;
        log::info!("[PROFILE] Privacy settings saved for {}", user_id);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SettingsStore {
        SettingsStore::new(Database::in_memory().unwrap())
    }

    #[test]
    fn test_defaults_are_all_enabled() {
        let settings = store().get("alice").unwrap();
        assert_eq!(settings, UserSettings::default());
        assert!(settings.notifications.push_enabled);
        assert!(settings.privacy.profile_public);
    }

    #[test]
    fn test_sections_are_saved_independently() {
        let store = store();
        let quiet = NotificationSettings {
            push_enabled: false,
            email_courses: false,
            ..Default::default()
        };
        store.set_notifications("alice", quiet).unwrap();

        let private = PrivacySettings {
            profile_public: false,
            ..Default::default()
        };
        store.set_privacy("alice", private).unwrap();

        let saved = store.get("alice").unwrap();
        assert_eq!(saved.notifications, quiet);
        assert_eq!(saved.privacy, private);
        assert_eq!(store.get("bob").unwrap(), UserSettings::default());
    }

    #[test]
    fn test_missing_fields_default_to_enabled() {
        let parsed: PrivacySettings = serde_json::from_str(r#"{"show_skills": false}"#).unwrap();
        assert!(!parsed.show_skills);
        assert!(parsed.profile_public);
    }
}
