//! Server Configuration
//!
//! All settings come from environment variables with development defaults.
//! Invalid values fail startup instead of silently falling back.

use std::path::PathBuf;
use thiserror::Error;

/// Database path that selects an in-memory SQLite database
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Which mentorship records count towards a mentor's `current_mentees_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenteeCountMode {
    /// Every record naming the mentor, whatever its status
    #[default]
    All,
    /// Only Pending and Accepted records
    ActiveOnly,
}

impl MenteeCountMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(MenteeCountMode::All),
            "active" => Some(MenteeCountMode::ActiveOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file, or `:memory:`
    pub database_path: PathBuf,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
    pub mentee_count_mode: MenteeCountMode,
    /// Answer 404 instead of 403 when a non-participant touches a mentorship
    pub conceal_foreign_mentorships: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from(IN_MEMORY_DATABASE),
            cors_origins: Vec::new(),
            mentee_count_mode: MenteeCountMode::All,
            conceal_foreign_mentorships: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw.clone(),
                reason: "expected a port number",
            })?,
            None => defaults.port,
        };

        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("career_platform.db"));

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let mentee_count_mode = match lookup("MENTEE_COUNT_MODE") {
            Some(raw) => MenteeCountMode::from_str(&raw).ok_or(ConfigError::InvalidValue {
                name: "MENTEE_COUNT_MODE",
                value: raw.clone(),
                reason: "expected 'all' or 'active'",
            })?,
            None => defaults.mentee_count_mode,
        };

        let conceal_foreign_mentorships = match lookup("CONCEAL_FOREIGN_MENTORSHIPS") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                name: "CONCEAL_FOREIGN_MENTORSHIPS",
                value: raw.clone(),
                reason: "expected 'true' or 'false'",
            })?,
            None => defaults.conceal_foreign_mentorships,
        };

        Ok(Self {
            host,
            port,
            database_path,
            cors_origins,
            mentee_count_mode,
            conceal_foreign_mentorships,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_DATABASE
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("career_platform.db"));
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.mentee_count_mode, MenteeCountMode::All);
        assert!(!config.conceal_foreign_mentorships);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("DATABASE_PATH", ":memory:"),
            ("CORS_ORIGINS", "http://localhost:5173, http://localhost:3000,"),
            ("MENTEE_COUNT_MODE", "Active"),
            ("CONCEAL_FOREIGN_MENTORSHIPS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert!(config.is_in_memory());
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173".to_string(), "http://localhost:3000".to_string()]
        );
        assert_eq!(config.mentee_count_mode, MenteeCountMode::ActiveOnly);
        assert!(config.conceal_foreign_mentorships);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "PORT", .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("MENTEE_COUNT_MODE", "some")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "MENTEE_COUNT_MODE", .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("CONCEAL_FOREIGN_MENTORSHIPS", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("CONCEAL_FOREIGN_MENTORSHIPS"));
    }
}
