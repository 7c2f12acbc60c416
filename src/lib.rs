//! Career Platform Backend
//!
//! Profiles, portfolio and mentorship for a career-development platform:
//! - User directory with skills
//! - Mentorship lifecycle (request, accept/decline, complete, cancel)
//! - Mentor discovery by skill with live mentee counts
//! - Achievements, projects, notifications and settings

pub mod api;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod mentorship;
pub mod profile;

pub use api::{configure, run_server, AppState};
pub use config::AppConfig;
pub use error::AppError;
