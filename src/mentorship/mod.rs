//! Mentorship Module - Lifecycle & Matching
//!
//! Architecture (leaf-first):
//! - Store: persistence of mentorship records, no policy
//! - Guard: role x action authorization for an existing mentorship
//! - Lifecycle: status state machine and transition legality
//! - Resolver: mentor discovery by skill with live mentee counts

pub mod guard;
pub mod lifecycle;
pub mod resolver;
pub mod store;
pub mod types;

pub use guard::{authorize, Action, Decision, Role};
pub use lifecycle::{AccessPolicy, MentorshipManager};
pub use resolver::MentorDirectory;
pub use store::{MentorshipStore, SqliteMentorshipStore};
pub use types::*;

use crate::db::StoreError;
use thiserror::Error;

/// Failures of the mentorship subsystem
#[derive(Error, Debug)]
pub enum MentorshipError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: MentorshipStatus,
        to: MentorshipStatus,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
