//! Mentorship Types
//!
//! The mentorship record, its status state machine, and the discovery
//! summary returned to mentees looking for a mentor.
//!
//! ```text
//! Pending ──▶ Accepted ──▶ Completed
//!    │            │
//!    │            └──▶ Cancelled
//!    ├──▶ Declined
//!    └──▶ Cancelled
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================
// STATUS STATE MACHINE
// ============================================================

/// Lifecycle stage of a mentorship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentorshipStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
    Cancelled,
}

impl MentorshipStatus {
    pub const ALL: [MentorshipStatus; 5] = [
        MentorshipStatus::Pending,
        MentorshipStatus::Accepted,
        MentorshipStatus::Declined,
        MentorshipStatus::Completed,
        MentorshipStatus::Cancelled,
    ];

    /// Statuses that still tie up a mentor
    pub const ACTIVE: [MentorshipStatus; 2] = [MentorshipStatus::Pending, MentorshipStatus::Accepted];

    pub fn as_str(&self) -> &'static str {
        match self {
            MentorshipStatus::Pending => "pending",
            MentorshipStatus::Accepted => "accepted",
            MentorshipStatus::Declined => "declined",
            MentorshipStatus::Completed => "completed",
            MentorshipStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MentorshipStatus::Pending),
            "accepted" => Some(MentorshipStatus::Accepted),
            "declined" => Some(MentorshipStatus::Declined),
            "completed" => Some(MentorshipStatus::Completed),
            "cancelled" => Some(MentorshipStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MentorshipStatus::Declined | MentorshipStatus::Completed | MentorshipStatus::Cancelled
        )
    }

    /// The transition table. Who may drive each move is decided by the guard.
    pub fn can_transition_to(self, to: MentorshipStatus) -> bool {
        use MentorshipStatus::*;
        matches!(
            (self, to),
            (Pending, Accepted)
                | (Pending, Declined)
                | (Pending, Cancelled)
                | (Accepted, Completed)
                | (Accepted, Cancelled)
        )
    }

    /// Every status reachable in one step
    pub fn valid_transitions(self) -> Vec<MentorshipStatus> {
        Self::ALL
            .into_iter()
            .filter(|to| self.can_transition_to(*to))
            .collect()
    }
}

impl std::fmt::Display for MentorshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// MENTORSHIP
// ============================================================

/// A mentorship between a mentor and a mentee around one skill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mentorship {
    pub id: String,
    pub mentor_id: String,
    pub mentee_id: String,
    pub skill_focus: String,
    pub status: MentorshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mentorship {
    /// A fresh Pending request. Callers validate the participants first.
    pub fn new(mentor_id: &str, mentee_id: &str, skill_focus: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            mentor_id: mentor_id.to_string(),
            mentee_id: mentee_id.to_string(),
            skill_focus: skill_focus.to_string(),
            status: MentorshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// List envelope for mentorship queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipList {
    pub items: Vec<Mentorship>,
    pub total_count: usize,
}

impl From<Vec<Mentorship>> for MentorshipList {
    fn from(items: Vec<Mentorship>) -> Self {
        Self {
            total_count: items.len(),
            items,
        }
    }
}

/// A candidate mentor returned by discovery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentorSummary {
    pub id: String,
    pub full_name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub expertise_skills: Vec<String>,
    pub current_mentees_count: usize,
}
