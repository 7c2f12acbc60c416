//! Mentorship Lifecycle Manager
//!
//! Owns creation and every status change of a mentorship. Existence is
//! checked first, then the guard, then the transition table.
//!
//! Status writes are last-write-wins: the current status is read and checked
//! in one store call and written in another, so a concurrent accept and
//! cancel on the same record resolve to whichever write lands last.

use super::guard::{authorize, Action, Decision, Role};
use super::store::MentorshipStore;
use super::types::{Mentorship, MentorshipStatus};
use super::MentorshipError;
use crate::directory::UserDirectory;
use chrono::Utc;
use std::sync::Arc;

/// How denials are reported to callers
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    /// Report `NotFound` instead of `Forbidden` to callers holding neither role
    pub conceal_foreign: bool,
}

pub struct MentorshipManager {
    store: Arc<dyn MentorshipStore>,
    users: Arc<dyn UserDirectory>,
    policy: AccessPolicy,
}

/// Parse a caller-supplied status string
pub fn parse_status(raw: &str) -> Result<MentorshipStatus, MentorshipError> {
    MentorshipStatus::from_str(raw.trim()).ok_or_else(|| {
        MentorshipError::Validation(format!(
            "Unknown status '{}'; expected one of pending, accepted, declined, completed, cancelled",
            raw
        ))
    })
}

impl MentorshipManager {
    pub fn new(
        store: Arc<dyn MentorshipStore>,
        users: Arc<dyn UserDirectory>,
        policy: AccessPolicy,
    ) -> Self {
        Self { store, users, policy }
    }

    /// Request a mentorship; the caller becomes the mentee
    pub fn create(
        &self,
        mentor_id: &str,
        mentee_id: &str,
        skill_focus: &str,
    ) -> Result<Mentorship, MentorshipError> {
        if skill_focus.trim().is_empty() {
            return Err(MentorshipError::Validation(
                "skill_focus must not be empty".to_string(),
            ));
        }
        if mentor_id == mentee_id {
            return Err(MentorshipError::Validation(
                "Cannot request mentorship from yourself".to_string(),
            ));
        }
        if !self.users.exists(mentor_id)? {
            return Err(MentorshipError::NotFound("Mentor not found".to_string()));
        }

        let mentorship = Mentorship::new(mentor_id, mentee_id, skill_focus);
        self.store.create(&mentorship)?;

        log::info!(
            "[MENTORSHIP] Created {} (mentor={}, mentee={}, skill_focus={})",
            mentorship.id,
            mentor_id,
            mentee_id,
            skill_focus
        );
        Ok(mentorship)
    }

    /// Fetch one mentorship visible to the caller
    pub fn get(&self, id: &str, caller_id: &str) -> Result<Mentorship, MentorshipError> {
        self.fetch_authorized(id, caller_id, Action::Read)
    }

    /// Move a mentorship along the transition table (mentor only)
    pub fn update_status(
        &self,
        id: &str,
        new_status: MentorshipStatus,
        caller_id: &str,
    ) -> Result<Mentorship, MentorshipError> {
        let current = self.fetch_authorized(id, caller_id, Action::UpdateStatus)?;

        if !current.status.can_transition_to(new_status) {
            log::warn!(
                "[MENTORSHIP] Rejected transition {} -> {} on {} by {} (allowed: {:?})",
                current.status,
                new_status,
                id,
                caller_id,
                current.status.valid_transitions()
            );
            return Err(MentorshipError::InvalidTransition {
                from: current.status,
                to: new_status,
            });
        }

        let updated = self
            .store
            .update_status(id, new_status, Utc::now())?
            .ok_or_else(not_found)?;

        log::info!(
            "[MENTORSHIP] Updated {}: {} -> {} (by {})",
            id,
            current.status,
            updated.status,
            caller_id
        );
        Ok(updated)
    }

    /// Cancel a live mentorship; the record is removed
    pub fn cancel(&self, id: &str, caller_id: &str) -> Result<(), MentorshipError> {
        let current = self.fetch_authorized(id, caller_id, Action::Cancel)?;

        if !current.status.can_transition_to(MentorshipStatus::Cancelled) {
            return Err(MentorshipError::InvalidTransition {
                from: current.status,
                to: MentorshipStatus::Cancelled,
            });
        }

        if !self.store.delete(id)? {
            return Err(not_found());
        }

        log::info!("[MENTORSHIP] Cancelled {} (by {})", id, caller_id);
        Ok(())
    }

    /// The user's own relationships, as mentee or as mentor
    pub fn list_for_user(
        &self,
        user_id: &str,
        as_mentee: bool,
    ) -> Result<Vec<Mentorship>, MentorshipError> {
        Ok(self.store.list_for_user(user_id, as_mentee)?)
    }

    fn fetch_authorized(
        &self,
        id: &str,
        caller_id: &str,
        action: Action,
    ) -> Result<Mentorship, MentorshipError> {
        let mentorship = self.store.get(id)?.ok_or_else(not_found)?;

        match authorize(&mentorship, caller_id, action) {
            Decision::Allowed => Ok(mentorship),
            Decision::Denied { role: Role::Outsider } if self.policy.conceal_foreign => {
                Err(not_found())
            }
            Decision::Denied { .. } => {
                let reason = match action {
                    Action::UpdateStatus => "Only mentor can update status",
                    Action::Read | Action::Cancel => "Access denied",
                };
                Err(MentorshipError::Forbidden(reason.to_string()))
            }
        }
    }
}

fn not_found() -> MentorshipError {
    MentorshipError::NotFound("Mentorship not found".to_string())
}
