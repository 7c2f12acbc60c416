//! Mentor Discovery
//!
//! Finds users who hold a given skill and reports how many mentees each one
//! currently has. Counts come from one grouped query over all candidates.

use super::store::MentorshipStore;
use super::types::{MentorSummary, MentorshipStatus};
use super::MentorshipError;
use crate::config::MenteeCountMode;
use crate::directory::UserDirectory;
use std::sync::Arc;

pub struct MentorDirectory {
    users: Arc<dyn UserDirectory>,
    store: Arc<dyn MentorshipStore>,
    count_mode: MenteeCountMode,
}

impl MentorDirectory {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn MentorshipStore>,
        count_mode: MenteeCountMode,
    ) -> Self {
        Self { users, store, count_mode }
    }

    /// Users holding `skill_focus` (exact match), excluding the requester,
    /// ordered by full name then id
    pub fn get_available_mentors(
        &self,
        skill_focus: &str,
        requester_id: &str,
    ) -> Result<Vec<MentorSummary>, MentorshipError> {
        if skill_focus.trim().is_empty() {
            return Err(MentorshipError::Validation(
                "skill_focus is required".to_string(),
            ));
        }

        let candidates: Vec<_> = self
            .users
            .users_with_skill(skill_focus)?
            .into_iter()
            .filter(|u| u.id != requester_id)
            .collect();

        let ids: Vec<String> = candidates.iter().map(|u| u.id.clone()).collect();
        let statuses = match self.count_mode {
            MenteeCountMode::All => None,
            MenteeCountMode::ActiveOnly => Some(&MentorshipStatus::ACTIVE[..]),
        };
        let counts = self.store.count_by_mentor(&ids, statuses)?;

        let mentors: Vec<MentorSummary> = candidates
            .into_iter()
            .map(|user| {
                let mut expertise_skills: Vec<String> =
                    user.skills.into_iter().map(|s| s.skill_name).collect();
                expertise_skills.sort();
                MentorSummary {
                    current_mentees_count: counts.get(&user.id).copied().unwrap_or(0),
                    id: user.id,
                    full_name: user.full_name,
                    title: user.title,
                    bio: user.bio,
                    avatar_url: user.avatar_url,
                    expertise_skills,
                }
            })
            .collect();

        log::debug!(
            "[MENTORSHIP] {} mentor(s) available for '{}'",
            mentors.len(),
            skill_focus
        );
        Ok(mentors)
    }
}
