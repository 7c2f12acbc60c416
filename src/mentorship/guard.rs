//! Access Control Guard
//!
//! One policy function for every read or mutation of an existing mentorship.
//! The decision depends only on which role (if any) the caller holds in the
//! relationship and on the requested action.

use super::types::Mentorship;

/// What the caller wants to do with a mentorship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    UpdateStatus,
    Cancel,
}

/// The caller's role in one mentorship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Mentor,
    Mentee,
    Outsider,
}

impl Role {
    pub fn of(mentorship: &Mentorship, caller_id: &str) -> Self {
        if mentorship.mentor_id == caller_id {
            Role::Mentor
        } else if mentorship.mentee_id == caller_id {
            Role::Mentee
        } else {
            Role::Outsider
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied { role: Role },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Role x action matrix
fn permits(role: Role, action: Action) -> bool {
    match (role, action) {
        (Role::Mentor, _) => true,
        (Role::Mentee, Action::Read) | (Role::Mentee, Action::Cancel) => true,
        (Role::Mentee, Action::UpdateStatus) => false,
        (Role::Outsider, _) => false,
    }
}

/// Decide whether `caller_id` may perform `action` on `mentorship`
pub fn authorize(mentorship: &Mentorship, caller_id: &str, action: Action) -> Decision {
    let role = Role::of(mentorship, caller_id);
    if permits(role, action) {
        Decision::Allowed
    } else {
        Decision::Denied { role }
    }
}
