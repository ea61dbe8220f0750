//! Reward claim bookkeeping.

use std::collections::HashSet;

use super::value_object::UserId;

/// Whether a user may claim more than once per session generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimPolicy {
    /// Every eligible claim increments the counter
    #[default]
    Repeatable,
    /// One successful claim per user per session generation
    OncePerSession,
}

/// Users who already claimed in the current generation
#[derive(Debug, Clone, Default)]
pub struct ClaimLedger {
    claimed: HashSet<UserId>,
}

impl ClaimLedger {
    pub fn has_claimed(&self, user_id: UserId) -> bool {
        self.claimed.contains(&user_id)
    }

    pub fn record(&mut self, user_id: UserId) {
        self.claimed.insert(user_id);
    }

    /// Forget all claims; called when a new generation starts
    pub fn reset(&mut self) {
        self.claimed.clear();
    }

    /// Whether `policy` lets `user_id` claim now
    pub fn permits(&self, policy: ClaimPolicy, user_id: UserId) -> bool {
        match policy {
            ClaimPolicy::Repeatable => true,
            ClaimPolicy::OncePerSession => !self.has_claimed(user_id),
        }
    }
}
