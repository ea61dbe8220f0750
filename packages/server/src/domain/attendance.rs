//! Attendance tracking and reward eligibility.
//!
//! A room keeps one first-seen timestamp per user for the current session
//! generation. A generation starts fresh every time a timer is started.

use std::collections::HashMap;

use super::{
    error::AttendanceError,
    session::SessionState,
    value_object::{AttendanceThreshold, Timestamp, UserId},
};

/// Per-room map of user → first join time in the current generation
#[derive(Debug, Clone, Default)]
pub struct AttendanceTracker {
    joined_at: HashMap<UserId, Timestamp>,
}

impl AttendanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a join.
    ///
    /// While a session is active the first timestamp of the generation wins,
    /// so reconnects do not reset the clock. While idle the timestamp is
    /// overwritten; it is discarded anyway on the next session start.
    pub fn on_join(&mut self, user_id: UserId, now: Timestamp, session_active: bool) {
        if session_active {
            self.joined_at.entry(user_id).or_insert(now);
        } else {
            self.joined_at.insert(user_id, now);
        }
    }

    /// Begin a new generation with exactly the given users, all joined at `now`
    pub fn on_session_start(&mut self, user_ids: impl IntoIterator<Item = UserId>, now: Timestamp) {
        self.joined_at = user_ids.into_iter().map(|id| (id, now)).collect();
    }

    pub fn joined_at(&self, user_id: UserId) -> Option<Timestamp> {
        self.joined_at.get(&user_id).copied()
    }

    pub fn len(&self) -> usize {
        self.joined_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joined_at.is_empty()
    }

    /// Compute whether `user_id` attended enough of `session` as of `now`.
    ///
    /// # Errors
    ///
    /// * `NoActiveSession` - no timer was ever started in the room
    /// * `NotInSession` - the user has no join record in this generation
    pub fn compute_eligibility(
        &self,
        session: Option<&SessionState>,
        user_id: UserId,
        now: Timestamp,
        threshold: AttendanceThreshold,
    ) -> Result<Eligibility, AttendanceError> {
        let session = session.ok_or(AttendanceError::NoActiveSession)?;
        let joined_at = self
            .joined_at(user_id)
            .ok_or(AttendanceError::NotInSession)?;

        let session_seconds = session.duration.as_secs() as f64;
        let present_seconds = now.secs_since(joined_at);
        let required_seconds = session_seconds * threshold.value();
        let percentage = (100.0 * present_seconds / session_seconds).floor() as i64;

        Ok(Eligibility {
            eligible: present_seconds >= required_seconds,
            present_seconds,
            required_seconds,
            percentage,
        })
    }
}

/// Outcome of an eligibility computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eligibility {
    pub eligible: bool,
    pub present_seconds: f64,
    pub required_seconds: f64,
    /// Floor of attended share of the full session, in percent
    pub percentage: i64,
}

impl Eligibility {
    pub fn present_minutes(&self) -> f64 {
        round_one_decimal(self.present_seconds / 60.0)
    }

    pub fn required_minutes(&self) -> f64 {
        round_one_decimal(self.required_seconds / 60.0)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
