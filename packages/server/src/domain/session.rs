//! Shared countdown timer state of a room.

use super::value_object::{DurationMinutes, Timestamp};

/// Timer state of one room.
///
/// Replaced wholesale on every timer start. `is_active` is never cleared when
/// `end_time` passes; callers that care about expiry ask [`SessionState::is_running_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration: DurationMinutes,
    pub is_active: bool,
}

impl SessionState {
    /// Start a session at `now`, ending `duration` minutes later
    pub fn start(now: Timestamp, duration: DurationMinutes) -> Self {
        Self {
            start_time: now,
            end_time: now.plus_secs(duration.as_secs()),
            duration,
            is_active: true,
        }
    }

    /// Active and not yet past its end time
    pub fn is_running_at(&self, now: Timestamp) -> bool {
        self.is_active && self.end_time > now
    }
}

/// Timer state machine of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Focusing,
}

impl TimerState {
    pub fn of(session: Option<&SessionState>) -> Self {
        match session {
            Some(session) if session.is_active => TimerState::Focusing,
            _ => TimerState::Idle,
        }
    }
}
