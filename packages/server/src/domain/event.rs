//! Events the room engine sends to connections.

use super::{
    connection::PresenceEntry,
    value_object::{ChatText, DurationMinutes, Timestamp, Username},
};

/// Outbound room event, encoded for the wire by the message pusher
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Current presence list of the room
    UserList(Vec<PresenceEntry>),
    /// Catch-up for a connection joining a running session
    SyncTimer {
        end_time: Timestamp,
        duration: DurationMinutes,
    },
    /// A timer was started for the whole room
    TimerStarted {
        end_time: Timestamp,
        duration: DurationMinutes,
    },
    /// Chat relay; `clock_time` is the sender-side wall clock as `HH:MM`
    Chat {
        username: Username,
        text: ChatText,
        clock_time: String,
    },
}

impl RoomEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            RoomEvent::UserList(_) => "USER_LIST",
            RoomEvent::SyncTimer { .. } => "SYNC_TIMER",
            RoomEvent::TimerStarted { .. } => "TIMER_STARTED",
            RoomEvent::Chat { .. } => "CHAT",
        }
    }
}
