//! Conversion from domain types to DTOs.

use focusroom_shared::time::millis_to_epoch_secs;

use crate::domain::{PresenceEntry, RoomEvent};
use crate::infrastructure::dto::websocket as dto;

impl From<&PresenceEntry> for dto::UserPresenceDto {
    fn from(entry: &PresenceEntry) -> Self {
        Self {
            username: entry.username.as_str().to_string(),
            status: entry.status.as_str().to_string(),
        }
    }
}

impl From<&RoomEvent> for dto::OutboundMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::UserList(entries) => Self::UserList {
                users: entries.iter().map(Into::into).collect(),
            },
            RoomEvent::SyncTimer { end_time, duration } => Self::SyncTimer {
                end_time: millis_to_epoch_secs(end_time.value()),
                duration: duration.value(),
            },
            RoomEvent::TimerStarted { end_time, duration } => Self::TimerStarted {
                end_time: millis_to_epoch_secs(end_time.value()),
                duration: duration.value(),
            },
            RoomEvent::Chat {
                username,
                text,
                clock_time,
            } => Self::Chat {
                username: username.as_str().to_string(),
                text: text.as_str().to_string(),
                timestamp: clock_time.clone(),
            },
        }
    }
}
