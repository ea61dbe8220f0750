//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::DEFAULT_DURATION_MINUTES;

/// Inbound action frame sent by a participant.
///
/// Tags the server does not know decode to [`InboundAction::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundAction {
    StartTimer {
        #[serde(default = "default_duration")]
        duration: i64,
    },
    Fail,
    Rejoin,
    Chat {
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(other)]
    Unrecognized,
}

fn default_duration() -> i64 {
    i64::from(DEFAULT_DURATION_MINUTES)
}

impl InboundAction {
    /// Decode a text frame. Anything that is not an action object yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(action) => Some(action),
            Err(e) => {
                tracing::debug!("Ignoring malformed frame: {}", e);
                None
            }
        }
    }
}

/// One row of a USER_LIST frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPresenceDto {
    pub username: String,
    pub status: String,
}

/// Outbound event frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    UserList {
        users: Vec<UserPresenceDto>,
    },
    SyncTimer {
        /// Seconds since the Unix epoch
        end_time: f64,
        duration: u32,
    },
    TimerStarted {
        /// Seconds since the Unix epoch
        end_time: f64,
        duration: u32,
    },
    Chat {
        username: String,
        text: String,
        timestamp: String,
    },
}
