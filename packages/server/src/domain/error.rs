//! Domain error types.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Validation failures of value objects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id must be at most {max} characters")]
    RoomIdTooLong { max: usize },

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("duration {value} is outside {min}..={max} minutes")]
    DurationOutOfRange { value: i64, min: u32, max: u32 },

    #[error("chat message must not be empty")]
    EmptyChatText,

    #[error("chat message has {len} characters, at most {max} allowed")]
    ChatTextTooLong { len: usize, max: usize },

    #[error("attendance threshold {0} must be in (0, 1]")]
    InvalidThreshold(f64),
}

/// Failures of the eligibility computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttendanceError {
    /// No timer has ever been started in the room
    #[error("no active session in this room")]
    NoActiveSession,

    /// The user has no join record in the current session generation
    #[error("user is not part of the current session")]
    NotInSession,
}

/// Handshake-time identity failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing identity token")]
    MissingToken,

    #[error("invalid identity token")]
    InvalidToken,
}

/// Failures of the persisted user store collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserStoreError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// Delivery failures towards a single connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("outbound channel of connection {0} is closed")]
    ChannelClosed(ConnectionId),

    #[error("failed to encode event: {0}")]
    Encode(String),
}
