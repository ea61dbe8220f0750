//! UseCase layer error types.

use thiserror::Error;

use crate::domain::{AttendanceError, UserStoreError, ValueObjectError};

/// Failures of commands issued from an open connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomCommandError {
    #[error("room not found")]
    RoomNotFound,

    /// The connection was evicted or pruned and no longer acts for the room
    #[error("connection is no longer registered in the room")]
    NotConnected,
}

/// Chat relay failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendChatError {
    #[error("chat message is empty")]
    EmptyMessage,

    #[error("invalid chat message: {0}")]
    InvalidMessage(ValueObjectError),

    #[error(transparent)]
    Room(#[from] RoomCommandError),
}

/// Reward claim rejections
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClaimRewardError {
    #[error("no active session")]
    NoActiveSession,

    #[error("user is not in the session")]
    NotInSession,

    #[error("attendance too low: present {present_minutes} of {required_minutes} required minutes ({percentage}%)")]
    LowAttendance {
        present_minutes: f64,
        required_minutes: f64,
        percentage: i64,
    },

    #[error("reward already claimed for this session")]
    AlreadyClaimed,

    #[error(transparent)]
    Store(#[from] UserStoreError),
}

impl From<AttendanceError> for ClaimRewardError {
    fn from(e: AttendanceError) -> Self {
        match e {
            AttendanceError::NoActiveSession => ClaimRewardError::NoActiveSession,
            AttendanceError::NotInSession => ClaimRewardError::NotInSession,
        }
    }
}
