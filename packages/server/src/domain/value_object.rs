//! Value objects of the focus room domain.
//!
//! Every value object validates itself on construction, so the rest of the
//! domain can take them at face value.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a room key
pub const ROOM_ID_MAX_LEN: usize = 128;
/// Maximum length of a chat message, in characters
pub const CHAT_TEXT_MAX_LEN: usize = 1000;
/// Shortest accepted session, in minutes
pub const DURATION_MIN_MINUTES: u32 = 1;
/// Longest accepted session, in minutes
pub const DURATION_MAX_MINUTES: u32 = 24 * 60;
/// Session length used when START_TIMER omits the duration
pub const DEFAULT_DURATION_MINUTES: u32 = 25;
/// Share of the session a participant must attend to earn a reward
pub const DEFAULT_ATTENDANCE_THRESHOLD: f64 = 0.9;

/// Opaque room key taken from the connection path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        if value.chars().count() > ROOM_ID_MAX_LEN {
            return Err(ValueObjectError::RoomIdTooLong {
                max: ROOM_ID_MAX_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric user id issued by the identity collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name shown in presence lists and chat
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Timestamp `secs` seconds later
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + secs * 1000)
    }

    /// Seconds elapsed from `earlier` to `self`, never negative
    pub fn secs_since(&self, earlier: Timestamp) -> f64 {
        ((self.0 - earlier.0).max(0)) as f64 / 1000.0
    }
}

/// Length of a focus session in whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationMinutes(u32);

impl DurationMinutes {
    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        let range = i64::from(DURATION_MIN_MINUTES)..=i64::from(DURATION_MAX_MINUTES);
        if !range.contains(&value) {
            return Err(ValueObjectError::DurationOutOfRange {
                value,
                min: DURATION_MIN_MINUTES,
                max: DURATION_MAX_MINUTES,
            });
        }
        // in range, so it fits
        Ok(Self(value as u32))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_secs(&self) -> i64 {
        i64::from(self.0) * 60
    }
}

impl Default for DurationMinutes {
    fn default() -> Self {
        Self(DEFAULT_DURATION_MINUTES)
    }
}

impl TryFrom<i64> for DurationMinutes {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-empty chat message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatText(String);

impl ChatText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyChatText);
        }
        let len = value.chars().count();
        if len > CHAT_TEXT_MAX_LEN {
            return Err(ValueObjectError::ChatTextTooLong {
                len,
                max: CHAT_TEXT_MAX_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChatText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifies one open transport, distinct from the identity using it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fraction of the session duration required for a reward, in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendanceThreshold(f64);

impl AttendanceThreshold {
    pub fn new(value: f64) -> Result<Self, ValueObjectError> {
        if !(value > 0.0 && value <= 1.0) {
            return Err(ValueObjectError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for AttendanceThreshold {
    fn default() -> Self {
        Self(DEFAULT_ATTENDANCE_THRESHOLD)
    }
}
