//! Domain layer: entities, value objects and the interfaces the domain needs.

pub mod attendance;
pub mod connection;
pub mod error;
pub mod event;
pub mod identity;
pub mod message_pusher;
pub mod repository;
pub mod reward;
pub mod room;
pub mod session;
pub mod value_object;

pub use attendance::{AttendanceTracker, Eligibility};
pub use connection::{Connection, ConnectionMultiplexer, ParticipantStatus, PresenceEntry};
pub use error::{AttendanceError, AuthError, MessagePushError, UserStoreError, ValueObjectError};
pub use event::RoomEvent;
pub use identity::{Identity, IdentityProvider};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{RoomRepository, SharedRoom, UserRepository};
pub use reward::{ClaimLedger, ClaimPolicy};
pub use room::{JoinOutcome, Room, RoomLifecycle};
pub use session::{SessionState, TimerState};
pub use value_object::{
    AttendanceThreshold, ChatText, ConnectionId, DurationMinutes, RoomId, Timestamp, UserId,
    Username,
};
