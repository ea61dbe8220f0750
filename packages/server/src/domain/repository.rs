//! Repository traits.
//!
//! The domain defines the storage interfaces it needs; the infrastructure
//! layer provides the implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    error::UserStoreError,
    room::Room,
    value_object::{RoomId, Timestamp, UserId},
};

/// A room behind its exclusive lock
pub type SharedRoom = Arc<Mutex<Room>>;

/// Registry of live rooms.
///
/// Callers lock the returned room for the whole of one command, which
/// serializes every mutation of that room.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Fetch a room, creating an empty one if none exists
    async fn get_or_create(&self, room_id: &RoomId) -> SharedRoom;

    /// Fetch a room if it exists
    async fn find(&self, room_id: &RoomId) -> Option<SharedRoom>;

    /// Remove and retire every room the expiry policy allows to discard.
    ///
    /// Rooms that are busy at the time of the sweep are skipped.
    async fn remove_reapable(&self, now: Timestamp, idle_ttl_secs: i64) -> Vec<RoomId>;
}

/// Persisted per-user reward counters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Current counter of `user_id`
    async fn get(&self, user_id: UserId) -> Result<u64, UserStoreError>;

    /// Increment the counter of `user_id`, returning the new value
    async fn increment(&self, user_id: UserId) -> Result<u64, UserStoreError>;
}
