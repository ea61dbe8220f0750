//! In-memory repositories.
//!
//! Room state is never persisted. User counters live in a map standing in for
//! the external user store.

pub mod room;
pub mod user;

pub use room::InMemoryRoomRepository;
pub use user::InMemoryUserRepository;
