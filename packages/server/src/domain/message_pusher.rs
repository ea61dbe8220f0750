//! Outbound delivery abstraction.
//!
//! The domain decides who receives which event; the pusher knows how to encode
//! it and put it on a connection's outbound channel.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    connection::Connection, error::MessagePushError, event::RoomEvent,
    value_object::ConnectionId,
};

/// Outbound channel of one connection, drained by its writer task
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Deliver an event to a single connection
    async fn push_to(
        &self,
        connection: &Connection,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;

    /// Deliver an event to every given connection, in order.
    ///
    /// A failing destination never stops delivery to the others. Returns the
    /// ids of the connections that could not be reached.
    async fn broadcast(&self, connections: &[Connection], event: &RoomEvent) -> Vec<ConnectionId>;
}
