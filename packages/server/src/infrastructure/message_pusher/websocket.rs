//! WebSocket MessagePusher implementation.
//!
//! Events are encoded once per call and queued on each connection's
//! `UnboundedSender`. The per-connection writer task (UI layer) drains the
//! channel into the socket. A send only fails once that writer is gone.

use async_trait::async_trait;

use crate::{
    domain::{Connection, ConnectionId, MessagePushError, MessagePusher, RoomEvent},
    infrastructure::dto::websocket::OutboundMessage,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketMessagePusher;

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self
    }

    fn encode(event: &RoomEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&OutboundMessage::from(event))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn push_to(
        &self,
        connection: &Connection,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let payload = Self::encode(event)?;
        connection
            .channel()
            .send(payload)
            .map_err(|_| MessagePushError::ChannelClosed(connection.id))?;
        tracing::debug!(
            "Pushed {} to '{}' ({})",
            event.kind(),
            connection.identity.username,
            connection.id
        );
        Ok(())
    }

    async fn broadcast(&self, connections: &[Connection], event: &RoomEvent) -> Vec<ConnectionId> {
        let payload = match Self::encode(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Dropping {} broadcast: {}", event.kind(), e);
                return Vec::new();
            }
        };

        let mut failed = Vec::new();
        for connection in connections {
            if connection.channel().send(payload.clone()).is_err() {
                tracing::warn!(
                    "Failed to push {} to '{}' ({}), channel closed",
                    event.kind(),
                    connection.identity.username,
                    connection.id
                );
                failed.push(connection.id);
            }
        }
        tracing::debug!(
            "Broadcasted {} to {} of {} connections",
            event.kind(),
            connections.len() - failed.len(),
            connections.len()
        );
        failed
    }
}
