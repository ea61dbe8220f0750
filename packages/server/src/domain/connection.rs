//! Connections of a room and their presence status.

use serde::Serialize;

use super::{
    identity::Identity,
    message_pusher::PusherChannel,
    value_object::{ConnectionId, Timestamp, UserId, Username},
};

/// Live status a participant shows to the rest of the room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Idle,
    Focusing,
    Failed,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Idle => "idle",
            ParticipantStatus::Focusing => "focusing",
            ParticipantStatus::Failed => "failed",
        }
    }
}

/// One open transport registered in a room
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: Identity,
    pub status: ParticipantStatus,
    pub connected_at: Timestamp,
    channel: PusherChannel,
}

impl Connection {
    pub fn new(
        identity: Identity,
        status: ParticipantStatus,
        channel: PusherChannel,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            id: ConnectionId::generate(),
            identity,
            status,
            connected_at,
            channel,
        }
    }

    pub fn channel(&self) -> &PusherChannel {
        &self.channel
    }

    /// The writer side of the transport has gone away
    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }
}

/// One row of the presence list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub username: Username,
    pub status: ParticipantStatus,
}

/// Ordered set of connections of a room, at most one per identity
#[derive(Debug, Default)]
pub struct ConnectionMultiplexer {
    connections: Vec<Connection>,
}

impl ConnectionMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, evicting any prior one with the same identity.
    ///
    /// Returns the evicted connection. Dropping it closes its outbound channel.
    pub fn register(&mut self, connection: Connection) -> Option<Connection> {
        let evicted = self
            .connections
            .iter()
            .position(|c| c.identity == connection.identity)
            .map(|index| self.connections.remove(index));
        self.connections.push(connection);
        evicted
    }

    /// Remove a connection by id
    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections
            .iter()
            .position(|c| c.id == connection_id)
            .map(|index| self.connections.remove(index))
    }

    /// Remove every listed connection, returning how many were present
    pub fn prune(&mut self, connection_ids: &[ConnectionId]) -> usize {
        let before = self.connections.len();
        self.connections.retain(|c| !connection_ids.contains(&c.id));
        before - self.connections.len()
    }

    /// Remove connections whose outbound channel is already closed
    pub fn prune_closed(&mut self) -> Vec<ConnectionId> {
        let closed: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|c| c.is_closed())
            .map(|c| c.id)
            .collect();
        self.prune(&closed);
        closed
    }

    /// Update the status of the connection held by `identity`.
    ///
    /// Returns `false` when the identity has no connection here.
    pub fn set_status(&mut self, identity: &Identity, status: ParticipantStatus) -> bool {
        match self.connections.iter_mut().find(|c| &c.identity == identity) {
            Some(connection) => {
                connection.status = status;
                true
            }
            None => false,
        }
    }

    pub fn set_all_status(&mut self, status: ParticipantStatus) {
        for connection in &mut self.connections {
            connection.status = status;
        }
    }

    /// Presence rows in registration order
    pub fn list_presence(&self) -> Vec<PresenceEntry> {
        self.connections
            .iter()
            .map(|c| PresenceEntry {
                username: c.identity.username.clone(),
                status: c.status,
            })
            .collect()
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == connection_id)
    }

    pub fn connected_user_ids(&self) -> Vec<UserId> {
        self.connections.iter().map(|c| c.identity.user_id).collect()
    }

    pub fn as_slice(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
