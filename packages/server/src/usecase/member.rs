//! Resolving the room and identity a connection acts for.

use tokio::sync::OwnedMutexGuard;

use crate::domain::{ConnectionId, Identity, Room, RoomId, RoomRepository};

use super::error::RoomCommandError;

/// Lock `room_id` on behalf of `connection_id`.
///
/// Returns the locked room and the identity currently bound to the
/// connection. Evicted or pruned connections no longer act for the room.
pub(crate) async fn lock_room_as_member(
    repository: &dyn RoomRepository,
    room_id: &RoomId,
    connection_id: ConnectionId,
) -> Result<(OwnedMutexGuard<Room>, Identity), RoomCommandError> {
    let shared = repository
        .find(room_id)
        .await
        .ok_or(RoomCommandError::RoomNotFound)?;
    let room = shared.lock_owned().await;
    if room.is_retired() {
        return Err(RoomCommandError::RoomNotFound);
    }
    let identity = room
        .connection(connection_id)
        .map(|c| c.identity.clone())
        .ok_or(RoomCommandError::NotConnected)?;
    Ok((room, identity))
}
