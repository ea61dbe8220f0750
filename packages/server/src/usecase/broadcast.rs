//! Room fan-out.
//!
//! Every broadcast runs while the caller holds the room lock, so events of one
//! room reach each connection in the order the commands were applied.
//! Unreachable connections are pruned inside the same call.

use crate::domain::{MessagePusher, Room, RoomEvent, Timestamp};

/// Send the current presence list to everyone in the room.
///
/// Connections found dead are pruned first; if a send still fails, the list
/// is rebuilt and re-sent so nobody is shown a participant that is gone.
pub(crate) async fn broadcast_presence(pusher: &dyn MessagePusher, room: &mut Room, now: Timestamp) {
    let closed = room.prune_closed(now);
    if !closed.is_empty() {
        tracing::info!(
            "Pruned {} closed connection(s) from room '{}'",
            closed.len(),
            room.id()
        );
    }

    while !room.connections().is_empty() {
        let event = RoomEvent::UserList(room.presence());
        let failed = pusher.broadcast(room.connections(), &event).await;
        if failed.is_empty() {
            return;
        }
        room.prune(&failed, now);
        tracing::info!(
            "Pruned {} unreachable connection(s) from room '{}'",
            failed.len(),
            room.id()
        );
    }
}

/// Send `event` to everyone in the room.
///
/// If some destinations were unreachable they are pruned and the remaining
/// connections receive a corrected presence list.
pub(crate) async fn broadcast_event(
    pusher: &dyn MessagePusher,
    room: &mut Room,
    event: &RoomEvent,
    now: Timestamp,
) {
    let failed = pusher.broadcast(room.connections(), event).await;
    if !failed.is_empty() {
        room.prune(&failed, now);
        broadcast_presence(pusher, room, now).await;
    }
}
