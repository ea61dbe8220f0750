//! UseCase: タイマー開始処理
//!
//! Starting a timer replaces the room's session, restarts attendance for
//! everyone connected and marks them all as focusing.

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{
    ConnectionId, DurationMinutes, MessagePusher, Room, RoomEvent, RoomId, RoomRepository,
    SessionState, Timestamp,
};

use super::{
    broadcast::{broadcast_event, broadcast_presence},
    error::RoomCommandError,
    member::lock_room_as_member,
};

/// タイマー開始のユースケース
pub struct StartTimerUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl StartTimerUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// Start a `duration` minute timer on behalf of `connection_id`.
    ///
    /// Broadcasts TIMER_STARTED followed by the refreshed presence list.
    /// Starting while a timer is already running simply restarts it.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        duration: DurationMinutes,
    ) -> Result<SessionState, RoomCommandError> {
        let (mut room, identity) =
            lock_room_as_member(self.repository.as_ref(), room_id, connection_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        let session = room.start_timer(duration, now);
        tracing::info!(
            "'{}' started a {}-minute timer in room '{}'",
            identity.username,
            duration.value(),
            room_id
        );

        let event = RoomEvent::TimerStarted {
            end_time: session.end_time,
            duration: session.duration,
        };
        broadcast_event(self.message_pusher.as_ref(), &mut room, &event, now).await;
        broadcast_presence(self.message_pusher.as_ref(), &mut room, now).await;

        Ok(session)
    }
}

/// Send SYNC_TIMER to a connection that joined a running session.
///
/// Returns whether a sync was delivered. A failed push leaves the dead
/// connection for the next presence broadcast to prune.
pub(crate) async fn sync_late_joiner(
    pusher: &dyn MessagePusher,
    room: &Room,
    connection_id: ConnectionId,
    now: Timestamp,
) -> bool {
    let Some(event) = room.sync_event(now) else {
        return false;
    };
    let Some(connection) = room.connection(connection_id) else {
        return false;
    };
    match pusher.push_to(connection, &event).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to sync timer to '{}': {}", connection.identity.username, e);
            false
        }
    }
}
