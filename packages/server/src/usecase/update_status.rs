//! UseCase: ステータス更新処理 (FAIL / REJOIN)

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, ParticipantStatus, RoomId, RoomRepository, Timestamp,
};

use super::{broadcast::broadcast_presence, error::RoomCommandError, member::lock_room_as_member};

/// ステータス更新のユースケース
pub struct UpdateStatusUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl UpdateStatusUseCase {
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

    /// Set the status of the identity bound to `connection_id` and broadcast
    /// the presence list. Attendance and timer state are untouched.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        status: ParticipantStatus,
    ) -> Result<(), RoomCommandError> {
        let (mut room, identity) =
            lock_room_as_member(self.repository.as_ref(), room_id, connection_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        room.set_status(&identity, status);
        tracing::info!(
            "'{}' is now {} in room '{}'",
            identity.username,
            status.as_str(),
            room_id
        );
        broadcast_presence(self.message_pusher.as_ref(), &mut room, now).await;
        Ok(())
    }
}
