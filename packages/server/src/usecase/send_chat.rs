//! UseCase: チャット送信処理

use std::sync::Arc;

use focusroom_shared::time::{Clock, format_hh_mm};

use crate::domain::{
    ChatText, ConnectionId, MessagePusher, RoomEvent, RoomId, RoomRepository, Timestamp,
    ValueObjectError,
};

use super::{broadcast::broadcast_event, error::SendChatError, member::lock_room_as_member};

/// チャット送信のユースケース
pub struct SendChatUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// Offset applied to the `HH:MM` stamp of relayed messages
    utc_offset_minutes: i32,
}

impl SendChatUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        utc_offset_minutes: i32,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            utc_offset_minutes,
        }
    }

    /// Relay `message` to every connection of the room, sender included.
    ///
    /// Missing, empty and oversized messages are rejected before the room is
    /// touched.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        message: Option<String>,
    ) -> Result<(), SendChatError> {
        let text = ChatText::new(message.ok_or(SendChatError::EmptyMessage)?).map_err(|e| match e {
            ValueObjectError::EmptyChatText => SendChatError::EmptyMessage,
            other => SendChatError::InvalidMessage(other),
        })?;

        let (mut room, identity) =
            lock_room_as_member(self.repository.as_ref(), room_id, connection_id).await?;
        let now = Timestamp::new(self.clock.now_millis());

        let event = RoomEvent::Chat {
            username: identity.username,
            text,
            clock_time: format_hh_mm(now.value(), self.utc_offset_minutes),
        };
        broadcast_event(self.message_pusher.as_ref(), &mut room, &event, now).await;
        Ok(())
    }
}
