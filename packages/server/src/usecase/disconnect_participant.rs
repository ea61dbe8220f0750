//! UseCase: 参加者切断処理

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRepository, Timestamp};

use super::broadcast::broadcast_presence;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
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

    /// Unregister `connection_id` and tell the rest of the room.
    ///
    /// Returns `false` when the connection had already been evicted or
    /// pruned; nothing is broadcast in that case. Attendance records are
    /// kept so the user can still claim after leaving.
    pub async fn execute(&self, room_id: &RoomId, connection_id: ConnectionId) -> bool {
        let Some(shared) = self.repository.find(room_id).await else {
            return false;
        };
        let mut room = shared.lock().await;
        let now = Timestamp::new(self.clock.now_millis());

        if !room.disconnect(connection_id, now) {
            tracing::debug!(
                "Connection {} already gone from room '{}'",
                connection_id,
                room_id
            );
            return false;
        }
        tracing::info!("Connection {} left room '{}'", connection_id, room_id);

        broadcast_presence(self.message_pusher.as_ref(), &mut room, now).await;
        if room.connections().is_empty() {
            tracing::info!("Room '{}' is now idle", room_id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{AttendanceThreshold, DurationMinutes, UserId},
        usecase::{
            ConnectParticipantUseCase,
            test_support::{Fixture, drain, identity, room_id},
        },
    };
    use tokio::sync::mpsc;

    fn usecases(fixture: &Fixture) -> (ConnectParticipantUseCase, DisconnectParticipantUseCase) {
        (
            ConnectParticipantUseCase::new(
                fixture.rooms.clone(),
                fixture.pusher.clone(),
                fixture.clock.clone(),
            ),
            DisconnectParticipantUseCase::new(
                fixture.rooms.clone(),
                fixture.pusher.clone(),
                fixture.clock.clone(),
            ),
        )
    }

    #[tokio::test]
    async fn test_disconnect_broadcasts_remaining_presence() {
        // テスト項目: 切断すると残りの参加者に更新された USER_LIST が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let (connect, disconnect) = usecases(&fixture);
        let room = room_id("study");
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, _rx_bob) = mpsc::unbounded_channel();
        connect.execute(&room, identity("alice", 1), tx_alice).await;
        let bob = connect.execute(&room, identity("bob", 2), tx_bob).await;
        drain(&mut rx_alice);

        // when (操作):
        let removed = disconnect.execute(&room, bob.connection_id).await;

        // then (期待する結果):
        assert!(removed);
        let frames = drain(&mut rx_alice);
        assert_eq!(frames.len(), 1);
        let users = frames[0]["users"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["username"], "alice");
    }

    #[tokio::test]
    async fn test_disconnect_of_evicted_connection_is_noop() {
        // テスト項目: 追い出された古い接続の切断は新しい接続を消さず、通知もしない
        // given (前提条件):
        let fixture = Fixture::new();
        let (connect, disconnect) = usecases(&fixture);
        let room = room_id("study");
        let (tx_old, _rx_old) = mpsc::unbounded_channel();
        let (tx_new, mut rx_new) = mpsc::unbounded_channel();
        let old = connect.execute(&room, identity("alice", 1), tx_old).await;
        connect.execute(&room, identity("alice", 1), tx_new).await;
        drain(&mut rx_new);

        // when (操作):
        let removed = disconnect.execute(&room, old.connection_id).await;

        // then (期待する結果):
        assert!(!removed);
        assert!(drain(&mut rx_new).is_empty());
        let shared = fixture.rooms.find(&room).await.unwrap();
        assert_eq!(shared.lock().await.connections().len(), 1);
    }

    #[tokio::test]
    async fn test_last_disconnect_keeps_attendance() {
        // テスト項目: 最後の参加者が抜けても出席記録とセッションは残る
        // given (前提条件):
        let fixture = Fixture::new();
        let (connect, disconnect) = usecases(&fixture);
        let room = room_id("study");
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = connect.execute(&room, identity("alice", 1), tx).await;
        {
            let shared = fixture.rooms.find(&room).await.unwrap();
            let mut locked = shared.lock().await;
            locked.start_timer(
                DurationMinutes::new(25).unwrap(),
                Timestamp::new(fixture.clock.now_millis()),
            );
        }

        // when (操作):
        disconnect.execute(&room, alice.connection_id).await;

        // then (期待する結果):
        fixture.clock.advance_secs(1400);
        let shared = fixture.rooms.find(&room).await.unwrap();
        let locked = shared.lock().await;
        assert!(locked.connections().is_empty());
        let eligibility = locked
            .eligibility(
                UserId::new(1),
                Timestamp::new(fixture.clock.now_millis()),
                AttendanceThreshold::default(),
            )
            .unwrap();
        assert!(eligibility.eligible);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_room() {
        // テスト項目: 存在しない部屋の切断は false
        let fixture = Fixture::new();
        let (_, disconnect) = usecases(&fixture);
        assert!(
            !disconnect
                .execute(&room_id("nowhere"), ConnectionId::generate())
                .await
        );
    }
}
