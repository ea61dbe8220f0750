//! UseCase: 参加者接続処理
//!
//! A new connection evicts any older one of the same identity, gets a timer
//! sync if a session is running, and triggers a presence broadcast.

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{
    ConnectionId, Identity, MessagePusher, ParticipantStatus, PusherChannel, RoomId,
    RoomRepository, Timestamp,
};

use super::{broadcast::broadcast_presence, start_timer::sync_late_joiner};

/// Registered connection handed back to the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectedParticipant {
    pub connection_id: ConnectionId,
    pub status: ParticipantStatus,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
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

    /// Register `identity` in `room_id`, creating the room on first use.
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room to join
    /// * `identity` - Authenticated identity of the caller
    /// * `sender` - Outbound channel drained by the connection's writer task
    pub async fn execute(
        &self,
        room_id: &RoomId,
        identity: Identity,
        sender: PusherChannel,
    ) -> ConnectedParticipant {
        loop {
            let shared = self.repository.get_or_create(room_id).await;
            let mut room = shared.lock().await;
            // Reaped between lookup and lock; the registry hands out a fresh room next time
            if room.is_retired() {
                tracing::debug!("Room '{}' was reaped during join, retrying", room_id);
                continue;
            }

            let now = Timestamp::new(self.clock.now_millis());
            let username = identity.username.clone();
            let outcome = room.connect(identity, sender, now);
            if let Some(evicted) = outcome.evicted {
                tracing::info!(
                    "Evicted previous connection {} of '{}' in room '{}'",
                    evicted.id,
                    username,
                    room_id
                );
            }
            tracing::info!(
                "'{}' joined room '{}' as {} ({})",
                username,
                room_id,
                outcome.status.as_str(),
                outcome.connection_id
            );

            sync_late_joiner(
                self.message_pusher.as_ref(),
                &room,
                outcome.connection_id,
                now,
            )
            .await;
            broadcast_presence(self.message_pusher.as_ref(), &mut room, now).await;

            return ConnectedParticipant {
                connection_id: outcome.connection_id,
                status: outcome.status,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Fixture, drain, identity, room_id};
    use tokio::sync::mpsc;

    fn usecase(fixture: &Fixture) -> ConnectParticipantUseCase {
        ConnectParticipantUseCase::new(
            fixture.rooms.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_connect_creates_room_and_broadcasts_presence() {
        // テスト項目: 最初の接続で部屋が作られ、全員に USER_LIST が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        let room = room_id("study");
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();

        // when (操作):
        let alice = usecase.execute(&room, identity("alice", 1), tx_alice).await;
        usecase.execute(&room, identity("bob", 2), tx_bob).await;

        // then (期待する結果):
        assert_eq!(alice.status, ParticipantStatus::Idle);
        let alice_frames = drain(&mut rx_alice);
        assert_eq!(alice_frames.len(), 2);
        assert_eq!(alice_frames[1]["users"].as_array().unwrap().len(), 2);
        let bob_frames = drain(&mut rx_bob);
        assert_eq!(bob_frames.len(), 1);
        assert_eq!(bob_frames[0]["type"], "USER_LIST");
        assert_eq!(bob_frames[0]["users"][0]["username"], "alice");
        assert_eq!(bob_frames[0]["users"][1]["username"], "bob");
        assert_eq!(bob_frames[0]["users"][1]["status"], "idle");
    }

    #[tokio::test]
    async fn test_reconnect_evicts_previous_connection() {
        // テスト項目: 同じ identity の再接続で古い接続が閉じられ、一覧は 1 行のまま
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        let room = room_id("study");
        let (tx_first, mut rx_first) = mpsc::unbounded_channel();
        let first = usecase.execute(&room, identity("alice", 1), tx_first).await;
        drain(&mut rx_first);

        // when (操作):
        let (tx_second, mut rx_second) = mpsc::unbounded_channel();
        let second = usecase.execute(&room, identity("alice", 1), tx_second).await;

        // then (期待する結果):
        assert_ne!(first.connection_id, second.connection_id);
        assert!(rx_first.recv().await.is_none());
        let frames = drain(&mut rx_second);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["users"].as_array().unwrap().len(), 1);
        let shared = fixture.rooms.find(&room).await.unwrap();
        assert_eq!(shared.lock().await.connections().len(), 1);
    }

    #[tokio::test]
    async fn test_connect_prunes_dead_connections() {
        // テスト項目: 送信先が閉じた接続は参加時のブロードキャストで除去される
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        let room = room_id("study");
        let (tx_ghost, rx_ghost) = mpsc::unbounded_channel();
        usecase.execute(&room, identity("ghost", 9), tx_ghost).await;
        drop(rx_ghost);

        // when (操作):
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        usecase.execute(&room, identity("alice", 1), tx_alice).await;

        // then (期待する結果):
        let frames = drain(&mut rx_alice);
        assert_eq!(frames.len(), 1);
        let users = frames[0]["users"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["username"], "alice");
    }

    #[tokio::test]
    async fn test_connect_after_reap_uses_fresh_room() {
        // テスト項目: 回収済みの部屋に再参加すると新しい部屋が作られる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture);
        let room = room_id("study");
        let old = fixture.rooms.get_or_create(&room).await;
        fixture
            .rooms
            .remove_reapable(Timestamp::new(fixture.clock.now_millis()), 0)
            .await;

        // when (操作):
        let (tx, _rx) = mpsc::unbounded_channel();
        usecase.execute(&room, identity("alice", 1), tx).await;

        // then (期待する結果):
        assert!(old.lock().await.is_retired());
        let fresh = fixture.rooms.find(&room).await.unwrap();
        assert_eq!(fresh.lock().await.connections().len(), 1);
    }
}
