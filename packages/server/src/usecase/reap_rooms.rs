//! UseCase: 空き部屋の回収処理

use std::sync::Arc;

use focusroom_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, Timestamp};

/// 空き部屋回収のユースケース
pub struct ReapIdleRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    idle_ttl_secs: i64,
}

impl ReapIdleRoomsUseCase {
    /// Rooms idle for at least `idle_ttl_secs` are discarded
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>, idle_ttl_secs: i64) -> Self {
        Self {
            repository,
            clock,
            idle_ttl_secs,
        }
    }

    pub fn idle_ttl_secs(&self) -> i64 {
        self.idle_ttl_secs
    }

    /// Run one sweep, returning the ids of the discarded rooms
    pub async fn execute(&self) -> Vec<RoomId> {
        let now = Timestamp::new(self.clock.now_millis());
        let removed = self
            .repository
            .remove_reapable(now, self.idle_ttl_secs)
            .await;
        if !removed.is_empty() {
            tracing::info!("Reaped {} idle room(s): {:?}", removed.len(), removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{AttendanceThreshold, ClaimPolicy, DurationMinutes, UserId},
        infrastructure::repository::InMemoryUserRepository,
        usecase::{
            ClaimRewardUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
            StartTimerUseCase,
            test_support::{Fixture, identity, room_id},
        },
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_reap_only_rooms_idle_past_ttl() {
        // テスト項目: TTL を過ぎた空き部屋だけが回収され、接続中の部屋は残る
        // given (前提条件):
        let fixture = Fixture::new();
        let connect = ConnectParticipantUseCase::new(
            fixture.rooms.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        );
        let disconnect = DisconnectParticipantUseCase::new(
            fixture.rooms.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        );
        let reap = ReapIdleRoomsUseCase::new(fixture.rooms.clone(), fixture.clock.clone(), 600);
        let busy = room_id("busy");
        let left = room_id("left");
        let (tx_busy, _rx_busy) = mpsc::unbounded_channel();
        let (tx_left, _rx_left) = mpsc::unbounded_channel();
        connect.execute(&busy, identity("alice", 1), tx_busy).await;
        let bob = connect.execute(&left, identity("bob", 2), tx_left).await;
        {
            let shared = fixture.rooms.find(&left).await.unwrap();
            shared.lock().await.start_timer(
                DurationMinutes::default(),
                Timestamp::new(fixture.clock.now_millis()),
            );
        }
        disconnect.execute(&left, bob.connection_id).await;

        // when (操作): 25 分のセッション終了から数える
        fixture.clock.advance_secs(1500 + 599);
        let early = reap.execute().await;
        fixture.clock.advance_secs(1);
        let due = reap.execute().await;

        // then (期待する結果):
        assert!(early.is_empty());
        assert_eq!(due, vec![left.clone()]);
        assert_eq!(fixture.rooms.room_ids().await, vec![busy]);
    }

    #[tokio::test]
    async fn test_reap_keeps_room_with_running_session() {
        // テスト項目: 全員が抜けてもセッション中の部屋は回収されず、後から受け取れる
        // given (前提条件): 60 分のセッション開始後 10 秒で alice が切断
        let fixture = Fixture::new();
        let connect = ConnectParticipantUseCase::new(
            fixture.rooms.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        );
        let start = StartTimerUseCase::new(
            fixture.rooms.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        );
        let disconnect = DisconnectParticipantUseCase::new(
            fixture.rooms.clone(),
            fixture.pusher.clone(),
            fixture.clock.clone(),
        );
        let claim = ClaimRewardUseCase::new(
            fixture.rooms.clone(),
            Arc::new(InMemoryUserRepository::new()),
            fixture.clock.clone(),
            AttendanceThreshold::default(),
            ClaimPolicy::Repeatable,
        );
        let reap = ReapIdleRoomsUseCase::new(fixture.rooms.clone(), fixture.clock.clone(), 1800);
        let room = room_id("study");
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = connect.execute(&room, identity("alice", 1), tx).await;
        start
            .execute(&room, alice.connection_id, DurationMinutes::new(60).unwrap())
            .await
            .unwrap();
        fixture.clock.advance_secs(10);
        disconnect.execute(&room, alice.connection_id).await;

        // when (操作): 切断から 1800 秒後に回収し、3300 秒時点で受け取る
        fixture.clock.advance_secs(1800);
        let reaped = reap.execute().await;
        fixture.clock.advance_secs(3300 - 1810);
        let receipt = claim.execute(&room, UserId::new(1)).await;

        // then (期待する結果):
        assert!(reaped.is_empty());
        assert_eq!(receipt.map(|r| r.flowers), Ok(1));
    }
}
