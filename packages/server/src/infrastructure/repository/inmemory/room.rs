//! InMemory Room Repository implementation.
//!
//! Rooms live in a `HashMap` behind a registry lock. Each room has its own
//! lock; the registry lock is only held to look up, create or reap rooms.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use focusroom_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{Room, RoomId, RoomRepository, SharedRoom, Timestamp};

pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, SharedRoom>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// `clock` stamps the creation time of new rooms
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Ids of every room currently held, sorted
    #[cfg(test)]
    pub(crate) async fn room_ids(&self) -> Vec<RoomId> {
        let rooms = self.rooms.lock().await;
        let mut ids: Vec<RoomId> = rooms.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_or_create(&self, room_id: &RoomId) -> SharedRoom {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::info!("Room '{}' created", room_id);
                Arc::new(Mutex::new(Room::new(
                    room_id.clone(),
                    Timestamp::new(self.clock.now_millis()),
                )))
            })
            .clone()
    }

    async fn find(&self, room_id: &RoomId) -> Option<SharedRoom> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn remove_reapable(&self, now: Timestamp, idle_ttl_secs: i64) -> Vec<RoomId> {
        let mut rooms = self.rooms.lock().await;
        let mut removed = Vec::new();
        rooms.retain(|room_id, shared| {
            // A locked room is in use, leave it for the next sweep
            let Ok(mut room) = shared.try_lock() else {
                return true;
            };
            if room.is_reapable(now, idle_ttl_secs) {
                room.retire();
                removed.push(room_id.clone());
                false
            } else {
                true
            }
        });
        removed.sort();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DurationMinutes, Identity, UserId, Username};
    use focusroom_shared::time::ManualClock;
    use tokio::sync::mpsc;

    const T0: i64 = 1_700_000_000_000;

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn create_test_repository() -> (InMemoryRoomRepository, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        (InMemoryRoomRepository::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_room() {
        // テスト項目: 同じ ID では同じ部屋インスタンスが返される
        // given (前提条件):
        let (repo, _clock) = create_test_repository();

        // when (操作):
        let first = repo.get_or_create(&room_id("study")).await;
        let second = repo.get_or_create(&room_id("study")).await;
        let other = repo.get_or_create(&room_id("gym")).await;

        // then (期待する結果):
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(repo.room_ids().await, vec![room_id("gym"), room_id("study")]);
    }

    #[tokio::test]
    async fn test_find_missing_room() {
        // テスト項目: 存在しない部屋は None
        let (repo, _clock) = create_test_repository();
        assert!(repo.find(&room_id("nowhere")).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_reapable_drops_expired_idle_rooms() {
        // テスト項目: TTL を超えてアイドルな部屋だけが削除され、retired になる
        // given (前提条件):
        let (repo, _clock) = create_test_repository();
        let start = Timestamp::new(T0);

        // idle room with a session
        let idle = repo.get_or_create(&room_id("idle")).await;
        {
            let mut room = idle.lock().await;
            let (tx, _rx) = mpsc::unbounded_channel();
            let identity =
                Identity::new(Username::new("alice".to_string()).unwrap(), UserId::new(1));
            let joined = room.connect(identity, tx, start);
            room.start_timer(DurationMinutes::new(25).unwrap(), start);
            room.disconnect(joined.connection_id, start);
        }

        // active room
        let active = repo.get_or_create(&room_id("active")).await;
        let (tx, _rx) = mpsc::unbounded_channel();
        active.lock().await.connect(
            Identity::new(Username::new("bob".to_string()).unwrap(), UserId::new(2)),
            tx,
            start,
        );

        // when (操作): 25 分のセッション終了から 600 秒後に回収対象になる
        let too_early = repo.remove_reapable(start.plus_secs(1500 + 599), 600).await;
        let removed = repo.remove_reapable(start.plus_secs(1500 + 600), 600).await;

        // then (期待する結果):
        assert!(too_early.is_empty());
        assert_eq!(removed, vec![room_id("idle")]);
        assert!(idle.lock().await.is_retired());
        assert_eq!(repo.room_ids().await, vec![room_id("active")]);
    }

    #[tokio::test]
    async fn test_remove_reapable_skips_locked_rooms() {
        // テスト項目: ロック中の部屋は回収をスキップする
        // given (前提条件):
        let (repo, _clock) = create_test_repository();
        let empty = repo.get_or_create(&room_id("empty")).await;
        let _guard = empty.lock().await;

        // when (操作):
        let removed = repo.remove_reapable(Timestamp::new(T0), 0).await;

        // then (期待する結果):
        assert!(removed.is_empty());
        assert_eq!(repo.room_ids().await, vec![room_id("empty")]);
    }
}
