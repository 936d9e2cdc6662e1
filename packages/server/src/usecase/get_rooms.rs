//! UseCase: room introspection for the HTTP API.

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRegistry};

/// UseCase backing the health and room-listing endpoints
pub struct GetRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Snapshot of all active rooms
    pub async fn execute(&self) -> Vec<Room> {
        self.registry.rooms().await
    }

    /// Number of rooms with at least one live connection
    pub async fn room_count(&self) -> usize {
        self.registry.room_count().await
    }

    /// Snapshot of a single room, `None` when it has no live connection
    pub async fn find(&self, room_id: &RoomId) -> Option<Room> {
        self.registry
            .rooms()
            .await
            .into_iter()
            .find(|room| &room.id == room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, Identity, Member, Timestamp, UserId, UserName};
    use crate::infrastructure::registry::InMemoryRoomRegistry;

    fn test_member(user_id: &str) -> Member {
        Member::new(
            ConnectionId::generate(),
            Identity::new(
                UserId::new(user_id.to_string()).unwrap(),
                UserName::new(user_id.to_string()).unwrap(),
                None,
            ),
            Timestamp::new(1000),
        )
    }

    fn room_id(code: &str) -> RoomId {
        RoomId::new(code.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_room_count_tracks_active_rooms() {
        // テスト項目: room_count がアクティブなルーム数を返す
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = GetRoomsUseCase::new(registry.clone());
        assert_eq!(usecase.room_count().await, 0);

        // when (操作):
        registry
            .add_member(room_id("ROOM-A"), test_member("alice"))
            .await
            .unwrap();
        registry
            .add_member(room_id("ROOM-B"), test_member("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(usecase.room_count().await, 2);
    }

    #[tokio::test]
    async fn test_find_returns_room_with_members() {
        // テスト項目: find が該当ルームのスナップショットを返す
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = GetRoomsUseCase::new(registry.clone());
        registry
            .add_member(room_id("ABCDE"), test_member("alice"))
            .await
            .unwrap();

        // when (操作):
        let room = usecase.find(&room_id("ABCDE")).await;

        // then (期待する結果):
        let room = room.unwrap();
        assert_eq!(room.id.as_str(), "ABCDE");
        assert_eq!(room.member_count(), 1);
    }

    #[tokio::test]
    async fn test_find_unknown_room_returns_none() {
        // テスト項目: 存在しないルームの find が None を返す
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = GetRoomsUseCase::new(registry);

        // when (操作):
        let room = usecase.find(&room_id("NOROOM")).await;

        // then (期待する結果):
        assert!(room.is_none());
    }
}
