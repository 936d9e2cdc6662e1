//! Domain entities: identities, room members, rooms and chat messages.

use super::error::RoomError;
use super::value_object::{ChatText, ConnectionId, RoomId, Timestamp, UserId, UserName};

/// Default maximum number of members per room
const DEFAULT_MEMBER_CAPACITY: usize = 64;

/// Verified identity of a connected user, extracted from the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub name: UserName,
    pub photo: Option<String>,
}

impl Identity {
    pub fn new(user_id: UserId, name: UserName, photo: Option<String>) -> Self {
        Self {
            user_id,
            name,
            photo,
        }
    }
}

/// One member of a room: a live connection plus its presence state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub identity: Identity,
    pub connected_at: Timestamp,
    pub drawing: bool,
}

impl Member {
    pub fn new(connection_id: ConnectionId, identity: Identity, connected_at: Timestamp) -> Self {
        Self {
            connection_id,
            identity,
            connected_at,
            drawing: false,
        }
    }
}

/// A room: the broadcast domain for one whiteboard session.
///
/// Created implicitly when the first member joins and dropped by the
/// registry when the last member leaves. A member belongs to exactly one
/// room for the lifetime of its connection.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    members: Vec<Member>,
    member_capacity: usize,
}

impl Room {
    /// Create a new room with the default member capacity
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, created_at, DEFAULT_MEMBER_CAPACITY)
    }

    /// Create a new room with an explicit member capacity
    pub fn with_capacity(id: RoomId, created_at: Timestamp, member_capacity: usize) -> Self {
        Self {
            id,
            created_at,
            members: Vec::new(),
            member_capacity,
        }
    }

    /// Add a member to the room.
    ///
    /// Rejects a connection id that is already a member and enforces the
    /// member capacity.
    pub fn add_member(&mut self, member: Member) -> Result<(), RoomError> {
        if self
            .members
            .iter()
            .any(|m| m.connection_id == member.connection_id)
        {
            return Err(RoomError::DuplicateConnection(
                member.connection_id.to_string(),
            ));
        }
        if self.members.len() >= self.member_capacity {
            return Err(RoomError::CapacityExceeded);
        }
        self.members.push(member);
        Ok(())
    }

    /// Remove a member by connection id. Returns the removed member, or
    /// `None` if the connection was not a member.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        Some(self.members.remove(index))
    }

    /// Flip the drawing flag of a member. Returns `false` if the connection
    /// is not a member.
    pub fn set_drawing(&mut self, connection_id: &ConnectionId, drawing: bool) -> bool {
        match self
            .members
            .iter_mut()
            .find(|m| &m.connection_id == connection_id)
        {
            Some(member) => {
                member.drawing = drawing;
                true
            }
            None => false,
        }
    }

    /// Members in join order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A chat message as broadcast by the relay.
///
/// Id and timestamp are assigned by the server at arrival, never taken from
/// the client frame; ordering is arrival order at the broadcaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub from: Identity,
    pub text: ChatText,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(id: String, from: Identity, text: ChatText, timestamp: Timestamp) -> Self {
        Self {
            id,
            from,
            text,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_identity(user_id: &str) -> Identity {
        Identity::new(
            UserId::new(user_id.to_string()).unwrap(),
            UserName::new(user_id.to_string()).unwrap(),
            None,
        )
    }

    fn test_member(user_id: &str) -> Member {
        Member::new(
            ConnectionId::generate(),
            test_identity(user_id),
            Timestamp::new(1000),
        )
    }

    fn test_room() -> Room {
        Room::new(
            RoomId::new("ABCDE".to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_add_member_success() {
        // テスト項目: メンバーを追加すると members に反映される
        // given (前提条件):
        let mut room = test_room();
        let member = test_member("alice");

        // when (操作):
        let result = room.add_member(member.clone());

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(room.member_count(), 1);
        assert_eq!(room.members()[0], member);
    }

    #[test]
    fn test_add_member_duplicate_connection() {
        // テスト項目: 同一の ConnectionId を持つメンバーの追加が拒否される
        // given (前提条件):
        let mut room = test_room();
        let member = test_member("alice");
        room.add_member(member.clone()).unwrap();

        // when (操作):
        let result = room.add_member(member.clone());

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomError::DuplicateConnection(
                member.connection_id.to_string()
            ))
        );
        assert_eq!(room.member_count(), 1);
    }

    #[test]
    fn test_add_member_capacity_exceeded() {
        // テスト項目: 定員超過時にメンバーの追加が拒否される
        // given (前提条件):
        let mut room = Room::with_capacity(
            RoomId::new("ABCDE".to_string()).unwrap(),
            Timestamp::new(1000),
            2,
        );
        room.add_member(test_member("alice")).unwrap();
        room.add_member(test_member("bob")).unwrap();

        // when (操作):
        let result = room.add_member(test_member("charlie"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::CapacityExceeded));
        assert_eq!(room.member_count(), 2);
    }

    #[test]
    fn test_remove_member_success() {
        // テスト項目: メンバーを削除すると members から取り除かれる
        // given (前提条件):
        let mut room = test_room();
        let member = test_member("alice");
        room.add_member(member.clone()).unwrap();

        // when (操作):
        let removed = room.remove_member(&member.connection_id);

        // then (期待する結果):
        assert_eq!(removed, Some(member));
        assert!(room.is_empty());
    }

    #[test]
    fn test_remove_nonexistent_member() {
        // テスト項目: 存在しないメンバーの削除は None を返す
        // given (前提条件):
        let mut room = test_room();

        // when (操作):
        let removed = room.remove_member(&ConnectionId::generate());

        // then (期待する結果):
        assert_eq!(removed, None);
    }

    #[test]
    fn test_set_drawing_flips_flag() {
        // テスト項目: set_drawing でメンバーの描画フラグが切り替わる
        // given (前提条件):
        let mut room = test_room();
        let member = test_member("alice");
        room.add_member(member.clone()).unwrap();

        // when (操作):
        let found = room.set_drawing(&member.connection_id, true);

        // then (期待する結果):
        assert!(found);
        assert!(room.members()[0].drawing);

        // when (操作): フラグを戻す
        room.set_drawing(&member.connection_id, false);

        // then (期待する結果):
        assert!(!room.members()[0].drawing);
    }

    #[test]
    fn test_set_drawing_unknown_member() {
        // テスト項目: 存在しないメンバーの set_drawing は false を返す
        // given (前提条件):
        let mut room = test_room();

        // when (操作):
        let found = room.set_drawing(&ConnectionId::generate(), true);

        // then (期待する結果):
        assert!(!found);
    }

    #[test]
    fn test_members_preserve_join_order() {
        // テスト項目: members が参加順を保持する
        // given (前提条件):
        let mut room = test_room();
        let alice = test_member("alice");
        let bob = test_member("bob");

        // when (操作):
        room.add_member(alice.clone()).unwrap();
        room.add_member(bob.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(room.members()[0].identity.user_id.as_str(), "alice");
        assert_eq!(room.members()[1].identity.user_id.as_str(), "bob");
    }
}
