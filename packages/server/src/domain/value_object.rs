//! Value objects for the room relay domain.
//!
//! Construction validates the invariants once; the rest of the code can
//! rely on a `RoomId` or `UserName` always being well-formed.

use std::fmt;

use uuid::Uuid;

use super::error::ValueError;

/// Maximum length of a room code
const ROOM_ID_MAX_LEN: usize = 32;
/// Maximum length of a user id / display name
const USER_FIELD_MAX_LEN: usize = 64;
/// Maximum length of a chat message
const CHAT_TEXT_MAX_LEN: usize = 500;

/// Room code: the logical broadcast domain a connection joins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// Valid codes are 1..=32 characters, alphanumeric plus `-` and `_`.
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.is_empty() {
            return Err(ValueError::Empty("room id"));
        }
        if value.len() > ROOM_ID_MAX_LEN {
            return Err(ValueError::TooLong("room id", ROOM_ID_MAX_LEN));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValueError::InvalidChars("room id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique id of one open WebSocket connection.
///
/// Assigned by the relay at upgrade time; never supplied by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stable user id carried in the verified credential (`sub` claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.is_empty() {
            return Err(ValueError::Empty("user id"));
        }
        if value.len() > USER_FIELD_MAX_LEN {
            return Err(ValueError::TooLong("user id", USER_FIELD_MAX_LEN));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Display name shown to other room members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.is_empty() {
            return Err(ValueError::Empty("user name"));
        }
        if value.len() > USER_FIELD_MAX_LEN {
            return Err(ValueError::TooLong("user name", USER_FIELD_MAX_LEN));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Chat message body, 1..=500 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatText(String);

impl ChatText {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.is_empty() {
            return Err(ValueError::Empty("chat message"));
        }
        if value.chars().count() > CHAT_TEXT_MAX_LEN {
            return Err(ValueError::TooLong("chat message", CHAT_TEXT_MAX_LEN));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Id of a drawing primitive. The relay never interprets the shape itself,
/// only its id (needed for `delete`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.is_empty() {
            return Err(ValueError::Empty("shape id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_accepts_short_code() {
        // テスト項目: 英数字の短いルームコードが受理される
        // given (前提条件):
        let code = "ABCDE".to_string();

        // when (操作):
        let result = RoomId::new(code);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "ABCDE");
    }

    #[test]
    fn test_room_id_rejects_empty_code() {
        // テスト項目: 空のルームコードが拒否される
        // given (前提条件):
        let code = "".to_string();

        // when (操作):
        let result = RoomId::new(code);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_room_id_rejects_invalid_characters() {
        // テスト項目: 不正な文字を含むルームコードが拒否される
        // given (前提条件):
        let code = "room/../etc".to_string();

        // when (操作):
        let result = RoomId::new(code);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_room_id_rejects_too_long_code() {
        // テスト項目: 長すぎるルームコードが拒否される
        // given (前提条件):
        let code = "a".repeat(33);

        // when (操作):
        let result = RoomId::new(code);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_connection_id_is_unique() {
        // テスト項目: 生成された ConnectionId が一意である
        // given (前提条件):

        // when (操作):
        let id1 = ConnectionId::generate();
        let id2 = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_chat_text_accepts_normal_message() {
        // テスト項目: 通常のチャットメッセージが受理される
        // given (前提条件):
        let text = "hi".to_string();

        // when (操作):
        let result = ChatText::new(text);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "hi");
    }

    #[test]
    fn test_chat_text_rejects_empty_message() {
        // テスト項目: 空のチャットメッセージが拒否される
        // given (前提条件):
        let text = "".to_string();

        // when (操作):
        let result = ChatText::new(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_text_rejects_too_long_message() {
        // テスト項目: 上限を超える長さのチャットメッセージが拒否される
        // given (前提条件):
        let text = "a".repeat(501);

        // when (操作):
        let result = ChatText::new(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_user_name_rejects_empty_name() {
        // テスト項目: 空の表示名が拒否される
        // given (前提条件):
        let name = "".to_string();

        // when (操作):
        let result = UserName::new(name);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
