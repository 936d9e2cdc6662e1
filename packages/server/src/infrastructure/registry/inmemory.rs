//! In-memory implementation of the connection registry.
//!
//! Rooms live in a map guarded by one mutex; each room carries its own
//! mutex so operations on different rooms proceed in parallel while all
//! operations on a single room are linearized.
//!
//! Lock order invariant: the rooms map is always locked before a room.
//! Mutating operations keep the map locked while they take the room lock,
//! which lets an emptied room be dropped from the map atomically with the
//! removal that emptied it. Read operations clone the room handle and
//! release the map lock first.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Member, RegistryError, Room, RoomError, RoomId, RoomRegistry,
};

/// Process-local room registry
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<RoomId, Arc<Mutex<Room>>>>,
    member_capacity: usize,
}

impl InMemoryRoomRegistry {
    /// Create a registry with the default per-room member capacity
    pub fn new() -> Self {
        Self::with_member_capacity(64)
    }

    /// Create a registry with an explicit per-room member capacity
    pub fn with_member_capacity(member_capacity: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            member_capacity,
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn add_member(
        &self,
        room_id: RoomId,
        member: Member,
    ) -> Result<Vec<Member>, RegistryError> {
        let mut rooms = self.rooms.lock().await;
        let room_arc = rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::debug!("Room '{}' created", room_id.as_str());
                Arc::new(Mutex::new(Room::with_capacity(
                    room_id.clone(),
                    member.connected_at,
                    self.member_capacity,
                )))
            })
            .clone();

        let mut room = room_arc.lock().await;
        room.add_member(member).map_err(|e| match e {
            RoomError::DuplicateConnection(id) => RegistryError::DuplicateConnection(id),
            RoomError::CapacityExceeded => RegistryError::RoomCapacityExceeded,
        })?;
        Ok(room.members().to_vec())
    }

    async fn remove_member(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Vec<Member>, RegistryError> {
        let mut rooms = self.rooms.lock().await;
        let room_arc = rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;

        let mut room = room_arc.lock().await;
        room.remove_member(connection_id)
            .ok_or_else(|| RegistryError::MemberNotFound(connection_id.to_string()))?;

        let roster = room.members().to_vec();
        if room.is_empty() {
            rooms.remove(room_id);
            tracing::debug!("Room '{}' removed (last member left)", room_id.as_str());
        }
        Ok(roster)
    }

    async fn members(&self, room_id: &RoomId) -> Vec<Member> {
        let room_arc = {
            let rooms = self.rooms.lock().await;
            rooms.get(room_id).cloned()
        };
        match room_arc {
            Some(room_arc) => {
                let room = room_arc.lock().await;
                room.members().to_vec()
            }
            None => Vec::new(),
        }
    }

    async fn set_drawing(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        drawing: bool,
    ) -> Result<Vec<Member>, RegistryError> {
        let rooms = self.rooms.lock().await;
        let room_arc = rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;

        let mut room = room_arc.lock().await;
        if !room.set_drawing(connection_id, drawing) {
            return Err(RegistryError::MemberNotFound(connection_id.to_string()));
        }
        Ok(room.members().to_vec())
    }

    async fn room_count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }

    async fn rooms(&self) -> Vec<Room> {
        let room_arcs: Vec<Arc<Mutex<Room>>> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };
        let mut snapshot = Vec::with_capacity(room_arcs.len());
        for room_arc in room_arcs {
            let room = room_arc.lock().await;
            snapshot.push(room.clone());
        }
        snapshot
    }
}
