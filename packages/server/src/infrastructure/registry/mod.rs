//! Connection registry implementations.
//!
//! - `inmemory`: process-local registry, one lock per room
//! - future: sharded or external pub/sub registries can implement the same
//!   `RoomRegistry` trait

pub mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
