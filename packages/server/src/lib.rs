//! Real-time room relay server for the hakuban collaborative whiteboard.
//!
//! Accepts WebSocket connections scoped to a room, authenticates them on
//! upgrade, and rebroadcasts drawing, chat and presence events to the other
//! members of the same room. The relay keeps no durable state of its own;
//! shape history is fetched from an external snapshot store on join.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
