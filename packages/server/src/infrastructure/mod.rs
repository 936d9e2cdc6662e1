//! Infrastructure layer: concrete implementations of the domain seams.

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod registry;
pub mod snapshot;
