//! Data Transfer Objects (DTOs) for the relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: wire messages of the event envelope
//! - `codec`: inbound frame decoding into typed events
//! - `http`: HTTP API response DTOs

pub mod codec;
pub mod conversion;
pub mod http;
pub mod websocket;
