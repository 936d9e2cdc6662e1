//! Shared utilities for the hakuban whiteboard relay.
//!
//! This crate holds the pieces both the server and the CLI client need:
//! logging setup and time handling.

pub mod logger;
pub mod time;
