//! External room/shape store implementations.
//!
//! - `http`: consults the REST collaborator that owns rooms and shape
//!   persistence
//! - `null`: stand-in used when no collaborator is configured

pub mod http;
pub mod null;

pub use http::HttpSnapshotStore;
pub use null::NullSnapshotStore;
