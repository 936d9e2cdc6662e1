//! REST implementation of the `SnapshotStore` trait.
//!
//! The collaborator owns room existence and shape persistence:
//! - `GET {base}/rooms/{code}` — 200 if the room exists, 404 otherwise
//! - `GET {base}/rooms/{code}/shapes` — JSON array of opaque shapes

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::{RoomId, SnapshotError, SnapshotStore};

/// Snapshot store backed by the external REST service
pub struct HttpSnapshotStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSnapshotStore {
    /// Create a store for the given base URL (without trailing slash)
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn room_url(&self, room_id: &RoomId) -> String {
        format!("{}/rooms/{}", self.base_url, room_id.as_str())
    }
}

#[async_trait]
impl SnapshotStore for HttpSnapshotStore {
    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, SnapshotError> {
        let response = self
            .client
            .get(self.room_url(room_id))
            .send()
            .await
            .map_err(|e| SnapshotError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(SnapshotError::InvalidResponse(format!(
                "unexpected status {status} for room existence check"
            ))),
        }
    }

    async fn fetch_shapes(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<serde_json::Value>, SnapshotError> {
        let response = self
            .client
            .get(format!("{}/shapes", self.room_url(room_id)))
            .send()
            .await
            .map_err(|e| SnapshotError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SnapshotError::InvalidResponse(format!(
                "unexpected status {} for shape snapshot",
                response.status()
            )));
        }
        response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| SnapshotError::InvalidResponse(e.to_string()))
    }
}
