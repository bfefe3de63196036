//! Mock track catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, SongId, TrackCatalog, TrackMetadata};

/// Mock implementation of the TrackCatalog trait.
///
/// Unknown ids resolve to [`CatalogError::NotFound`], like the real
/// catalog. Setting an API key rejection makes every call fail with
/// [`CatalogError::Unauthorized`].
#[derive(Default)]
pub struct MockCatalog {
    tracks: RwLock<HashMap<SongId, TrackMetadata>>,
    rejected_key: RwLock<Option<String>>,
    next_error: RwLock<Option<CatalogError>>,
    delay: RwLock<Option<Duration>>,
    calls: RwLock<Vec<SongId>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a track.
    pub async fn add_track(&self, id: impl Into<SongId>, track: TrackMetadata) {
        self.tracks.write().await.insert(id.into(), track);
    }

    /// Reject every request as if `api_key` were invalid.
    pub async fn reject_api_key(&self, api_key: impl Into<String>) {
        *self.rejected_key.write().await = Some(api_key.into());
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Ids resolved so far, in order.
    pub async fn recorded_calls(&self) -> Vec<SongId> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl TrackCatalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, id: SongId) -> Result<TrackMetadata, CatalogError> {
        self.calls.write().await.push(id);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if let Some(api_key) = self.rejected_key.read().await.clone() {
            return Err(CatalogError::Unauthorized { api_key });
        }

        self.tracks
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }
}
