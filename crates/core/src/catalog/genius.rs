//! Genius API client.
//!
//! Only the `GET /songs/{id}` endpoint is used. Genius lists linked media
//! per song; the first entry from the configured provider becomes the
//! download source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::types::{SongId, TrackMetadata};
use super::{CatalogError, TrackCatalog};
use crate::config::CatalogConfig;
use crate::metrics;

/// Genius API client.
pub struct GeniusClient {
    client: Client,
    base_url: String,
    api_key: String,
    source_provider: String,
}

impl GeniusClient {
    /// Create a new Genius client.
    ///
    /// An empty API key is accepted; every lookup will then come back 401.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            source_provider: config.source_provider,
        })
    }

    async fn fetch_song(&self, id: SongId) -> Result<GeniusSong, CatalogError> {
        let url = format!("{}/songs/{}", self.base_url, id);

        debug!("Genius get song: id={}", id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Unauthorized {
                api_key: self.api_key.clone(),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GeniusEnvelope = response.json().await.map_err(|e| {
            CatalogError::Parse(format!("Failed to parse song response: {}", e))
        })?;

        Ok(envelope.response.song)
    }
}

#[async_trait]
impl TrackCatalog for GeniusClient {
    fn name(&self) -> &str {
        "genius"
    }

    async fn resolve(&self, id: SongId) -> Result<TrackMetadata, CatalogError> {
        let result = self.fetch_song(id).await;
        metrics::record_external_call("genius", "get_song", result.is_ok());
        result?.into_metadata(&self.source_provider)
    }
}

// ============================================================================
// Genius API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct GeniusEnvelope {
    response: GeniusSongResponse,
}

#[derive(Debug, Deserialize)]
struct GeniusSongResponse {
    song: GeniusSong,
}

#[derive(Debug, Deserialize)]
struct GeniusSong {
    title: String,
    primary_artist: GeniusArtist,
    #[serde(default)]
    media: Vec<GeniusMedia>,
}

#[derive(Debug, Deserialize)]
struct GeniusArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GeniusMedia {
    provider: String,
    #[serde(default)]
    url: Option<String>,
}

impl GeniusSong {
    fn into_metadata(self, provider: &str) -> Result<TrackMetadata, CatalogError> {
        let artist = self.primary_artist.name.trim().to_string();
        let title = self.title.trim().to_string();
        if artist.is_empty() || title.is_empty() {
            return Err(CatalogError::Parse(
                "song is missing artist or title".to_string(),
            ));
        }

        let source_locator = self
            .media
            .into_iter()
            .filter(|m| m.provider == provider)
            .find_map(|m| m.url.filter(|u| !u.is_empty()));

        Ok(TrackMetadata {
            artist,
            title,
            source_locator,
        })
    }
}
