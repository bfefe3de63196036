//! lyrics.ovh style lyrics API client.
//!
//! `GET {base}/v1/{artist}/{title}` returns `{"lyrics": "..."}` or 404.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{LyricsError, LyricsSource};
use crate::config::LyricsConfig;
use crate::metrics;

/// HTTP lyrics client.
pub struct LyricsOvhClient {
    client: Client,
    base_url: String,
}

impl LyricsOvhClient {
    /// Create a new lyrics client.
    pub fn new(config: LyricsConfig) -> Result<Self, LyricsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn lookup_url(&self, artist: &str, title: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }

    async fn lookup(&self, artist: &str, title: &str) -> Result<Option<String>, LyricsError> {
        let url = self.lookup_url(artist, title);

        debug!("Lyrics lookup: artist='{}', title='{}'", artist, title);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LyricsError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: LyricsResponse = response
            .json()
            .await
            .map_err(|e| LyricsError::Parse(e.to_string()))?;

        Ok(body.lyrics)
    }
}

#[async_trait]
impl LyricsSource for LyricsOvhClient {
    fn name(&self) -> &str {
        "lyrics.ovh"
    }

    async fn search(&self, artist: &str, title: &str) -> Result<Option<String>, LyricsError> {
        let result = self.lookup(artist, title).await;
        metrics::record_external_call("lyrics", "search", result.is_ok());
        result
    }
}

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    #[serde(default)]
    lyrics: Option<String>,
}
