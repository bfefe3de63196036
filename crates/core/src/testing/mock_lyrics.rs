//! Mock lyrics source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::lyrics::{LyricsError, LyricsSource};

/// Mock implementation of the LyricsSource trait.
///
/// Returns lyrics registered for an exact (artist, title) pair, falling
/// back to a default text if one is set.
#[derive(Default)]
pub struct MockLyricsSource {
    lyrics: RwLock<HashMap<(String, String), String>>,
    default_lyrics: RwLock<Option<String>>,
    next_error: RwLock<Option<LyricsError>>,
    delay: RwLock<Option<Duration>>,
    searches: RwLock<Vec<(String, String)>>,
}

impl MockLyricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_lyrics(&self, artist: &str, title: &str, lyrics: impl Into<String>) {
        self.lyrics
            .write()
            .await
            .insert((artist.to_string(), title.to_string()), lyrics.into());
    }

    /// Lyrics returned for any track without a specific entry.
    pub async fn set_default_lyrics(&self, lyrics: impl Into<String>) {
        *self.default_lyrics.write().await = Some(lyrics.into());
    }

    pub async fn set_next_error(&self, error: LyricsError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// (artist, title) pairs searched so far.
    pub async fn recorded_searches(&self) -> Vec<(String, String)> {
        self.searches.read().await.clone()
    }
}

#[async_trait]
impl LyricsSource for MockLyricsSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, artist: &str, title: &str) -> Result<Option<String>, LyricsError> {
        self.searches
            .write()
            .await
            .push((artist.to_string(), title.to_string()));

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let key = (artist.to_string(), title.to_string());
        if let Some(lyrics) = self.lyrics.read().await.get(&key) {
            return Ok(Some(lyrics.clone()));
        }
        Ok(self.default_lyrics.read().await.clone())
    }
}
