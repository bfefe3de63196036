//! Mock lyrics aligner for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::aligner::{AlignmentError, LyricsAligner};

/// Subtitle document returned by default.
pub const MOCK_SUBTITLE: &str = "[Script Info]\r\nTitle: mock\r\n\r\n[Events]\r\n";

/// A recorded alignment request for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAlignment {
    pub lyrics: String,
    pub audio: Vec<u8>,
    pub audio_file_name: String,
    /// Whether the watched path existed when the call was made.
    pub watched_path_existed: Option<bool>,
}

/// Mock implementation of the LyricsAligner trait.
#[derive(Default)]
pub struct MockAligner {
    requests: RwLock<Vec<RecordedAlignment>>,
    document: RwLock<Option<Vec<u8>>>,
    watch: RwLock<Option<PathBuf>>,
    next_error: RwLock<Option<AlignmentError>>,
    delay: RwLock<Option<Duration>>,
}

impl MockAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document returned instead of [`MOCK_SUBTITLE`].
    pub async fn set_document(&self, document: impl Into<Vec<u8>>) {
        *self.document.write().await = Some(document.into());
    }

    /// Record whether `path` exists at the time of each call.
    pub async fn watch_path(&self, path: impl AsRef<Path>) {
        *self.watch.write().await = Some(path.as_ref().to_path_buf());
    }

    pub async fn set_next_error(&self, error: AlignmentError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn recorded_requests(&self) -> Vec<RecordedAlignment> {
        self.requests.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl LyricsAligner for MockAligner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn align(
        &self,
        lyrics: &str,
        audio: Vec<u8>,
        audio_file_name: &str,
    ) -> Result<Vec<u8>, AlignmentError> {
        let watched = self.watch.read().await.clone();
        let watched_path_existed = match watched {
            Some(path) => Some(tokio::fs::try_exists(&path).await.unwrap_or(false)),
            None => None,
        };

        self.requests.write().await.push(RecordedAlignment {
            lyrics: lyrics.to_string(),
            audio,
            audio_file_name: audio_file_name.to_string(),
            watched_path_existed,
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self
            .document
            .read()
            .await
            .clone()
            .unwrap_or_else(|| MOCK_SUBTITLE.as_bytes().to_vec()))
    }
}
