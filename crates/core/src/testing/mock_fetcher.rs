//! Mock media fetcher for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, MediaFetcher, StreamKind};
use crate::tool::ToolError;

/// A recorded download for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    pub locator: String,
    pub kind: StreamKind,
    pub dest: PathBuf,
}

/// Mock implementation of the MediaFetcher trait.
///
/// Writes a small placeholder file to the destination, so later stages see
/// real files on disk.
#[derive(Default)]
pub struct MockFetcher {
    fetches: RwLock<Vec<RecordedFetch>>,
    fail_on: RwLock<Option<StreamKind>>,
    delay: RwLock<Option<Duration>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail downloads of `kind` as if the downloader exited non-zero.
    pub async fn fail_on(&self, kind: StreamKind) {
        *self.fail_on.write().await = Some(kind);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Placeholder content written for each stream kind.
    pub fn content(kind: StreamKind) -> &'static [u8] {
        match kind {
            StreamKind::VideoOnly => b"mock video stream",
            StreamKind::AudioOnly => b"mock audio stream",
        }
    }
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(
        &self,
        locator: &str,
        kind: StreamKind,
        dest: &Path,
    ) -> Result<u64, FetchError> {
        self.fetches.write().await.push(RecordedFetch {
            locator: locator.to_string(),
            kind,
            dest: dest.to_path_buf(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.fail_on.read().await == Some(kind) {
            return Err(FetchError::Tool(ToolError::Failed {
                program: PathBuf::from("yt-dlp"),
                code: Some(1),
                stderr: "ERROR: Video unavailable".to_string(),
            }));
        }

        let content = Self::content(kind);
        tokio::fs::write(dest, content)
            .await
            .map_err(ToolError::from)?;
        Ok(content.len() as u64)
    }
}
