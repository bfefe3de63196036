//! Mock stem separator for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::separator::{SeparationError, StemPaths, StemSeparator};
use crate::tool::ToolError;

/// Mock implementation of the StemSeparator trait.
///
/// Creates both stems next to each other in the output directory, using
/// the same naming as the real separator.
#[derive(Default)]
pub struct MockSeparator {
    inputs: RwLock<Vec<PathBuf>>,
    skip_vocals: RwLock<bool>,
    next_error: RwLock<Option<SeparationError>>,
    delay: RwLock<Option<Duration>>,
}

impl MockSeparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit successfully without writing the vocals stem.
    pub async fn skip_vocals(&self) {
        *self.skip_vocals.write().await = true;
    }

    pub async fn set_next_error(&self, error: SeparationError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Audio files separated so far.
    pub async fn recorded_inputs(&self) -> Vec<PathBuf> {
        self.inputs.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.inputs.read().await.len()
    }
}

#[async_trait]
impl StemSeparator for MockSeparator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn separate(
        &self,
        audio: &Path,
        out_dir: &Path,
    ) -> Result<StemPaths, SeparationError> {
        self.inputs.write().await.push(audio.to_path_buf());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let stems = StemPaths::expected(audio, out_dir);
        tokio::fs::write(&stems.instruments, b"mock instruments")
            .await
            .map_err(ToolError::from)?;

        if *self.skip_vocals.read().await {
            return Err(SeparationError::MissingOutput {
                path: stems.vocals,
            });
        }
        tokio::fs::write(&stems.vocals, b"mock vocals")
            .await
            .map_err(ToolError::from)?;

        Ok(stems)
    }
}
