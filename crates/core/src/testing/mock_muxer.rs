//! Mock muxer for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::muxer::{MediaMuxer, MuxError, MuxJob};
use crate::tool::ToolError;

/// Mock implementation of the MediaMuxer trait.
///
/// Checks that every input exists, then writes a placeholder output.
#[derive(Default)]
pub struct MockMuxer {
    jobs: RwLock<Vec<MuxJob>>,
    next_error: RwLock<Option<MuxError>>,
    delay: RwLock<Option<Duration>>,
}

impl MockMuxer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_next_error(&self, error: MuxError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn recorded_jobs(&self) -> Vec<MuxJob> {
        self.jobs.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[async_trait]
impl MediaMuxer for MockMuxer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn mux(&self, job: &MuxJob) -> Result<PathBuf, MuxError> {
        self.jobs.write().await.push(job.clone());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        for input in job.inputs() {
            if !tokio::fs::try_exists(input).await.unwrap_or(false) {
                return Err(MuxError::InputNotFound {
                    path: input.clone(),
                });
            }
        }

        tokio::fs::write(&job.output, b"mock karaoke video")
            .await
            .map_err(ToolError::from)?;
        Ok(job.output.clone())
    }
}
