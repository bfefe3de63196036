//! Multi-track container assembly.
//!
//! The karaoke deliverable is one container holding the original video plus
//! three audio tracks: instruments (default), vocals and the full mix.

mod ffmpeg;

pub use ffmpeg::FfmpegMuxer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::tool::ToolError;

/// Track titles, in output stream order.
pub const TRACK_TITLES: [&str; 3] = ["Instruments", "Vocals", "All"];

/// Errors that can occur during muxing.
#[derive(Debug, Error)]
pub enum MuxError {
    /// Muxer failed.
    #[error("mux failed: {0}")]
    Tool(#[from] ToolError),

    /// An input is missing or empty.
    #[error("mux input not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Muxer exited cleanly but wrote nothing.
    #[error("mux produced no output at {path}")]
    MissingOutput { path: PathBuf },
}

/// Inputs and output of one mux.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuxJob {
    pub video: PathBuf,
    pub instruments: PathBuf,
    pub vocals: PathBuf,
    /// Original full mix.
    pub audio: PathBuf,
    pub output: PathBuf,
}

impl MuxJob {
    /// Inputs in stream index order.
    pub fn inputs(&self) -> [&PathBuf; 4] {
        [&self.video, &self.instruments, &self.vocals, &self.audio]
    }
}

/// Combines a video stream and three audio tracks into one container.
#[async_trait]
pub trait MediaMuxer: Send + Sync {
    /// Returns the name of this muxer.
    fn name(&self) -> &str;

    /// Writes `job.output`, replacing any existing file.
    async fn mux(&self, job: &MuxJob) -> Result<PathBuf, MuxError>;
}
