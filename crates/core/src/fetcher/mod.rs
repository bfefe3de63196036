//! Source media download.
//!
//! Video and audio are fetched as separate elementary streams so the muxer
//! can place the original audio next to the separated stems.

mod ytdlp;

pub use ytdlp::YtDlpFetcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tool::ToolError;

/// Which stream of the source to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Highest quality stream without audio.
    VideoOnly,
    /// Highest quality stream without video.
    AudioOnly,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VideoOnly => write!(f, "video"),
            Self::AudioOnly => write!(f, "audio"),
        }
    }
}

/// Errors that can occur while downloading.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Downloader failed.
    #[error("download failed: {0}")]
    Tool(#[from] ToolError),

    /// Downloader reported success but the file is missing or empty.
    #[error("download produced no data at {path}")]
    EmptyOutput { path: PathBuf },
}

/// Downloads streams of a source link to local files.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Returns the name of this fetcher.
    fn name(&self) -> &str;

    /// Downloads the `kind` stream of `locator` to `dest`.
    ///
    /// Returns the number of bytes written. The full stream is on disk when
    /// this returns `Ok`.
    async fn fetch(&self, locator: &str, kind: StreamKind, dest: &Path)
        -> Result<u64, FetchError>;
}
