//! Lyric-to-audio alignment.
//!
//! The alignment model runs as a separate HTTP service. It takes the lyrics
//! and the full mix and returns a timed subtitle document.

mod http;

pub use http::HttpAligner;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during alignment.
#[derive(Debug, Error)]
pub enum AlignmentError {
    /// Service returned a non-success status.
    #[error("alignment service error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// Service returned an empty document.
    #[error("alignment service returned an empty document")]
    EmptyDocument,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Produces timed subtitles from lyrics and audio.
#[async_trait]
pub trait LyricsAligner: Send + Sync {
    /// Returns the name of this aligner.
    fn name(&self) -> &str;

    /// Aligns `lyrics` against `audio`, returning the subtitle document bytes.
    ///
    /// `audio_file_name` is forwarded so the service can sniff the container.
    async fn align(
        &self,
        lyrics: &str,
        audio: Vec<u8>,
        audio_file_name: &str,
    ) -> Result<Vec<u8>, AlignmentError>;
}
