//! Lyrics lookup.
//!
//! A [`LyricsSource`] only finds raw text. [`fetch_lyrics`] is what the
//! pipeline calls: it turns a miss or a blank result into
//! [`LyricsError::NotFound`] and normalizes line endings to CRLF, which the
//! alignment service needs to produce correct subtitle lines.

mod lyrics_ovh;
mod normalize;

pub use lyrics_ovh::LyricsOvhClient;
pub use normalize::normalize_line_endings;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching lyrics.
#[derive(Debug, Error)]
pub enum LyricsError {
    /// No lyrics for this track.
    #[error("lyrics not found for {artist} - {title}")]
    NotFound { artist: String, title: String },

    /// Lyrics service returned an error.
    #[error("lyrics service error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response.
    #[error("failed to parse lyrics response: {0}")]
    Parse(String),
}

/// Something that can look up lyrics for a track.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Looks up raw lyrics. `Ok(None)` means the source has nothing.
    async fn search(&self, artist: &str, title: &str) -> Result<Option<String>, LyricsError>;
}

/// Fetches lyrics and normalizes them for alignment.
pub async fn fetch_lyrics(
    source: &dyn LyricsSource,
    artist: &str,
    title: &str,
) -> Result<String, LyricsError> {
    let raw = source.search(artist, title).await?;

    match raw {
        Some(text) if !text.trim().is_empty() => Ok(normalize_line_endings(&text)),
        _ => Err(LyricsError::NotFound {
            artist: artist.to_string(),
            title: title.to_string(),
        }),
    }
}
