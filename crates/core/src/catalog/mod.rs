//! Track metadata lookup.
//!
//! Resolves a numeric song identifier to artist, title and a playable source
//! link through a remote catalog. The production client talks to the Genius
//! API.

mod genius;
mod types;

pub use genius::GeniusClient;
pub use types::{InvalidSongId, SongId, TrackMetadata};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when resolving track metadata.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured credential was rejected (401).
    #[error("catalog rejected API key: {api_key:?}")]
    Unauthorized { api_key: String },

    /// The identifier is unknown to the catalog (404).
    #[error("song not found: {0}")]
    NotFound(SongId),

    /// Any other non-success response.
    #[error("catalog error: {status} - {body}")]
    Upstream { status: u16, body: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response.
    #[error("failed to parse catalog response: {0}")]
    Parse(String),
}

/// A catalog that can resolve song identifiers.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Returns the name of this catalog implementation.
    fn name(&self) -> &str;

    /// Resolves `id` to artist, title and (if any) source link.
    async fn resolve(&self, id: SongId) -> Result<TrackMetadata, CatalogError>;
}
