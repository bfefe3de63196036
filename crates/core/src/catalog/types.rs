//! Types shared by catalog implementations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Catalog identifier of a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub u64);

/// A string identifier that is not a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid song identifier: {0:?}")]
pub struct InvalidSongId(pub String);

impl FromStr for SongId {
    type Err = InvalidSongId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(SongId)
            .map_err(|_| InvalidSongId(s.to_string()))
    }
}

impl From<u64> for SongId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the catalog knows about a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Primary artist name. Never empty.
    pub artist: String,
    /// Track title. Never empty.
    pub title: String,
    /// Link to a playable source, if the catalog lists one from the
    /// configured provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_locator: Option<String>,
}

impl TrackMetadata {
    /// `"{artist} - {title}"`, as used in user-facing messages.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}
