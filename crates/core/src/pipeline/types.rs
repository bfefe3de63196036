//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::catalog::SongId;

/// A request to turn one song into a karaoke track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SongRequest {
    /// Numeric identifier.
    Id(u64),
    /// Identifier as received, e.g. a path segment.
    Raw(String),
}

impl SongRequest {
    /// Parses the identifier. Strings are trimmed and must be an unsigned
    /// integer.
    pub fn song_id(&self) -> Result<SongId, crate::catalog::InvalidSongId> {
        match self {
            Self::Id(id) => Ok(SongId(*id)),
            Self::Raw(raw) => raw.parse(),
        }
    }
}

impl From<u64> for SongRequest {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<SongId> for SongRequest {
    fn from(id: SongId) -> Self {
        Self::Id(id.0)
    }
}

impl From<&str> for SongRequest {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for SongRequest {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl fmt::Display for SongRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    ResolvingMetadata,
    ValidatingSource,
    FetchingLyrics,
    Downloading,
    Separating,
    Muxing,
    Aligning,
    /// Writing the subtitle and moving deliverables into place.
    Finalizing,
}

impl PipelineStage {
    /// All stages, in order.
    pub const ALL: [PipelineStage; 8] = [
        Self::ResolvingMetadata,
        Self::ValidatingSource,
        Self::FetchingLyrics,
        Self::Downloading,
        Self::Separating,
        Self::Muxing,
        Self::Aligning,
        Self::Finalizing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResolvingMetadata => "resolving_metadata",
            Self::ValidatingSource => "validating_source",
            Self::FetchingLyrics => "fetching_lyrics",
            Self::Downloading => "downloading",
            Self::Separating => "separating",
            Self::Muxing => "muxing",
            Self::Aligning => "aligning",
            Self::Finalizing => "finalizing",
        }
    }

    /// The stage that follows this one, `None` for the last.
    pub fn next(&self) -> Option<PipelineStage> {
        let index = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidIdentifier,
    CredentialInvalid,
    TrackNotFound,
    NoPlayableSource,
    LyricsNotFound,
    DownloadFailure,
    SeparationFailure,
    MuxFailure,
    AlignmentFailure,
    Timeout,
    Cancelled,
    Unclassified,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid_identifier",
            Self::CredentialInvalid => "credential_invalid",
            Self::TrackNotFound => "track_not_found",
            Self::NoPlayableSource => "no_playable_source",
            Self::LyricsNotFound => "lyrics_not_found",
            Self::DownloadFailure => "download_failure",
            Self::SeparationFailure => "separation_failure",
            Self::MuxFailure => "mux_failure",
            Self::AlignmentFailure => "alignment_failure",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::Unclassified => "unclassified",
        }
    }

    /// HTTP status reported for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidIdentifier => 400,
            Self::CredentialInvalid => 401,
            Self::TrackNotFound | Self::LyricsNotFound => 404,
            Self::NoPlayableSource => 406,
            Self::Timeout => 504,
            _ => 500,
        }
    }

    /// Classified failures are answered with a plain message; everything
    /// else with the raw diagnostic.
    pub fn is_classified(&self) -> bool {
        self.status_code() != 500
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure attributed to one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: PipelineStage,
    pub kind: FailureKind,
    /// Human readable message.
    pub message: String,
    /// Underlying error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StageFailure {
    pub fn new(stage: PipelineStage, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({}): {}", self.stage, self.kind, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for StageFailure {}

/// Deliverables of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSong {
    pub song_id: SongId,
    pub artist: String,
    pub title: String,
    pub final_output: PathBuf,
    pub subtitle: PathBuf,
}

impl CompletedSong {
    pub fn message(&self) -> String {
        format!(
            "{} - {} is ready to sing! Please refresh your library!",
            self.artist, self.title
        )
    }
}

/// Result of one run. A run either completes every stage or reports exactly
/// one failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Success(CompletedSong),
    Failure(StageFailure),
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// HTTP status for this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure(failure) => failure.kind.status_code(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Success(song) => song.message(),
            Self::Failure(failure) => failure.message.clone(),
        }
    }

    /// Label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Failure(failure) => failure.kind.as_str(),
        }
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
