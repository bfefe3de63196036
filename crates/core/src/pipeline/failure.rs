//! Converts component errors into stage failures.

use std::fmt::Display;

use super::{FailureKind, PipelineStage, StageFailure};
use crate::aligner::AlignmentError;
use crate::catalog::{CatalogError, InvalidSongId, SongId, TrackMetadata};
use crate::fetcher::FetchError;
use crate::lyrics::LyricsError;
use crate::muxer::MuxError;
use crate::separator::SeparationError;
use crate::tool::ToolError;

/// Error text plus the tool's stderr tail, if any.
fn describe(error: &dyn Display, tool: Option<&ToolError>) -> String {
    match tool.and_then(ToolError::stderr) {
        Some(stderr) => format!("{}\n{}", error, stderr),
        None => error.to_string(),
    }
}

pub(crate) fn invalid_identifier(error: InvalidSongId) -> StageFailure {
    StageFailure::new(
        PipelineStage::ResolvingMetadata,
        FailureKind::InvalidIdentifier,
        format!("Song ID {:?} is not a valid identifier.", error.0),
    )
    .with_detail(error)
}

pub(crate) fn catalog(id: SongId, error: CatalogError) -> StageFailure {
    let stage = PipelineStage::ResolvingMetadata;
    match error {
        CatalogError::Unauthorized { ref api_key } => StageFailure::new(
            stage,
            FailureKind::CredentialInvalid,
            format!(
                "Genius API Key is Invalid: {}\nPlease provide a valid key through KARAOKIFY_CATALOG__API_KEY",
                api_key
            ),
        ),
        CatalogError::NotFound(id) => StageFailure::new(
            stage,
            FailureKind::TrackNotFound,
            format!("Song with ID {} not found.", id),
        ),
        other => StageFailure::new(
            stage,
            FailureKind::Unclassified,
            format!("Failed to resolve song {}", id),
        )
        .with_detail(other),
    }
}

pub(crate) fn no_playable_source(metadata: &TrackMetadata) -> StageFailure {
    StageFailure::new(
        PipelineStage::ValidatingSource,
        FailureKind::NoPlayableSource,
        format!(
            "No YouTube link available for {}. Unable to continue.",
            metadata.display_name()
        ),
    )
}

pub(crate) fn lyrics(metadata: &TrackMetadata, error: LyricsError) -> StageFailure {
    let stage = PipelineStage::FetchingLyrics;
    match error {
        LyricsError::NotFound { .. } => StageFailure::new(
            stage,
            FailureKind::LyricsNotFound,
            format!("Lyrics for {} not found.", metadata.display_name()),
        ),
        other => StageFailure::new(
            stage,
            FailureKind::Unclassified,
            format!("Failed to fetch lyrics for {}", metadata.display_name()),
        )
        .with_detail(other),
    }
}

pub(crate) fn download(error: FetchError) -> StageFailure {
    let tool = match &error {
        FetchError::Tool(tool) => Some(tool),
        _ => None,
    };
    let detail = describe(&error, tool);
    StageFailure::new(
        PipelineStage::Downloading,
        FailureKind::DownloadFailure,
        "Failed to download source media",
    )
    .with_detail(detail)
}

pub(crate) fn separation(error: SeparationError) -> StageFailure {
    let tool = match &error {
        SeparationError::Tool(tool) => Some(tool),
        _ => None,
    };
    let detail = describe(&error, tool);
    StageFailure::new(
        PipelineStage::Separating,
        FailureKind::SeparationFailure,
        "Failed to separate vocals from instruments",
    )
    .with_detail(detail)
}

pub(crate) fn mux(error: MuxError) -> StageFailure {
    let tool = match &error {
        MuxError::Tool(tool) => Some(tool),
        _ => None,
    };
    let detail = describe(&error, tool);
    StageFailure::new(
        PipelineStage::Muxing,
        FailureKind::MuxFailure,
        "Failed to mux karaoke video",
    )
    .with_detail(detail)
}

pub(crate) fn alignment(error: AlignmentError) -> StageFailure {
    StageFailure::new(
        PipelineStage::Aligning,
        FailureKind::AlignmentFailure,
        "Failed to align lyrics",
    )
    .with_detail(error)
}

pub(crate) fn io(stage: PipelineStage, action: &str, error: std::io::Error) -> StageFailure {
    StageFailure::new(stage, FailureKind::Unclassified, format!("Failed to {}", action))
        .with_detail(error)
}
