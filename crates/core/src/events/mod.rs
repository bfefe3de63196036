//! Structured pipeline events.
//!
//! The pipeline never logs stage transitions itself; it emits
//! [`PipelineEvent`]s through an [`EventHandle`] and leaves rendering to
//! whoever holds the receiving end ([`EventLogger`] in the server).

mod handle;
mod logger;

pub use handle::*;
pub use logger::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pipeline::{FailureKind, PipelineStage};

/// Events emitted by a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    StageStarted {
        run_id: String,
        stage: PipelineStage,
    },
    StageCompleted {
        run_id: String,
        stage: PipelineStage,
        duration_ms: u64,
    },
    StageFailed {
        run_id: String,
        stage: PipelineStage,
        kind: FailureKind,
        error: String,
    },
    PipelineCompleted {
        run_id: String,
        artist: String,
        title: String,
        final_output: PathBuf,
        subtitle: PathBuf,
        duration_ms: u64,
    },
    PipelineFailed {
        run_id: String,
        stage: PipelineStage,
        kind: FailureKind,
        duration_ms: u64,
    },
    /// An intermediate artifact was removed.
    ArtifactDeleted { run_id: String, path: PathBuf },
}

impl PipelineEvent {
    /// Run this event belongs to.
    pub fn run_id(&self) -> &str {
        match self {
            Self::StageStarted { run_id, .. }
            | Self::StageCompleted { run_id, .. }
            | Self::StageFailed { run_id, .. }
            | Self::PipelineCompleted { run_id, .. }
            | Self::PipelineFailed { run_id, .. }
            | Self::ArtifactDeleted { run_id, .. } => run_id,
        }
    }
}
