//! Song processing pipeline.
//!
//! ```text
//! metadata -> source check -> lyrics -> download -> separate -> mux -> align -> finalize
//! ```
//!
//! Each request runs the stages in order inside a [`Workspace`], and ends in
//! exactly one [`PipelineOutcome`].
//!
//! [`Workspace`]: crate::artifacts::Workspace

mod failure;
mod runner;
mod types;

pub use runner::{KaraokePipeline, PipelineComponents};
pub use types::{
    CompletedSong, FailureKind, PipelineOutcome, PipelineStage, SongRequest, StageFailure,
};
