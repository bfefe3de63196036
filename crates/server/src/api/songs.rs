//! Song processing endpoint.
//!
//! `GET|POST /api/v1/songs/{id}` runs the whole pipeline and answers once it
//! is done. Classified failures get a plain text message with a specific
//! status; anything else is a 500 with the raw diagnostic as JSON.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use karaokify_core::pipeline::{FailureKind, PipelineOutcome, PipelineStage, StageFailure};

use crate::state::AppState;

/// Body of an unclassified failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub stage: PipelineStage,
    pub kind: FailureKind,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<StageFailure> for ErrorResponse {
    fn from(failure: StageFailure) -> Self {
        Self {
            stage: failure.stage,
            kind: failure.kind,
            error: failure.message,
            detail: failure.detail,
        }
    }
}

pub async fn process_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    // Run detached so a client hanging up does not abort the run; only
    // server shutdown does.
    let pipeline = state.pipeline().clone();
    let cancel = state.shutdown_token().child_token();
    let run = tokio::spawn(async move { pipeline.process_song_with_cancel(id, cancel).await });

    match run.await {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => {
            error!("Pipeline task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Maps a pipeline outcome to an HTTP response.
pub fn outcome_response(outcome: PipelineOutcome) -> Response {
    let status = StatusCode::from_u16(outcome.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match outcome {
        PipelineOutcome::Success(song) => (status, song.message()).into_response(),
        PipelineOutcome::Failure(failure) if failure.kind.is_classified() => {
            (status, failure.message).into_response()
        }
        PipelineOutcome::Failure(failure) => {
            (status, Json(ErrorResponse::from(failure))).into_response()
        }
    }
}
