use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{EventHandle, PipelineEvent, PipelineEventEnvelope};

/// Background task that renders pipeline events through `tracing`
pub struct EventLogger {
    rx: mpsc::Receiver<PipelineEventEnvelope>,
}

impl EventLogger {
    pub fn new(rx: mpsc::Receiver<PipelineEventEnvelope>) -> Self {
        Self { rx }
    }

    /// Consume events until every handle is dropped
    ///
    /// Spawn with `tokio::spawn(logger.run())`.
    pub async fn run(mut self) {
        info!("Event logger started");

        while let Some(envelope) = self.rx.recv().await {
            render(&envelope);
        }

        info!("Event logger shutting down");
    }
}

fn render(envelope: &PipelineEventEnvelope) {
    match &envelope.event {
        PipelineEvent::StageStarted { run_id, stage } => {
            info!(run_id = %run_id, stage = %stage, "Stage started");
        }
        PipelineEvent::StageCompleted {
            run_id,
            stage,
            duration_ms,
        } => {
            info!(run_id = %run_id, stage = %stage, duration_ms, "Stage completed");
        }
        PipelineEvent::StageFailed {
            run_id,
            stage,
            kind,
            error,
        } => {
            warn!(run_id = %run_id, stage = %stage, kind = %kind, error = %error, "Stage failed");
        }
        PipelineEvent::PipelineCompleted {
            run_id,
            artist,
            title,
            final_output,
            duration_ms,
            ..
        } => {
            info!(
                run_id = %run_id,
                output = %final_output.display(),
                duration_ms,
                "{} - {} is ready",
                artist,
                title
            );
        }
        PipelineEvent::PipelineFailed {
            run_id,
            stage,
            kind,
            duration_ms,
        } => {
            warn!(run_id = %run_id, stage = %stage, kind = %kind, duration_ms, "Pipeline failed");
        }
        PipelineEvent::ArtifactDeleted { run_id, path } => {
            debug!(run_id = %run_id, path = %path.display(), "Artifact deleted");
        }
    }
}

/// Create a complete event system
///
/// Returns:
/// - `EventHandle` - pass to the pipeline (clone to share)
/// - `EventLogger` - spawn as a background task with `tokio::spawn(logger.run())`
pub fn create_event_system(buffer_size: usize) -> (EventHandle, EventLogger) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (EventHandle::new(tx), EventLogger::new(rx))
}
