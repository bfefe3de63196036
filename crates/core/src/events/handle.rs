use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::PipelineEvent;

/// Envelope wrapping a pipeline event with its emission time
#[derive(Debug, Clone)]
pub struct PipelineEventEnvelope {
    pub timestamp: DateTime<Utc>,
    pub event: PipelineEvent,
}

/// Handle for emitting pipeline events
///
/// Cheaply cloneable; every run holds one. A full or closed channel is
/// logged and otherwise ignored, it never fails the run.
#[derive(Clone)]
pub struct EventHandle {
    tx: mpsc::Sender<PipelineEventEnvelope>,
}

impl EventHandle {
    pub fn new(tx: mpsc::Sender<PipelineEventEnvelope>) -> Self {
        Self { tx }
    }

    /// Emit an event, waiting for channel capacity
    pub async fn emit(&self, event: PipelineEvent) {
        let envelope = PipelineEventEnvelope {
            timestamp: Utc::now(),
            event,
        };
        if let Err(e) = self.tx.send(envelope).await {
            tracing::error!("Failed to emit pipeline event: {}", e);
        }
    }
}
