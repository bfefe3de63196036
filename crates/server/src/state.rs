use karaokify_core::{Config, KaraokePipeline, SanitizedConfig};
use tokio_util::sync::CancellationToken;

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: KaraokePipeline,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, pipeline: KaraokePipeline, shutdown: CancellationToken) -> Self {
        Self {
            config,
            pipeline,
            shutdown,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &KaraokePipeline {
        &self.pipeline
    }

    /// Token cancelled when the server shuts down. Every pipeline run gets a
    /// child of it.
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}
