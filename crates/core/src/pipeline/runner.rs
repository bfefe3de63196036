//! The karaoke pipeline runner.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::failure;
use super::{
    CompletedSong, FailureKind, PipelineOutcome, PipelineStage, SongRequest, StageFailure,
};
use crate::aligner::LyricsAligner;
use crate::artifacts::{ArtifactSet, Workspace};
use crate::catalog::{SongId, TrackCatalog, TrackMetadata};
use crate::config::Config;
use crate::events::{EventHandle, PipelineEvent};
use crate::fetcher::{MediaFetcher, StreamKind};
use crate::lyrics::{fetch_lyrics, LyricsSource};
use crate::metrics;
use crate::muxer::{MediaMuxer, MuxJob};
use crate::separator::StemSeparator;

/// The external collaborators of a pipeline.
#[derive(Clone)]
pub struct PipelineComponents {
    pub catalog: Arc<dyn TrackCatalog>,
    pub lyrics: Arc<dyn LyricsSource>,
    pub fetcher: Arc<dyn MediaFetcher>,
    pub separator: Arc<dyn StemSeparator>,
    pub muxer: Arc<dyn MediaMuxer>,
    pub aligner: Arc<dyn LyricsAligner>,
}

/// Turns a song identifier into a karaoke video and subtitle.
///
/// Stages run strictly in order and nothing is retried. Every stage is
/// bounded by its configured deadline and by the run's cancellation token.
/// The pipeline keeps no state between runs, so one instance can serve any
/// number of concurrent requests.
#[derive(Clone)]
pub struct KaraokePipeline {
    config: Arc<Config>,
    components: PipelineComponents,
    events: Option<EventHandle>,
}

/// Per-run context.
struct Run {
    id: String,
    cancel: CancellationToken,
}

impl KaraokePipeline {
    pub fn new(config: Config, components: PipelineComponents) -> Self {
        Self {
            config: Arc::new(config),
            components,
            events: None,
        }
    }

    /// Sets the event handle stage transitions are reported to.
    pub fn with_events(mut self, events: EventHandle) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Processes one song to completion.
    pub async fn process_song(&self, request: impl Into<SongRequest>) -> PipelineOutcome {
        self.process_song_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Processes one song, giving up with [`FailureKind::Cancelled`] as soon
    /// as `cancel` fires.
    pub async fn process_song_with_cancel(
        &self,
        request: impl Into<SongRequest>,
        cancel: CancellationToken,
    ) -> PipelineOutcome {
        let request = request.into();
        let run = Run {
            id: Uuid::new_v4().to_string(),
            cancel,
        };
        let start = Instant::now();

        info!(run_id = %run.id, "Processing song {}", request);
        metrics::PIPELINE_RUNS_ACTIVE.inc();

        let outcome = match self.execute(&run, &request).await {
            Ok(song) => PipelineOutcome::Success(song),
            Err(failure) => PipelineOutcome::Failure(failure),
        };

        metrics::PIPELINE_RUNS_ACTIVE.dec();
        metrics::PIPELINE_RUNS
            .with_label_values(&[outcome.label()])
            .inc();

        let duration_ms = start.elapsed().as_millis() as u64;
        let event = match &outcome {
            PipelineOutcome::Success(song) => PipelineEvent::PipelineCompleted {
                run_id: run.id.clone(),
                artist: song.artist.clone(),
                title: song.title.clone(),
                final_output: song.final_output.clone(),
                subtitle: song.subtitle.clone(),
                duration_ms,
            },
            PipelineOutcome::Failure(failure) => PipelineEvent::PipelineFailed {
                run_id: run.id.clone(),
                stage: failure.stage,
                kind: failure.kind,
                duration_ms,
            },
        };
        self.emit(event).await;

        outcome
    }

    async fn execute(
        &self,
        run: &Run,
        request: &SongRequest,
    ) -> Result<CompletedSong, StageFailure> {
        let components = &self.components;

        let (song_id, metadata) = self
            .stage(run, PipelineStage::ResolvingMetadata, async {
                let song_id = request.song_id().map_err(failure::invalid_identifier)?;
                let metadata = components
                    .catalog
                    .resolve(song_id)
                    .await
                    .map_err(|e| failure::catalog(song_id, e))?;
                Ok((song_id, metadata))
            })
            .await?;

        let locator = self
            .stage(run, PipelineStage::ValidatingSource, async {
                metadata
                    .source_locator
                    .clone()
                    .ok_or_else(|| failure::no_playable_source(&metadata))
            })
            .await?;

        let lyrics = self
            .stage(run, PipelineStage::FetchingLyrics, async {
                fetch_lyrics(
                    components.lyrics.as_ref(),
                    &metadata.artist,
                    &metadata.title,
                )
                .await
                .map_err(|e| failure::lyrics(&metadata, e))
            })
            .await?;

        let workspace = Workspace::new(
            &self.config.output.dir,
            self.config.output.isolate_requests,
        );
        let result = self
            .produce(run, &workspace, song_id, &metadata, &locator, &lyrics)
            .await;
        workspace.discard().await;
        result
    }

    /// Download through finalize, inside `workspace`.
    async fn produce(
        &self,
        run: &Run,
        workspace: &Workspace,
        song_id: SongId,
        metadata: &TrackMetadata,
        locator: &str,
        lyrics: &str,
    ) -> Result<CompletedSong, StageFailure> {
        let components = &self.components;
        let artifacts = ArtifactSet::derive(workspace.dir(), &metadata.artist, &metadata.title);
        debug!(run_id = %run.id, "Artifacts in {:?} as {:?}", artifacts.dir, artifacts.base_name);

        self.stage(run, PipelineStage::Downloading, async {
            workspace.prepare().await.map_err(|e| {
                failure::io(PipelineStage::Downloading, "prepare working directory", e)
            })?;
            let video = components
                .fetcher
                .fetch(locator, StreamKind::VideoOnly, &artifacts.video)
                .await
                .map_err(failure::download)?;
            let audio = components
                .fetcher
                .fetch(locator, StreamKind::AudioOnly, &artifacts.audio)
                .await
                .map_err(failure::download)?;
            debug!(run_id = %run.id, "Downloaded {} bytes video, {} bytes audio", video, audio);
            Ok(())
        })
        .await?;

        let stems = self
            .stage(run, PipelineStage::Separating, async {
                components
                    .separator
                    .separate(&artifacts.audio, &artifacts.dir)
                    .await
                    .map_err(failure::separation)
            })
            .await?;

        let job = MuxJob {
            video: artifacts.video.clone(),
            instruments: stems.instruments.clone(),
            vocals: stems.vocals.clone(),
            audio: artifacts.audio.clone(),
            output: artifacts.final_output.clone(),
        };
        self.stage(run, PipelineStage::Muxing, async {
            components.muxer.mux(&job).await.map_err(failure::mux)?;
            for path in [&job.video, &job.vocals, &job.instruments] {
                self.delete_artifact(run, path).await;
            }
            Ok(())
        })
        .await?;

        let subtitle = self
            .stage(run, PipelineStage::Aligning, async {
                let audio = tokio::fs::read(&artifacts.audio).await.map_err(|e| {
                    failure::io(PipelineStage::Aligning, "read audio for alignment", e)
                })?;
                let document = components
                    .aligner
                    .align(lyrics, audio, &artifacts.audio_file_name())
                    .await
                    .map_err(failure::alignment)?;
                self.delete_artifact(run, &artifacts.audio).await;
                Ok(document)
            })
            .await?;

        let (final_output, subtitle_path) = self
            .stage(run, PipelineStage::Finalizing, async {
                tokio::fs::write(&artifacts.subtitle, &subtitle)
                    .await
                    .map_err(|e| failure::io(PipelineStage::Finalizing, "write subtitle", e))?;
                workspace.promote(&artifacts).await.map_err(|e| {
                    failure::io(PipelineStage::Finalizing, "move deliverables into place", e)
                })
            })
            .await?;

        Ok(CompletedSong {
            song_id,
            artist: metadata.artist.clone(),
            title: metadata.title.clone(),
            final_output,
            subtitle: subtitle_path,
        })
    }

    /// Runs one stage under its deadline and the run's cancellation token,
    /// reporting the transition as events and metrics.
    async fn stage<T, F>(
        &self,
        run: &Run,
        stage: PipelineStage,
        work: F,
    ) -> Result<T, StageFailure>
    where
        F: Future<Output = Result<T, StageFailure>>,
    {
        self.emit(PipelineEvent::StageStarted {
            run_id: run.id.clone(),
            stage,
        })
        .await;
        let start = Instant::now();

        let deadline = self.deadline(stage);
        let bounded = async {
            match deadline {
                Some(limit) => match tokio::time::timeout(limit, work).await {
                    Ok(result) => result,
                    Err(_) => Err(StageFailure::new(
                        stage,
                        FailureKind::Timeout,
                        format!("Stage {} timed out after {}s", stage, limit.as_secs()),
                    )),
                },
                None => work.await,
            }
        };

        let result = tokio::select! {
            biased;
            _ = run.cancel.cancelled() => Err(StageFailure::new(
                stage,
                FailureKind::Cancelled,
                format!("Cancelled during {}", stage),
            )),
            result = bounded => result,
        };

        let elapsed = start.elapsed();
        match &result {
            Ok(_) => {
                metrics::STAGE_DURATION
                    .with_label_values(&[stage.as_str(), "success"])
                    .observe(elapsed.as_secs_f64());
                self.emit(PipelineEvent::StageCompleted {
                    run_id: run.id.clone(),
                    stage,
                    duration_ms: elapsed.as_millis() as u64,
                })
                .await;
            }
            Err(failure) => {
                metrics::STAGE_DURATION
                    .with_label_values(&[stage.as_str(), "failure"])
                    .observe(elapsed.as_secs_f64());
                self.emit_stage_failed(run, failure).await;
            }
        }

        result
    }

    /// Deadline for `stage`. Local bookkeeping stages are unbounded.
    fn deadline(&self, stage: PipelineStage) -> Option<Duration> {
        let timeouts = &self.config.timeouts;
        let secs = match stage {
            PipelineStage::ResolvingMetadata => timeouts.metadata_secs,
            PipelineStage::FetchingLyrics => timeouts.lyrics_secs,
            PipelineStage::Downloading => timeouts.download_secs,
            PipelineStage::Separating => timeouts.separation_secs,
            PipelineStage::Muxing => timeouts.mux_secs,
            PipelineStage::Aligning => timeouts.alignment_secs,
            PipelineStage::ValidatingSource | PipelineStage::Finalizing => return None,
        };
        Some(Duration::from_secs(secs))
    }

    /// Removes an intermediate artifact. A file that cannot be removed is
    /// logged and left behind.
    async fn delete_artifact(&self, run: &Run, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                self.emit(PipelineEvent::ArtifactDeleted {
                    run_id: run.id.clone(),
                    path: PathBuf::from(path),
                })
                .await;
            }
            Err(e) => warn!(run_id = %run.id, "Failed to delete {:?}: {}", path, e),
        }
    }

    async fn emit_stage_failed(&self, run: &Run, failure: &StageFailure) {
        self.emit(PipelineEvent::StageFailed {
            run_id: run.id.clone(),
            stage: failure.stage,
            kind: failure.kind,
            error: failure.to_string(),
        })
        .await;
    }

    async fn emit(&self, event: PipelineEvent) {
        if let Some(events) = &self.events {
            events.emit(event).await;
        }
    }
}
