//! Pipeline lifecycle integration tests.
//!
//! These tests drive the full pipeline with mock collaborators:
//! - Successful runs and the exact deliverables they leave behind
//! - Early exits (bad id, bad credential, unknown track, no source, no lyrics)
//! - Intermediate artifact lifecycle
//! - Stage failures, timeouts and cancellation
//! - Concurrent runs for the same track, shared and isolated

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use karaokify_core::{
    aligner::{AlignmentError, LyricsAligner},
    artifacts::ArtifactSet,
    events::{EventHandle, PipelineEvent},
    fetcher::StreamKind,
    muxer::MuxError,
    pipeline::{FailureKind, KaraokePipeline, PipelineOutcome, PipelineStage},
    testing::{fixtures, MockSuite, MOCK_SUBTITLE},
    tool::ToolError,
    Config, SongId,
};

/// Test helper holding a pipeline wired to mocks.
struct TestHarness {
    pipeline: KaraokePipeline,
    mocks: MockSuite,
    output: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let output = TempDir::new().expect("Failed to create output dir");
        Self::with_config(fixtures::config(output.path()), output).await
    }

    async fn shared() -> Self {
        let output = TempDir::new().expect("Failed to create output dir");
        Self::with_config(fixtures::shared_config(output.path()), output).await
    }

    async fn with_config(config: Config, output: TempDir) -> Self {
        let mocks = MockSuite::new();
        mocks.catalog.add_track(12345, fixtures::track("A", "B")).await;
        mocks.lyrics.set_default_lyrics(fixtures::LYRICS).await;

        let pipeline = KaraokePipeline::new(config, mocks.components());
        Self {
            pipeline,
            mocks,
            output,
        }
    }

    fn dir(&self) -> &Path {
        self.output.path()
    }

    /// Regular files directly in the output directory, sorted.
    fn output_files(&self) -> Vec<String> {
        list_files(self.dir())
    }

    /// Entries left under the isolated working area.
    fn work_entries(&self) -> usize {
        match std::fs::read_dir(self.dir().join(".work")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn expect_failure(outcome: &PipelineOutcome) -> (PipelineStage, FailureKind) {
    match outcome {
        PipelineOutcome::Failure(failure) => (failure.stage, failure.kind),
        PipelineOutcome::Success(song) => panic!("expected failure, got success: {:?}", song),
    }
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_success_leaves_exactly_video_and_subtitle() {
    let h = TestHarness::new().await;

    let outcome = h.pipeline.process_song(12345).await;

    assert!(outcome.is_success(), "unexpected outcome: {:?}", outcome);
    assert_eq!(outcome.status_code(), 200);
    assert_eq!(
        outcome.message(),
        "A - B is ready to sing! Please refresh your library!"
    );
    assert_eq!(h.output_files(), vec!["A - B.ass", "A - B.mp4"]);
    assert_eq!(h.work_entries(), 0);

    let subtitle = std::fs::read(h.dir().join("A - B.ass")).unwrap();
    assert_eq!(subtitle, MOCK_SUBTITLE.as_bytes());

    match outcome {
        PipelineOutcome::Success(song) => {
            assert_eq!(song.song_id, SongId(12345));
            assert_eq!(song.final_output, h.dir().join("A - B.mp4"));
            assert_eq!(song.subtitle, h.dir().join("A - B.ass"));
        }
        PipelineOutcome::Failure(_) => unreachable!(),
    }
}

#[tokio::test]
async fn test_success_in_shared_mode() {
    let h = TestHarness::shared().await;

    let outcome = h.pipeline.process_song(12345).await;

    assert!(outcome.is_success(), "unexpected outcome: {:?}", outcome);
    assert_eq!(h.output_files(), vec!["A - B.ass", "A - B.mp4"]);
    assert!(!h.dir().join(".work").exists());
}

#[tokio::test]
async fn test_string_identifier_is_trimmed_and_parsed() {
    let h = TestHarness::new().await;

    let outcome = h.pipeline.process_song(" 12345 ").await;

    assert!(outcome.is_success(), "unexpected outcome: {:?}", outcome);
    assert_eq!(h.mocks.catalog.recorded_calls().await, vec![SongId(12345)]);
}

#[tokio::test]
async fn test_both_streams_downloaded_from_source() {
    let h = TestHarness::shared().await;

    h.pipeline.process_song(12345).await;

    let fetches = h.mocks.fetcher.recorded_fetches().await;
    assert_eq!(fetches.len(), 2);
    assert_eq!(fetches[0].kind, StreamKind::VideoOnly);
    assert_eq!(fetches[0].dest, h.dir().join("A - B.mov"));
    assert_eq!(fetches[1].kind, StreamKind::AudioOnly);
    assert_eq!(fetches[1].dest, h.dir().join("A - B.webm"));
    assert!(fetches.iter().all(|f| f.locator == fixtures::SOURCE_URL));
}

// =============================================================================
// Early exits
// =============================================================================

#[tokio::test]
async fn test_unknown_identifier_halts_before_download() {
    let h = TestHarness::new().await;

    let outcome = h.pipeline.process_song(999).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::ResolvingMetadata, FailureKind::TrackNotFound)
    );
    assert_eq!(outcome.status_code(), 404);
    assert_eq!(outcome.message(), "Song with ID 999 not found.");
    assert_eq!(h.mocks.fetcher.fetch_count().await, 0);
    assert!(h.mocks.lyrics.recorded_searches().await.is_empty());
}

#[tokio::test]
async fn test_rejected_credential_reported_before_any_other_stage() {
    let h = TestHarness::new().await;
    h.mocks.catalog.reject_api_key("test-api-key").await;

    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::ResolvingMetadata, FailureKind::CredentialInvalid)
    );
    assert_eq!(outcome.status_code(), 401);
    assert!(outcome.message().contains("test-api-key"));
    assert!(h.mocks.lyrics.recorded_searches().await.is_empty());
    assert_eq!(h.mocks.tool_invocations().await, 0);
    assert_eq!(h.mocks.aligner.call_count().await, 0);
}

#[tokio::test]
async fn test_missing_source_halts_without_subprocesses() {
    let h = TestHarness::new().await;
    h.mocks
        .catalog
        .add_track(7, fixtures::track_without_source("C", "D"))
        .await;

    let outcome = h.pipeline.process_song(7).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::ValidatingSource, FailureKind::NoPlayableSource)
    );
    assert_eq!(outcome.status_code(), 406);
    assert_eq!(
        outcome.message(),
        "No YouTube link available for C - D. Unable to continue."
    );
    assert_eq!(h.mocks.tool_invocations().await, 0);
    assert!(h.output_files().is_empty());
}

#[tokio::test]
async fn test_missing_lyrics_halts_before_download() {
    let output = TempDir::new().unwrap();
    let mocks = MockSuite::new();
    mocks.catalog.add_track(12345, fixtures::track("A", "B")).await;
    let pipeline = KaraokePipeline::new(fixtures::config(output.path()), mocks.components());

    let outcome = pipeline.process_song(12345).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::FetchingLyrics, FailureKind::LyricsNotFound)
    );
    assert_eq!(outcome.status_code(), 404);
    assert_eq!(outcome.message(), "Lyrics for A - B not found.");
    assert_eq!(mocks.fetcher.fetch_count().await, 0);
}

#[tokio::test]
async fn test_blank_lyrics_count_as_missing() {
    let h = TestHarness::new().await;
    h.mocks.lyrics.add_lyrics("A", "B", "  \n ").await;

    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(expect_failure(&outcome).1, FailureKind::LyricsNotFound);
}

#[tokio::test]
async fn test_invalid_identifier_rejected_before_catalog() {
    let h = TestHarness::new().await;

    let outcome = h.pipeline.process_song("twelve").await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::ResolvingMetadata, FailureKind::InvalidIdentifier)
    );
    assert_eq!(outcome.status_code(), 400);
    assert_eq!(h.mocks.catalog.call_count().await, 0);
}

// =============================================================================
// Lyrics normalization
// =============================================================================

#[tokio::test]
async fn test_lyrics_reach_aligner_with_crlf() {
    let h = TestHarness::new().await;

    h.pipeline.process_song(12345).await;

    let requests = h.mocks.aligner.recorded_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].lyrics,
        "First line\r\nSecond line\r\n\r\nChorus line"
    );
    assert_eq!(requests[0].audio_file_name, "A - B.webm");
    assert_eq!(requests[0].audio, b"mock audio stream");
}

#[tokio::test]
async fn test_already_normalized_lyrics_pass_unchanged() {
    let h = TestHarness::new().await;
    h.mocks
        .lyrics
        .add_lyrics("A", "B", "First line\r\nSecond line")
        .await;

    h.pipeline.process_song(12345).await;

    let requests = h.mocks.aligner.recorded_requests().await;
    assert_eq!(requests[0].lyrics, "First line\r\nSecond line");
}

// =============================================================================
// Artifact lifecycle
// =============================================================================

/// Aligner that snapshots which artifacts exist when it is called.
struct InspectingAligner {
    artifacts: ArtifactSet,
    seen: tokio::sync::Mutex<Option<[bool; 5]>>,
}

#[async_trait]
impl LyricsAligner for InspectingAligner {
    fn name(&self) -> &str {
        "inspecting"
    }

    async fn align(&self, _: &str, _: Vec<u8>, _: &str) -> Result<Vec<u8>, AlignmentError> {
        let a = &self.artifacts;
        *self.seen.lock().await = Some([
            a.video.exists(),
            a.vocals_stem.exists(),
            a.instruments_stem.exists(),
            a.audio.exists(),
            a.final_output.exists(),
        ]);
        Ok(b"subs".to_vec())
    }
}

#[tokio::test]
async fn test_intermediates_deleted_after_mux_and_audio_after_alignment() {
    let output = TempDir::new().unwrap();
    let mocks = MockSuite::new();
    mocks.catalog.add_track(12345, fixtures::track("A", "B")).await;
    mocks.lyrics.set_default_lyrics(fixtures::LYRICS).await;

    let artifacts = ArtifactSet::derive(output.path(), "A", "B");
    let aligner = Arc::new(InspectingAligner {
        artifacts: artifacts.clone(),
        seen: tokio::sync::Mutex::new(None),
    });
    let mut components = mocks.components();
    components.aligner = aligner.clone();

    let pipeline = KaraokePipeline::new(fixtures::shared_config(output.path()), components);
    let outcome = pipeline.process_song(12345).await;
    assert!(outcome.is_success(), "unexpected outcome: {:?}", outcome);

    // video, vocals, instruments gone; audio and muxed output present
    let seen = aligner.seen.lock().await.expect("aligner was not called");
    assert_eq!(seen, [false, false, false, true, true]);

    assert!(!artifacts.audio.exists());
    assert!(artifacts.final_output.exists());
}

#[tokio::test]
async fn test_mux_received_all_four_inputs() {
    let h = TestHarness::shared().await;

    h.pipeline.process_song(12345).await;

    let jobs = h.mocks.muxer.recorded_jobs().await;
    assert_eq!(jobs.len(), 1);
    let expected = ArtifactSet::derive(h.dir(), "A", "B");
    assert_eq!(jobs[0].video, expected.video);
    assert_eq!(jobs[0].instruments, expected.instruments_stem);
    assert_eq!(jobs[0].vocals, expected.vocals_stem);
    assert_eq!(jobs[0].audio, expected.audio);
    assert_eq!(jobs[0].output, expected.final_output);
}

// =============================================================================
// Stage failures
// =============================================================================

#[tokio::test]
async fn test_download_failure() {
    let h = TestHarness::new().await;
    h.mocks.fetcher.fail_on(StreamKind::AudioOnly).await;

    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::Downloading, FailureKind::DownloadFailure)
    );
    assert_eq!(outcome.status_code(), 500);
    let detail = outcome.failure().unwrap().detail.clone().unwrap();
    assert!(detail.contains("Video unavailable"));
    assert_eq!(h.mocks.separator.call_count().await, 0);
    assert_eq!(h.work_entries(), 0);
}

#[tokio::test]
async fn test_missing_stem_is_separation_failure() {
    let h = TestHarness::new().await;
    h.mocks.separator.skip_vocals().await;

    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::Separating, FailureKind::SeparationFailure)
    );
    assert_eq!(h.mocks.muxer.call_count().await, 0);
    assert!(h.output_files().is_empty());
    assert_eq!(h.work_entries(), 0);
}

#[tokio::test]
async fn test_mux_failure() {
    let h = TestHarness::new().await;
    h.mocks
        .muxer
        .set_next_error(MuxError::Tool(ToolError::Failed {
            program: "ffmpeg".into(),
            code: Some(1),
            stderr: "Conversion failed!".to_string(),
        }))
        .await;

    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::Muxing, FailureKind::MuxFailure)
    );
    assert_eq!(h.mocks.aligner.call_count().await, 0);
    assert!(h.output_files().is_empty());
}

#[tokio::test]
async fn test_alignment_failure_leaves_no_deliverables() {
    let h = TestHarness::new().await;
    h.mocks
        .aligner
        .set_next_error(AlignmentError::Upstream {
            status: 500,
            message: "model crashed".to_string(),
        })
        .await;

    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::Aligning, FailureKind::AlignmentFailure)
    );
    assert!(h.output_files().is_empty());
    assert_eq!(h.work_entries(), 0);
}

#[tokio::test]
async fn test_shared_mode_keeps_artifacts_on_failure() {
    let h = TestHarness::shared().await;
    h.mocks
        .aligner
        .set_next_error(AlignmentError::EmptyDocument)
        .await;

    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(expect_failure(&outcome).1, FailureKind::AlignmentFailure);
    // Muxed output and audio stay where the failed run left them.
    assert_eq!(h.output_files(), vec!["A - B.mp4", "A - B.webm"]);
}

// =============================================================================
// Timeouts and cancellation
// =============================================================================

#[tokio::test]
async fn test_stage_timeout() {
    let output = TempDir::new().unwrap();
    let config = fixtures::config_with_timeout(output.path(), Duration::from_secs(1));
    let h = TestHarness::with_config(config, output).await;
    h.mocks.separator.set_delay(Duration::from_secs(10)).await;

    let start = Instant::now();
    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::Separating, FailureKind::Timeout)
    );
    assert_eq!(outcome.status_code(), 504);
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(h.mocks.muxer.call_count().await, 0);
    assert_eq!(h.work_entries(), 0);
}

#[tokio::test]
async fn test_cancellation() {
    let h = TestHarness::new().await;
    h.mocks.fetcher.set_delay(Duration::from_secs(10)).await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let outcome = h.pipeline.process_song_with_cancel(12345, token).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::Downloading, FailureKind::Cancelled)
    );
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(h.mocks.separator.call_count().await, 0);
}

#[tokio::test]
async fn test_already_cancelled_token_stops_at_first_stage() {
    let h = TestHarness::new().await;
    let token = CancellationToken::new();
    token.cancel();

    let outcome = h.pipeline.process_song_with_cancel(12345, token).await;

    assert_eq!(
        expect_failure(&outcome),
        (PipelineStage::ResolvingMetadata, FailureKind::Cancelled)
    );
    assert_eq!(h.mocks.catalog.call_count().await, 0);
}

#[tokio::test]
async fn test_blocked_subtitle_destination_publishes_nothing() {
    let h = TestHarness::new().await;
    std::fs::create_dir_all(h.dir().join("A - B.ass").join("occupied")).unwrap();

    let outcome = h.pipeline.process_song(12345).await;

    assert_eq!(expect_failure(&outcome).0, PipelineStage::Finalizing);
    assert!(!h.dir().join("A - B.mp4").exists());
    assert!(h.output_files().is_empty());
    assert_eq!(h.work_entries(), 0);
}

// =============================================================================
// Events
// =============================================================================

#[tokio::test]
async fn test_events_follow_stage_order() {
    let output = TempDir::new().unwrap();
    let mocks = MockSuite::new();
    mocks.catalog.add_track(12345, fixtures::track("A", "B")).await;
    mocks.lyrics.set_default_lyrics(fixtures::LYRICS).await;

    let (tx, mut rx) = mpsc::channel(256);
    let pipeline = KaraokePipeline::new(fixtures::config(output.path()), mocks.components())
        .with_events(EventHandle::new(tx));

    let outcome = pipeline.process_song(12345).await;
    assert!(outcome.is_success());
    drop(pipeline);

    let mut events = Vec::new();
    while let Some(envelope) = rx.recv().await {
        events.push(envelope.event);
    }

    let started: Vec<PipelineStage> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::StageStarted { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(started, PipelineStage::ALL.to_vec());

    let completed = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::StageCompleted { .. }))
        .count();
    assert_eq!(completed, PipelineStage::ALL.len());

    let deleted = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::ArtifactDeleted { .. }))
        .count();
    assert_eq!(deleted, 4);

    assert!(matches!(
        events.last(),
        Some(PipelineEvent::PipelineCompleted { .. })
    ));

    let run_id = events[0].run_id().to_string();
    assert!(events.iter().all(|e| e.run_id() == run_id));
}

#[tokio::test]
async fn test_failure_events() {
    let output = TempDir::new().unwrap();
    let mocks = MockSuite::new();

    let (tx, mut rx) = mpsc::channel(256);
    let pipeline = KaraokePipeline::new(fixtures::config(output.path()), mocks.components())
        .with_events(EventHandle::new(tx));

    pipeline.process_song(1).await;
    drop(pipeline);

    let mut events = Vec::new();
    while let Some(envelope) = rx.recv().await {
        events.push(envelope.event);
    }

    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], PipelineEvent::StageStarted { .. }));
    assert!(matches!(
        events[1],
        PipelineEvent::StageFailed {
            kind: FailureKind::TrackNotFound,
            ..
        }
    ));
    assert!(matches!(
        events[2],
        PipelineEvent::PipelineFailed {
            stage: PipelineStage::ResolvingMetadata,
            ..
        }
    ));
}

/// Runs one song with an event channel attached and returns every event.
async fn run_collecting_events(
    config: Config,
    mocks: &MockSuite,
    request: &str,
) -> (PipelineOutcome, Vec<PipelineEvent>) {
    let (tx, mut rx) = mpsc::channel(256);
    let pipeline =
        KaraokePipeline::new(config, mocks.components()).with_events(EventHandle::new(tx));

    let outcome = pipeline.process_song(request).await;
    drop(pipeline);

    let mut events = Vec::new();
    while let Some(envelope) = rx.recv().await {
        events.push(envelope.event);
    }
    (outcome, events)
}

#[tokio::test]
async fn test_invalid_identifier_events_are_paired() {
    let output = TempDir::new().unwrap();
    let mocks = MockSuite::new();

    let (outcome, events) =
        run_collecting_events(fixtures::config(output.path()), &mocks, "twelve").await;

    assert_eq!(outcome.status_code(), 400);
    assert_eq!(events.len(), 3);
    assert!(matches!(
        events[0],
        PipelineEvent::StageStarted {
            stage: PipelineStage::ResolvingMetadata,
            ..
        }
    ));
    assert!(matches!(
        events[1],
        PipelineEvent::StageFailed {
            stage: PipelineStage::ResolvingMetadata,
            kind: FailureKind::InvalidIdentifier,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unusable_output_dir_fails_inside_download_stage() {
    let temp = TempDir::new().unwrap();
    let blocked = temp.path().join("not-a-dir");
    std::fs::write(&blocked, b"file").unwrap();
    let mocks = MockSuite::new();
    mocks.catalog.add_track(12345, fixtures::track("A", "B")).await;
    mocks.lyrics.set_default_lyrics(fixtures::LYRICS).await;

    let (outcome, events) =
        run_collecting_events(fixtures::config(&blocked), &mocks, "12345").await;

    assert_eq!(expect_failure(&outcome).0, PipelineStage::Downloading);
    assert_eq!(mocks.fetcher.fetch_count().await, 0);

    let download_events: Vec<&PipelineEvent> = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                PipelineEvent::StageStarted {
                    stage: PipelineStage::Downloading,
                    ..
                } | PipelineEvent::StageFailed {
                    stage: PipelineStage::Downloading,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(download_events.len(), 2);
    assert!(matches!(download_events[0], PipelineEvent::StageStarted { .. }));
    assert!(matches!(download_events[1], PipelineEvent::StageFailed { .. }));
}

// =============================================================================
// Concurrency
// =============================================================================

/// With a shared output directory, two runs for the same track read, write
/// and delete the same paths. Which run wins depends on scheduling; at least
/// one always completes, and the loser fails on a file the winner removed.
#[tokio::test]
async fn test_concurrent_same_track_shares_paths_when_not_isolated() {
    let h = TestHarness::shared().await;
    h.mocks.separator.set_delay(Duration::from_millis(200)).await;

    let (first, second) = tokio::join!(
        h.pipeline.process_song(12345),
        h.pipeline.process_song(12345)
    );

    let jobs = h.mocks.muxer.recorded_jobs().await;
    assert!(!jobs.is_empty());
    assert!(jobs.iter().all(|job| job.output == h.dir().join("A - B.mp4")));

    let inputs = h.mocks.separator.recorded_inputs().await;
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0], inputs[1]);

    let outcomes = [first, second];
    assert!(outcomes.iter().any(PipelineOutcome::is_success));
    for outcome in &outcomes {
        if let PipelineOutcome::Failure(failure) = outcome {
            assert!(
                matches!(failure.stage, PipelineStage::Muxing | PipelineStage::Aligning),
                "unexpected failure: {}",
                failure
            );
        }
    }
    assert!(h.dir().join("A - B.mp4").exists());
}

#[tokio::test]
async fn test_concurrent_same_track_isolated() {
    let h = TestHarness::new().await;
    h.mocks.separator.set_delay(Duration::from_millis(200)).await;

    let (first, second) = tokio::join!(
        h.pipeline.process_song(12345),
        h.pipeline.process_song(12345)
    );

    assert!(first.is_success(), "unexpected outcome: {:?}", first);
    assert!(second.is_success(), "unexpected outcome: {:?}", second);

    let inputs = h.mocks.separator.recorded_inputs().await;
    assert_eq!(inputs.len(), 2);
    assert_ne!(inputs[0].parent(), inputs[1].parent());

    assert_eq!(h.output_files(), vec!["A - B.ass", "A - B.mp4"]);
    assert_eq!(h.work_entries(), 0);
}

#[tokio::test]
async fn test_concurrent_different_tracks_isolated() {
    let h = TestHarness::new().await;
    for (id, title) in [(1u64, "One"), (2, "Two"), (3, "Three")] {
        h.mocks.catalog.add_track(id, fixtures::track("Band", title)).await;
    }
    h.mocks.separator.set_delay(Duration::from_millis(100)).await;

    let outcomes =
        futures::future::join_all([1u64, 2, 3].map(|id| h.pipeline.process_song(id))).await;

    assert!(outcomes.iter().all(PipelineOutcome::is_success));
    assert_eq!(
        h.output_files(),
        vec![
            "Band - One.ass",
            "Band - One.mp4",
            "Band - Three.ass",
            "Band - Three.mp4",
            "Band - Two.ass",
            "Band - Two.mp4",
        ]
    );
    assert_eq!(h.work_entries(), 0);
}
