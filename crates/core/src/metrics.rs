//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Pipeline runs (outcomes, stage durations)
//! - External services (catalog, lyrics, downloader, separator, muxer, aligner)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Pipeline runs by outcome.
pub static PIPELINE_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("karaokify_pipeline_runs_total", "Total pipeline runs"),
        &["outcome"], // "success" or a failure kind
    )
    .unwrap()
});

/// Pipeline runs currently executing.
pub static PIPELINE_RUNS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "karaokify_pipeline_runs_active",
        "Number of pipeline runs in progress",
    )
    .unwrap()
});

/// Stage duration in seconds.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "karaokify_stage_duration_seconds",
            "Duration of pipeline stages",
        )
        .buckets(vec![
            0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0,
        ]),
        &["stage", "result"], // result: "success", "failure"
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "karaokify_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Records one call to an external service or tool.
pub fn record_external_call(service: &str, operation: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    EXTERNAL_SERVICE_REQUESTS
        .with_label_values(&[service, operation, status])
        .inc();
}

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Pipeline
        Box::new(PIPELINE_RUNS.clone()),
        Box::new(PIPELINE_RUNS_ACTIVE.clone()),
        Box::new(STAGE_DURATION.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
