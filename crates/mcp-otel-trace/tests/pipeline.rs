//! Pipeline lifecycle tests. These run in their own process so the global
//! tracer provider they install cannot leak into other test binaries.

use mcp_otel_trace::{TelemetryConfig, TelemetryPipeline};

#[tokio::test(flavor = "multi_thread")]
async fn start_runs_the_pipeline_at_most_once() {
    let mut pipeline = TelemetryPipeline::new();
    assert!(!pipeline.started());

    let config = TelemetryConfig::default();
    assert!(pipeline.start(&config));
    assert!(pipeline.started());

    // Repeated registration attempts are no-ops.
    assert!(!pipeline.start(&config));
    assert!(pipeline.started());

    pipeline.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn start_failure_is_swallowed_and_not_retried() {
    let mut pipeline = TelemetryPipeline::new();
    let mut config = TelemetryConfig::default();
    config.otlp.endpoint = "not a valid endpoint".to_string();

    // The flag flips even when assembly fails, so nothing retries.
    assert!(pipeline.start(&config));
    assert!(!pipeline.start(&config));

    pipeline.shutdown();
}
