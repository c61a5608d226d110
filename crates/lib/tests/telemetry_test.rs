//! # Trace Export Tests
//!
//! Verifies that each `generate` call flushes one run record to the collector,
//! and that collector failures never fail the call itself.

use anyhow::Result;
use autoprompt::telemetry::TraceRecorder;
use autoprompt::{PromptPipeline, StaticDocument, TelemetryConfig};
use autoprompt_test_utils::{setup_tracing, MockAiProvider, SAMPLE_DOCUMENT};
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn telemetry_for(endpoint: String) -> TelemetryConfig {
    TelemetryConfig {
        endpoint,
        api_key: "ls-test".to_string(),
        project: "prompt-builder".to_string(),
        timeout: Duration::from_millis(500),
    }
}

fn pipeline_with(mock: &MockAiProvider, tracer: TraceRecorder) -> Result<PromptPipeline> {
    Ok(PromptPipeline::builder()
        .ai_provider(Box::new(mock.clone()))
        .document(StaticDocument::from_text(SAMPLE_DOCUMENT))
        .tracer(tracer)
        .build()?)
}

#[tokio::test]
async fn test_generate_flushes_one_run() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let collector = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/batch"))
        .and(header("x-api-key", "ls-test"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&collector)
        .await;

    let tracer = TraceRecorder::from_config(Some(&telemetry_for(collector.uri())))?;
    assert!(tracer.is_exporting());
    let mock = MockAiProvider::new();
    mock.add_response("generated template");
    let pipeline = pipeline_with(&mock, tracer.clone())?;

    // --- Act ---
    let reply = pipeline.generate("trace me").await?;

    // --- Assert ---
    assert_eq!(reply, "generated template");
    assert_eq!(tracer.pending(), 0);

    let requests = collector
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 1);
    let batch: Value = serde_json::from_slice(&requests[0].body)?;
    assert_eq!(batch["project"], "prompt-builder");
    let runs = batch["runs"].as_array().expect("runs array");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["model"], "mock-model");
    assert_eq!(runs[0]["output"], "generated template");
    assert!(runs[0]["error"].is_null());
    assert!(runs[0]["prompt"]
        .as_str()
        .unwrap_or_default()
        .contains("trace me"));
    Ok(())
}

#[tokio::test]
async fn test_failed_call_is_still_flushed() -> Result<()> {
    setup_tracing();
    let collector = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/batch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&collector)
        .await;

    let mock = MockAiProvider::new();
    mock.add_failure("upstream down");
    let tracer = TraceRecorder::from_config(Some(&telemetry_for(collector.uri())))?;
    let pipeline = pipeline_with(&mock, tracer)?;

    assert!(pipeline.generate("o").await.is_err());

    let requests = collector.received_requests().await.unwrap_or_default();
    let batch: Value = serde_json::from_slice(&requests[0].body)?;
    assert!(batch["runs"][0]["output"].is_null());
    assert!(batch["runs"][0]["error"]
        .as_str()
        .unwrap_or_default()
        .contains("upstream down"));
    Ok(())
}

#[tokio::test]
async fn test_collector_error_does_not_fail_generate() -> Result<()> {
    setup_tracing();
    let collector = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/batch"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&collector)
        .await;

    let mock = MockAiProvider::new();
    mock.add_response("still fine");
    let tracer = TraceRecorder::from_config(Some(&telemetry_for(collector.uri())))?;
    let pipeline = pipeline_with(&mock, tracer.clone())?;

    assert_eq!(pipeline.generate("o").await?, "still fine");
    assert_eq!(tracer.pending(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_collector_does_not_fail_generate() -> Result<()> {
    setup_tracing();
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let mock = MockAiProvider::new();
    mock.add_response("still fine");
    let tracer = TraceRecorder::from_config(Some(&telemetry_for(format!("http://{addr}/"))))?;
    let pipeline = pipeline_with(&mock, tracer)?;

    assert_eq!(pipeline.generate("o").await?, "still fine");
    Ok(())
}

#[tokio::test]
async fn test_hanging_collector_does_not_block_generate() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let collector = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/batch"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&collector)
        .await;

    let mock = MockAiProvider::new();
    mock.add_response("still fine");
    let tracer = TraceRecorder::from_config(Some(&telemetry_for(collector.uri())))?;
    let pipeline = pipeline_with(&mock, tracer.clone())?;

    // --- Act ---
    let reply = tokio::time::timeout(Duration::from_secs(5), pipeline.generate("o"))
        .await
        .expect("generate should return once the flush times out")?;

    // --- Assert ---
    assert_eq!(reply, "still fine");
    assert_eq!(tracer.pending(), 0);
    Ok(())
}

#[tokio::test]
async fn test_disabled_tracer_makes_no_requests() -> Result<()> {
    setup_tracing();
    let tracer = TraceRecorder::from_config(None)?;
    assert!(!tracer.is_exporting());

    let mock = MockAiProvider::new();
    let pipeline = pipeline_with(&mock, tracer.clone())?;
    pipeline.generate("o").await?;
    assert_eq!(tracer.pending(), 0);
    Ok(())
}
