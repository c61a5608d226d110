//! # Run Tracing
//!
//! Each `generate` call produces one `RunRecord`. Records are buffered in a
//! `TraceRecorder` and flushed at the end of the call, either to a remote
//! collector or, when none is configured, to the debug log.
//!
//! Export is best-effort: a failed flush is logged and otherwise ignored.

use crate::config::TelemetryConfig;
use crate::errors::{ConfigError, PipelineError};
use chrono::{DateTime, Utc};
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One traced model invocation.
#[derive(Clone, Debug, Serialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub run_type: &'static str,
    pub model: String,
    pub prompt: String,
    pub output: Option<String>,
    pub error: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl RunRecord {
    /// Starts a record for `prompt`; the end time is set by `finish`.
    pub fn start(model: &str, prompt: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            run_type: "llm",
            model: model.to_string(),
            prompt: prompt.to_string(),
            output: None,
            error: None,
            start_time: now,
            end_time: now,
        }
    }

    /// Stamps the end time and stores the outcome.
    pub fn finish(mut self, outcome: &Result<String, PipelineError>) -> Self {
        self.end_time = Utc::now();
        match outcome {
            Ok(text) => self.output = Some(text.clone()),
            Err(e) => self.error = Some(e.to_string()),
        }
        self
    }
}

#[derive(Serialize)]
struct RunBatch<'a> {
    project: &'a str,
    runs: &'a [RunRecord],
}

#[derive(Clone)]
struct TraceExporter {
    client: ReqwestClient,
    url: String,
    api_key: String,
    project: String,
}

impl fmt::Debug for TraceExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceExporter")
            .field("url", &self.url)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

/// Buffers run records until the next flush.
#[derive(Clone, Debug, Default)]
pub struct TraceRecorder {
    buffer: Arc<Mutex<Vec<RunRecord>>>,
    exporter: Option<TraceExporter>,
}

impl TraceRecorder {
    /// A recorder that only logs records.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Builds a recorder that exports to the collector in `config`, if any.
    pub fn from_config(config: Option<&TelemetryConfig>) -> Result<Self, PipelineError> {
        let Some(config) = config else {
            return Ok(Self::disabled());
        };
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::ReqwestClientBuild)?;
        info!(
            "Trace export enabled: {} (project '{}')",
            config.endpoint, config.project
        );
        Ok(Self {
            buffer: Arc::default(),
            exporter: Some(TraceExporter {
                client,
                url: format!("{}/runs/batch", config.endpoint.trim_end_matches('/')),
                api_key: config.api_key.clone(),
                project: config.project.clone(),
            }),
        })
    }

    pub fn is_exporting(&self) -> bool {
        self.exporter.is_some()
    }

    pub fn record(&self, run: RunRecord) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(run);
    }

    /// Number of records waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drains the buffer, waiting until the batch has been sent.
    ///
    /// Returns the number of records drained. Export failures are logged at
    /// `warn` and the records are dropped.
    pub async fn flush(&self) -> usize {
        let runs: Vec<RunRecord> =
            std::mem::take(&mut *self.buffer.lock().unwrap_or_else(PoisonError::into_inner));
        if runs.is_empty() {
            return 0;
        }

        let Some(exporter) = &self.exporter else {
            for run in &runs {
                debug!(run_id = %run.id, model = %run.model, failed = run.error.is_some(), "Trace record");
            }
            return runs.len();
        };

        let batch = RunBatch {
            project: &exporter.project,
            runs: &runs,
        };
        let result = exporter
            .client
            .post(&exporter.url)
            .header("x-api-key", &exporter.api_key)
            .json(&batch)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!("Flushed {} trace record(s) to {}", runs.len(), exporter.url);
            }
            Ok(response) => {
                warn!(
                    "Trace collector at {} returned status {}; dropping {} record(s)",
                    exporter.url,
                    response.status(),
                    runs.len()
                );
            }
            Err(e) if e.is_timeout() => {
                warn!(
                    "Trace collector at {} did not answer within the flush timeout; dropping {} record(s)",
                    exporter.url,
                    runs.len()
                );
            }
            Err(e) => {
                warn!(
                    "Failed to flush {} trace record(s) to {}: {e}",
                    runs.len(),
                    exporter.url
                );
            }
        }
        runs.len()
    }
}
