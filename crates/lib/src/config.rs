//! # Pipeline Configuration
//!
//! Everything the pipeline needs from the outside world, gathered into one
//! explicit struct. `PipelineConfig::from_env` reads it from process
//! environment variables; callers that want `.env` support load it first with
//! `dotenvy::dotenv()`.

use crate::constants::*;
use crate::errors::ConfigError;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Settings for the remote model call and the static document.
#[derive(Clone)]
pub struct PipelineConfig {
    /// Credential for the chat-completions API. Loaded from `OPENAI_API_KEY`.
    pub api_key: String,
    /// The chat-completions URL. Loaded from `OPENAI_API_URL`.
    pub api_url: String,
    pub model_id: String,
    /// Location of the instructional document. Loaded from `PROMPT_DOCUMENT_PATH`.
    pub document_path: PathBuf,
    /// Trace export settings; `None` disables export.
    pub telemetry: Option<TelemetryConfig>,
}

/// Where run records are exported on flush.
#[derive(Clone)]
pub struct TelemetryConfig {
    pub endpoint: String,
    pub api_key: String,
    pub project: String,
    /// Upper bound on a single flush request.
    pub timeout: Duration,
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("api_url", &self.api_url)
            .field("model_id", &self.model_id)
            .field("temperature", &self.temperature())
            .field("document_path", &self.document_path)
            .field("telemetry", &self.telemetry)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for TelemetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryConfig")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PipelineConfig {
    /// Creates a configuration with the default model, URL, and document path.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            document_path: PathBuf::from(DEFAULT_DOCUMENT_PATH),
            telemetry: None,
        }
    }

    /// Loads the configuration from environment variables.
    ///
    /// Fails with `ConfigError::MissingVar` when `OPENAI_API_KEY` is unset or
    /// empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = non_empty_var(ENV_API_KEY).ok_or(ConfigError::MissingVar(ENV_API_KEY))?;
        let mut config = Self::new(api_key);

        if let Some(url) = non_empty_var(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(path) = non_empty_var(ENV_DOCUMENT_PATH) {
            config.document_path = PathBuf::from(path);
        }
        config.telemetry = TelemetryConfig::from_env();

        Ok(config)
    }

    /// Sampling temperature. Always zero.
    pub fn temperature(&self) -> f32 {
        DETERMINISTIC_TEMPERATURE
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_path = path.into();
        self
    }

    pub fn with_telemetry(mut self, telemetry: TelemetryConfig) -> Self {
        self.telemetry = Some(telemetry);
        self
    }
}

impl TelemetryConfig {
    /// A collector at `endpoint` with the default project and flush timeout.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            project: DEFAULT_TRACING_PROJECT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TRACING_TIMEOUT_SECS),
        }
    }

    /// Reads the `LANGCHAIN_*` variables. Returns `None` unless
    /// `LANGCHAIN_TRACING_V2` is truthy.
    ///
    /// Tracing never blocks the model call: an unparseable flag or a missing
    /// `LANGCHAIN_API_KEY` is logged at `warn` and disables export.
    pub fn from_env() -> Option<Self> {
        let enabled = match non_empty_var(ENV_TRACING_ENABLED) {
            Some(value) => match parse_bool(ENV_TRACING_ENABLED, &value) {
                Ok(enabled) => enabled,
                Err(e) => {
                    warn!("{e}; trace export disabled");
                    false
                }
            },
            None => false,
        };
        if !enabled {
            return None;
        }

        let Some(api_key) = non_empty_var(ENV_TRACING_API_KEY) else {
            warn!(
                "{ENV_TRACING_ENABLED} is set but {ENV_TRACING_API_KEY} is missing; trace export disabled"
            );
            return None;
        };
        let mut config = Self::new(
            non_empty_var(ENV_TRACING_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_TRACING_ENDPOINT.to_string()),
            api_key,
        );
        if let Some(project) = non_empty_var(ENV_TRACING_PROJECT) {
            config.project = project;
        }
        Some(config)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            reason: format!("expected a boolean, got '{value}'"),
        }),
    }
}
