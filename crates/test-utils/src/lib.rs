use anyhow::Result;
use autoprompt::errors::{PipelineError, UpstreamError};
use autoprompt::providers::ai::AiProvider;
use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex, Once};
use tempfile::NamedTempFile;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// --- Fixtures ---

/// A short instructional document used across tests.
pub const SAMPLE_DOCUMENT: &str = "# Prompting Guide\n\nWrite clear instructions.\nUse delimiters like {braces} when it helps.\n";

/// Writes `contents` to a temporary file that lives as long as the handle.
pub fn write_document(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    /// Creates a mock that answers every call with a fallback response.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply. Replies are returned in the order added.
    pub fn add_response(&self, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push(Ok(response.to_string()));
    }

    /// Queues a failure, returned as `UpstreamError::Other`.
    pub fn add_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, PipelineError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok("Default mock response".to_string());
        }
        responses
            .remove(0)
            .map_err(|message| UpstreamError::Other(message).into())
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
