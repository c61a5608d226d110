use crate::{
    config::PipelineConfig,
    errors::{ConfigError, PipelineError, UpstreamError},
    providers::ai::AiProvider,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

// --- OpenAI chat-completions request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// --- OpenAI Provider implementation ---

/// A provider for the OpenAI chat-completions API, or any server speaking the
/// same protocol.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider`.
    ///
    /// An empty `api_key` is rejected here so a missing credential never
    /// reaches the network.
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self, PipelineError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar(crate::constants::ENV_API_KEY).into());
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(ConfigError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
            temperature: crate::constants::DETERMINISTIC_TEMPERATURE,
        })
    }

    /// Creates a provider from the URL, key, and model in `config`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.model_id.clone(),
        )
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, PipelineError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            stream: false,
        };

        info!("--> Sending prompt to {} ({})", self.api_url, self.model);
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(UpstreamError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(UpstreamError::Deserialization)?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::EmptyResponse)?
            .message
            .content
            .unwrap_or_default();

        debug!("<-- Response from AI: {}", content);
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
