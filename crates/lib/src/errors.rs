use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the pipeline.
///
/// Every failure falls into one of three kinds: configuration, local I/O on the
/// static document, or the upstream model call. None of them are retried.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to read static document '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Upstream model call failed: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Errors raised while assembling the pipeline from its configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required environment variable {0} is missing or empty")]
    MissingVar(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
    #[error("Invalid prompt template: {0}")]
    Template(#[from] TemplateError),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
}

/// Errors from the remote chat-completion endpoint.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Failed to send request to AI API: {0}")]
    Request(reqwest::Error),
    #[error("AI API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to deserialize AI API response: {0}")]
    Deserialization(reqwest::Error),
    #[error("AI API response contained no choices")]
    EmptyResponse,
    #[error("{0}")]
    Other(String),
}

/// Errors from parsing or rendering a prompt template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unmatched '{{' at byte {0}")]
    UnclosedPlaceholder(usize),
    #[error("Unmatched '}}' at byte {0}")]
    UnopenedPlaceholder(usize),
    #[error("Empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),
    #[error("Missing value for template variable '{0}'")]
    MissingVariable(String),
    #[error("Template has no variable named '{0}'")]
    UnknownVariable(String),
}

impl From<TemplateError> for PipelineError {
    fn from(err: TemplateError) -> Self {
        PipelineError::Config(ConfigError::Template(err))
    }
}
