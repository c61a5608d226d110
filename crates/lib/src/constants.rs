//! # Shared Constants
//!
//! Default values and environment variable names shared by the library and the
//! `autoprompt` CLI.

/// The chat model every prompt is sent to unless overridden.
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";

/// The OpenAI chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The instructional document, relative to the working directory.
pub const DEFAULT_DOCUMENT_PATH: &str = "openapi-prompting.txt";

/// Sampling temperature for every request. Not configurable.
pub const DETERMINISTIC_TEMPERATURE: f32 = 0.0;

/// The default trace collector.
pub const DEFAULT_TRACING_ENDPOINT: &str = "https://api.smith.langchain.com";

pub const DEFAULT_TRACING_PROJECT: &str = "default";

/// Seconds a trace flush may take before it is abandoned.
pub const DEFAULT_TRACING_TIMEOUT_SECS: u64 = 10;

// --- Environment variables ---

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_URL: &str = "OPENAI_API_URL";
pub const ENV_DOCUMENT_PATH: &str = "PROMPT_DOCUMENT_PATH";
pub const ENV_TRACING_ENABLED: &str = "LANGCHAIN_TRACING_V2";
pub const ENV_TRACING_ENDPOINT: &str = "LANGCHAIN_ENDPOINT";
pub const ENV_TRACING_API_KEY: &str = "LANGCHAIN_API_KEY";
pub const ENV_TRACING_PROJECT: &str = "LANGCHAIN_PROJECT";
