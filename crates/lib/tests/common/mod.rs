#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Helpers shared by the integration tests for wiring the pipeline to a
//! `wiremock` stand-in for the chat-completions API.

use autoprompt::PipelineConfig;
use serde_json::{json, Value};
use std::path::Path;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const CHAT_PATH: &str = "/v1/chat/completions";

/// A reply shaped like the OpenAI chat-completions response.
pub fn chat_completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4-1106-preview",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// A config pointing at `server` and reading the document from `document_path`.
pub fn config_for(server: &MockServer, document_path: &Path) -> PipelineConfig {
    PipelineConfig::new(TEST_API_KEY)
        .with_api_url(format!("{}{CHAT_PATH}", server.uri()))
        .with_document_path(document_path)
}
