pub mod openai;

use crate::errors::PipelineError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a chat-completion provider.
///
/// The pipeline only depends on this trait, so tests and alternative backends
/// can stand in for the hosted API.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Sends a fully rendered prompt as a single user message.
    ///
    /// The result is the text content of the model's reply, unmodified.
    async fn generate(&self, prompt: &str) -> Result<String, PipelineError>;

    /// The model identifier requests are sent to.
    fn model(&self) -> &str;
}

dyn_clone::clone_trait_object!(AiProvider);
