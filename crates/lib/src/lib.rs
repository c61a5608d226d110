//! # Prompt Template Builder
//!
//! This crate asks a chat model to write prompt templates. A fixed instructional
//! document is bound into a prompt-builder template once; each caller objective
//! is then substituted in and sent to an OpenAI-compatible chat-completions API
//! with deterministic sampling.
//!
//! ```no_run
//! use autoprompt::{PipelineConfig, PromptPipeline};
//!
//! # async fn run() -> Result<(), autoprompt::PipelineError> {
//! let config = PipelineConfig::from_env()?;
//! let pipeline = PromptPipeline::from_config(&config)?;
//! let template = pipeline.generate("Summarize a support ticket").await?;
//! println!("{template}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod document;
pub mod errors;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod telemetry;

pub use config::{PipelineConfig, TelemetryConfig};
pub use document::StaticDocument;
pub use errors::{ConfigError, PipelineError, TemplateError, UpstreamError};
pub use pipeline::{PromptPipeline, PromptPipelineBuilder};
pub use prompts::{extract_prompt_block, PromptTemplate};
