//! # Prompt Template Modules
//!
//! `core` holds the fixed prompt-builder text, `template` the engine that binds
//! values into it.

pub mod core;
pub mod template;

pub use self::core::{extract_prompt_block, PROMPT_BUILDER_TEMPLATE};
pub use self::template::PromptTemplate;
