//! # Command Helpers
//!
//! Argument handling that does not depend on the terminal: resolving the
//! objective, applying flag overrides to the loaded config, and shaping the
//! model's reply for output.

use anyhow::{bail, Result};
use autoprompt::{extract_prompt_block, PipelineConfig};
use std::io::Read;
use std::path::PathBuf;

/// Flag values that take precedence over the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub document: Option<PathBuf>,
    pub model: Option<String>,
}

pub fn apply_overrides(mut config: PipelineConfig, overrides: &Overrides) -> PipelineConfig {
    if let Some(document) = &overrides.document {
        config = config.with_document_path(document.clone());
    }
    if let Some(model) = &overrides.model {
        config = config.with_model_id(model.clone());
    }
    config
}

/// Returns the objective argument, or reads it from `input` when the argument
/// is absent or `-`. A single trailing newline from stdin is dropped.
pub fn read_objective(arg: Option<&str>, mut input: impl Read) -> Result<String> {
    match arg {
        Some(objective) if objective != "-" => Ok(objective.to_string()),
        _ => {
            let mut buf = String::new();
            input.read_to_string(&mut buf)?;
            let objective = buf
                .strip_suffix('\n')
                .map(|s| s.strip_suffix('\r').unwrap_or(s))
                .unwrap_or(&buf);
            if objective.trim().is_empty() {
                bail!("No objective given. Pass it as an argument or on stdin.");
            }
            Ok(objective.to_string())
        }
    }
}

/// With `extract`, prints only the body of the ```` ```prompt ```` block,
/// falling back to the full reply when there is none.
pub fn format_output(reply: &str, extract: bool) -> String {
    if extract {
        if let Some(block) = extract_prompt_block(reply) {
            return block;
        }
    }
    reply.to_string()
}
