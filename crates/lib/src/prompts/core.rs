//! # Prompt Builder Template
//!
//! The fixed scaffolding that wraps the instructional document and the caller's
//! objective, plus a helper for pulling the generated template out of the
//! model's reply.

use regex::Regex;
use std::sync::LazyLock;

/// Asks the model to write a new prompt template for an objective.
///
/// Placeholders: `{text}` (the static document), `{objective}`
pub const PROMPT_BUILDER_TEMPLATE: &str = r#"
{text}
========================
Based on the above instructions, help me write a good prompt TEMPLATE.

This template should be a string that can be formatted as if python f-string. It can take in any number of variables depending on my objective.

Return your answer in the following format:
```prompt
...
This is my objective:
{objective}
"#;

/// The variable the static document is bound to.
pub const DOCUMENT_VARIABLE: &str = "text";

/// The variable bound per call.
pub const OBJECTIVE_VARIABLE: &str = "objective";

static PROMPT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```prompt[^\n]*\n([\s\S]*?)(?:```|\z)")
        .expect("prompt block pattern is valid")
});

/// Returns the body of the first ```` ```prompt ```` block in a model reply.
///
/// An unterminated block runs to the end of the reply. Returns `None` when the
/// reply has no such block.
pub fn extract_prompt_block(response: &str) -> Option<String> {
    PROMPT_BLOCK_RE
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(['\n', '\r']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_body() {
        let reply = "Sure!\n```prompt\nHELLO {name}\n```\nGood luck.";
        assert_eq!(extract_prompt_block(reply), Some("HELLO {name}".to_string()));
    }

    #[test]
    fn unterminated_block_runs_to_end() {
        let reply = "```prompt\nline one\nline two\n";
        assert_eq!(
            extract_prompt_block(reply),
            Some("line one\nline two".to_string())
        );
    }

    #[test]
    fn pattern_compiles_and_is_reused() {
        LazyLock::force(&PROMPT_BLOCK_RE);
        for i in 0..3 {
            let reply = format!("```prompt\nattempt {i}\n```");
            assert_eq!(extract_prompt_block(&reply), Some(format!("attempt {i}")));
        }
    }

    #[test]
    fn other_fences_are_ignored() {
        assert_eq!(extract_prompt_block("```python\nprint(1)\n```"), None);
        assert_eq!(extract_prompt_block("no fences at all"), None);
    }
}
