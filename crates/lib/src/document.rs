//! # Static Document
//!
//! The instructional text that frames every prompt. It is read once when the
//! pipeline is built and shared, unmodified, by every call afterwards.

use crate::errors::PipelineError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// An immutable, cheaply cloneable instructional document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticDocument {
    path: Option<PathBuf>,
    text: Arc<str>,
}

impl StaticDocument {
    /// Reads a UTF-8 document from `path`.
    ///
    /// A missing, unreadable, or non-UTF-8 file yields `PipelineError::Io`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Loaded static document from {} ({} bytes)",
            path.display(),
            text.len()
        );
        Ok(Self {
            path: Some(path.to_path_buf()),
            text: Arc::from(text),
        })
    }

    /// Wraps text that did not come from disk.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: Arc::from(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The file the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns at most the first `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}
