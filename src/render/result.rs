//! Rendered artifacts and document statistics.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// One exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name including extension
    pub file_name: String,

    /// Extension without the dot
    pub extension: String,

    /// MIME type of the content
    pub mime_type: String,

    /// File content
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Create an artifact from raw bytes.
    pub fn new(
        file_name: impl Into<String>,
        extension: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            extension: extension.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Create a UTF-8 text artifact.
    pub fn text(
        file_name: impl Into<String>,
        extension: impl Into<String>,
        mime_type: impl Into<String>,
        content: String,
    ) -> Self {
        Self::new(file_name, extension, mime_type, content.into_bytes())
    }

    /// Content as text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the artifact is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact into `dir` and return the path written.
    ///
    /// The file name must be a single plain component; anything that would
    /// land outside `dir` is rejected.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let mut components = Path::new(&self.file_name).components();
        let name = match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => name,
            _ => return Err(Error::UnsafeFileName(self.file_name.clone())),
        };
        let path = dir.as_ref().join(name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Counts over the rendered block sequence.
///
/// Every adapter renders the same numbered blocks, so these numbers are
/// the cross-format invariants: question and option counts must agree in
/// every output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Rendered blocks (blank untyped blocks excluded)
    pub block_count: u32,

    /// Question blocks
    pub question_count: u32,

    /// Passage blocks
    pub passage_count: u32,

    /// Concept blocks
    pub concept_count: u32,

    /// Explanation blocks
    pub explanation_count: u32,

    /// Displayed multiple-choice options
    pub option_count: u32,

    /// Ruled answer lines
    pub answer_line_count: u32,

    /// Blocks with an image reference
    pub image_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
