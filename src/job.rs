//! Export jobs: blocks, format options and test metadata loaded from JSON.
//!
//! Blocks arrive as loosely-typed data-service rows. [`BlockRecord`] accepts
//! the shapes seen in practice and [`BlockRecord::into_block`] maps them onto
//! the closed [`Block`] type, absorbing anything it does not recognise:
//!
//! - an unknown `type` becomes [`BlockKind::Other`]
//! - a bare question subtype as `type` (`"multiple_choice"`) is a question
//! - an unknown `subtype` or `difficulty` becomes `None`
//! - `content` falls back to the `question` field
//! - the image reference is read from `image_url`, `imageRef`, `imageUrl`
//!   or `config.imageUrl`
//!
//! All text is NFC-normalized so decomposed Hangul measures like composed.

use crate::error::{Error, Result};
use crate::layout::FormatOptions;
use crate::model::{Block, BlockKind, Difficulty, Question, QuestionKind, TestInfo};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// One block row as supplied by the data service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRecord {
    /// Row id; numbers and strings are both accepted
    pub id: Value,

    #[serde(rename = "type")]
    pub block_type: Option<String>,

    pub subtype: Option<String>,

    pub content: Option<String>,

    /// Legacy name for the question stem
    pub question: Option<String>,

    /// Array of choices, or a JSON-encoded array string
    pub options: Value,

    #[serde(alias = "correctAnswer")]
    pub correct_answer: Option<Value>,

    pub difficulty: Option<String>,

    #[serde(alias = "imageRef", alias = "imageUrl")]
    pub image_url: Option<String>,

    /// Editor configuration; only `imageUrl` is read
    pub config: Option<Value>,

    #[serde(alias = "materialTitle")]
    pub material_title: Option<String>,
}

impl BlockRecord {
    /// Convert the row into a block, using `index` for a missing id.
    pub fn into_block(self, index: usize) -> Block {
        let id = match &self.id {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => format!("block-{}", index + 1),
        };

        let type_name = self.block_type.as_deref().map(str::trim).unwrap_or("");
        let kind = match type_name {
            "question" => BlockKind::Question(self.question_payload(self.subtype.as_deref())),
            "passage" => BlockKind::Passage,
            "concept" => BlockKind::Concept,
            "explanation" => BlockKind::Explanation,
            other => match QuestionKind::parse(other) {
                Some(_) => BlockKind::Question(self.question_payload(Some(other))),
                None => {
                    if !other.is_empty() {
                        debug!("Block {}: unknown type '{}', rendering as text", id, other);
                    }
                    BlockKind::Other
                }
            },
        };

        let content = self
            .content
            .as_deref()
            .or(self.question.as_deref())
            .map(nfc)
            .unwrap_or_default();

        let difficulty = self.difficulty.as_deref().and_then(|d| {
            let parsed = Difficulty::parse(d);
            if parsed.is_none() {
                warn!("Block {}: unknown difficulty '{}'", id, d);
            }
            parsed
        });

        let image_ref = self
            .image_url
            .clone()
            .or_else(|| {
                self.config
                    .as_ref()
                    .and_then(|c| c.get("imageUrl"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .filter(|s| !s.trim().is_empty());

        Block {
            id,
            kind,
            content,
            difficulty,
            image_ref,
            material_title: self.material_title.as_deref().map(nfc),
        }
    }

    fn question_payload(&self, subtype: Option<&str>) -> Question {
        let subtype = subtype.and_then(|s| {
            let parsed = QuestionKind::parse(s);
            if parsed.is_none() {
                warn!("Unknown question subtype '{}'", s);
            }
            parsed
        });
        Question {
            subtype,
            options: parse_options(&self.options),
            correct_answer: self.correct_answer.as_ref().and_then(value_text),
        }
    }
}

fn nfc(s: &str) -> String {
    s.nfc().collect()
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(nfc(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_options(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_text).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(inner @ Value::Array(_)) => parse_options(&inner),
            _ => {
                warn!("Options string is not a JSON array; ignoring");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

/// A complete export request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportJob {
    /// Raw block rows, in display order
    pub blocks: Vec<BlockRecord>,

    /// Format options
    #[serde(
        alias = "formatOptions",
        alias = "format_options",
        deserialize_with = "null_as_default"
    )]
    pub format: FormatOptions,

    /// Test metadata
    #[serde(alias = "test_info", deserialize_with = "null_as_default")]
    pub test_info: TestInfo,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ExportJob {
    /// Parse a job from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(Error::InvalidJob("expected a JSON object".to_string()));
        }
        if value.get("blocks").is_some_and(|b| !b.is_array()) {
            return Err(Error::InvalidJob("`blocks` must be an array".to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Load a job from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The rows converted into blocks.
    pub fn blocks(&self) -> Vec<Block> {
        self.blocks
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, record)| record.into_block(i))
            .collect()
    }
}
