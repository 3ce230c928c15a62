//! Word-processor document rendering.
//!
//! Blocks are first mapped to a stream of [`WordParagraph`]s, then packed
//! into an Office Open XML container. Packing needs the `docx` feature; the
//! capability is resolved once when the [`WordRenderer`] is built, and a
//! renderer without it produces the plain-text rendering instead.

use super::text::{to_text, TextFlavor};
use super::visitor::{walk, BlockVisitor};
use crate::error::Result;
use crate::layout::{
    metadata_line, FormatOptions, Labels, SourcePosition, ACCENT, FAINT, MUTED, PASSAGE_FILL,
};
use crate::model::{non_blank, Block, Color, Document, NumberedBlock, Question, TestInfo};
use log::warn;
use std::fmt;

/// What a paragraph represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphRole {
    Title,
    Metadata,
    Instructions,
    QuestionStem,
    Difficulty,
    Option,
    AnswerLine,
    Citation,
    SectionLabel,
    Body,
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A run of uniformly formatted text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Size in half-points
    pub size: Option<u32>,
    pub color: Option<Color>,
}

impl WordRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A paragraph of the word-processor document.
#[derive(Debug, Clone, PartialEq)]
pub struct WordParagraph {
    pub role: ParagraphRole,
    pub runs: Vec<WordRun>,
    pub alignment: Alignment,
    /// Background shading
    pub shading: Option<Color>,
    /// Space after, in twentieths of a point
    pub spacing_after: u32,
}

impl WordParagraph {
    pub fn new(role: ParagraphRole, runs: Vec<WordRun>) -> Self {
        Self {
            role,
            runs,
            alignment: Alignment::Left,
            shading: None,
            spacing_after: 0,
        }
    }

    /// A paragraph with a single run.
    pub fn text(role: ParagraphRole, run: WordRun) -> Self {
        Self::new(role, vec![run])
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn shaded(mut self, color: Color) -> Self {
        self.shading = Some(color);
        self
    }

    pub fn spacing(mut self, after: u32) -> Self {
        self.spacing_after = after;
        self
    }

    /// Concatenated run text.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Maps blocks to word-processor paragraphs.
pub struct ParagraphBuilder<'a> {
    options: &'a FormatOptions,
    labels: &'static Labels,
    paragraphs: Vec<WordParagraph>,
}

impl<'a> ParagraphBuilder<'a> {
    pub fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            labels: Labels::for_locale(options.locale),
            paragraphs: Vec::new(),
        }
    }

    /// Title, metadata, instructions, then every block.
    pub fn build(mut self, info: &TestInfo, blocks: &[NumberedBlock]) -> Vec<WordParagraph> {
        let title = non_blank(&info.title).unwrap_or(self.labels.default_document_title);
        self.push(
            WordParagraph::text(ParagraphRole::Title, WordRun::new(title))
                .aligned(Alignment::Center)
                .spacing(200),
        );
        if info.has_class_info() {
            if let Some(meta) = metadata_line(info, self.labels, false) {
                self.push(
                    WordParagraph::text(ParagraphRole::Metadata, WordRun::new(meta).size(24))
                        .aligned(Alignment::Center)
                        .spacing(400),
                );
            }
        }
        let instructions =
            non_blank(&info.instructions).unwrap_or(self.labels.default_instructions);
        self.push(
            WordParagraph::text(ParagraphRole::Instructions, WordRun::new(instructions))
                .spacing(200),
        );

        walk(blocks, &mut self);
        self.paragraphs
    }

    fn push(&mut self, paragraph: WordParagraph) {
        self.paragraphs.push(paragraph);
    }

    fn section(&mut self, label: WordRun, body: &Block, shading: Option<Color>, italic: bool) {
        self.push(WordParagraph::text(ParagraphRole::SectionLabel, label.bold()).spacing(100));
        let mut run = WordRun::new(&body.content);
        if italic {
            run = run.italic();
        }
        let mut paragraph = WordParagraph::text(ParagraphRole::Body, run).spacing(200);
        if let Some(color) = shading {
            paragraph = paragraph.shaded(color);
        }
        self.push(paragraph);
    }
}

impl BlockVisitor for ParagraphBuilder<'_> {
    fn visit_question(&mut self, numbered: &NumberedBlock, question: &Question) {
        let block = &numbered.block;
        self.push(
            WordParagraph::new(
                ParagraphRole::QuestionStem,
                vec![
                    WordRun::new(format!("{} ", numbered.label())).bold(),
                    WordRun::new(&block.content),
                ],
            )
            .spacing(100),
        );

        if let Some(indicator) = self
            .labels
            .difficulty_indicator(self.options.show_difficulty, block.difficulty)
        {
            self.push(
                WordParagraph::text(
                    ParagraphRole::Difficulty,
                    WordRun::new(indicator).size(20).color(MUTED),
                )
                .spacing(100),
            );
        }

        for (i, option) in question.display_options().iter().enumerate() {
            self.push(
                WordParagraph::text(
                    ParagraphRole::Option,
                    WordRun::new(format!("  {}) {}", i + 1, option)),
                )
                .spacing(50),
            );
        }

        for _ in 0..question.answer_lines() {
            self.push(
                WordParagraph::text(ParagraphRole::AnswerLine, WordRun::new("_".repeat(80)))
                    .spacing(100),
            );
        }

        if self.options.show_sources {
            if let Some(title) = non_blank(&block.material_title) {
                let alignment = match self.options.source_position {
                    SourcePosition::Left => Alignment::Left,
                    SourcePosition::Right => Alignment::Right,
                };
                self.push(
                    WordParagraph::text(
                        ParagraphRole::Citation,
                        WordRun::new(self.labels.citation(title)).size(18).color(FAINT),
                    )
                    .aligned(alignment)
                    .spacing(200),
                );
            }
        }
    }

    fn visit_passage(&mut self, block: &Block) {
        let label = WordRun::new(self.labels.passage_marker);
        self.section(label, block, Some(PASSAGE_FILL), false);
    }

    fn visit_concept(&mut self, block: &Block) {
        let label = WordRun::new(self.labels.concept_marker).size(28).color(ACCENT);
        self.section(label, block, None, false);
    }

    fn visit_explanation(&mut self, block: &Block) {
        let label = WordRun::new(self.labels.explanation).color(ACCENT);
        self.section(label, block, None, true);
    }

    fn visit_other(&mut self, block: &Block) {
        self.push(WordParagraph::text(ParagraphRole::Body, WordRun::new(&block.content)));
    }
}

/// Paragraph stream for a document.
pub fn word_paragraphs(doc: &Document) -> Vec<WordParagraph> {
    ParagraphBuilder::new(&doc.format).build(&doc.test_info, &doc.blocks)
}

/// Reason the container writer cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    reason: String,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "word-processor output unavailable: {}", self.reason)
    }
}

/// Ability to write the word-processor container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocxCapability {
    _private: (),
}

impl DocxCapability {
    /// Resolve the capability for this build.
    pub fn detect() -> std::result::Result<Self, Unavailable> {
        #[cfg(feature = "docx")]
        {
            Ok(Self { _private: () })
        }
        #[cfg(not(feature = "docx"))]
        {
            Err(Unavailable::new("built without the `docx` feature"))
        }
    }

    /// Pack paragraphs into container bytes.
    pub fn pack(&self, paragraphs: &[WordParagraph], info: &TestInfo) -> Result<Vec<u8>> {
        #[cfg(feature = "docx")]
        {
            super::docx_package::write_package(paragraphs, info)
        }
        #[cfg(not(feature = "docx"))]
        {
            let _ = (paragraphs, info);
            Err(crate::error::Error::Archive(
                "built without the `docx` feature".to_string(),
            ))
        }
    }
}

/// Output of the word-processor adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum WordOutput {
    /// Container bytes
    Docx(Vec<u8>),
    /// Plain-text rendering used when the container writer is unavailable
    PlainText(String),
}

impl WordOutput {
    /// Whether the fallback was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, WordOutput::PlainText(_))
    }

    /// File extension for the output.
    pub fn extension(&self) -> &'static str {
        match self {
            WordOutput::Docx(_) => "docx",
            WordOutput::PlainText(_) => "txt",
        }
    }

    /// MIME type for the output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            WordOutput::Docx(_) => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            WordOutput::PlainText(_) => "text/plain; charset=utf-8",
        }
    }

    /// Output bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            WordOutput::Docx(bytes) => bytes,
            WordOutput::PlainText(text) => text.into_bytes(),
        }
    }
}

/// Word-processor adapter with its capability resolved at construction.
#[derive(Debug, Clone)]
pub struct WordRenderer {
    capability: std::result::Result<DocxCapability, Unavailable>,
}

impl WordRenderer {
    /// Create a renderer using the capability of this build.
    pub fn new() -> Self {
        Self::with_capability(DocxCapability::detect())
    }

    /// Create a renderer with an explicit capability.
    pub fn with_capability(capability: std::result::Result<DocxCapability, Unavailable>) -> Self {
        Self { capability }
    }

    /// Create a renderer that always falls back.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::with_capability(Err(Unavailable::new(reason)))
    }

    /// Whether the container writer can be used.
    pub fn is_available(&self) -> bool {
        self.capability.is_ok()
    }

    /// Render the document, falling back to plain text when unavailable.
    pub fn render(&self, doc: &Document) -> Result<WordOutput> {
        match &self.capability {
            Ok(capability) => {
                let paragraphs = word_paragraphs(doc);
                let bytes = capability.pack(&paragraphs, &doc.test_info)?;
                Ok(WordOutput::Docx(bytes))
            }
            Err(unavailable) => {
                warn!("{}; falling back to plain text", unavailable);
                Ok(WordOutput::PlainText(to_text(doc, TextFlavor::Plain)))
            }
        }
    }
}

impl Default for WordRenderer {
    fn default() -> Self {
        Self::new()
    }
}
