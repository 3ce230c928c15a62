//! Line-oriented text rendering.
//!
//! Two flavours share one algorithm: the plain-text fallback and the
//! HWP-paste text, which differ only in their separator rule.

use super::visitor::{walk, BlockVisitor};
use crate::layout::{metadata_line, FormatOptions, Labels};
use crate::model::{non_blank, Block, Document, NumberedBlock, Question, TestInfo};

const INDENT: &str = "   ";
const ANSWER_RULE_WIDTH: usize = 60;

/// Text output flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFlavor {
    /// Plain text with a `=` separator
    #[default]
    Plain,
    /// Text for pasting into a Korean word processor, `─` separator
    Hwp,
}

impl TextFlavor {
    /// Separator line under the header.
    pub fn separator(self) -> String {
        match self {
            TextFlavor::Plain => "=".repeat(60),
            TextFlavor::Hwp => "─".repeat(80),
        }
    }
}

/// Renders a document as lines of text.
pub struct TextRenderer<'a> {
    flavor: TextFlavor,
    options: &'a FormatOptions,
    labels: &'static Labels,
    lines: Vec<String>,
}

impl<'a> TextRenderer<'a> {
    /// Create a renderer for the given options.
    pub fn new(flavor: TextFlavor, options: &'a FormatOptions) -> Self {
        Self {
            flavor,
            options,
            labels: Labels::for_locale(options.locale),
            lines: Vec::new(),
        }
    }

    /// Render the header and every block into lines.
    pub fn render_lines(mut self, info: &TestInfo, blocks: &[NumberedBlock]) -> Vec<String> {
        self.header(info);
        walk(blocks, &mut self);
        self.lines
    }

    fn header(&mut self, info: &TestInfo) {
        let title = non_blank(&info.title).unwrap_or(self.labels.default_document_title);
        self.push(title);
        self.blank();
        if info.has_class_info() {
            if let Some(meta) = metadata_line(info, self.labels, false) {
                self.push(meta);
                self.blank();
            }
        }
        let instructions =
            non_blank(&info.instructions).unwrap_or(self.labels.default_instructions);
        self.push(instructions);
        self.blank();
        self.push(self.flavor.separator());
        self.blank();
    }

    fn labelled(&mut self, label: &str, block: &Block) {
        self.push(format!("[{}]", label));
        self.push(&block.content);
        self.blank();
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }
}

impl BlockVisitor for TextRenderer<'_> {
    fn visit_question(&mut self, numbered: &NumberedBlock, question: &Question) {
        let block = &numbered.block;
        self.push(format!("{} {}", numbered.label(), block.content).trim_end());

        if let Some(indicator) = self
            .labels
            .difficulty_indicator(self.options.show_difficulty, block.difficulty)
        {
            self.push(format!("{}{}", INDENT, indicator));
        }
        for (i, option) in question.display_options().iter().enumerate() {
            self.push(format!("{}{}) {}", INDENT, i + 1, option));
        }
        for _ in 0..question.answer_lines() {
            self.push(format!("{}{}", INDENT, "_".repeat(ANSWER_RULE_WIDTH)));
        }
        if self.options.show_sources {
            if let Some(title) = non_blank(&block.material_title) {
                self.push(format!("{}{}", INDENT, self.labels.citation(title)));
            }
        }
        self.blank();
    }

    fn visit_passage(&mut self, block: &Block) {
        self.labelled(self.labels.passage, block);
    }

    fn visit_concept(&mut self, block: &Block) {
        self.labelled(self.labels.concept, block);
    }

    fn visit_explanation(&mut self, block: &Block) {
        self.labelled(self.labels.explanation, block);
    }

    fn visit_other(&mut self, block: &Block) {
        self.push(&block.content);
        self.blank();
    }
}

/// Text lines for a document.
pub fn text_lines(doc: &Document, flavor: TextFlavor) -> Vec<String> {
    TextRenderer::new(flavor, &doc.format).render_lines(&doc.test_info, &doc.blocks)
}

/// Render a document as text.
pub fn to_text(doc: &Document, flavor: TextFlavor) -> String {
    let mut out = text_lines(doc, flavor).join("\n");
    out.push('\n');
    out
}
