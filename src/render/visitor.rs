//! Visitor over the numbered blocks of a document.
//!
//! Text-like renderers do not need page geometry; they walk the numbered
//! blocks in input order and emit their own structure per block type. The
//! match in [`walk`] is exhaustive, so a new block type cannot be silently
//! ignored by any renderer.
//!
//! # Example
//!
//! ```
//! use printsheet::model::{Block, NumberedBlock, Question};
//! use printsheet::render::visitor::{walk, BlockVisitor};
//!
//! #[derive(Default)]
//! struct Numbers(Vec<u32>);
//!
//! impl BlockVisitor for Numbers {
//!     fn visit_question(&mut self, block: &NumberedBlock, _question: &Question) {
//!         self.0.extend(block.display_number);
//!     }
//!     fn visit_passage(&mut self, _block: &Block) {}
//!     fn visit_concept(&mut self, _block: &Block) {}
//!     fn visit_explanation(&mut self, _block: &Block) {}
//!     fn visit_other(&mut self, _block: &Block) {}
//! }
//!
//! let blocks = printsheet::layout::assign(&[
//!     Block::passage("p", "text"),
//!     Block::question("q", Question::default(), "why?"),
//! ]);
//! let mut numbers = Numbers::default();
//! walk(&blocks, &mut numbers);
//! assert_eq!(numbers.0, vec![1]);
//! ```

use super::result::RenderStats;
use crate::model::{Block, BlockKind, NumberedBlock, Question};
use log::debug;

/// Callbacks for each block type.
pub trait BlockVisitor {
    /// Called for a question with its display number.
    fn visit_question(&mut self, block: &NumberedBlock, question: &Question);

    /// Called for a reading passage.
    fn visit_passage(&mut self, block: &Block);

    /// Called for a key concept.
    fn visit_concept(&mut self, block: &Block);

    /// Called for an explanation.
    fn visit_explanation(&mut self, block: &Block);

    /// Called for an untyped block with content.
    fn visit_other(&mut self, block: &Block);

    /// Called once before the first block.
    fn on_start(&mut self) {}

    /// Called once after the last block.
    fn on_end(&mut self) {}
}

/// Visit blocks in order.
///
/// Untyped blocks without content are skipped here, matching the layout
/// engine, so every renderer sees the same block sequence.
pub fn walk<V: BlockVisitor + ?Sized>(blocks: &[NumberedBlock], visitor: &mut V) {
    visitor.on_start();
    for numbered in blocks {
        let block = &numbered.block;
        match &block.kind {
            BlockKind::Question(question) => visitor.visit_question(numbered, question),
            BlockKind::Passage => visitor.visit_passage(block),
            BlockKind::Concept => visitor.visit_concept(block),
            BlockKind::Explanation => visitor.visit_explanation(block),
            BlockKind::Other if block.has_content() => visitor.visit_other(block),
            BlockKind::Other => debug!("Skipping block {}: no content", block.id),
        }
    }
    visitor.on_end();
}

/// Visitor that collects [`RenderStats`].
#[derive(Debug, Clone, Default)]
pub struct StatsVisitor {
    stats: RenderStats,
}

impl StatsVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the visitor and return the statistics.
    pub fn into_stats(self) -> RenderStats {
        self.stats
    }

    fn count(&mut self, block: &Block) {
        self.stats.block_count += 1;
        self.stats.count_text(&block.content);
        if block.image_ref.is_some() {
            self.stats.image_count += 1;
        }
    }
}

impl BlockVisitor for StatsVisitor {
    fn visit_question(&mut self, block: &NumberedBlock, question: &Question) {
        self.count(&block.block);
        self.stats.question_count += 1;
        self.stats.option_count += question.display_options().len() as u32;
        self.stats.answer_line_count += question.answer_lines() as u32;
    }

    fn visit_passage(&mut self, block: &Block) {
        self.count(block);
        self.stats.passage_count += 1;
    }

    fn visit_concept(&mut self, block: &Block) {
        self.count(block);
        self.stats.concept_count += 1;
    }

    fn visit_explanation(&mut self, block: &Block) {
        self.count(block);
        self.stats.explanation_count += 1;
    }

    fn visit_other(&mut self, block: &Block) {
        self.count(block);
    }
}

/// Collect statistics for a block sequence.
pub fn collect_stats(blocks: &[NumberedBlock]) -> RenderStats {
    let mut visitor = StatsVisitor::new();
    walk(blocks, &mut visitor);
    visitor.into_stats()
}
