//! Layout engine: numbering, element construction and pagination.
//!
//! # Example
//!
//! ```
//! use printsheet::layout::{FormatOptions, LayoutEngine};
//! use printsheet::model::{Block, Question, QuestionKind};
//!
//! let blocks = vec![
//!     Block::question("q1", Question::new(QuestionKind::ShortAnswer), "2 + 2 = ?"),
//!     Block::passage("p1", "Read the passage."),
//! ];
//! let doc = LayoutEngine::new().compute(&blocks, &FormatOptions::default());
//! assert_eq!(doc.page_count(), 1);
//! assert_eq!(doc.blocks[0].display_number, Some(1));
//! ```

mod element;
mod geometry;
mod header;
mod labels;
mod measure;
mod numbering;
mod options;
mod paginate;
mod style;

pub use element::{Element, ElementFactory, IMAGE_HEIGHT, OPTION_INDENT, QUESTION_INDENT};
pub use geometry::{
    content_width, snap_to_grid, Margins, PageGeometry, PageSize, COLUMN_GAP, GRID_SIZE, MARGINS,
};
pub use header::{metadata_line, HeaderGenerator};
pub use labels::Labels;
pub use measure::{is_wide, FixedAdvanceMetrics, TextMeasurer};
pub use numbering::assign;
pub use options::{
    Columns, DifficultyDisplay, FontSize, FormatOptions, Locale, QuestionSpacing, SourcePosition,
};
pub use paginate::{transition, Cursor, PaginationEngine, PaginationState, Transition};
pub use style::{font_size_points, StyleResolver, TITLE_FONT_SIZE};

pub(crate) use style::{ACCENT, FAINT, MUTED, PASSAGE_FILL};

use crate::model::{Block, Document, Primitive, TestInfo};
use log::debug;

/// Computes documents from blocks.
///
/// The engine holds only the text metrics; every call builds a fresh
/// [`Document`], so identical inputs always give identical output.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine<M: TextMeasurer = FixedAdvanceMetrics> {
    measurer: M,
}

impl LayoutEngine<FixedAdvanceMetrics> {
    /// Create an engine with the default fixed-advance metrics.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMeasurer> LayoutEngine<M> {
    /// Create an engine that measures text with `measurer`.
    pub fn with_measurer(measurer: M) -> Self {
        Self { measurer }
    }

    /// The text metrics in use.
    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Number, build and paginate the blocks.
    pub fn compute(&self, blocks: &[Block], options: &FormatOptions) -> Document {
        let numbered = assign(blocks);
        let factory = ElementFactory::new(&self.measurer, options);
        let geometry = PageGeometry::new(options.page_size, options.columns);
        let pages = PaginationEngine::new(factory, geometry).paginate(&numbered);

        debug!(
            "Layout: {} blocks, {} pages ({} {}-column)",
            blocks.len(),
            pages.len(),
            options.page_size,
            options.columns.count()
        );

        let mut doc = Document::new(options.clone());
        doc.blocks = numbered;
        doc.pages = pages;
        doc
    }

    /// Compute the document and attach test metadata.
    pub fn compute_with_info(
        &self,
        blocks: &[Block],
        options: &FormatOptions,
        info: &TestInfo,
    ) -> Document {
        self.compute(blocks, options).with_test_info(info.clone())
    }

    /// Header page primitives, labelled in the options' locale.
    pub fn header(&self, info: &TestInfo, options: &FormatOptions) -> Vec<Primitive> {
        self.generator(options.locale).header(info, options.page_size)
    }

    /// Answer key page primitives, labelled in the options' locale.
    pub fn answer_key(&self, blocks: &[Block], options: &FormatOptions) -> Vec<Primitive> {
        self.generator(options.locale)
            .answer_key(blocks, options.page_size)
    }

    fn generator(&self, locale: Locale) -> HeaderGenerator<'_> {
        HeaderGenerator::new(&self.measurer, Labels::for_locale(locale))
    }
}

/// Compute a document with the default metrics.
pub fn compute_layout(blocks: &[Block], options: &FormatOptions) -> Document {
    LayoutEngine::new().compute(blocks, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Question, QuestionKind};

    fn sample() -> Vec<Block> {
        vec![
            Block::question("q1", Question::multiple_choice(["1", "2", "3", "4"]), "Pick")
                .with_difficulty(Difficulty::Easy),
            Block::question("q2", Question::new(QuestionKind::ShortAnswer), "Solve"),
            Block::passage("p1", "Passage text"),
            Block::concept("c1", "Concept text"),
            Block::question("q3", Question::new(QuestionKind::Essay), "Discuss"),
        ]
    }

    #[test]
    fn test_compute_numbers_and_places_all_blocks() {
        let options = FormatOptions::default().with_difficulty(DifficultyDisplay::Text);
        let doc = compute_layout(&sample(), &options);

        let numbers: Vec<Option<u32>> = doc.blocks.iter().map(|b| b.display_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), None, None, Some(3)]);
        assert_eq!(doc.block_order(), vec!["q1", "q2", "p1", "c1", "q3"]);
        assert_eq!(doc.format, options);
    }

    #[test]
    fn test_compute_with_info_attaches_metadata() {
        let info = TestInfo::new().with_title("Quiz");
        let doc = LayoutEngine::new().compute_with_info(&sample(), &FormatOptions::default(), &info);
        assert_eq!(doc.test_info.title.as_deref(), Some("Quiz"));
        assert!(doc.header.is_none());
    }

    #[test]
    fn test_locale_selects_labels() {
        let options = FormatOptions::default().with_locale(Locale::En);
        let key = LayoutEngine::new().answer_key(&sample(), &options);
        assert_eq!(key[0].text(), Some("Answer Key"));
        assert_eq!(key[2].text(), Some("2. TBD"));
    }
}
