//! Per-block element construction.
//!
//! [`ElementFactory::build`] turns one numbered block into a positioned
//! [`Primitive::Group`] and the vertical space it consumes. Children are
//! laid out with a cursor relative to the group origin; the returned height
//! is the cursor delta, not the sum of intrinsic child heights.

use super::geometry::content_width;
use super::labels::Labels;
use super::measure::TextMeasurer;
use super::options::{FormatOptions, SourcePosition};
use super::style::{
    StyleResolver, ACCENT, FAINT, MUTED, PASSAGE_BORDER, PASSAGE_FILL, PLACEHOLDER_FILL, RULE,
};
use crate::model::{
    non_blank, Block, BlockKind, Color, NumberedBlock, Point, Primitive, Question, ShapeStyle,
    Style,
};
use log::debug;

/// Left indent of question body content.
pub const QUESTION_INDENT: f32 = 30.0;
/// Left indent of multiple-choice options.
pub const OPTION_INDENT: f32 = 40.0;
/// Fixed height reserved for an image.
pub const IMAGE_HEIGHT: f32 = 200.0;

const CONTENT_GAP: f32 = 10.0;
const IMAGE_ADVANCE: f32 = 210.0;
const LINE_ADVANCE: f32 = 20.0;
const OPTION_ADVANCE: f32 = 25.0;
const CITATION_RIGHT_INSET: f32 = 100.0;

/// A built block: primitives anchored at the requested origin plus the
/// height consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub primitives: Vec<Primitive>,
    pub height: f32,
}

/// Builds elements for one layout run.
pub struct ElementFactory<'a> {
    measurer: &'a dyn TextMeasurer,
    options: &'a FormatOptions,
    labels: &'static Labels,
    styles: StyleResolver,
    content_width: f32,
}

impl<'a> ElementFactory<'a> {
    /// Create a factory for the given options.
    pub fn new(measurer: &'a dyn TextMeasurer, options: &'a FormatOptions) -> Self {
        Self {
            measurer,
            options,
            labels: Labels::for_locale(options.locale),
            styles: StyleResolver::new(),
            content_width: content_width(options.columns),
        }
    }

    /// Width every element is laid out against.
    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    /// Build the element for a block at `origin`.
    ///
    /// Returns `None` for an untyped block with no content; such a block
    /// takes no space.
    pub fn build(&self, numbered: &NumberedBlock, origin: Point) -> Option<Element> {
        let block = &numbered.block;
        let style = self.styles.resolve(&block.kind, self.options);

        let (children, height) = match &block.kind {
            BlockKind::Question(question) => self.question(numbered, question, &style),
            BlockKind::Passage => self.passage(block, &style),
            BlockKind::Concept => self.concept(block, &style),
            BlockKind::Explanation => self.explanation(block, &style),
            BlockKind::Other => {
                if !block.has_content() {
                    debug!("Skipping block {}: no content", block.id);
                    return None;
                }
                self.plain(block, &style)
            }
        };

        Some(Element {
            primitives: vec![Primitive::Group {
                x: origin.x,
                y: origin.y,
                children,
            }],
            height,
        })
    }

    fn question(
        &self,
        numbered: &NumberedBlock,
        question: &Question,
        style: &Style,
    ) -> (Vec<Primitive>, f32) {
        let block = &numbered.block;
        let body_width = self.content_width - QUESTION_INDENT;
        let mut children = vec![self.run(numbered.label(), 0.0, 0.0, style.clone().bold())];
        let mut cy = 0.0;

        if block.has_content() {
            let (text_box, h) = self.text_box(&block.content, QUESTION_INDENT, cy, body_width, style);
            children.push(text_box);
            cy += h + CONTENT_GAP;
        }

        if let Some(image_ref) = &block.image_ref {
            children.push(Primitive::ImagePlaceholder {
                x: QUESTION_INDENT,
                y: cy,
                width: body_width,
                height: IMAGE_HEIGHT,
                image_ref: image_ref.clone(),
                style: ShapeStyle::stroke(RULE).with_fill(PLACEHOLDER_FILL),
            });
            cy += IMAGE_ADVANCE;
        }

        if let Some(text) = self
            .labels
            .difficulty_indicator(self.options.show_difficulty, block.difficulty)
        {
            let muted = style.clone().resized(-2.0).colored(MUTED);
            children.push(self.run(text, QUESTION_INDENT, cy, muted));
            cy += LINE_ADVANCE;
        }

        let option_width = self.content_width - OPTION_INDENT;
        for (i, option) in question.display_options().iter().enumerate() {
            let text = format!("{}) {}", i + 1, option);
            let (text_box, h) = self.text_box(&text, OPTION_INDENT, cy, option_width, style);
            children.push(text_box);
            cy += OPTION_ADVANCE.max(h + 5.0);
        }

        for _ in 0..question.answer_lines() {
            children.push(Primitive::Line {
                x1: QUESTION_INDENT,
                y1: cy,
                x2: self.content_width,
                y2: cy,
                style: ShapeStyle::stroke(RULE),
            });
            cy += LINE_ADVANCE;
        }

        if let Some(title) = self.citation_title(block) {
            let faint = style.clone().resized(-2.0).colored(FAINT);
            let text = self.labels.citation(title);
            let run = match self.options.source_position {
                SourcePosition::Left => self.run(text, QUESTION_INDENT, cy, faint),
                SourcePosition::Right => {
                    let width = self.measurer.line_width(&text, &faint);
                    let x = (self.content_width - CITATION_RIGHT_INSET)
                        .min(self.content_width - width)
                        .max(QUESTION_INDENT);
                    self.run(text, x, cy, faint)
                }
            };
            children.push(run);
            cy += LINE_ADVANCE;
        }

        cy += self.options.question_spacing.gap();
        (children, cy)
    }

    fn passage(&self, block: &Block, style: &Style) -> (Vec<Primitive>, f32) {
        let inner_width = self.content_width - 2.0 * style.padding;
        let (text_box, h) =
            self.text_box(&block.content, style.padding, style.padding, inner_width, style);
        let background_height = h + 2.0 * style.padding;
        let background = Primitive::Rect {
            x: 0.0,
            y: 0.0,
            width: self.content_width,
            height: background_height,
            style: ShapeStyle::stroke(PASSAGE_BORDER)
                .with_fill(style.background.unwrap_or(PASSAGE_FILL))
                .rounded(5.0),
        };
        (vec![background, text_box], background_height + 20.0)
    }

    fn concept(&self, block: &Block, style: &Style) -> (Vec<Primitive>, f32) {
        let marker = self.run(
            self.labels.concept_marker.to_string(),
            0.0,
            0.0,
            style.clone().bold().resized(2.0),
        );
        let (text_box, h) = self.text_box(&block.content, 0.0, 30.0, self.content_width, style);
        (vec![marker, text_box], h + 50.0)
    }

    fn explanation(&self, block: &Block, style: &Style) -> (Vec<Primitive>, f32) {
        let (text_box, h) =
            self.text_box(&block.content, 5.0, 25.0, self.content_width - 10.0, style);
        let border_height = h + 30.0;
        let border = Primitive::Rect {
            x: 0.0,
            y: 10.0,
            width: self.content_width,
            height: border_height,
            style: ShapeStyle::stroke(ACCENT).dashed(5.0, 5.0).rounded(3.0),
        };
        let badge = Primitive::Rect {
            x: 10.0,
            y: 0.0,
            width: 40.0,
            height: 20.0,
            style: ShapeStyle::fill(Color::WHITE),
        };
        let label = self.run(
            self.labels.explanation.to_string(),
            15.0,
            2.0,
            style
                .clone()
                .bold()
                .colored(ACCENT)
                .resized(-2.0),
        );
        (vec![border, badge, label, text_box], border_height + 30.0)
    }

    fn plain(&self, block: &Block, style: &Style) -> (Vec<Primitive>, f32) {
        let (text_box, h) = self.text_box(&block.content, 0.0, 0.0, self.content_width, style);
        (vec![text_box], h + 10.0)
    }

    fn citation_title<'b>(&self, block: &'b Block) -> Option<&'b str> {
        if !self.options.show_sources {
            return None;
        }
        non_blank(&block.material_title)
    }

    fn run(&self, text: String, x: f32, y: f32, style: Style) -> Primitive {
        let width = self.measurer.line_width(&text, &style);
        Primitive::TextRun {
            text,
            x,
            y,
            width,
            style,
        }
    }

    fn text_box(&self, text: &str, x: f32, y: f32, width: f32, style: &Style) -> (Primitive, f32) {
        let (lines, height) = self.measurer.measure_box(text, width, style);
        let text_box = Primitive::TextBox {
            text: text.to_string(),
            x,
            y,
            width,
            height,
            lines,
            style: style.clone(),
        };
        (text_box, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::FixedAdvanceMetrics;
    use crate::layout::options::{Columns, DifficultyDisplay, QuestionSpacing};
    use crate::model::{Difficulty, QuestionKind};

    fn numbered(block: Block, n: Option<u32>) -> NumberedBlock {
        NumberedBlock {
            block,
            display_number: n,
        }
    }

    fn children(element: &Element) -> &[Primitive] {
        match &element.primitives[0] {
            Primitive::Group { children, .. } => children,
            other => panic!("expected group, got {:?}", other),
        }
    }

    fn build(block: Block, options: &FormatOptions) -> Option<Element> {
        let metrics = FixedAdvanceMetrics::new();
        let factory = ElementFactory::new(&metrics, options);
        factory.build(&numbered(block, Some(1)), Point::new(54.0, 72.0))
    }

    #[test]
    fn test_group_is_anchored_at_origin() {
        let element = build(Block::passage("p", "text"), &FormatOptions::default()).unwrap();
        match &element.primitives[0] {
            Primitive::Group { x, y, .. } => {
                assert_eq!(*x, 54.0);
                assert_eq!(*y, 72.0);
            }
            _ => panic!("expected group"),
        }
    }

    #[test]
    fn test_question_height_is_cursor_delta() {
        // One-line content at 12pt: 12 * 1.13 = 13.56.
        let block = Block::question("q", Question::new(QuestionKind::ShortAnswer), "2 + 2 = ?");
        let options = FormatOptions::default();
        let element = build(block, &options).unwrap();

        let expected = 13.56 + 10.0 + 2.0 * 20.0 + 20.0;
        assert!((element.height - expected).abs() < 1e-3);

        let lines = children(&element)
            .iter()
            .filter(|p| matches!(p, Primitive::Line { .. }))
            .count();
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_question_label_is_bold_number() {
        let block = Block::question("q", Question::default(), "content");
        let element = build(block, &FormatOptions::default()).unwrap();
        match &children(&element)[0] {
            Primitive::TextRun { text, style, .. } => {
                assert_eq!(text, "1.");
                assert!(style.is_bold());
            }
            other => panic!("expected label run, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_question_content_skips_text_box() {
        let block = Block::question("q", Question::default(), "  ");
        let options = FormatOptions::default().with_spacing(QuestionSpacing::Narrow);
        let element = build(block, &options).unwrap();
        assert_eq!(children(&element).len(), 1);
        assert_eq!(element.height, 10.0);
    }

    #[test]
    fn test_multiple_choice_options_are_numbered() {
        let block = Block::question("q", Question::multiple_choice(["3", "4", "5", "6"]), "2+2?");
        let element = build(block, &FormatOptions::default()).unwrap();
        let texts: Vec<&str> = children(&element).iter().filter_map(Primitive::text).collect();
        assert!(texts.contains(&"1) 3"));
        assert!(texts.contains(&"4) 6"));
    }

    #[test]
    fn test_image_placeholder_and_difficulty() {
        let block = Block::question("q", Question::default(), "Look")
            .with_image("img/1.png")
            .with_difficulty(Difficulty::Easy);
        let options = FormatOptions::default().with_difficulty(DifficultyDisplay::Text);
        let element = build(block, &options).unwrap();
        let kids = children(&element);

        let placeholder = kids
            .iter()
            .find(|p| matches!(p, Primitive::ImagePlaceholder { .. }))
            .unwrap();
        if let Primitive::ImagePlaceholder {
            x, height, image_ref, ..
        } = placeholder
        {
            assert_eq!(*x, QUESTION_INDENT);
            assert_eq!(*height, IMAGE_HEIGHT);
            assert_eq!(image_ref, "img/1.png");
        }
        assert!(kids
            .iter()
            .filter_map(Primitive::text)
            .any(|t| t == "난이도: 쉬움"));
    }

    #[test]
    fn test_right_citation_stays_in_content_width() {
        let block = Block::question("q", Question::default(), "Q").with_source("A rather long textbook title");
        let options = FormatOptions::default()
            .with_sources(true)
            .with_source_position(SourcePosition::Right);
        let element = build(block, &options).unwrap();
        let bounds = element.primitives[0].bounds();
        assert!(bounds.right <= 54.0 + 500.0 + 1e-3);
    }

    #[test]
    fn test_passage_and_concept_heights() {
        let options = FormatOptions::default();
        let passage = build(Block::passage("p", "one line"), &options).unwrap();
        assert!((passage.height - (13.56 + 20.0 + 20.0)).abs() < 1e-3);

        let concept = build(Block::concept("c", "idea"), &options).unwrap();
        assert!((concept.height - (13.56 + 50.0)).abs() < 1e-3);
        assert_eq!(children(&concept)[0].text(), Some("💡 핵심 개념"));
    }

    #[test]
    fn test_explanation_has_dashed_border_and_badge() {
        let element = build(Block::explanation("e", "why"), &FormatOptions::default()).unwrap();
        let kids = children(&element);
        assert_eq!(kids.len(), 4);
        match &kids[0] {
            Primitive::Rect { style, .. } => assert_eq!(style.dash, Some([5.0, 5.0])),
            other => panic!("expected border, got {:?}", other),
        }
        assert_eq!(kids[2].text(), Some("해설"));
        // 10pt text: 11.3 + 30 + 30.
        assert!((element.height - 71.3).abs() < 1e-3);
    }

    #[test]
    fn test_blank_other_block_is_skipped() {
        assert!(build(Block::other("o", ""), &FormatOptions::default()).is_none());
        assert!(build(Block::other("o", "note"), &FormatOptions::default()).is_some());
    }

    #[test]
    fn test_children_stay_within_content_width() {
        let options = FormatOptions::default().with_columns(Columns::Two);
        let long = "word ".repeat(200);
        let blocks = vec![
            Block::question("q", Question::multiple_choice([long.clone()]), long.clone())
                .with_image("x"),
            Block::passage("p", long.clone()),
            Block::concept("c", long.clone()),
            Block::explanation("e", long.clone()),
            Block::other("o", long),
        ];
        for block in blocks {
            let element = build(block, &options).unwrap();
            let b = element.primitives[0].bounds();
            assert!(b.left >= 54.0 - 1e-3);
            assert!(b.right <= 54.0 + 250.0 + 1e-3, "right edge {}", b.right);
        }
    }
}
