//! Test header and answer key pages.
//!
//! Both are produced outside the pagination loop and attached to the
//! document as a leading or trailing page of absolute-positioned
//! primitives.

use super::geometry::{PageSize, MARGINS};
use super::labels::Labels;
use super::measure::TextMeasurer;
use super::numbering::assign;
use super::style::TITLE_FONT_SIZE;
use crate::model::{non_blank, Block, Color, Primitive, ShapeStyle, Style, TestInfo, TextAlign};

const HEADER_TITLE_SIZE: f32 = 20.0;
const META_SIZE: f32 = 12.0;
const INSTRUCTION_SIZE: f32 = 11.0;
const INSTRUCTION_TOP: f32 = 100.0;
/// Minimum space between the instructions and the divider.
const INSTRUCTION_GAP: f32 = 6.0;
const NAME_BOX_WIDTH: f32 = 200.0;
const NAME_BOX_HEIGHT: f32 = 25.0;
const DIVIDER_Y: f32 = 120.0;

const ANSWER_TOP: f32 = 80.0;
const ANSWER_COLUMN_WIDTH: f32 = 250.0;
const ANSWER_ROW_HEIGHT: f32 = 25.0;

/// Join the present metadata fields with `" | "`.
///
/// `with_time` adds the time limit; the header prints it, text exports do
/// not.
pub fn metadata_line(info: &TestInfo, labels: &Labels, with_time: bool) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(subject) = non_blank(&info.subject) {
        parts.push(format!("{}: {}", labels.subject, subject));
    }
    if let Some(grade) = non_blank(&info.grade) {
        parts.push(format!("{}: {}", labels.grade, grade));
    }
    if let Some(date) = non_blank(&info.date) {
        parts.push(format!("{}: {}", labels.date, date));
    }
    if with_time {
        if let Some(minutes) = info.time {
            parts.push(format!("{}: {}{}", labels.time, minutes, labels.minutes_suffix));
        }
    }
    (!parts.is_empty()).then(|| parts.join(" | "))
}

/// Builds the header and answer key pages.
pub struct HeaderGenerator<'a> {
    measurer: &'a dyn TextMeasurer,
    labels: &'static Labels,
}

impl<'a> HeaderGenerator<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, labels: &'static Labels) -> Self {
        Self { measurer, labels }
    }

    /// Title, metadata line, student name box, instructions and divider.
    pub fn header(&self, info: &TestInfo, page_size: PageSize) -> Vec<Primitive> {
        let width = page_size.width();
        let center = width / 2.0;
        let title = non_blank(&info.title).unwrap_or(self.labels.default_test_title);

        let mut primitives = vec![self.run(
            title,
            center,
            30.0,
            Style::plain(HEADER_TITLE_SIZE)
                .bold()
                .aligned(TextAlign::Center),
        )];

        if let Some(meta) = metadata_line(info, self.labels, true) {
            primitives.push(self.run(
                &meta,
                center,
                60.0,
                Style::plain(META_SIZE).aligned(TextAlign::Center),
            ));
        }

        let box_left = width - MARGINS.right - NAME_BOX_WIDTH;
        primitives.push(Primitive::Rect {
            x: box_left,
            y: 30.0,
            width: NAME_BOX_WIDTH,
            height: NAME_BOX_HEIGHT,
            style: ShapeStyle::stroke(Color::BLACK),
        });
        primitives.push(self.run(
            self.labels.student_name,
            box_left + 10.0,
            35.0,
            Style::plain(META_SIZE),
        ));

        let instructions =
            non_blank(&info.instructions).unwrap_or(self.labels.default_instructions);
        let style = Style::plain(INSTRUCTION_SIZE);
        let box_width = width - MARGINS.left - MARGINS.right;
        let (lines, height) = self.measurer.measure_box(instructions, box_width, &style);
        primitives.push(Primitive::TextBox {
            text: instructions.to_string(),
            x: MARGINS.left,
            y: INSTRUCTION_TOP,
            width: box_width,
            height,
            lines,
            style,
        });

        // Long instructions push the divider down.
        let divider_y = DIVIDER_Y.max(INSTRUCTION_TOP + height + INSTRUCTION_GAP);
        primitives.push(Primitive::Line {
            x1: MARGINS.left,
            y1: divider_y,
            x2: width - MARGINS.right,
            y2: divider_y,
            style: ShapeStyle::stroke(Color::BLACK),
        });

        primitives
    }

    /// Title plus a two-column list of question answers.
    ///
    /// Rows are numbered by question, matching the display numbers of the
    /// laid-out document.
    pub fn answer_key(&self, blocks: &[Block], page_size: PageSize) -> Vec<Primitive> {
        let mut primitives = vec![self.run(
            self.labels.answer_key_title,
            page_size.width() / 2.0,
            30.0,
            Style::plain(TITLE_FONT_SIZE)
                .bold()
                .aligned(TextAlign::Center),
        )];

        let mut y = ANSWER_TOP;
        let numbered = assign(blocks);
        let questions = numbered.iter().filter_map(|nb| {
            nb.block
                .as_question()
                .map(|q| (nb.display_number.unwrap_or_default(), q))
        });
        for (i, (number, question)) in questions.enumerate() {
            let answer = non_blank(&question.correct_answer).unwrap_or(self.labels.undetermined);
            let x = MARGINS.left + (i % 2) as f32 * ANSWER_COLUMN_WIDTH;
            primitives.push(self.run(
                &format!("{}. {}", number, answer),
                x,
                y,
                Style::plain(META_SIZE),
            ));
            if i % 2 == 1 {
                y += ANSWER_ROW_HEIGHT;
            }
        }

        primitives
    }

    fn run(&self, text: &str, x: f32, y: f32, style: Style) -> Primitive {
        Primitive::TextRun {
            text: text.to_string(),
            x,
            y,
            width: self.measurer.line_width(text, &style),
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::FixedAdvanceMetrics;
    use crate::layout::options::Locale;
    use crate::model::Question;

    fn generator(metrics: &FixedAdvanceMetrics) -> HeaderGenerator<'_> {
        HeaderGenerator::new(metrics, Labels::for_locale(Locale::Ko))
    }

    #[test]
    fn test_metadata_line() {
        let labels = Labels::for_locale(Locale::Ko);
        let info = TestInfo::new()
            .with_subject("수학")
            .with_date("2024-05-01")
            .with_time(50);
        assert_eq!(
            metadata_line(&info, labels, true).as_deref(),
            Some("과목: 수학 | 일시: 2024-05-01 | 시간: 50분")
        );
        assert_eq!(
            metadata_line(&info, labels, false).as_deref(),
            Some("과목: 수학 | 일시: 2024-05-01")
        );
        assert_eq!(metadata_line(&TestInfo::new(), labels, true), None);
    }

    #[test]
    fn test_header_layout() {
        let metrics = FixedAdvanceMetrics::new();
        let header = generator(&metrics).header(&TestInfo::new(), PageSize::A4);

        // Title, name box, name label, instructions, divider.
        assert_eq!(header.len(), 5);
        assert_eq!(header[0].text(), Some("시험지"));
        match &header[1] {
            Primitive::Rect { x, y, width, .. } => {
                assert_eq!(*x, 595.0 - 54.0 - 200.0);
                assert_eq!(*y, 30.0);
                assert_eq!(*width, 200.0);
            }
            other => panic!("expected name box, got {:?}", other),
        }
        match &header[4] {
            Primitive::Line { x1, x2, y1, .. } => {
                assert_eq!((*x1, *x2, *y1), (54.0, 541.0, 120.0));
            }
            other => panic!("expected divider, got {:?}", other),
        }
    }

    #[test]
    fn test_long_instructions_wrap_inside_margins() {
        let metrics = FixedAdvanceMetrics::new();
        let info = TestInfo::new().with_instructions(
            "Read every question carefully before answering. ".repeat(8),
        );
        let header = generator(&metrics).header(&info, PageSize::A4);

        let right = 595.0 - 54.0;
        let divider_y = match &header[4] {
            Primitive::Line { y1, .. } => *y1,
            other => panic!("expected divider, got {:?}", other),
        };
        match &header[3] {
            Primitive::TextBox {
                x,
                y,
                width,
                height,
                lines,
                style,
                ..
            } => {
                assert_eq!((*x, *y), (54.0, 100.0));
                assert!(lines.len() > 1);
                for line in lines {
                    assert!(x + metrics.line_width(line, style) <= right + 1e-3);
                }
                assert!(divider_y > y + height);
            }
            other => panic!("expected instruction box, got {:?}", other),
        }
        assert!(divider_y > 120.0);
    }

    #[test]
    fn test_header_title_is_centered() {
        let metrics = FixedAdvanceMetrics::new();
        let info = TestInfo::new().with_title("Midterm").with_grade("3");
        let header = generator(&metrics).header(&info, PageSize::B4);
        let b = header[0].bounds();
        assert!(((b.left + b.right) / 2.0 - 729.0 / 2.0).abs() < 1e-3);
        assert_eq!(header[1].text(), Some("학년: 3"));
    }

    #[test]
    fn test_answer_key_rows() {
        let metrics = FixedAdvanceMetrics::new();
        let blocks = vec![
            Block::question("q1", Question::default().with_answer("3"), "a"),
            Block::passage("p", "text"),
            Block::question("q2", Question::default(), "b"),
            Block::question("q3", Question::default().with_answer("x = 2"), "c"),
        ];
        let key = generator(&metrics).answer_key(&blocks, PageSize::A4);
        assert_eq!(key[0].text(), Some("정답지"));

        let rows: Vec<(String, f32, f32)> = key[1..]
            .iter()
            .map(|p| match p {
                Primitive::TextRun { text, x, y, .. } => (text.clone(), *x, *y),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("1. 3".to_string(), 54.0, 80.0),
                ("2. 미정".to_string(), 304.0, 80.0),
                ("3. x = 2".to_string(), 54.0, 105.0),
            ]
        );
    }
}
