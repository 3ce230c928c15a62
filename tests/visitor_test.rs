//! Integration tests for the block visitor.

use printsheet::layout::assign;
use printsheet::model::NumberedBlock;
use printsheet::render::{collect_stats, walk, BlockVisitor, StatsVisitor};
use printsheet::{Block, Question, QuestionKind};

/// Custom visitor that tracks visit counts.
#[derive(Default)]
struct CountingVisitor {
    questions: Vec<u32>,
    passage_count: usize,
    concept_count: usize,
    explanation_count: usize,
    other_count: usize,
    started: bool,
    ended: bool,
}

impl BlockVisitor for CountingVisitor {
    fn visit_question(&mut self, block: &NumberedBlock, _question: &Question) {
        self.questions.extend(block.display_number);
    }

    fn visit_passage(&mut self, _block: &Block) {
        self.passage_count += 1;
    }

    fn visit_concept(&mut self, _block: &Block) {
        self.concept_count += 1;
    }

    fn visit_explanation(&mut self, _block: &Block) {
        self.explanation_count += 1;
    }

    fn visit_other(&mut self, _block: &Block) {
        self.other_count += 1;
    }

    fn on_start(&mut self) {
        self.started = true;
    }

    fn on_end(&mut self) {
        self.ended = true;
    }
}

fn blocks() -> Vec<NumberedBlock> {
    assign(&[
        Block::passage("p1", "A short passage."),
        Block::question("q1", Question::multiple_choice(["a", "b", "c"]), "First?"),
        Block::concept("c1", "An idea"),
        Block::other("o1", "   "),
        Block::other("o2", "Loose note"),
        Block::question("q2", Question::new(QuestionKind::Essay), "Second?")
            .with_image("diagram.png"),
        Block::explanation("x1", "Why it works"),
    ])
}

#[test]
fn test_counting_visitor() {
    let mut visitor = CountingVisitor::default();
    walk(&blocks(), &mut visitor);

    assert!(visitor.started);
    assert!(visitor.ended);
    assert_eq!(visitor.questions, vec![1, 2]);
    assert_eq!(visitor.passage_count, 1);
    assert_eq!(visitor.concept_count, 1);
    assert_eq!(visitor.explanation_count, 1);
    // The blank untyped block is skipped.
    assert_eq!(visitor.other_count, 1);
}

#[test]
fn test_walk_empty() {
    let mut visitor = CountingVisitor::default();
    walk(&[], &mut visitor);

    assert!(visitor.started);
    assert!(visitor.ended);
    assert!(visitor.questions.is_empty());
}

#[test]
fn test_walk_through_trait_object() {
    let mut visitor = CountingVisitor::default();
    {
        let dynamic: &mut dyn BlockVisitor = &mut visitor;
        walk(&blocks(), dynamic);
    }
    assert_eq!(visitor.questions.len(), 2);
}

#[test]
fn test_stats_visitor() {
    let mut visitor = StatsVisitor::new();
    walk(&blocks(), &mut visitor);
    let stats = visitor.into_stats();

    assert_eq!(stats.question_count, 2);
    assert_eq!(stats.passage_count, 1);
    assert_eq!(stats.concept_count, 1);
    assert_eq!(stats.explanation_count, 1);
    assert_eq!(stats.option_count, 3);
    assert_eq!(stats.image_count, 1);
    assert_eq!(stats.block_count, 6);
    assert!(stats.answer_line_count > 0);
    assert_eq!(stats, collect_stats(&blocks()));
}
