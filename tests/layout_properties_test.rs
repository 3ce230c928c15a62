//! Integration tests for layout invariants.

use printsheet::layout::{content_width, PageGeometry, MARGINS};
use printsheet::{
    compute_layout, Block, Columns, DifficultyDisplay, Document, FormatOptions, PageSize, Question,
    QuestionKind,
};

fn essay(id: &str, content: &str) -> Block {
    Block::question(id, Question::new(QuestionKind::Essay), content)
}

fn long_sheet(count: usize) -> Vec<Block> {
    (0..count)
        .map(|i| match i % 4 {
            0 => Block::passage(format!("p{}", i), "지문 내용 ".repeat(20)),
            1 => Block::question(
                format!("q{}", i),
                Question::multiple_choice(["하나", "둘", "셋", "넷", "다섯"]),
                format!("Question {}", i),
            ),
            2 => essay(&format!("e{}", i), "Describe the process in detail."),
            _ => Block::concept(format!("c{}", i), "Key idea"),
        })
        .collect()
}

fn numbers(doc: &Document) -> Vec<Option<u32>> {
    doc.blocks.iter().map(|b| b.display_number).collect()
}

#[test]
fn test_layout_is_deterministic() {
    let blocks = long_sheet(30);
    let options = FormatOptions::new().with_columns(Columns::Two);
    let first = compute_layout(&blocks, &options);
    let second = compute_layout(&blocks, &options);
    assert_eq!(first, second);
}

#[test]
fn test_input_order_is_preserved() {
    let blocks = long_sheet(30);
    let doc = compute_layout(&blocks, &FormatOptions::default());

    let placed: Vec<&str> = doc.nodes().map(|n| n.block_id.as_str()).collect();
    let expected: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(placed, expected);
    assert_eq!(doc.block_order(), expected);
}

#[test]
fn test_numbering_ignores_geometry() {
    let blocks = long_sheet(30);
    let baseline = numbers(&compute_layout(&blocks, &FormatOptions::default()));

    for page_size in [PageSize::A4, PageSize::A3, PageSize::B4, PageSize::B3] {
        for columns in [Columns::One, Columns::Two] {
            let options = FormatOptions::new()
                .with_page_size(page_size)
                .with_columns(columns);
            assert_eq!(numbers(&compute_layout(&blocks, &options)), baseline);
        }
    }
}

#[test]
fn test_pages_are_non_decreasing() {
    let doc = compute_layout(&long_sheet(60), &FormatOptions::default());
    assert!(doc.page_count() > 1);

    let pages: Vec<usize> = doc.nodes().map(|n| n.page_index).collect();
    assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    for (i, page) in doc.pages.iter().enumerate() {
        assert_eq!(page.index, i);
        assert!(!page.is_empty());
    }
}

#[test]
fn test_nodes_start_inside_the_work_area() {
    let options = FormatOptions::new().with_columns(Columns::Two);
    let doc = compute_layout(&long_sheet(60), &options);
    let geometry = PageGeometry::new(PageSize::A4, Columns::Two);

    for node in doc.nodes() {
        assert!(node.column_index < 2);
        assert_eq!(node.origin.x, geometry.column_x(node.column_index));
        assert!(node.origin.y >= MARGINS.top);
    }
}

#[test]
fn test_second_column_overhangs_right_margin() {
    let options = FormatOptions::new().with_columns(Columns::Two);
    let doc = compute_layout(&long_sheet(60), &options);
    let geometry = PageGeometry::new(PageSize::A4, Columns::Two);

    let second = doc
        .nodes()
        .find(|n| n.column_index == 1)
        .expect("second column used");
    assert_eq!(second.origin.x, 317.5);

    // The gap sits on top of the column share, so the right edge passes
    // the printable area.
    let right = second.origin.x + content_width(Columns::Two);
    assert!(right > geometry.printable_right());
}

#[test]
fn test_mixed_sheet_scenario() {
    let blocks = vec![
        Block::question(
            "1",
            Question::multiple_choice(["1", "2", "3", "4"]),
            "Which is prime?",
        ),
        Block::question("2", Question::new(QuestionKind::ShortAnswer), "2 + 2 = ?"),
        Block::passage("3", "Once upon a time."),
        Block::concept("4", "Prime numbers have two divisors."),
        essay("5", "Explain why."),
    ];
    let options = FormatOptions::new().with_difficulty(DifficultyDisplay::Text);
    let doc = compute_layout(&blocks, &options);

    assert_eq!(
        numbers(&doc),
        vec![Some(1), Some(2), None, None, Some(3)]
    );
    assert_eq!(doc.node_count(), 5);

    let placed: Vec<(usize, f32)> = doc.nodes().map(|n| (n.page_index, n.origin.y)).collect();
    for pair in placed.windows(2) {
        let ((page_a, y_a), (page_b, y_b)) = (pair[0], pair[1]);
        assert!(page_a <= page_b);
        if page_a == page_b {
            assert!(y_a < y_b);
        }
    }
}

#[test]
fn test_empty_input_has_no_pages() {
    let doc = compute_layout(&[], &FormatOptions::default());
    assert!(doc.is_empty());
    assert_eq!(doc.page_count(), 0);
}

#[test]
fn test_oversize_block_never_leaves_an_empty_page() {
    let huge = Block::passage("big", "가".repeat(20_000));
    let blocks = vec![essay("q1", "before"), huge, essay("q2", "after")];
    let doc = compute_layout(&blocks, &FormatOptions::default());

    assert_eq!(doc.node_count(), 3);
    assert!(doc.pages.iter().all(|p| !p.is_empty()));
}
