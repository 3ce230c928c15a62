//! Question numbering, run before pagination.

use crate::model::{Block, NumberedBlock};

/// Pair each block with its display number.
///
/// A single left-to-right pass; only questions consume a number, starting
/// at 1. Numbers depend on input order alone, never on page geometry.
pub fn assign(blocks: &[Block]) -> Vec<NumberedBlock> {
    blocks
        .iter()
        .scan(0u32, |counter, block| {
            let display_number = if block.is_question() {
                *counter += 1;
                Some(*counter)
            } else {
                None
            };
            Some(NumberedBlock {
                block: block.clone(),
                display_number,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    #[test]
    fn test_only_questions_are_numbered() {
        let blocks = vec![
            Block::passage("p1", "read"),
            Block::question("q1", Question::default(), "a"),
            Block::concept("c1", "idea"),
            Block::question("q2", Question::default(), "b"),
        ];
        let numbered = assign(&blocks);
        let numbers: Vec<Option<u32>> = numbered.iter().map(|b| b.display_number).collect();
        assert_eq!(numbers, vec![None, Some(1), None, Some(2)]);
        assert_eq!(numbered[3].label(), "2.");
    }

    #[test]
    fn test_blocks_are_unchanged() {
        let blocks = vec![Block::question("q", Question::default(), "x").with_source("book")];
        let numbered = assign(&blocks);
        assert_eq!(numbered[0].block, blocks[0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(assign(&[]).is_empty());
    }
}
