//! Paginated layout result.

use super::{Block, Bounds, NumberedBlock, Primitive, TestInfo};
use crate::layout::{FormatOptions, PageSize};
use serde::{Deserialize, Serialize};

/// A point on the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A block's resolved placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Id of the source block
    pub block_id: String,

    /// 0-based page the node sits on
    pub page_index: usize,

    /// 0-based column within the page
    pub column_index: usize,

    /// Top-left corner of the block on the page
    pub origin: Point,

    /// Vertical space consumed, including trailing spacing
    pub height: f32,

    /// Drawable content; groups are anchored at `origin`
    pub primitives: Vec<Primitive>,
}

impl LayoutNode {
    /// Leaf primitives in absolute page coordinates.
    pub fn absolute_primitives(&self) -> Vec<Primitive> {
        self.primitives.iter().flat_map(Primitive::flatten).collect()
    }

    /// Extent of everything drawn by the node.
    pub fn bounds(&self) -> Option<Bounds> {
        self.primitives
            .iter()
            .map(Primitive::bounds)
            .reduce(Bounds::union)
    }
}

/// One page of the paginated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 0-based page index
    pub index: usize,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Nodes in placement order
    pub nodes: Vec<LayoutNode>,
}

impl Page {
    /// Create an empty page.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            nodes: Vec::new(),
        }
    }

    /// Check if the page has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the page.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All leaf primitives on the page, in paint order.
    pub fn primitives(&self) -> Vec<Primitive> {
        self.nodes
            .iter()
            .flat_map(LayoutNode::absolute_primitives)
            .collect()
    }
}

/// Full result of one layout computation.
///
/// A document is built fresh per call and owns everything a renderer
/// needs: the numbered blocks, the pages, and optional header and answer
/// key pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Options the layout was computed with
    pub format: FormatOptions,

    /// Test metadata for headers and title slides
    pub test_info: TestInfo,

    /// Input blocks with display numbers, in input order
    pub blocks: Vec<NumberedBlock>,

    /// Paginated content
    pub pages: Vec<Page>,

    /// Leading header page primitives
    pub header: Option<Vec<Primitive>>,

    /// Trailing answer-key page primitives
    pub answer_key: Option<Vec<Primitive>>,
}

impl Document {
    /// Create an empty document for the given options.
    pub fn new(format: FormatOptions) -> Self {
        Self {
            format,
            test_info: TestInfo::default(),
            blocks: Vec::new(),
            pages: Vec::new(),
            header: None,
            answer_key: None,
        }
    }

    /// Page size the document was laid out for.
    pub fn page_size(&self) -> PageSize {
        self.format.page_size
    }

    /// Number of content pages (header and answer key excluded).
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if there are no content pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate over all nodes in page, column and placement order.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.pages.iter().flat_map(|p| p.nodes.iter())
    }

    /// Total number of placed nodes.
    pub fn node_count(&self) -> usize {
        self.pages.iter().map(Page::node_count).sum()
    }

    /// Block ids in placement order.
    pub fn block_order(&self) -> Vec<&str> {
        self.nodes().map(|n| n.block_id.as_str()).collect()
    }

    /// Look up a numbered block by id.
    pub fn get_block(&self, id: &str) -> Option<&NumberedBlock> {
        self.blocks.iter().find(|b| b.block.id == id)
    }

    /// Question blocks in input order.
    pub fn questions(&self) -> impl Iterator<Item = &NumberedBlock> {
        self.blocks.iter().filter(|b| b.block.is_question())
    }

    /// Number of question blocks.
    pub fn question_count(&self) -> usize {
        self.questions().count()
    }

    /// Input blocks, unnumbered.
    pub fn source_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().map(|b| &b.block)
    }

    /// Attach a leading header page.
    pub fn with_header(mut self, header: Vec<Primitive>) -> Self {
        self.header = Some(header);
        self
    }

    /// Attach a trailing answer-key page.
    pub fn with_answer_key(mut self, answer_key: Vec<Primitive>) -> Self {
        self.answer_key = Some(answer_key);
        self
    }

    /// Attach test metadata.
    pub fn with_test_info(mut self, info: TestInfo) -> Self {
        self.test_info = info;
        self
    }
}
