//! Column and page placement.
//!
//! Pagination is a fold over the numbered blocks. Each step consumes the
//! previous [`PaginationState`] and returns the next one; the overflow
//! decision itself is the pure [`transition`] function.

use super::element::ElementFactory;
use super::geometry::PageGeometry;
use crate::model::{LayoutNode, NumberedBlock, Page, Point};
use log::debug;

/// Placement decision for the next block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The block fits below the cursor
    Fits,
    /// Move to the top of the next column on the same page
    NextColumn,
    /// Flush the page and start at the first column of a new page
    NextPage,
}

/// Insertion point for the next block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page_index: usize,
    pub column: usize,
    pub y: f32,
    /// Nodes already placed in the current column
    pub placed_in_column: usize,
}

impl Cursor {
    /// Top of the first column of the first page.
    pub fn start(geometry: &PageGeometry) -> Self {
        Self {
            page_index: 0,
            column: 0,
            y: geometry.margins.top,
            placed_in_column: 0,
        }
    }

    /// Top-left corner of the cursor on the page.
    pub fn position(&self, geometry: &PageGeometry) -> Point {
        Point::new(geometry.column_x(self.column), self.y)
    }

    fn advance(self, transition: Transition, geometry: &PageGeometry) -> Self {
        match transition {
            Transition::Fits => self,
            Transition::NextColumn => Self {
                column: self.column + 1,
                y: geometry.margins.top,
                placed_in_column: 0,
                ..self
            },
            Transition::NextPage => Self {
                page_index: self.page_index + 1,
                ..Self::start(geometry)
            },
        }
    }
}

/// Decide where a block of `height` goes.
///
/// A block that overflows an empty column is placed anyway: moving it would
/// only leave an empty column behind, and blocks are never split. This holds
/// for the first column too, so a too-tall first block of a two-column page
/// stays in column 0 and the next block opens column 1.
pub fn transition(cursor: &Cursor, height: f32, geometry: &PageGeometry) -> Transition {
    if cursor.placed_in_column == 0 || cursor.y + height <= geometry.bottom_limit() {
        Transition::Fits
    } else if cursor.column + 1 < geometry.columns {
        Transition::NextColumn
    } else {
        Transition::NextPage
    }
}

/// Fold accumulator: the cursor, the page being filled and finished pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    pub cursor: Cursor,
    pub current: Page,
    pub pages: Vec<Page>,
}

impl PaginationState {
    /// Empty state at the top of the first page.
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            cursor: Cursor::start(geometry),
            current: Page::new(0, geometry.width, geometry.height),
            pages: Vec::new(),
        }
    }

    /// Place one block and return the next state.
    pub fn step(
        self,
        numbered: &NumberedBlock,
        factory: &ElementFactory<'_>,
        geometry: &PageGeometry,
    ) -> Self {
        let block_id = &numbered.block.id;
        let here = self.cursor.position(geometry);
        let Some(element) = factory.build(numbered, here) else {
            return self;
        };

        let Self {
            cursor,
            mut current,
            mut pages,
        } = self;

        let decision = transition(&cursor, element.height, geometry);
        let cursor = cursor.advance(decision, geometry);
        match decision {
            Transition::Fits => {}
            Transition::NextColumn => {
                debug!("Block {} starts column {}", block_id, cursor.column);
            }
            Transition::NextPage => {
                debug!("Block {} starts page {}", block_id, cursor.page_index);
                pages.push(current);
                current = Page::new(cursor.page_index, geometry.width, geometry.height);
            }
        }

        let origin = cursor.position(geometry);
        let (dx, dy) = (origin.x - here.x, origin.y - here.y);
        current.nodes.push(LayoutNode {
            block_id: block_id.clone(),
            page_index: cursor.page_index,
            column_index: cursor.column,
            origin,
            height: element.height,
            primitives: element
                .primitives
                .into_iter()
                .map(|p| p.translated(dx, dy))
                .collect(),
        });

        Self {
            cursor: Cursor {
                y: cursor.y + element.height,
                placed_in_column: cursor.placed_in_column + 1,
                ..cursor
            },
            current,
            pages,
        }
    }

    /// Flush the trailing page if it holds anything.
    pub fn finish(self) -> Vec<Page> {
        let mut pages = self.pages;
        if !self.current.is_empty() {
            pages.push(self.current);
        }
        pages
    }
}

/// Places numbered blocks into pages and columns.
pub struct PaginationEngine<'a> {
    factory: ElementFactory<'a>,
    geometry: PageGeometry,
}

impl<'a> PaginationEngine<'a> {
    pub fn new(factory: ElementFactory<'a>, geometry: PageGeometry) -> Self {
        Self { factory, geometry }
    }

    /// Geometry the engine places against.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Paginate the blocks in input order.
    pub fn paginate(&self, blocks: &[NumberedBlock]) -> Vec<Page> {
        let pages = blocks
            .iter()
            .fold(PaginationState::new(&self.geometry), |state, block| {
                state.step(block, &self.factory, &self.geometry)
            })
            .finish();
        debug!("Paginated {} blocks into {} pages", blocks.len(), pages.len());
        pages
    }
}
