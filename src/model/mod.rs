//! Document model types.
//!
//! This module defines the input blocks, the format-agnostic primitives the
//! layout engine emits, and the paginated [`Document`] every renderer
//! consumes.

mod block;
mod document;
mod primitive;
mod test_info;

pub use block::{Block, BlockKind, Difficulty, NumberedBlock, Question, QuestionKind};
pub use document::{Document, LayoutNode, Page, Point};
pub use primitive::{
    Bounds, Color, FontWeight, Primitive, ShapeStyle, Style, TextAlign, SINGLE_LINE_FACTOR,
};
pub use test_info::TestInfo;

pub(crate) use test_info::non_blank;
