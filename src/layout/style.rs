//! Mapping from block type and format options to a visual style.

use super::options::{FontSize, FormatOptions};
use crate::model::{BlockKind, Color, Style};

/// Title font size (answer key title).
pub const TITLE_FONT_SIZE: f32 = 18.0;

pub const MUTED: Color = Color::hex(0x666666);
pub const FAINT: Color = Color::hex(0x999999);
pub const ACCENT: Color = Color::hex(0x1a73e8);
pub const PASSAGE_TEXT: Color = Color::hex(0x333333);
pub const PASSAGE_FILL: Color = Color::hex(0xf5f5f5);
pub const PASSAGE_BORDER: Color = Color::hex(0xe0e0e0);
pub const RULE: Color = Color::hex(0xcccccc);
pub const PLACEHOLDER_FILL: Color = Color::hex(0xf0f0f0);

/// Point size for a font size preset.
pub fn font_size_points(size: FontSize) -> f32 {
    match size {
        FontSize::Small => 10.0,
        FontSize::Medium => 12.0,
        FontSize::Large => 14.0,
    }
}

/// Resolves block styles. Stateless; kept as a type so renderers can hold
/// one alongside their other collaborators.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleResolver;

impl StyleResolver {
    pub fn new() -> Self {
        Self
    }

    /// Style for a block kind under the given options.
    pub fn resolve(&self, kind: &BlockKind, options: &FormatOptions) -> Style {
        let base = Style::plain(font_size_points(options.font_size));
        match kind {
            BlockKind::Question(_) => base,
            BlockKind::Passage => {
                let mut style = base.colored(PASSAGE_TEXT);
                style.background = Some(PASSAGE_FILL);
                style.padding = 10.0;
                style
            }
            BlockKind::Concept => base.bold().colored(ACCENT),
            BlockKind::Explanation => base.resized(-2.0).italic().colored(MUTED),
            BlockKind::Other => base,
        }
    }
}
