//! Renderer adapters turning a laid-out document into export artifacts.
//!
//! Every adapter reads the same numbered [`Document`](crate::model::Document),
//! so ordering and numbering agree across formats.

mod docx;
#[cfg(feature = "docx")]
mod docx_package;
#[cfg(feature = "raster")]
mod fonts;
mod json;
pub mod raster;
mod result;
#[cfg(feature = "raster")]
mod skia;
mod slides;
mod text;
pub mod visitor;

pub use docx::{
    word_paragraphs, Alignment, DocxCapability, ParagraphBuilder, ParagraphRole, Unavailable,
    WordOutput, WordParagraph, WordRenderer, WordRun,
};
#[cfg(feature = "raster")]
pub use fonts::{FontFace, FontLibrary};
pub use json::{to_json, JsonFormat};
pub use raster::{
    fit_scale, DrawingSurface, FileImageSource, ImageSource, MemoryImageSource, NoImages,
    PageKind, RasterPage, RasterRenderer, RecordingSurface,
};
pub use result::{ExportArtifact, RenderStats};
#[cfg(feature = "raster")]
pub use skia::SkiaSurface;
pub use slides::{slides, to_html_slides, Slide, SlideBuilder, SlideQuestion, QUESTIONS_PER_SLIDE};
pub use text::{text_lines, to_text, TextFlavor, TextRenderer};
pub use visitor::{collect_stats, walk, BlockVisitor, StatsVisitor};
