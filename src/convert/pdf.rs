//! Paged image exporter.
//!
//! Produces one PNG per page, ready for an external PDF packer: the
//! optional header page first, then the content pages, then the optional
//! answer key.

use super::{ExportOptions, ExportResult, Exporter, DEFAULT_STEM};
use crate::error::Result;
use crate::layout::LayoutEngine;
use crate::model::{Block, Document};
use crate::render::{
    collect_stats, ExportArtifact, FileImageSource, FontFace, FontLibrary, ImageSource, NoImages,
    PageKind, RasterRenderer, SkiaSurface,
};
use log::{debug, warn};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Rasterizes document pages into PNG images.
#[derive(Debug, Clone, Default)]
pub struct PagedImageExporter {
    image_root: Option<PathBuf>,
    font_dir: Option<PathBuf>,
    skip_system_fonts: bool,
    font: OnceLock<Option<FontFace>>,
}

impl PagedImageExporter {
    /// Exporter without an image source; image placeholders stay empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve image references as files under `root`.
    pub fn with_image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.image_root = Some(root.into());
        self
    }

    /// Also search `dir` for fonts.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dir = Some(dir.into());
        self.font = OnceLock::new();
        self
    }

    /// Only use fonts from the font directory.
    pub fn without_system_fonts(mut self) -> Self {
        self.skip_system_fonts = true;
        self.font = OnceLock::new();
        self
    }

    /// Face used for glyph outlines, loaded on first use.
    fn font(&self) -> Option<FontFace> {
        self.font
            .get_or_init(|| {
                let mut library = if self.skip_system_fonts {
                    FontLibrary::new()
                } else {
                    FontLibrary::system()
                };
                if let Some(dir) = &self.font_dir {
                    library = library.with_font_dir(dir);
                }
                let face = library.resolve();
                if face.is_none() {
                    warn!("No usable font found; glyphs are drawn as boxes");
                }
                face
            })
            .clone()
    }

    fn image_source(&self) -> Box<dyn ImageSource> {
        match &self.image_root {
            Some(root) => Box::new(FileImageSource::new(root.clone())),
            None => Box::new(NoImages),
        }
    }
}

/// Attach header and answer-key primitives the options ask for but the
/// document lacks.
fn with_extra_pages<'a>(doc: &'a Document, options: &ExportOptions) -> Cow<'a, Document> {
    let needs_header = options.include_header && doc.header.is_none();
    let needs_key = options.include_answer_key && doc.answer_key.is_none();
    if !needs_header && !needs_key {
        return Cow::Borrowed(doc);
    }

    let engine = LayoutEngine::new();
    let mut owned = doc.clone();
    if needs_header {
        owned.header = Some(engine.header(&doc.test_info, &doc.format));
    }
    if needs_key {
        let blocks: Vec<Block> = doc.source_blocks().cloned().collect();
        owned.answer_key = Some(engine.answer_key(&blocks, &doc.format));
    }
    Cow::Owned(owned)
}

fn page_file_name(doc: &Document, kind: PageKind, number: usize) -> String {
    let stem = doc.format.output_stem(DEFAULT_STEM);
    match kind {
        PageKind::Header => format!("{}-header.png", stem),
        PageKind::Content => format!("{}-{:03}.png", stem, number),
        PageKind::AnswerKey => format!("{}-answers.png", stem),
    }
}

impl Exporter for PagedImageExporter {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extensions(&self) -> &[&str] {
        &["pdf", "png"]
    }

    fn description(&self) -> &str {
        "Paged PNG images for PDF packing"
    }

    fn export(&self, doc: &Document, options: &ExportOptions) -> Result<ExportResult> {
        let doc = with_extra_pages(doc, options);
        let mut renderer = RasterRenderer::new(SkiaSurface::with_dpi(options.dpi).with_font(self.font()))
            .with_images(self.image_source())
            .with_header(options.include_header)
            .with_answer_key(options.include_answer_key);
        let pages = renderer.render(&doc)?;
        debug!("Rasterized {} pages", pages.len());

        let mut content_number = 0;
        let artifacts = pages
            .into_iter()
            .map(|page| {
                if page.kind == PageKind::Content {
                    content_number += 1;
                }
                ExportArtifact::new(
                    page_file_name(&doc, page.kind, content_number),
                    "png",
                    "image/png",
                    page.data,
                )
            })
            .collect();

        let mut result = ExportResult::new(self.name(), artifacts);
        if options.collect_stats {
            result = result.with_stats(collect_stats(&doc.blocks));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, FormatOptions};
    use crate::model::{Question, TestInfo};

    fn doc() -> Document {
        let blocks = vec![
            Block::question("q1", Question::multiple_choice(["a", "b"]), "Pick")
                .with_image("pic.png"),
            Block::concept("c1", "Idea"),
        ];
        compute_layout(&blocks, &FormatOptions::default())
            .with_test_info(TestInfo::new().with_title("Quiz"))
    }

    #[test]
    fn test_content_pages_only() {
        let result = PagedImageExporter::new()
            .export(&doc(), &ExportOptions::default())
            .unwrap();
        assert_eq!(result.artifacts.len(), 1);
        assert_eq!(result.artifacts[0].file_name, "material-001.png");
        assert_eq!(result.artifacts[0].mime_type, "image/png");
    }

    #[test]
    fn test_header_and_answer_key_are_generated() {
        let options = ExportOptions::default()
            .with_header(true)
            .with_answer_key(true);
        let result = PagedImageExporter::new().export(&doc(), &options).unwrap();
        let names: Vec<&str> = result
            .artifacts
            .iter()
            .map(|a| a.file_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["material-header.png", "material-001.png", "material-answers.png"]
        );
    }

    #[test]
    fn test_missing_image_root_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let result = PagedImageExporter::new()
            .with_image_root(dir.path())
            .export(&doc(), &ExportOptions::default().with_dpi(36.0))
            .unwrap();
        assert_eq!(result.artifacts.len(), 1);
    }

    #[test]
    fn test_font_is_resolved_once() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PagedImageExporter::new()
            .with_font_dir(dir.path())
            .without_system_fonts();
        assert!(exporter.font().is_none());
        assert!(exporter.font.get().is_some());

        // Boxes stand in for glyphs when no font is available.
        let result = exporter.export(&doc(), &ExportOptions::default()).unwrap();
        assert_eq!(result.artifacts.len(), 1);
    }

    #[test]
    fn test_borrowed_when_nothing_requested() {
        let doc = doc();
        assert!(matches!(
            with_extra_pages(&doc, &ExportOptions::default()),
            Cow::Borrowed(_)
        ));
    }
}
