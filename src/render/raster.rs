//! Paged raster rendering.
//!
//! The renderer walks a laid-out [`Document`] and replays each page's
//! primitives onto a [`DrawingSurface`]. The surface is injected by the
//! caller; the tiny-skia backend lives in [`super::skia`] behind the
//! `raster` feature, and [`RecordingSurface`] captures draw calls without
//! touching pixels.
//!
//! Image placeholders are drawn first and filled afterwards from an
//! [`ImageSource`]. A failed image leaves the placeholder as drawn.

use crate::error::{Error, Result};
use crate::model::{Document, Primitive};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves an image reference to encoded image bytes.
pub trait ImageSource: Send + Sync {
    /// Fetch the bytes behind `image_ref`.
    fn fetch(&self, image_ref: &str) -> Result<Vec<u8>>;
}

impl<T: ImageSource + ?Sized> ImageSource for Box<T> {
    fn fetch(&self, image_ref: &str) -> Result<Vec<u8>> {
        (**self).fetch(image_ref)
    }
}

/// Image source that resolves nothing; placeholders stay empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageSource for NoImages {
    fn fetch(&self, image_ref: &str) -> Result<Vec<u8>> {
        Err(Error::ImageLoad(
            image_ref.to_string(),
            "no image source configured".to_string(),
        ))
    }
}

/// Reads images from files relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    root: PathBuf,
}

impl FileImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory references are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageSource for FileImageSource {
    fn fetch(&self, image_ref: &str) -> Result<Vec<u8>> {
        let relative = image_ref.trim_start_matches('/');
        let path = self.root.join(relative);
        std::fs::read(&path).map_err(|e| Error::ImageLoad(image_ref.to_string(), e.to_string()))
    }
}

/// In-memory image store keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a reference.
    pub fn with_image(mut self, image_ref: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.images.insert(image_ref.into(), bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSource for MemoryImageSource {
    fn fetch(&self, image_ref: &str) -> Result<Vec<u8>> {
        self.images
            .get(image_ref)
            .cloned()
            .ok_or_else(|| Error::ImageLoad(image_ref.to_string(), "not found".to_string()))
    }
}

/// A drawing backend that turns leaf primitives into one encoded page.
///
/// Coordinates passed to the surface are absolute page points.
pub trait DrawingSurface {
    /// Clear the surface for a new page of the given size in points.
    fn begin_page(&mut self, width: f32, height: f32) -> Result<()>;

    /// Draw one leaf primitive.
    fn draw(&mut self, primitive: &Primitive);

    /// Draw encoded image bytes fitted into the given box.
    fn draw_image(&mut self, bytes: &[u8], x: f32, y: f32, width: f32, height: f32)
        -> Result<()>;

    /// Serialize the current page.
    fn finish_page(&mut self) -> Result<Vec<u8>>;
}

/// Uniform scale fitting an `image_width` x `image_height` image into a box.
///
/// Returns 0 for degenerate images.
pub fn fit_scale(image_width: f32, image_height: f32, box_width: f32, box_height: f32) -> f32 {
    if image_width <= 0.0 || image_height <= 0.0 {
        return 0.0;
    }
    (box_width / image_width).min(box_height / image_height)
}

/// Role of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Header,
    Content,
    AnswerKey,
}

/// One serialized page.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// Position in the output sequence
    pub index: usize,
    pub kind: PageKind,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Encoded page produced by the surface
    pub data: Vec<u8>,
}

/// Replays document pages onto a drawing surface.
pub struct RasterRenderer<S: DrawingSurface> {
    surface: S,
    images: Box<dyn ImageSource>,
    include_header: bool,
    include_answer_key: bool,
}

impl<S: DrawingSurface> RasterRenderer<S> {
    /// Create a renderer drawing onto `surface`, with no image source.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            images: Box::new(NoImages),
            include_header: false,
            include_answer_key: false,
        }
    }

    /// Resolve image placeholders through `images`.
    pub fn with_images(mut self, images: impl ImageSource + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    /// Emit the document header as a leading page.
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Emit the answer key as a trailing page.
    pub fn with_answer_key(mut self, include: bool) -> Self {
        self.include_answer_key = include;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Render every page of the document.
    pub fn render(&mut self, doc: &Document) -> Result<Vec<RasterPage>> {
        let (width, height) = doc.page_size().dimensions();
        let mut out = Vec::with_capacity(doc.page_count() + 2);

        if self.include_header {
            match &doc.header {
                Some(header) => {
                    let data = self.render_page(header, width, height)?;
                    out.push(RasterPage {
                        index: out.len(),
                        kind: PageKind::Header,
                        width,
                        height,
                        data,
                    });
                }
                None => debug!("Header page requested but document has no header"),
            }
        }

        for page in &doc.pages {
            let data = self.render_page(&page.primitives(), page.width, page.height)?;
            out.push(RasterPage {
                index: out.len(),
                kind: PageKind::Content,
                width: page.width,
                height: page.height,
                data,
            });
        }

        if self.include_answer_key {
            match &doc.answer_key {
                Some(key) => {
                    let data = self.render_page(key, width, height)?;
                    out.push(RasterPage {
                        index: out.len(),
                        kind: PageKind::AnswerKey,
                        width,
                        height,
                        data,
                    });
                }
                None => debug!("Answer key requested but document has no answer key"),
            }
        }

        Ok(out)
    }

    fn render_page(&mut self, primitives: &[Primitive], width: f32, height: f32) -> Result<Vec<u8>> {
        self.surface.begin_page(width, height)?;
        let leaves = primitives.iter().flat_map(Primitive::flatten);
        for leaf in leaves {
            self.surface.draw(&leaf);
            if let Primitive::ImagePlaceholder {
                x,
                y,
                width,
                height,
                image_ref,
                ..
            } = &leaf
            {
                self.fill_placeholder(image_ref, *x, *y, *width, *height);
            }
        }
        self.surface.finish_page()
    }

    fn fill_placeholder(&mut self, image_ref: &str, x: f32, y: f32, width: f32, height: f32) {
        let drawn = self
            .images
            .fetch(image_ref)
            .and_then(|bytes| self.surface.draw_image(&bytes, x, y, width, height));
        if let Err(e) = drawn {
            warn!("Skipping image '{}': {}", image_ref, e);
        }
    }
}

/// A recorded image draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedImage {
    pub byte_len: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Draw calls recorded for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordedPage {
    pub width: f32,
    pub height: f32,
    pub primitives: Vec<Primitive>,
    pub images: Vec<RecordedImage>,
}

/// Surface that records draw calls instead of rasterizing.
///
/// Each finished page serializes to JSON, which makes the surface usable
/// as a dry-run backend.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    current: Option<RecordedPage>,
    pages: Vec<RecordedPage>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages finished so far.
    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_page(&mut self, width: f32, height: f32) -> Result<()> {
        self.current = Some(RecordedPage {
            width,
            height,
            ..RecordedPage::default()
        });
        Ok(())
    }

    fn draw(&mut self, primitive: &Primitive) {
        if let Some(page) = self.current.as_mut() {
            page.primitives.push(primitive.clone());
        }
    }

    fn draw_image(
        &mut self,
        bytes: &[u8],
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        let page = self
            .current
            .as_mut()
            .ok_or_else(|| Error::Render("draw_image outside of a page".to_string()))?;
        page.images.push(RecordedImage {
            byte_len: bytes.len(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn finish_page(&mut self) -> Result<Vec<u8>> {
        let page = self
            .current
            .take()
            .ok_or_else(|| Error::Render("finish_page without begin_page".to_string()))?;
        let data = serde_json::to_vec(&page)?;
        self.pages.push(page);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FormatOptions, LayoutEngine};
    use crate::model::{Block, Question, TestInfo};

    fn doc_with_image() -> Document {
        let blocks = vec![
            Block::question("q1", Question::multiple_choice(["a", "b"]), "Look")
                .with_image("img/1.png"),
            Block::question("q2", Question::default(), "Next").with_image("img/missing.png"),
        ];
        let engine = LayoutEngine::new();
        let options = FormatOptions::default();
        let info = TestInfo::new().with_title("Quiz");
        let doc = engine.compute_with_info(&blocks, &options, &info);
        let header = engine.header(&info, &options);
        let key = engine.answer_key(&blocks, &options);
        doc.with_header(header).with_answer_key(key)
    }

    #[test]
    fn test_fit_scale() {
        assert_eq!(fit_scale(100.0, 50.0, 200.0, 200.0), 2.0);
        assert_eq!(fit_scale(400.0, 100.0, 200.0, 200.0), 0.5);
        assert_eq!(fit_scale(0.0, 100.0, 200.0, 200.0), 0.0);
    }

    #[test]
    fn test_content_pages_only_by_default() {
        let doc = doc_with_image();
        let mut renderer = RasterRenderer::new(RecordingSurface::new());
        let pages = renderer.render(&doc).unwrap();

        assert_eq!(pages.len(), doc.page_count());
        assert!(pages.iter().all(|p| p.kind == PageKind::Content));
        let recorded = &renderer.surface().pages()[0];
        assert_eq!(recorded.primitives.len(), doc.pages[0].primitives().len());
        assert!(recorded.images.is_empty());
    }

    #[test]
    fn test_header_and_answer_key_pages() {
        let doc = doc_with_image();
        let mut renderer = RasterRenderer::new(RecordingSurface::new())
            .with_header(true)
            .with_answer_key(true);
        let pages = renderer.render(&doc).unwrap();

        assert_eq!(pages.len(), doc.page_count() + 2);
        assert_eq!(pages[0].kind, PageKind::Header);
        assert_eq!(pages.last().map(|p| p.kind), Some(PageKind::AnswerKey));
        let indices: Vec<usize> = pages.iter().map(|p| p.index).collect();
        assert_eq!(indices, (0..pages.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let doc = doc_with_image();
        let images = MemoryImageSource::new().with_image("img/1.png", vec![1, 2, 3]);
        let mut renderer = RasterRenderer::new(RecordingSurface::new()).with_images(images);
        let pages = renderer.render(&doc).unwrap();

        assert_eq!(pages.len(), doc.page_count());
        let recorded = &renderer.surface().pages()[0];
        assert_eq!(recorded.images.len(), 1);
        assert_eq!(recorded.images[0].byte_len, 3);
        assert_eq!(recorded.images[0].height, crate::layout::IMAGE_HEIGHT);
    }

    #[test]
    fn test_recorded_page_serializes() {
        let doc = doc_with_image();
        let mut renderer = RasterRenderer::new(RecordingSurface::new());
        let pages = renderer.render(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&pages[0].data).unwrap();
        assert_eq!(value["width"], 595.0);
    }

    #[test]
    fn test_file_image_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"png").unwrap();
        let source = FileImageSource::new(dir.path());
        assert_eq!(source.fetch("/a.png").unwrap(), b"png".to_vec());
        assert!(matches!(source.fetch("b.png"), Err(Error::ImageLoad(_, _))));
    }
}
