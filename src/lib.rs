//! # printsheet
//!
//! Paginated layout engine and multi-format export for educational
//! worksheets.
//!
//! Content blocks (questions, passages, concepts, explanations) are numbered,
//! turned into format-agnostic layout primitives and paginated into a
//! [`Document`]. Renderer adapters then produce paged images, a word-processor
//! document, plain text or an HTML slide deck from that one document, so
//! ordering and numbering agree in every format.
//!
//! ## Quick Start
//!
//! ```no_run
//! use printsheet::{compute_layout, render, Block, FormatOptions, Question};
//!
//! let blocks = vec![
//!     Block::question("q1", Question::multiple_choice(["3", "4", "5"]), "2 + 2 = ?"),
//!     Block::concept("c1", "Addition is commutative."),
//! ];
//! let doc = compute_layout(&blocks, &FormatOptions::default());
//! println!("{}", render::to_text(&doc, render::TextFlavor::Plain));
//! ```
//!
//! ## Features
//!
//! - **Deterministic layout**: pure function from blocks and options to pages
//! - **Multi-column pagination**: blocks are never split across columns
//! - **Multiple output formats**: PNG pages, DOCX, plain/HWP text, HTML slides, JSON
//! - **Graceful degradation**: DOCX falls back to text, failed images are skipped
//! - **Parallel export**: independent formats render concurrently with Rayon

pub mod convert;
pub mod error;
pub mod job;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use convert::{ExportOptions, ExportResult, Exporter, ExporterRegistry};
pub use error::{Error, Result};
pub use job::{BlockRecord, ExportJob};
pub use layout::{
    compute_layout, Columns, DifficultyDisplay, FontSize, FormatOptions, LayoutEngine, Locale,
    PageSize, QuestionSpacing, SourcePosition,
};
pub use model::{
    Block, BlockKind, Difficulty, Document, LayoutNode, Page, Primitive, Question, QuestionKind,
    TestInfo,
};
pub use render::{
    DrawingSurface, ExportArtifact, JsonFormat, RasterPage, TextFlavor, WordOutput, WordRenderer,
};

use std::path::Path;

/// Replay a document onto a drawing surface, one encoded page per document
/// page.
///
/// When `answer_key` is given it is appended as a final page. The page size
/// is the one the document was laid out for.
///
/// # Example
///
/// ```no_run
/// use printsheet::{build_answer_key, compute_layout, render_to_paged_images, FormatOptions};
/// use printsheet::render::RecordingSurface;
///
/// let options = FormatOptions::default();
/// let doc = compute_layout(&[], &options);
/// let key = build_answer_key(&[], options.page_size, &options);
/// let pages = render_to_paged_images(&doc, RecordingSurface::new(), Some(key))?;
/// # Ok::<(), printsheet::Error>(())
/// ```
pub fn render_to_paged_images<S: DrawingSurface>(
    doc: &Document,
    surface: S,
    answer_key: Option<Vec<Primitive>>,
) -> Result<Vec<RasterPage>> {
    let include_key = answer_key.is_some();
    let mut renderer = render::RasterRenderer::new(surface).with_answer_key(include_key);
    match answer_key {
        Some(key) => renderer.render(&doc.clone().with_answer_key(key)),
        None => renderer.render(doc),
    }
}

/// Lay out the blocks and render a word-processor document.
///
/// Falls back to plain text when the container writer is unavailable; check
/// [`WordOutput::is_fallback`].
pub fn render_to_word_document(
    blocks: &[Block],
    options: &FormatOptions,
    info: &TestInfo,
) -> Result<WordOutput> {
    let doc = LayoutEngine::new().compute_with_info(blocks, options, info);
    WordRenderer::new().render(&doc)
}

/// Lay out the blocks and render them as plain text.
pub fn render_to_plain_text(blocks: &[Block], options: &FormatOptions, info: &TestInfo) -> String {
    let doc = LayoutEngine::new().compute_with_info(blocks, options, info);
    render::to_text(&doc, TextFlavor::Plain)
}

/// Lay out the blocks and render them as an HTML slide deck.
pub fn render_to_html_slides(
    blocks: &[Block],
    options: &FormatOptions,
    info: &TestInfo,
) -> String {
    let doc = LayoutEngine::new().compute_with_info(blocks, options, info);
    render::to_html_slides(&doc)
}

/// Header primitives for a page size, labelled in the default locale.
pub fn build_header(info: &TestInfo, page_size: PageSize) -> Vec<Primitive> {
    let options = FormatOptions::default().with_page_size(page_size);
    LayoutEngine::new().header(info, &options)
}

/// Answer key primitives for the question blocks, on a page of `page_size`.
pub fn build_answer_key(
    blocks: &[Block],
    page_size: PageSize,
    options: &FormatOptions,
) -> Vec<Primitive> {
    let options = options.clone().with_page_size(page_size);
    LayoutEngine::new().answer_key(blocks, &options)
}

/// Builder for laying out and exporting worksheets.
///
/// # Example
///
/// ```no_run
/// use printsheet::{Columns, Printsheet, TestInfo};
///
/// let sheet = Printsheet::new()
///     .with_columns(Columns::Two)
///     .with_test_info(TestInfo::new().with_title("Unit test"))
///     .with_answer_key()
///     .load("job.json")?;
/// for artifact in sheet.export("pdf")?.artifacts {
///     artifact.write_to("out")?;
/// }
/// # Ok::<(), printsheet::Error>(())
/// ```
pub struct Printsheet {
    format: FormatOptions,
    test_info: Option<TestInfo>,
    export_options: ExportOptions,
}

impl Printsheet {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            format: FormatOptions::default(),
            test_info: None,
            export_options: ExportOptions::default(),
        }
    }

    /// Replace all format options.
    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// Set the column count.
    pub fn with_columns(mut self, columns: Columns) -> Self {
        self.format = self.format.with_columns(columns);
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.format = self.format.with_page_size(page_size);
        self
    }

    /// Set the test metadata, overriding any from a loaded job.
    pub fn with_test_info(mut self, info: TestInfo) -> Self {
        self.test_info = Some(info);
        self
    }

    /// Add a leading header page to raster output.
    pub fn with_header(mut self) -> Self {
        self.export_options = self.export_options.with_header(true);
        self
    }

    /// Add a trailing answer key page to raster output.
    pub fn with_answer_key(mut self) -> Self {
        self.export_options = self.export_options.with_answer_key(true);
        self
    }

    /// Set the raster resolution.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.export_options = self.export_options.with_dpi(dpi);
        self
    }

    /// Export formats one after another.
    pub fn sequential(mut self) -> Self {
        self.export_options = self.export_options.with_parallel(false);
        self
    }

    /// Lay out blocks with the builder's options.
    pub fn layout(self, blocks: &[Block]) -> Worksheet {
        let info = self.test_info.clone().unwrap_or_default();
        self.finish(blocks, info)
    }

    /// Load a job file and lay it out; the job's format options are used
    /// as they are.
    pub fn load<P: AsRef<Path>>(self, path: P) -> Result<Worksheet> {
        let job = ExportJob::from_file(path)?;
        Ok(self.layout_job(job))
    }

    /// Lay out a job; the job's format options are used as they are.
    pub fn layout_job(mut self, job: ExportJob) -> Worksheet {
        let blocks = job.blocks();
        let info = self.test_info.take().unwrap_or(job.test_info);
        self.format = job.format;
        self.finish(&blocks, info)
    }

    fn finish(self, blocks: &[Block], info: TestInfo) -> Worksheet {
        let engine = LayoutEngine::new();
        let mut document = engine.compute_with_info(blocks, &self.format, &info);
        if self.export_options.include_header {
            document = document.with_header(engine.header(&info, &self.format));
        }
        if self.export_options.include_answer_key {
            document = document.with_answer_key(engine.answer_key(blocks, &self.format));
        }
        Worksheet {
            document,
            export_options: self.export_options,
        }
    }
}

impl Default for Printsheet {
    fn default() -> Self {
        Self::new()
    }
}

/// A laid-out worksheet ready for export.
pub struct Worksheet {
    /// The laid-out document
    pub document: Document,
    export_options: ExportOptions,
}

impl Worksheet {
    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Export options in effect.
    pub fn export_options(&self) -> &ExportOptions {
        &self.export_options
    }

    /// Export in one format, by name or extension.
    pub fn export(&self, format: &str) -> Result<ExportResult> {
        ExporterRegistry::with_defaults().export(format, &self.document, &self.export_options)
    }

    /// Export in several formats.
    pub fn export_all(&self, formats: &[&str]) -> Result<Vec<ExportResult>> {
        ExporterRegistry::with_defaults().export_all(formats, &self.document, &self.export_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document, TextFlavor::Plain)
    }

    /// Convert to an HTML slide deck.
    pub fn to_html_slides(&self) -> String {
        render::to_html_slides(&self.document)
    }

    /// Convert to a word-processor document.
    pub fn to_word(&self) -> Result<WordOutput> {
        WordRenderer::new().render(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use render::RecordingSurface;

    fn blocks() -> Vec<Block> {
        vec![
            Block::question(
                "q1",
                Question::multiple_choice(["1", "2", "3", "4"]).with_answer("2"),
                "1 + 1 = ?",
            ),
            Block::question("q2", Question::new(QuestionKind::ShortAnswer), "Why?"),
            Block::passage("p1", "Once upon a time"),
        ]
    }

    #[test]
    fn test_builder_defaults() {
        let builder = Printsheet::default();
        assert_eq!(builder.format, FormatOptions::default());
        assert!(!builder.export_options.include_answer_key);
        assert!(builder.export_options.parallel);
    }

    #[test]
    fn test_builder_chained() {
        let builder = Printsheet::new()
            .with_columns(Columns::Two)
            .with_page_size(PageSize::B4)
            .with_header()
            .with_answer_key()
            .sequential();
        assert_eq!(builder.format.columns, Columns::Two);
        assert_eq!(builder.format.page_size, PageSize::B4);
        assert!(builder.export_options.include_header);
        assert!(!builder.export_options.parallel);
    }

    #[test]
    fn test_layout_attaches_extra_pages() {
        let sheet = Printsheet::new()
            .with_header()
            .with_answer_key()
            .layout(&blocks());
        assert!(sheet.document().header.is_some());
        assert!(sheet.document().answer_key.is_some());
        assert_eq!(sheet.document().question_count(), 2);
    }

    #[test]
    fn test_layout_job_prefers_builder_info() {
        let job = ExportJob::from_json(
            r#"{"blocks": [{"type": "concept", "content": "x"}],
                "testInfo": {"title": "From job"}, "format": {"columns": 2}}"#,
        )
        .unwrap();
        let sheet = Printsheet::new()
            .with_test_info(TestInfo::new().with_title("Override"))
            .layout_job(job);
        assert_eq!(sheet.document().test_info.title.as_deref(), Some("Override"));
        assert_eq!(sheet.document().format.columns, Columns::Two);
    }

    #[test]
    fn test_top_level_renderers() {
        let options = FormatOptions::default();
        let info = TestInfo::new().with_title("Quiz");

        let text = render_to_plain_text(&blocks(), &options, &info);
        assert!(text.starts_with("Quiz\n"));

        let html = render_to_html_slides(&blocks(), &options, &info);
        assert!(html.contains("<h1>Quiz</h1>"));

        let word = render_to_word_document(&blocks(), &options, &info).unwrap();
        assert_eq!(word.is_fallback(), !cfg!(feature = "docx"));
    }

    #[test]
    fn test_paged_images_with_answer_key() {
        let options = FormatOptions::default();
        let doc = compute_layout(&blocks(), &options);
        let key = build_answer_key(&blocks(), PageSize::A4, &options);
        let pages = render_to_paged_images(&doc, RecordingSurface::new(), Some(key)).unwrap();
        assert_eq!(pages.len(), doc.page_count() + 1);

        let pages = render_to_paged_images(&doc, RecordingSurface::new(), None).unwrap();
        assert_eq!(pages.len(), doc.page_count());
    }

    #[test]
    fn test_build_header_uses_page_size() {
        let header = build_header(&TestInfo::new().with_title("T"), PageSize::A3);
        let title_x = header
            .iter()
            .find_map(|p| match p {
                Primitive::TextRun { text, x, .. } if text == "T" => Some(*x),
                _ => None,
            })
            .unwrap();
        assert_eq!(title_x, PageSize::A3.width() / 2.0);
    }
}
