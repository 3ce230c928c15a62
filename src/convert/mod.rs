//! Exporter registry dispatching a laid-out document to output formats.
//!
//! Each export format is an [`Exporter`] registered under a name and one or
//! more file extensions. The registry looks exporters up by either and can
//! run several formats over the same document at once.
//!
//! # Example
//!
//! ```no_run
//! use printsheet::convert::{ExportOptions, ExporterRegistry};
//! use printsheet::layout::{compute_layout, FormatOptions};
//! use printsheet::model::{Block, Question};
//!
//! fn main() -> printsheet::Result<()> {
//!     let blocks = vec![Block::question("q1", Question::multiple_choice(["3", "4"]), "2 + 2 = ?")];
//!     let doc = compute_layout(&blocks, &FormatOptions::default());
//!
//!     let registry = ExporterRegistry::with_defaults();
//!     let result = registry.export("txt", &doc, &ExportOptions::default())?;
//!     println!("{}", result.artifacts[0].as_text().unwrap_or_default());
//!     Ok(())
//! }
//! ```

mod formats;
#[cfg(feature = "raster")]
mod pdf;

pub use formats::{HtmlSlidesExporter, JsonExporter, TextExporter, WordExporter};
#[cfg(feature = "raster")]
pub use pdf::PagedImageExporter;

use crate::error::{Error, Result};
use crate::model::Document;
use crate::render::{ExportArtifact, JsonFormat, RenderStats};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Default file stem for worksheet exports.
pub const DEFAULT_STEM: &str = "material";

/// Options shared by all exporters.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Emit the header as a leading raster page
    pub include_header: bool,

    /// Emit the answer key as a trailing raster page
    pub include_answer_key: bool,

    /// Raster resolution in dots per inch
    pub dpi: f32,

    /// JSON layout dump format
    pub json_format: JsonFormat,

    /// Run independent formats concurrently in [`ExporterRegistry::export_all`]
    pub parallel: bool,

    /// Collect block statistics into each result
    pub collect_stats: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_header: false,
            include_answer_key: false,
            dpi: 72.0,
            json_format: JsonFormat::Pretty,
            parallel: true,
            collect_stats: false,
        }
    }
}

impl ExportOptions {
    /// Create export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the header page.
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Include the answer key page.
    pub fn with_answer_key(mut self, include: bool) -> Self {
        self.include_answer_key = include;
        self
    }

    /// Set the raster resolution.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the JSON dump format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Enable or disable parallel multi-format export.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

/// Result of one format export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Name of the exporter that produced the artifacts
    pub format: String,

    /// Produced files, in output order
    pub artifacts: Vec<ExportArtifact>,

    /// Whether the exporter substituted a fallback format
    pub fell_back: bool,

    /// Block statistics (if collected)
    pub stats: Option<RenderStats>,
}

impl ExportResult {
    /// Create a result holding the given artifacts.
    pub fn new(format: impl Into<String>, artifacts: Vec<ExportArtifact>) -> Self {
        Self {
            format: format.into(),
            artifacts,
            fell_back: false,
            stats: None,
        }
    }

    /// Mark the result as produced by a fallback.
    pub fn with_fallback(mut self, fell_back: bool) -> Self {
        self.fell_back = fell_back;
        self
    }

    /// Set block statistics.
    pub fn with_stats(mut self, stats: RenderStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Total size of all artifacts in bytes.
    pub fn total_bytes(&self) -> usize {
        self.artifacts.iter().map(ExportArtifact::len).sum()
    }
}

/// Trait for export formats.
///
/// Implement this trait to add a new output format.
pub trait Exporter: Send + Sync {
    /// Name the format is selected by (e.g. `"docx"`).
    fn name(&self) -> &str;

    /// File extensions this exporter answers to, lowercase without the dot.
    fn extensions(&self) -> &[&str];

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Export the document.
    fn export(&self, doc: &Document, options: &ExportOptions) -> Result<ExportResult>;

    /// Check if this exporter answers to the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();
        self.extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Base name for export files: the configured file name, else `default_stem`.
pub fn file_name(doc: &Document, default_stem: &str, extension: &str) -> String {
    doc.format.output_file_name(default_stem, extension)
}

/// Registry for exporters.
pub struct ExporterRegistry {
    exporters: Vec<Arc<dyn Exporter>>,
    by_extension: HashMap<String, Arc<dyn Exporter>>,
    by_name: HashMap<String, Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            exporters: Vec::new(),
            by_extension: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with every built-in format.
    ///
    /// `pdf` is only present when the `raster` feature is enabled.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        #[cfg(feature = "raster")]
        registry.register(Arc::new(PagedImageExporter::new()));
        registry.register(Arc::new(WordExporter::new()));
        registry.register(Arc::new(TextExporter::plain()));
        registry.register(Arc::new(TextExporter::hwp()));
        registry.register(Arc::new(HtmlSlidesExporter::new()));
        registry.register(Arc::new(JsonExporter::new()));
        registry
    }

    /// Register an exporter under its name and extensions.
    ///
    /// A later registration replaces an earlier one with the same name.
    pub fn register(&mut self, exporter: Arc<dyn Exporter>) {
        let name = exporter.name().to_lowercase();
        self.exporters.retain(|e| e.name().to_lowercase() != name);
        for ext in exporter.extensions() {
            self.by_extension
                .insert(ext.to_lowercase(), exporter.clone());
        }
        self.by_name.insert(name, exporter.clone());
        self.exporters.push(exporter);
    }

    /// Get an exporter by format name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Exporter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Get an exporter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn Exporter>> {
        self.by_extension
            .get(&ext.trim_start_matches('.').to_lowercase())
            .cloned()
    }

    /// Get an exporter by name, falling back to extension lookup.
    pub fn get(&self, format: &str) -> Option<Arc<dyn Exporter>> {
        self.get_by_name(format)
            .or_else(|| self.get_by_extension(format))
    }

    /// Check if a format name or extension is supported.
    pub fn supports(&self, format: &str) -> bool {
        self.get(format).is_some()
    }

    /// Registered format names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.exporters.iter().map(|e| e.name()).collect()
    }

    /// Registered exporters, in registration order.
    pub fn exporters(&self) -> &[Arc<dyn Exporter>] {
        &self.exporters
    }

    /// Export the document in one format.
    pub fn export(
        &self,
        format: &str,
        doc: &Document,
        options: &ExportOptions,
    ) -> Result<ExportResult> {
        let exporter = self
            .get(format)
            .ok_or_else(|| Error::UnsupportedFormat(format.to_string()))?;
        debug!("Exporting with '{}'", exporter.name());
        exporter.export(doc, options)
    }

    /// Export the document in several formats.
    ///
    /// Exports share nothing but the read-only document, so with
    /// `options.parallel` they run on the rayon pool. Results keep the order
    /// of `formats`. Unknown formats fail before any export starts.
    pub fn export_all(
        &self,
        formats: &[&str],
        doc: &Document,
        options: &ExportOptions,
    ) -> Result<Vec<ExportResult>> {
        let exporters = formats
            .iter()
            .map(|f| {
                self.get(f)
                    .ok_or_else(|| Error::UnsupportedFormat(f.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Exporting {} formats", exporters.len());
        if options.parallel {
            exporters
                .par_iter()
                .map(|e| e.export(doc, options))
                .collect()
        } else {
            exporters.iter().map(|e| e.export(doc, options)).collect()
        }
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
