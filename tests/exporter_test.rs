//! Integration tests for the exporter registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use printsheet::convert::{ExportOptions, ExportResult, Exporter, ExporterRegistry};
use printsheet::error::{Error, Result};
use printsheet::render::ExportArtifact;
use printsheet::{compute_layout, Block, Document, FormatOptions, JsonFormat, Question};

/// Mock exporter for testing.
struct MockExporter {
    name: &'static str,
    extensions: Vec<&'static str>,
    calls: AtomicUsize,
}

impl MockExporter {
    fn new(name: &'static str, extensions: Vec<&'static str>) -> Self {
        Self {
            name,
            extensions,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Exporter for MockExporter {
    fn name(&self) -> &str {
        self.name
    }

    fn extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn description(&self) -> &str {
        "mock"
    }

    fn export(&self, doc: &Document, _options: &ExportOptions) -> Result<ExportResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = format!("{} pages by {}", doc.page_count(), self.name);
        Ok(ExportResult::new(
            self.name,
            vec![ExportArtifact::text(
                format!("out.{}", self.extensions[0]),
                self.extensions[0],
                "text/plain",
                body,
            )],
        ))
    }
}

fn doc() -> Document {
    let blocks = vec![
        Block::question("q1", Question::multiple_choice(["x", "y"]), "Pick one"),
        Block::explanation("e1", "Because."),
    ];
    compute_layout(&blocks, &FormatOptions::default())
}

#[test]
fn test_export_options_builder() {
    let options = ExportOptions::new()
        .with_header(true)
        .with_answer_key(true)
        .with_dpi(150.0)
        .with_json_format(JsonFormat::Compact)
        .with_parallel(false)
        .with_stats(true);

    assert!(options.include_header);
    assert!(options.include_answer_key);
    assert_eq!(options.dpi, 150.0);
    assert_eq!(options.json_format, JsonFormat::Compact);
    assert!(!options.parallel);
    assert!(options.collect_stats);
}

#[test]
fn test_registry_new_is_empty() {
    let registry = ExporterRegistry::new();
    assert!(!registry.supports("txt"));
    assert!(registry.names().is_empty());
}

#[test]
fn test_registry_with_defaults() {
    let registry = ExporterRegistry::with_defaults();

    for format in ["docx", "txt", "hwp", "html", "json"] {
        assert!(registry.supports(format), "missing {}", format);
    }
    assert!(registry.supports("HTML"));
    assert!(registry.supports(".htm"));
    assert!(!registry.supports("odt"));

    #[cfg(feature = "raster")]
    assert!(registry.supports("pdf"));
}

#[test]
fn test_registry_register_and_lookup() {
    let mut registry = ExporterRegistry::new();
    registry.register(Arc::new(MockExporter::new("markdown", vec!["md", "markdown"])));

    assert!(registry.supports("markdown"));
    assert!(registry.supports("md"));
    assert_eq!(registry.get_by_extension(".MD").unwrap().name(), "markdown");
    assert!(registry.get_by_name("md").is_none());
}

#[test]
fn test_register_replaces_same_name() {
    let mut registry = ExporterRegistry::with_defaults();
    let before = registry.names().len();
    registry.register(Arc::new(MockExporter::new("txt", vec!["txt"])));

    assert_eq!(registry.names().len(), before);
    assert_eq!(registry.get("txt").unwrap().description(), "mock");
}

#[test]
fn test_export_unknown_format() {
    let registry = ExporterRegistry::with_defaults();
    let err = registry
        .export("odt", &doc(), &ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref f) if f == "odt"));
}

#[test]
fn test_export_all_keeps_order() {
    let mut registry = ExporterRegistry::new();
    let a = Arc::new(MockExporter::new("a", vec!["a"]));
    let b = Arc::new(MockExporter::new("b", vec!["b"]));
    registry.register(a.clone());
    registry.register(b.clone());

    for parallel in [true, false] {
        let options = ExportOptions::default().with_parallel(parallel);
        let results = registry.export_all(&["b", "a", "b"], &doc(), &options).unwrap();
        let formats: Vec<&str> = results.iter().map(|r| r.format.as_str()).collect();
        assert_eq!(formats, vec!["b", "a", "b"]);
        assert_eq!(results[0].artifacts[0].as_text(), Some("1 pages by b"));
    }

    assert_eq!(a.calls.load(Ordering::SeqCst), 2);
    assert_eq!(b.calls.load(Ordering::SeqCst), 4);
}

#[test]
fn test_export_all_fails_before_exporting() {
    let mut registry = ExporterRegistry::new();
    let a = Arc::new(MockExporter::new("a", vec!["a"]));
    registry.register(a.clone());

    let result = registry.export_all(&["a", "missing"], &doc(), &ExportOptions::default());
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    assert_eq!(a.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_default_file_names() {
    let registry = ExporterRegistry::with_defaults();
    let results = registry
        .export_all(&["txt", "hwp", "html", "json"], &doc(), &ExportOptions::default())
        .unwrap();
    let names: Vec<&str> = results
        .iter()
        .map(|r| r.artifacts[0].file_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["material.txt", "material-hwp.txt", "presentation.html", "layout.json"]
    );
}

#[test]
fn test_configured_file_name() {
    let blocks = vec![Block::concept("c", "idea")];
    let doc = compute_layout(&blocks, &FormatOptions::new().with_file_name("unit3"));
    let result = ExporterRegistry::with_defaults()
        .export("html", &doc, &ExportOptions::default())
        .unwrap();
    assert_eq!(result.artifacts[0].file_name, "unit3.html");
}

#[test]
fn test_configured_file_name_keeps_artifacts_distinct() {
    let blocks = vec![Block::concept("c", "idea")];
    let doc = compute_layout(&blocks, &FormatOptions::new().with_file_name("quiz"));
    let results = ExporterRegistry::with_defaults()
        .export_all(&["txt", "hwp", "html", "json"], &doc, &ExportOptions::default())
        .unwrap();

    let mut names: Vec<&str> = results
        .iter()
        .flat_map(|r| r.artifacts.iter().map(|a| a.file_name.as_str()))
        .collect();
    assert_eq!(names, vec!["quiz.txt", "quiz-hwp.txt", "quiz.html", "quiz.json"]);

    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 4);
}
