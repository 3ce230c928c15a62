//! Exporters for the document-like formats: word processor, text, slides
//! and the JSON layout dump.

use super::{file_name, ExportOptions, ExportResult, Exporter, DEFAULT_STEM};
use crate::error::Result;
use crate::model::Document;
use crate::render::{
    collect_stats, to_html_slides, to_json, to_text, ExportArtifact, TextFlavor, WordRenderer,
};

const TEXT_MIME: &str = "text/plain; charset=utf-8";

fn finish(result: ExportResult, doc: &Document, options: &ExportOptions) -> ExportResult {
    if options.collect_stats {
        result.with_stats(collect_stats(&doc.blocks))
    } else {
        result
    }
}

/// Word-processor document, falling back to plain text.
#[derive(Debug, Default)]
pub struct WordExporter {
    renderer: WordRenderer,
}

impl WordExporter {
    /// Exporter with the capability detected from the build.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter using a specific renderer, e.g. one simulated as unavailable.
    pub fn with_renderer(renderer: WordRenderer) -> Self {
        Self { renderer }
    }
}

impl Exporter for WordExporter {
    fn name(&self) -> &str {
        "docx"
    }

    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn description(&self) -> &str {
        "Word document (plain text when unavailable)"
    }

    fn export(&self, doc: &Document, options: &ExportOptions) -> Result<ExportResult> {
        let output = self.renderer.render(doc)?;
        let fell_back = output.is_fallback();
        let artifact = ExportArtifact::new(
            file_name(doc, DEFAULT_STEM, output.extension()),
            output.extension(),
            output.mime_type(),
            output.into_bytes(),
        );
        let result = ExportResult::new(self.name(), vec![artifact]).with_fallback(fell_back);
        Ok(finish(result, doc, options))
    }
}

/// Line-oriented text, plain or for pasting into a Korean word processor.
#[derive(Debug, Clone, Copy)]
pub struct TextExporter {
    flavor: TextFlavor,
}

impl TextExporter {
    /// Plain-text exporter (`txt`).
    pub fn plain() -> Self {
        Self {
            flavor: TextFlavor::Plain,
        }
    }

    /// HWP-paste text exporter (`hwp`), written as `.txt`.
    pub fn hwp() -> Self {
        Self {
            flavor: TextFlavor::Hwp,
        }
    }

    pub fn flavor(&self) -> TextFlavor {
        self.flavor
    }
}

impl Exporter for TextExporter {
    fn name(&self) -> &str {
        match self.flavor {
            TextFlavor::Plain => "txt",
            TextFlavor::Hwp => "hwp",
        }
    }

    fn extensions(&self) -> &[&str] {
        match self.flavor {
            TextFlavor::Plain => &["txt", "text"],
            TextFlavor::Hwp => &["hwp"],
        }
    }

    fn description(&self) -> &str {
        match self.flavor {
            TextFlavor::Plain => "Plain text",
            TextFlavor::Hwp => "Text for pasting into Hangul (HWP)",
        }
    }

    fn export(&self, doc: &Document, options: &ExportOptions) -> Result<ExportResult> {
        // Both flavours write .txt; the hwp flavour keeps a suffix so the
        // two never share a name.
        let name = match self.flavor {
            TextFlavor::Plain => file_name(doc, DEFAULT_STEM, "txt"),
            TextFlavor::Hwp => format!("{}-hwp.txt", doc.format.output_stem(DEFAULT_STEM)),
        };
        let artifact = ExportArtifact::text(
            name,
            "txt",
            TEXT_MIME,
            to_text(doc, self.flavor),
        );
        let result = ExportResult::new(self.name(), vec![artifact]);
        Ok(finish(result, doc, options))
    }
}

/// Self-contained HTML slide deck.
#[derive(Debug, Clone, Default)]
pub struct HtmlSlidesExporter {
    _private: (),
}

impl HtmlSlidesExporter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Exporter for HtmlSlidesExporter {
    fn name(&self) -> &str {
        "html"
    }

    fn extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn description(&self) -> &str {
        "HTML slide deck"
    }

    fn export(&self, doc: &Document, options: &ExportOptions) -> Result<ExportResult> {
        let artifact = ExportArtifact::text(
            file_name(doc, "presentation", "html"),
            "html",
            "text/html; charset=utf-8",
            to_html_slides(doc),
        );
        let result = ExportResult::new(self.name(), vec![artifact]);
        Ok(finish(result, doc, options))
    }
}

/// JSON dump of the laid-out document.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    _private: (),
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Exporter for JsonExporter {
    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn description(&self) -> &str {
        "Layout as JSON"
    }

    fn export(&self, doc: &Document, options: &ExportOptions) -> Result<ExportResult> {
        let content = to_json(doc, options.json_format)?;
        let artifact = ExportArtifact::text(
            file_name(doc, "layout", "json"),
            "json",
            "application/json",
            content,
        );
        let result = ExportResult::new(self.name(), vec![artifact]);
        Ok(finish(result, doc, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, FormatOptions};
    use crate::model::{Block, Question};

    fn doc() -> Document {
        let blocks = vec![
            Block::question("q1", Question::multiple_choice(["a", "b", "c"]), "Pick"),
            Block::passage("p1", "Read"),
        ];
        compute_layout(&blocks, &FormatOptions::default())
    }

    #[test]
    fn test_word_fallback_renames_extension() {
        let exporter = WordExporter::with_renderer(WordRenderer::unavailable("disabled"));
        let result = exporter.export(&doc(), &ExportOptions::default()).unwrap();
        assert!(result.fell_back);
        assert_eq!(result.artifacts[0].file_name, "material.txt");
        assert_eq!(result.artifacts[0].extension, "txt");
        assert!(result.artifacts[0].as_text().unwrap().contains("1. Pick"));
    }

    #[cfg(feature = "docx")]
    #[test]
    fn test_word_export() {
        let result = WordExporter::new()
            .export(&doc(), &ExportOptions::default())
            .unwrap();
        assert!(!result.fell_back);
        assert_eq!(result.artifacts[0].file_name, "material.docx");
        assert!(result.artifacts[0].bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_text_flavours_have_distinct_names() {
        let plain = TextExporter::plain()
            .export(&doc(), &ExportOptions::default())
            .unwrap();
        let hwp = TextExporter::hwp()
            .export(&doc(), &ExportOptions::default())
            .unwrap();
        assert_eq!(plain.artifacts[0].file_name, "material.txt");
        assert_eq!(hwp.artifacts[0].file_name, "material-hwp.txt");
        assert!(hwp.artifacts[0].as_text().unwrap().contains('─'));
    }

    #[test]
    fn test_text_flavours_stay_apart_with_file_name() {
        let blocks = vec![Block::concept("c1", "Idea")];
        let doc = compute_layout(&blocks, &FormatOptions::new().with_file_name("quiz.docx"));
        let plain = TextExporter::plain()
            .export(&doc, &ExportOptions::default())
            .unwrap();
        let hwp = TextExporter::hwp()
            .export(&doc, &ExportOptions::default())
            .unwrap();
        assert_eq!(plain.artifacts[0].file_name, "quiz.txt");
        assert_eq!(hwp.artifacts[0].file_name, "quiz-hwp.txt");
    }

    #[test]
    fn test_stats_collected_on_request() {
        let options = ExportOptions::default().with_stats(true);
        let result = HtmlSlidesExporter::new().export(&doc(), &options).unwrap();
        let stats = result.stats.unwrap();
        assert_eq!(stats.question_count, 1);
        assert_eq!(stats.option_count, 3);
        assert_eq!(result.artifacts[0].file_name, "presentation.html");
    }

    #[test]
    fn test_json_export() {
        let result = JsonExporter::new()
            .export(&doc(), &ExportOptions::default())
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_slice(&result.artifacts[0].bytes).unwrap();
        assert_eq!(value["pages"].as_array().map(Vec::len), Some(1));
    }
}
