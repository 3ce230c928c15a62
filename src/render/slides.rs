//! HTML slide deck rendering.
//!
//! Questions are batched three to a slide. Any other block closes the
//! current batch and gets a slide of its own.

use super::visitor::{walk, BlockVisitor};
use crate::layout::{FormatOptions, Labels};
use crate::model::{non_blank, Block, Document, NumberedBlock, Question, TestInfo};
use quick_xml::escape::escape;
use std::fmt::Write;

/// Maximum number of questions on one slide.
pub const QUESTIONS_PER_SLIDE: usize = 3;

const STYLE: &str = "\
body {
  font-family: 'Noto Sans KR', sans-serif;
  margin: 0;
  padding: 0;
}
.slide {
  width: 1024px;
  height: 768px;
  padding: 50px;
  box-sizing: border-box;
  page-break-after: always;
  display: flex;
  flex-direction: column;
  justify-content: center;
}
h1 { font-size: 48px; text-align: center; }
h2 { font-size: 36px; margin-bottom: 30px; }
.question { margin-bottom: 30px; }
.question-number { font-weight: bold; }
.difficulty { color: #666666; font-size: 0.9em; }
.options { margin-left: 20px; }
.passage { background: #f5f5f5; padding: 20px; border-radius: 8px; }
.concept { color: #1a73e8; font-weight: bold; }
.explanation { border: 1px dashed #1a73e8; padding: 20px; border-radius: 4px; color: #666666; }
";

/// Content of one slide.
#[derive(Debug, Clone, PartialEq)]
pub enum Slide {
    /// Title slide with optional subject and grade lines
    Title {
        title: String,
        lines: Vec<String>,
    },
    /// Up to three questions
    Questions(Vec<SlideQuestion>),
    /// A single non-question block
    Content {
        heading: Option<String>,
        class: Option<&'static str>,
        body: String,
    },
}

/// A question as shown on a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideQuestion {
    pub number: String,
    pub content: String,
    pub difficulty: Option<String>,
    pub options: Vec<String>,
}

/// Collects slides from a block walk.
pub struct SlideBuilder<'a> {
    options: &'a FormatOptions,
    labels: &'static Labels,
    slides: Vec<Slide>,
    pending: Vec<SlideQuestion>,
}

impl<'a> SlideBuilder<'a> {
    pub fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            labels: Labels::for_locale(options.locale),
            slides: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Build the title slide and one slide per batch or block.
    pub fn build(mut self, info: &TestInfo, blocks: &[NumberedBlock]) -> Vec<Slide> {
        let mut lines = Vec::new();
        if let Some(subject) = non_blank(&info.subject) {
            lines.push(format!("{}: {}", self.labels.subject, subject));
        }
        if let Some(grade) = non_blank(&info.grade) {
            lines.push(format!("{}: {}", self.labels.grade, grade));
        }
        self.slides.push(Slide::Title {
            title: self.title(info).to_string(),
            lines,
        });
        walk(blocks, &mut self);
        self.slides
    }

    fn title<'i>(&self, info: &'i TestInfo) -> &'i str {
        non_blank(&info.title).unwrap_or(self.labels.default_presentation_title)
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let batch = std::mem::take(&mut self.pending);
            self.slides.push(Slide::Questions(batch));
        }
    }

    fn content(&mut self, heading: Option<&str>, class: Option<&'static str>, block: &Block) {
        self.flush();
        self.slides.push(Slide::Content {
            heading: heading.map(str::to_string),
            class,
            body: block.content.clone(),
        });
    }
}

impl BlockVisitor for SlideBuilder<'_> {
    fn visit_question(&mut self, numbered: &NumberedBlock, question: &Question) {
        self.pending.push(SlideQuestion {
            number: numbered.label(),
            content: numbered.block.content.clone(),
            difficulty: self
                .labels
                .difficulty_indicator(self.options.show_difficulty, numbered.block.difficulty),
            options: question
                .display_options()
                .iter()
                .enumerate()
                .map(|(i, option)| format!("{}) {}", i + 1, option))
                .collect(),
        });
        if self.pending.len() >= QUESTIONS_PER_SLIDE {
            self.flush();
        }
    }

    fn visit_passage(&mut self, block: &Block) {
        self.content(Some(self.labels.passage), Some("passage"), block);
    }

    fn visit_concept(&mut self, block: &Block) {
        self.content(Some(self.labels.concept), Some("concept"), block);
    }

    fn visit_explanation(&mut self, block: &Block) {
        self.content(Some(self.labels.explanation), Some("explanation"), block);
    }

    fn visit_other(&mut self, block: &Block) {
        self.content(None, None, block);
    }

    fn on_end(&mut self) {
        self.flush();
    }
}

/// Slides for a document.
pub fn slides(doc: &Document) -> Vec<Slide> {
    SlideBuilder::new(&doc.format).build(&doc.test_info, &doc.blocks)
}

/// Render a document as a self-contained HTML slide deck.
pub fn to_html_slides(doc: &Document) -> String {
    let labels = Labels::for_locale(doc.format.locale);
    let title = non_blank(&doc.test_info.title).unwrap_or(labels.default_presentation_title);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(title));
    let _ = writeln!(html, "<style>\n{}</style>", STYLE);
    html.push_str("</head>\n<body>\n");
    for slide in slides(doc) {
        write_slide(&mut html, &slide);
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn write_slide(html: &mut String, slide: &Slide) {
    html.push_str("<div class=\"slide\">\n");
    match slide {
        Slide::Title { title, lines } => {
            let _ = writeln!(html, "<h1>{}</h1>", escape(title));
            for line in lines {
                let _ = writeln!(html, "<p>{}</p>", escape(line));
            }
        }
        Slide::Questions(questions) => {
            for q in questions {
                html.push_str("<div class=\"question\">\n");
                let _ = writeln!(
                    html,
                    "<p><span class=\"question-number\">{}</span> {}</p>",
                    escape(&q.number),
                    escape(&q.content)
                );
                if let Some(difficulty) = &q.difficulty {
                    let _ = writeln!(html, "<p class=\"difficulty\">{}</p>", escape(difficulty));
                }
                if !q.options.is_empty() {
                    html.push_str("<div class=\"options\">\n");
                    for option in &q.options {
                        let _ = writeln!(html, "<p>{}</p>", escape(option));
                    }
                    html.push_str("</div>\n");
                }
                html.push_str("</div>\n");
            }
        }
        Slide::Content {
            heading,
            class,
            body,
        } => {
            if let Some(heading) = heading {
                let _ = writeln!(html, "<h2>{}</h2>", escape(heading));
            }
            match class {
                Some(class) => {
                    let _ = writeln!(html, "<div class=\"{}\">{}</div>", class, escape(body));
                }
                None => {
                    let _ = writeln!(html, "<p>{}</p>", escape(body));
                }
            }
        }
    }
    html.push_str("</div>\n");
}
