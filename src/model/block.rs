//! Content blocks: the atomic units placed on a worksheet.

use serde::{Deserialize, Serialize};

/// A single content unit supplied by the caller.
///
/// Blocks are immutable input. The only engine-derived datum, the display
/// number of a question, lives on [`NumberedBlock`] rather than here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Stable identifier from the data service
    pub id: String,

    /// Type-specific payload
    #[serde(flatten)]
    pub kind: BlockKind,

    /// Body text
    #[serde(default)]
    pub content: String,

    /// Difficulty rating, if the block carries one
    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    /// Opaque image reference resolved by the storage layer
    #[serde(default)]
    pub image_ref: Option<String>,

    /// Title of the source material, used for citations
    #[serde(default)]
    pub material_title: Option<String>,
}

impl Block {
    /// Create a block of the given kind with content.
    pub fn new(id: impl Into<String>, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            difficulty: None,
            image_ref: None,
            material_title: None,
        }
    }

    /// Create a question block.
    pub fn question(id: impl Into<String>, question: Question, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Question(question), content)
    }

    /// Create a passage block.
    pub fn passage(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Passage, content)
    }

    /// Create a concept block.
    pub fn concept(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Concept, content)
    }

    /// Create an explanation block.
    pub fn explanation(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Explanation, content)
    }

    /// Create an untyped block.
    pub fn other(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Other, content)
    }

    /// Set the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set the image reference.
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Set the source material title.
    pub fn with_source(mut self, title: impl Into<String>) -> Self {
        self.material_title = Some(title.into());
        self
    }

    /// Check if this block is a question.
    pub fn is_question(&self) -> bool {
        matches!(self.kind, BlockKind::Question(_))
    }

    /// Get the question payload, if this is a question.
    pub fn as_question(&self) -> Option<&Question> {
        match &self.kind {
            BlockKind::Question(q) => Some(q),
            _ => None,
        }
    }

    /// Check if the body text is blank.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Closed set of block types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// A numbered question
    Question(Question),
    /// A reading passage
    Passage,
    /// A key concept callout
    Concept,
    /// An explanation / worked solution
    Explanation,
    /// Anything else, rendered as plain text
    Other,
}

impl BlockKind {
    /// Short lowercase name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Question(_) => "question",
            BlockKind::Passage => "passage",
            BlockKind::Concept => "concept",
            BlockKind::Explanation => "explanation",
            BlockKind::Other => "other",
        }
    }
}

/// Question-specific payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Answer format; `None` renders neither options nor answer lines
    #[serde(default)]
    pub subtype: Option<QuestionKind>,

    /// Choices, in display order (multiple choice only)
    #[serde(default)]
    pub options: Vec<String>,

    /// Expected answer for the answer key
    #[serde(default)]
    pub correct_answer: Option<String>,
}

impl Question {
    /// Create a question payload of the given kind.
    pub fn new(subtype: QuestionKind) -> Self {
        Self {
            subtype: Some(subtype),
            options: Vec::new(),
            correct_answer: None,
        }
    }

    /// Create a multiple-choice payload.
    pub fn multiple_choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subtype: Some(QuestionKind::MultipleChoice),
            options: options.into_iter().map(Into::into).collect(),
            correct_answer: None,
        }
    }

    /// Set the correct answer.
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.correct_answer = Some(answer.into());
        self
    }

    /// Options that are actually displayed (multiple choice only).
    pub fn display_options(&self) -> &[String] {
        match self.subtype {
            Some(QuestionKind::MultipleChoice) => &self.options,
            _ => &[],
        }
    }

    /// Number of ruled answer lines below the question.
    pub fn answer_lines(&self) -> usize {
        match self.subtype {
            Some(QuestionKind::ShortAnswer) => 2,
            Some(QuestionKind::Essay) => 5,
            _ => 0,
        }
    }
}

/// Answer format of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    ShortAnswer,
    Essay,
    TrueFalse,
}

impl QuestionKind {
    /// Parse a data-service subtype string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "multiple_choice" => Some(QuestionKind::MultipleChoice),
            "short_answer" => Some(QuestionKind::ShortAnswer),
            "essay" => Some(QuestionKind::Essay),
            "true_false" => Some(QuestionKind::TrueFalse),
            _ => None,
        }
    }
}

/// Five-step difficulty scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    /// Parse a data-service difficulty string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "very_easy" => Some(Difficulty::VeryEasy),
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "very_hard" => Some(Difficulty::VeryHard),
            _ => None,
        }
    }

    /// Position on the scale, 1 through 5.
    pub fn level(self) -> usize {
        match self {
            Difficulty::VeryEasy => 1,
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
            Difficulty::VeryHard => 5,
        }
    }

    /// Fixed five-glyph star scale.
    pub fn stars(self) -> String {
        let filled = self.level();
        let mut s = "★".repeat(filled);
        s.push_str(&"☆".repeat(5 - filled));
        s
    }
}

/// A block paired with its engine-assigned display number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberedBlock {
    /// The caller's block, unchanged
    pub block: Block,

    /// Sequential question number (questions only)
    pub display_number: Option<u32>,
}

impl NumberedBlock {
    /// Number label as printed, e.g. `"3."`.
    pub fn label(&self) -> String {
        match self.display_number {
            Some(n) => format!("{}.", n),
            None => String::new(),
        }
    }
}
