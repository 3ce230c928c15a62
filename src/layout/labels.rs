//! Localized label tables shared by the layout engine and every renderer.

use super::options::{DifficultyDisplay, Locale};
use crate::model::Difficulty;

/// Fixed strings printed by generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub difficulty_prefix: &'static str,
    pub source_prefix: &'static str,
    pub concept: &'static str,
    pub concept_marker: &'static str,
    pub passage: &'static str,
    pub passage_marker: &'static str,
    pub explanation: &'static str,
    pub undetermined: &'static str,
    pub answer_key_title: &'static str,
    pub default_test_title: &'static str,
    pub default_document_title: &'static str,
    pub default_presentation_title: &'static str,
    pub default_instructions: &'static str,
    pub student_name: &'static str,
    pub subject: &'static str,
    pub grade: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub minutes_suffix: &'static str,
    difficulty: [&'static str; 5],
}

const KO: Labels = Labels {
    difficulty_prefix: "난이도",
    source_prefix: "출처",
    concept: "핵심 개념",
    concept_marker: "💡 핵심 개념",
    passage: "지문",
    passage_marker: "📄 지문",
    explanation: "해설",
    undetermined: "미정",
    answer_key_title: "정답지",
    default_test_title: "시험지",
    default_document_title: "문서",
    default_presentation_title: "프레젠테이션",
    default_instructions: "※ 문제를 잘 읽고 답안을 작성하시오.",
    student_name: "이름:",
    subject: "과목",
    grade: "학년",
    date: "일시",
    time: "시간",
    minutes_suffix: "분",
    difficulty: ["매우 쉬움", "쉬움", "보통", "어려움", "매우 어려움"],
};

const EN: Labels = Labels {
    difficulty_prefix: "Difficulty",
    source_prefix: "Source",
    concept: "Key Concept",
    concept_marker: "💡 Key Concept",
    passage: "Passage",
    passage_marker: "📄 Passage",
    explanation: "Explanation",
    undetermined: "TBD",
    answer_key_title: "Answer Key",
    default_test_title: "Test",
    default_document_title: "Document",
    default_presentation_title: "Presentation",
    default_instructions: "※ Read each question carefully and write your answers.",
    student_name: "Name:",
    subject: "Subject",
    grade: "Grade",
    date: "Date",
    time: "Time",
    minutes_suffix: " min",
    difficulty: ["Very easy", "Easy", "Medium", "Hard", "Very hard"],
};

impl Labels {
    /// Label table for a locale.
    pub fn for_locale(locale: Locale) -> &'static Labels {
        match locale {
            Locale::Ko => &KO,
            Locale::En => &EN,
        }
    }

    /// Difficulty word, e.g. "보통".
    pub fn difficulty(&self, difficulty: Difficulty) -> &'static str {
        self.difficulty[difficulty.level() - 1]
    }

    /// Difficulty line in text mode, e.g. "난이도: 보통".
    pub fn difficulty_line(&self, difficulty: Difficulty) -> String {
        format!("{}: {}", self.difficulty_prefix, self.difficulty(difficulty))
    }

    /// Bracketed citation, e.g. "[출처: 수학의 정석]".
    pub fn citation(&self, title: &str) -> String {
        format!("[{}: {}]", self.source_prefix, title)
    }

    /// Difficulty indicator for a display mode, if one is shown.
    pub fn difficulty_indicator(
        &self,
        display: DifficultyDisplay,
        difficulty: Option<Difficulty>,
    ) -> Option<String> {
        let difficulty = difficulty?;
        match display {
            DifficultyDisplay::None => None,
            DifficultyDisplay::Text => Some(self.difficulty_line(difficulty)),
            DifficultyDisplay::Stars => Some(difficulty.stars()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_korean_labels() {
        let labels = Labels::for_locale(Locale::Ko);
        assert_eq!(labels.difficulty_line(Difficulty::Medium), "난이도: 보통");
        assert_eq!(labels.difficulty(Difficulty::VeryHard), "매우 어려움");
        assert_eq!(labels.citation("교과서"), "[출처: 교과서]");
    }

    #[test]
    fn test_english_labels() {
        let labels = Labels::for_locale(Locale::En);
        assert_eq!(labels.difficulty_line(Difficulty::Easy), "Difficulty: Easy");
        assert_eq!(labels.undetermined, "TBD");
    }

    #[test]
    fn test_difficulty_indicator_modes() {
        let labels = Labels::for_locale(Locale::Ko);
        let hard = Some(Difficulty::Hard);
        assert_eq!(labels.difficulty_indicator(DifficultyDisplay::None, hard), None);
        assert_eq!(
            labels.difficulty_indicator(DifficultyDisplay::Text, hard).as_deref(),
            Some("난이도: 어려움")
        );
        assert_eq!(
            labels.difficulty_indicator(DifficultyDisplay::Stars, hard).as_deref(),
            Some("★★★★☆")
        );
        assert_eq!(labels.difficulty_indicator(DifficultyDisplay::Text, None), None);
    }
}
