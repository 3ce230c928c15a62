//! Test metadata printed in headers and title slides.

use serde::{Deserialize, Serialize};

/// Descriptive information about the test or handout being exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestInfo {
    /// Title; a localized default is used when absent
    pub title: Option<String>,

    /// Subject, e.g. "Mathematics"
    pub subject: Option<String>,

    /// Grade or class
    pub grade: Option<String>,

    /// Date as free text
    pub date: Option<String>,

    /// Time limit in minutes
    pub time: Option<u32>,

    /// Instructions line; a localized default is used when absent
    pub instructions: Option<String>,
}

impl TestInfo {
    /// Create empty test info.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the grade.
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// Set the date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the time limit in minutes.
    pub fn with_time(mut self, minutes: u32) -> Self {
        self.time = Some(minutes);
        self
    }

    /// Set the instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Whether subject or grade is present (gates the metadata line in
    /// text-like exports).
    pub fn has_class_info(&self) -> bool {
        non_blank(&self.subject).is_some() || non_blank(&self.grade).is_some()
    }
}

/// Treat empty strings like absent values.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_class_info() {
        let info = TestInfo::new().with_title("Quiz").with_time(50);
        assert_eq!(info.title.as_deref(), Some("Quiz"));
        assert!(!info.has_class_info());

        let info = info.with_grade("  ");
        assert!(!info.has_class_info());

        let info = info.with_subject("Math");
        assert!(info.has_class_info());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let info: TestInfo =
            serde_json::from_str(r#"{"title":"Midterm","time":40,"instructions":"Read"}"#)
                .unwrap();
        assert_eq!(info.time, Some(40));
        assert_eq!(info.instructions.as_deref(), Some("Read"));
        assert!(info.subject.is_none());
    }
}
