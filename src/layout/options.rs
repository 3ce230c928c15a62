//! Format options and configuration.
//!
//! Every enum here deserializes leniently: an unrecognized value falls back
//! to the default with a warning instead of failing the export. `null`
//! means "not set" and yields the default silently.

use super::geometry::PageSize;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

macro_rules! lenient_enum {
    ($name:ident, $what:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Canonical option string.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parse an option string (case-insensitive).
            pub fn parse(s: &str) -> Option<Self> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            /// Parse an option string, falling back to the default.
            pub fn parse_or_default(s: &str) -> Self {
                Self::parse(s).unwrap_or_else(|| {
                    let fallback = Self::default();
                    warn!(
                        "Unknown {} '{}', using '{}'",
                        $what,
                        s,
                        fallback.as_str()
                    );
                    fallback
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(match Value::deserialize(deserializer)? {
                    Value::String(s) => Self::parse_or_default(&s),
                    Value::Null => Self::default(),
                    other => {
                        let fallback = Self::default();
                        warn!(
                            "Unsupported {} {}, using '{}'",
                            $what,
                            other,
                            fallback.as_str()
                        );
                        fallback
                    }
                })
            }
        }
    };
}

lenient_enum!(PageSize, "page size", {
    A4 => "A4",
    A3 => "A3",
    B4 => "B4",
    B3 => "B3",
});

/// Number of text columns per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Columns {
    #[default]
    One,
    Two,
}

impl Columns {
    /// Map a requested column count; anything but 2 is a single column.
    pub fn from_count(count: i64) -> Self {
        match count {
            1 => Columns::One,
            2 => Columns::Two,
            other => {
                warn!("Unsupported column count {}, using 1", other);
                Columns::One
            }
        }
    }

    /// Column count as a number.
    pub fn count(self) -> usize {
        match self {
            Columns::One => 1,
            Columns::Two => 2,
        }
    }
}

impl Serialize for Columns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.count() as u8)
    }
}

impl<'de> Deserialize<'de> for Columns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let count = match Value::deserialize(deserializer)? {
            Value::Null => return Ok(Columns::One),
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        };
        Ok(match count {
            Some(n) => Columns::from_count(n),
            None => {
                warn!("Unsupported column count, using 1");
                Columns::One
            }
        })
    }
}

/// Body font size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

lenient_enum!(FontSize, "font size", {
    Small => "small",
    Medium => "medium",
    Large => "large",
});

/// How a question's difficulty is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DifficultyDisplay {
    #[default]
    None,
    Text,
    Stars,
}

lenient_enum!(DifficultyDisplay, "difficulty display", {
    None => "none",
    Text => "text",
    Stars => "stars",
});

/// Horizontal anchor of source citations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourcePosition {
    #[default]
    Left,
    Right,
}

lenient_enum!(SourcePosition, "source position", {
    Left => "left",
    Right => "right",
});

/// Trailing space after each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuestionSpacing {
    Narrow,
    #[default]
    Normal,
    Wide,
}

lenient_enum!(QuestionSpacing, "question spacing", {
    Narrow => "narrow",
    Normal => "normal",
    Wide => "wide",
});

impl QuestionSpacing {
    /// Gap in points.
    pub fn gap(self) -> f32 {
        match self {
            QuestionSpacing::Narrow => 10.0,
            QuestionSpacing::Normal => 20.0,
            QuestionSpacing::Wide => 40.0,
        }
    }
}

/// Language of generated labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Ko,
    En,
}

lenient_enum!(Locale, "locale", {
    Ko => "ko",
    En => "en",
});

/// Formatting options for a single layout run / export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatOptions {
    /// Paper size
    #[serde(alias = "page_size")]
    pub page_size: PageSize,

    /// Column count
    pub columns: Columns,

    /// Body font size preset
    #[serde(alias = "font_size")]
    pub font_size: FontSize,

    /// Difficulty indicator mode
    #[serde(alias = "show_difficulty")]
    pub show_difficulty: DifficultyDisplay,

    /// Print source citations under questions
    #[serde(alias = "show_sources", deserialize_with = "lenient_bool")]
    pub show_sources: bool,

    /// Anchor of source citations
    #[serde(alias = "source_position")]
    pub source_position: SourcePosition,

    /// Trailing gap after questions
    #[serde(alias = "question_spacing")]
    pub question_spacing: QuestionSpacing,

    /// Label language
    pub locale: Locale,

    /// Base name for exported files
    #[serde(alias = "file_name", deserialize_with = "lenient_name")]
    pub file_name: Option<String>,
}

/// `true`/`false`, their string forms, or a number (non-zero is true).
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" | "" => false,
            other => {
                warn!("Unsupported flag '{}', using false", other);
                false
            }
        },
        other => {
            warn!("Unsupported flag {}, using false", other);
            false
        }
    })
}

/// Any string; numbers are taken as their text and everything else unsets.
fn lenient_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => {
            warn!("Unsupported file name {}, ignoring", other);
            None
        }
    })
}

impl FormatOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the column count.
    pub fn with_columns(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    /// Set the font size preset.
    pub fn with_font_size(mut self, font_size: FontSize) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the difficulty display mode.
    pub fn with_difficulty(mut self, display: DifficultyDisplay) -> Self {
        self.show_difficulty = display;
        self
    }

    /// Enable or disable source citations.
    pub fn with_sources(mut self, show: bool) -> Self {
        self.show_sources = show;
        self
    }

    /// Set the citation anchor.
    pub fn with_source_position(mut self, position: SourcePosition) -> Self {
        self.source_position = position;
        self
    }

    /// Set question spacing.
    pub fn with_spacing(mut self, spacing: QuestionSpacing) -> Self {
        self.question_spacing = spacing;
        self
    }

    /// Set the label language.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the export base file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Base name shared by every export of this document.
    ///
    /// Only the last path component of the configured name is used and its
    /// extension is dropped, so `../out/midterm.docx` yields `midterm`.
    /// Names that leave nothing usable fall back to `default_stem`.
    pub fn output_stem<'a>(&'a self, default_stem: &'a str) -> &'a str {
        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit(['/', '\\', ':']).next())
            .map(str::trim)
            .map(|name| match name.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem,
                _ => name,
            })
            .filter(|stem| !stem.is_empty() && !stem.chars().all(|c| c == '.'))
            .unwrap_or(default_stem)
    }

    /// File name for an export with the given extension.
    ///
    /// A configured name keeps its stem and gets the extension swapped, so
    /// `material.docx` becomes `material.txt` on fallback.
    pub fn output_file_name(&self, default_stem: &str, extension: &str) -> String {
        format!("{}.{}", self.output_stem(default_stem), extension)
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            columns: Columns::One,
            font_size: FontSize::Medium,
            show_difficulty: DifficultyDisplay::None,
            show_sources: false,
            source_position: SourcePosition::Left,
            question_spacing: QuestionSpacing::Normal,
            locale: Locale::Ko,
            file_name: None,
        }
    }
}
