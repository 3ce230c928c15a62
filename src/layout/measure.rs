//! Text measurement used to wrap text boxes before layout is finalized.
//!
//! The height of a wrapped text box depends on font metrics, which belong
//! to the rendering backend. Layout therefore takes a [`TextMeasurer`] and
//! stores the computed wrap on each text box, so every renderer draws the
//! exact lines the paginator measured.

use crate::model::{Style, SINGLE_LINE_FACTOR};

/// Deterministic text metrics.
pub trait TextMeasurer: Send + Sync {
    /// Advance width of a single unwrapped line.
    fn line_width(&self, text: &str, style: &Style) -> f32;

    /// Greedy word wrap to `max_width`.
    ///
    /// Explicit newlines start new lines; words wider than the box are
    /// broken between characters. Always returns at least one line.
    fn wrap(&self, text: &str, max_width: f32, style: &Style) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", line, word)
                };
                if self.line_width(&candidate, style) <= max_width {
                    line = candidate;
                    continue;
                }
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                if self.line_width(word, style) <= max_width {
                    line = word.to_string();
                } else {
                    let mut pieces = self.break_word(word, max_width, style);
                    line = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                }
            }
            lines.push(line);
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    /// Split an over-long word into chunks that each fit `max_width`.
    fn break_word(&self, word: &str, max_width: f32, style: &Style) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for ch in word.chars() {
            current.push(ch);
            if self.line_width(&current, style) > max_width && current.chars().count() > 1 {
                current.pop();
                pieces.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        pieces.push(current);
        pieces
    }

    /// Height of a box with `line_count` lines.
    fn box_height(&self, line_count: usize, style: &Style) -> f32 {
        if line_count == 0 {
            return 0.0;
        }
        let leading = style.font_size * style.line_height;
        leading * (line_count - 1) as f32 + style.font_size * SINGLE_LINE_FACTOR
    }

    /// Wrap and measure in one step.
    fn measure_box(&self, text: &str, max_width: f32, style: &Style) -> (Vec<String>, f32) {
        let lines = self.wrap(text, max_width, style);
        let height = self.box_height(lines.len(), style);
        (lines, height)
    }
}

/// Metrics with a fixed advance per character class.
///
/// Narrow (Latin, digits, punctuation) characters advance `narrow` ems,
/// wide (Hangul, CJK, fullwidth, emoji) characters advance `wide` ems.
/// The raster surface draws with the same advances, so measured and drawn
/// text agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMetrics {
    pub narrow: f32,
    pub wide: f32,
    /// Extra advance factor applied to bold text
    pub bold_factor: f32,
}

impl FixedAdvanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance of one character in ems.
    pub fn advance(&self, ch: char) -> f32 {
        if is_wide(ch) {
            self.wide
        } else {
            self.narrow
        }
    }
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self {
            narrow: 0.6,
            wide: 1.0,
            bold_factor: 1.05,
        }
    }
}

impl TextMeasurer for FixedAdvanceMetrics {
    fn line_width(&self, text: &str, style: &Style) -> f32 {
        let ems: f32 = text.chars().map(|c| self.advance(c)).sum();
        let factor = if style.is_bold() { self.bold_factor } else { 1.0 };
        ems * style.font_size * factor
    }
}

/// Whether a character occupies a full em.
pub fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F       // Hangul Jamo
        | 0x2E80..=0x303E     // CJK radicals, punctuation
        | 0x3041..=0x33FF     // Kana, compatibility
        | 0x3400..=0x4DBF     // CJK ext A
        | 0x4E00..=0x9FFF     // CJK unified
        | 0xA960..=0xA97F     // Hangul Jamo ext A
        | 0xAC00..=0xD7A3     // Hangul syllables
        | 0xF900..=0xFAFF     // CJK compatibility
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60     // Fullwidth forms
        | 0xFFE0..=0xFFE6
        | 0x2600..=0x27BF     // Symbols (stars, dingbats)
        | 0x1F300..=0x1FAFF   // Emoji
        | 0x20000..=0x3FFFD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> Style {
        Style::plain(10.0)
    }

    #[test]
    fn test_line_width_by_class() {
        let m = FixedAdvanceMetrics::new();
        assert_eq!(m.line_width("ab", &style()), 12.0);
        assert_eq!(m.line_width("가나", &style()), 20.0);
        assert!(m.line_width("ab", &style().bold()) > 12.0);
    }

    #[test]
    fn test_wrap_on_words() {
        let m = FixedAdvanceMetrics::new();
        // 6pt per char; 60pt fits 10 chars.
        let lines = m.wrap("aaaa bbbb cccc", 60.0, &style());
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_wrap_keeps_newlines_and_blank_text() {
        let m = FixedAdvanceMetrics::new();
        assert_eq!(m.wrap("a\nb", 100.0, &style()), vec!["a", "b"]);
        assert_eq!(m.wrap("", 100.0, &style()), vec![""]);
    }

    #[test]
    fn test_long_word_is_broken() {
        let m = FixedAdvanceMetrics::new();
        let lines = m.wrap("abcdefghijkl", 30.0, &style());
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
        for line in &lines {
            assert!(m.line_width(line, &style()) <= 30.0);
        }
    }

    #[test]
    fn test_box_height() {
        let m = FixedAdvanceMetrics::new();
        let s = style();
        assert_eq!(m.box_height(0, &s), 0.0);
        assert!((m.box_height(1, &s) - 11.3).abs() < 1e-4);
        assert!((m.box_height(3, &s) - (32.0 + 11.3)).abs() < 1e-4);
    }
}
