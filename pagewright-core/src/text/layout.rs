//! Greedy word wrapping against approximate font metrics.

use crate::text::{measure_text, Font};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    /// Stretches inter-word space to the full width on every line but the
    /// last line of a paragraph
    Justified,
}

impl TextAlign {
    /// Horizontal offset of a line of `line_width` inside `available`.
    pub fn offset(&self, line_width: f64, available: f64) -> f64 {
        match self {
            TextAlign::Left | TextAlign::Justified => 0.0,
            TextAlign::Right => available - line_width,
            TextAlign::Center => (available - line_width) / 2.0,
        }
    }
}

/// One output line produced by [`wrap_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    /// Measured width in points
    pub width: f64,
    /// True for the final line of a paragraph (before a newline or the end)
    pub ends_paragraph: bool,
}

impl WrappedLine {
    pub fn space_count(&self) -> usize {
        self.text.matches(' ').count()
    }

    /// Word spacing (`Tw`) that stretches this line to `available`, or `None`
    /// when the line should be set ragged.
    pub fn justify_spacing(&self, available: f64) -> Option<f64> {
        let spaces = self.space_count();
        if self.ends_paragraph || spaces == 0 || self.width >= available {
            return None;
        }
        Some((available - self.width) / spaces as f64)
    }
}

/// Splits `text` into lines no wider than `max_width`.
///
/// Explicit newlines always break. Words are never split, so a single word
/// wider than `max_width` gets a line of its own. Blank input lines are kept
/// as empty lines.
pub fn wrap_text(text: &str, font: Font, font_size: f64, max_width: f64) -> Vec<WrappedLine> {
    let space_width = measure_text(" ", font, font_size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = measure_text(word, font, font_size);

            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space_width + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space_width + word_width;
            } else {
                lines.push(WrappedLine {
                    text: std::mem::take(&mut current),
                    width: current_width,
                    ends_paragraph: false,
                });
                current.push_str(word);
                current_width = word_width;
            }
        }

        lines.push(WrappedLine {
            text: current,
            width: current_width,
            ends_paragraph: true,
        });
    }

    lines
}
