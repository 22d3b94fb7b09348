//! Content-measurement collaborator.
//!
//! Layout asks [`ContentMeasurer::content_height`] how tall a cell's content
//! is at a given width; the render path asks [`ContentMeasurer::reflow`] for
//! the laid-out lines. Implementations must be synchronous and must not touch
//! table state.

use crate::types::{CellContent, CellId};

/// Text-flow collaborator used by layout and rendering
pub trait ContentMeasurer {
    /// Height of `content` laid out in `width`, including any cell padding.
    fn content_height(&self, cell: CellId, content: &CellContent, width: f32) -> f32;

    /// Lines of `content` wrapped to `width`, truncated to those that fit in
    /// `max_height`.
    fn reflow(&self, cell: CellId, content: &CellContent, width: f32, max_height: f32)
        -> Vec<String>;

    /// Advance between reflowed lines when painting.
    fn line_height(&self) -> f32 {
        DEFAULT_LINE_HEIGHT
    }
}

/// Default character advance in pixels
pub const DEFAULT_CHAR_WIDTH: f32 = 7.0;

/// Default line height in pixels
pub const DEFAULT_LINE_HEIGHT: f32 = 16.0;

/// Deterministic measurer assuming a fixed advance per character.
///
/// Good enough for the CLI, tests and benchmarks; real documents plug in
/// their own shaping engine.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    pub char_width: f32,
    pub line_height: f32,
    /// Padding applied on each side of the text block
    pub padding: f32,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            char_width: DEFAULT_CHAR_WIDTH,
            line_height: DEFAULT_LINE_HEIGHT,
            padding: 4.0,
        }
    }
}

impl MonospaceMeasurer {
    pub fn new(char_width: f32, line_height: f32, padding: f32) -> Self {
        Self {
            char_width,
            line_height,
            padding,
        }
    }

    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    /// Wrap text into lines that fit within `max_width`.
    ///
    /// Explicit newlines always break. An empty paragraph yields an empty line.
    pub fn wrap_text(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for paragraph in text.split('\n') {
            let before = lines.len();
            self.wrap_paragraph(paragraph, max_width, &mut lines);
            if lines.len() == before {
                lines.push(String::new());
            }
        }
        lines
    }

    fn wrap_paragraph(&self, text: &str, max_width: f32, lines: &mut Vec<String>) {
        let mut current_line = String::new();

        for word in text.split_whitespace() {
            if !current_line.is_empty() {
                let test_width = self.measure(&current_line) + self.char_width + self.measure(word);
                if test_width <= max_width {
                    current_line.push(' ');
                    current_line.push_str(word);
                    continue;
                }
                lines.push(std::mem::take(&mut current_line));
            }

            if self.measure(word) > max_width {
                let mut broken = self.break_word(word, max_width);
                // Last part stays open so following words can join it
                current_line = broken.pop().unwrap_or_default();
                lines.extend(broken);
            } else {
                current_line = word.to_string();
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    /// Break a single word that's too long to fit on one line.
    fn break_word(&self, word: &str, max_width: f32) -> Vec<String> {
        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0;

        for ch in word.chars() {
            // Always keep at least one character per part so narrow widths terminate
            if !current.is_empty() && current_width + self.char_width > max_width {
                parts.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            current.push(ch);
            current_width += self.char_width;
        }

        if !current.is_empty() {
            parts.push(current);
        }
        parts
    }

    fn text_width(&self, width: f32) -> f32 {
        (width - self.padding * 2.0).max(0.0)
    }
}

impl ContentMeasurer for MonospaceMeasurer {
    fn content_height(&self, _cell: CellId, content: &CellContent, width: f32) -> f32 {
        let lines = self.wrap_text(&content.text, self.text_width(width)).len().max(1);
        lines as f32 * self.line_height + self.padding * 2.0
    }

    fn reflow(
        &self,
        _cell: CellId,
        content: &CellContent,
        width: f32,
        max_height: f32,
    ) -> Vec<String> {
        if content.is_empty() {
            return Vec::new();
        }
        let mut lines = self.wrap_text(&content.text, self.text_width(width));
        let available = (max_height - self.padding * 2.0).max(0.0);
        let mut fitting = 1;
        while fitting < lines.len() && (fitting + 1) as f32 * self.line_height <= available {
            fitting += 1;
        }
        lines.truncate(fitting);
        lines
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let m = MonospaceMeasurer::new(10.0, 20.0, 0.0);
        // 5 chars per line
        assert_eq!(m.wrap_text("ab cd ef", 50.0), vec!["ab cd", "ef"]);
    }

    #[test]
    fn breaks_long_words() {
        let m = MonospaceMeasurer::new(10.0, 20.0, 0.0);
        assert_eq!(m.wrap_text("abcdefgh xy", 30.0), vec!["abc", "def", "gh", "xy"]);
    }

    #[test]
    fn explicit_newlines_break() {
        let m = MonospaceMeasurer::new(10.0, 20.0, 0.0);
        assert_eq!(m.wrap_text("a\n\nb", 100.0), vec!["a", "", "b"]);
    }

    #[test]
    fn empty_content_is_one_line_tall() {
        let m = MonospaceMeasurer::new(10.0, 20.0, 4.0);
        assert_eq!(m.content_height(CellId(0), &CellContent::default(), 100.0), 28.0);
    }

    #[test]
    fn narrower_width_means_taller_content() {
        let m = MonospaceMeasurer::default();
        let content = CellContent::new("the quick brown fox jumps over the lazy dog");
        let wide = m.content_height(CellId(0), &content, 400.0);
        let narrow = m.content_height(CellId(0), &content, 60.0);
        assert!(narrow > wide);
    }

    #[test]
    fn reflow_truncates_to_max_height() {
        let m = MonospaceMeasurer::new(10.0, 20.0, 0.0);
        let content = CellContent::new("aa bb cc dd");
        assert_eq!(m.reflow(CellId(0), &content, 20.0, 45.0), vec!["aa", "bb"]);
    }
}
