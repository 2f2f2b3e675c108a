//! Mapping between text positions and screen coordinates for a fixed-width
//! font. Pure functions; the host supplies the font metrics.

use crate::util::text::{char_col_to_visual_col, visual_col_to_char_col};

use super::buffer::TextBuffer;
use super::cursor::Position;

/// Monospace cell size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for CharMetrics {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            line_height: 20.0,
        }
    }
}

impl CharMetrics {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    /// Top-left corner of the cell at `pos`, relative to the text origin
    pub fn position_to_screen(
        &self,
        buffer: &TextBuffer,
        pos: Position,
        tab_width: usize,
    ) -> (f32, f32) {
        let pos = buffer.clamp(pos);
        let visual = char_col_to_visual_col(buffer.line_or_empty(pos.line), pos.column, tab_width);
        (
            visual as f32 * self.char_width,
            pos.line as f32 * self.line_height,
        )
    }

    /// Nearest caret position to a point relative to the text origin.
    /// Points outside the document clamp to its bounds.
    pub fn screen_to_position(
        &self,
        buffer: &TextBuffer,
        x: f32,
        y: f32,
        tab_width: usize,
    ) -> Position {
        let line_height = self.line_height.max(1.0);
        let char_width = self.char_width.max(1.0);

        let line = (y.max(0.0) / line_height).floor() as usize;
        let line = line.min(buffer.line_count() - 1);

        let visual_column = if x > 0.0 {
            (x / char_width).round() as usize
        } else {
            0
        };

        let text = buffer.line_or_empty(line);
        let column = visual_col_to_char_col(text, visual_column, tab_width);
        Position::new(line, column.min(buffer.line_length(line)))
    }
}
