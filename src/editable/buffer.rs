//! Line-oriented text buffer.
//!
//! The document is an ordered list of line strings without terminators.
//! There is exactly one mutator, [`TextBuffer::replace_range`]; everything
//! else (insert, delete, newline, paste) is expressed through it by the
//! edit engine.

use std::borrow::Cow;

use super::cursor::Position;
use crate::util::text::char_to_byte;

/// Ordered sequence of lines. Always holds at least one (possibly empty) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Create a buffer from text. `\r` characters are dropped, so CRLF input
    /// is normalized to `\n`.
    pub fn from_text(text: &str) -> Self {
        let normalized: Cow<'_, str> = if text.contains('\r') {
            Cow::Owned(text.replace('\r', ""))
        } else {
            Cow::Borrowed(text)
        };
        Self {
            lines: normalized.split('\n').map(str::to_string).collect(),
        }
    }

    /// Replace the whole content
    pub fn set_text(&mut self, text: &str) {
        *self = Self::from_text(text);
    }

    /// Full content joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line content, or `None` past the last line
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Line content, or `""` past the last line
    pub fn line_or_empty(&self, line: usize) -> &str {
        self.line(line).unwrap_or("")
    }

    /// All lines in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Length of a line in characters
    pub fn line_length(&self, line: usize) -> usize {
        self.line(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Total length in characters, counting one per line break
    pub fn len_chars(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum::<usize>() + self.lines.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Position just past the last character
    pub fn end_position(&self) -> Position {
        let last = self.lines.len() - 1;
        Position::new(last, self.line_length(last))
    }

    /// Character at a position, `None` at or past the end of the line
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line)?.chars().nth(pos.column)
    }

    /// Clamp a position into the document bounds
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        Position::new(line, pos.column.min(self.line_length(line)))
    }

    /// Column of first non-whitespace character on line (for smart Home)
    pub fn first_non_whitespace_column(&self, line: usize) -> usize {
        self.line_or_empty(line)
            .chars()
            .take_while(|c| c.is_whitespace())
            .count()
    }

    /// Text between two positions (in either order), lines joined with `\n`
    pub fn slice(&self, a: Position, b: Position) -> String {
        let start = self.clamp(a.min(b));
        let end = self.clamp(a.max(b));
        if start.line == end.line {
            let line = &self.lines[start.line];
            return line[char_to_byte(line, start.column)..char_to_byte(line, end.column)]
                .to_string();
        }

        let mut out = String::new();
        let first = &self.lines[start.line];
        out.push_str(&first[char_to_byte(first, start.column)..]);
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        let last = &self.lines[end.line];
        out.push_str(&last[..char_to_byte(last, end.column)]);
        out
    }

    /// Replace the half-open range `[start, end)` with `text` and return the
    /// position just after the inserted text.
    ///
    /// Positions must already be clamped to the document; the buffer does not
    /// clamp on behalf of callers.
    pub fn replace_range(&mut self, start: Position, end: Position, text: &str) -> Position {
        debug_assert!(start <= end, "replace_range: start {:?} after end {:?}", start, end);
        debug_assert_eq!(self.clamp(start), start, "replace_range: start out of bounds");
        debug_assert_eq!(self.clamp(end), end, "replace_range: end out of bounds");

        let first = &self.lines[start.line];
        let prefix = first[..char_to_byte(first, start.column)].to_string();
        let last = &self.lines[end.line];
        let suffix = last[char_to_byte(last, end.column)..].to_string();

        let mut pieces = text.split('\n');
        let mut replacement = Vec::new();
        let mut head = prefix;
        head.push_str(pieces.next().unwrap_or(""));
        replacement.push(head);
        replacement.extend(pieces.map(str::to_string));

        let last_idx = replacement.len() - 1;
        let new_end = if last_idx == 0 {
            Position::new(start.line, replacement[0].chars().count())
        } else {
            Position::new(start.line + last_idx, replacement[last_idx].chars().count())
        };
        replacement[last_idx].push_str(&suffix);

        self.lines.splice(start.line..=end.line, replacement);
        new_end
    }
}
