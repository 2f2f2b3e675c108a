//! EditEngine - the only code path that mutates a [`TextBuffer`].
//!
//! Every operation runs over all cursors in one pass, in ascending position
//! order, against a buffer that is already updated for the cursors before it.
//! After each per-cursor mutation the remaining cursors are re-homed so they
//! keep pointing at the same text. The set is merged and sorted at the end.
//!
//! Operations return `true` when the buffer text changed.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::util::text::{is_identifier_char, leading_whitespace, next_tab_stop};

use super::buffer::TextBuffer;
use super::cursor::Position;
use super::cursor_set::{word_boundary, CursorSet, Direction};

/// Editing policy knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOptions {
    /// Width of one indent level and of a tab stop, in spaces
    pub tab_width: usize,
    /// Auto-close `(`, `[`, `{` and type over matching closers
    pub auto_pair_brackets: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            auto_pair_brackets: true,
        }
    }
}

impl EditOptions {
    fn indent_unit(&self) -> String {
        " ".repeat(self.tab_width.max(1))
    }
}

/// Closing character for an auto-paired opener
pub fn closing_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closing_bracket(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}')
}

/// Whether text ending in this character opens a new indent level
fn opens_indent(ch: char) -> bool {
    matches!(ch, '{' | '(' | '[' | ':')
}

/// Map a position through a replacement of `[start, old_end)` that now ends
/// at `new_end`.
///
/// `sticky` positions sitting exactly at the edit start stay put (used for
/// cursors already processed in this pass, which lie before the edit).
fn rehome(
    pos: Position,
    start: Position,
    old_end: Position,
    new_end: Position,
    sticky: bool,
) -> Position {
    if pos < start || (sticky && pos == start) {
        pos
    } else if pos < old_end {
        start
    } else if pos.line == old_end.line {
        Position::new(new_end.line, new_end.column + (pos.column - old_end.column))
    } else {
        let line = pos.line + new_end.line - old_end.line;
        Position::new(line, pos.column)
    }
}

/// Replace tabs with spaces up to the next tab stop, tracking the column
/// from `start_column` and resetting it after each line break.
fn expand_tabs(text: &str, start_column: usize, tab_width: usize) -> Cow<'_, str> {
    if !text.contains('\t') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut column = start_column;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let stop = next_tab_stop(column, tab_width);
                out.extend(std::iter::repeat(' ').take(stop - column));
                column = stop;
            }
            '\n' => {
                out.push('\n');
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    Cow::Owned(out)
}

/// Mutating view over a buffer and its cursors
pub struct EditEngine<'a> {
    buffer: &'a mut TextBuffer,
    cursors: &'a mut CursorSet,
    options: EditOptions,
}

impl<'a> EditEngine<'a> {
    pub fn new(
        buffer: &'a mut TextBuffer,
        cursors: &'a mut CursorSet,
        options: EditOptions,
    ) -> Self {
        Self {
            buffer,
            cursors,
            options,
        }
    }

    /// Clamp stale cursors and drop goal columns before an edit
    fn begin(&mut self) {
        self.cursors.clamp_all(self.buffer);
        for cursor in self.cursors.cursors_mut() {
            cursor.clear_desired_column();
        }
    }

    fn finish(&mut self, changed: bool) -> bool {
        self.cursors.merge_and_sort();
        changed
    }

    /// Replace `[start, end)` on behalf of cursor `idx`, re-home every other
    /// cursor and return the end of the inserted text. The cursor `idx`
    /// itself is left for the caller to place.
    fn replace(&mut self, idx: usize, start: Position, end: Position, text: &str) -> Position {
        let a = self.buffer.clamp(start);
        let b = self.buffer.clamp(end);
        let (start, end) = (a.min(b), a.max(b));
        let new_end = self.buffer.replace_range(start, end, text);

        for (j, cursor) in self.cursors.cursors_mut().iter_mut().enumerate() {
            if j == idx {
                continue;
            }
            let sticky = j < idx;
            cursor.selection.anchor = rehome(cursor.selection.anchor, start, end, new_end, sticky);
            cursor.selection.active = rehome(cursor.selection.active, start, end, new_end, sticky);
            cursor.position = cursor.selection.active;
        }
        new_end
    }

    /// Replace cursor `idx`'s selection (or insert at its caret) and park the
    /// caret after the new text.
    fn replace_selection(&mut self, idx: usize, text: &str) -> bool {
        let cursor = self.cursors.as_slice()[idx];
        let (start, end) = (cursor.selection.start(), cursor.selection.end());
        if start == end && text.is_empty() {
            return false;
        }
        let new_end = self.replace(idx, start, end, text);
        self.cursors.cursor_mut(idx).place(new_end);
        true
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Insert text at every cursor, replacing selections.
    ///
    /// A single character goes through the typing rules: newline
    /// auto-indent, tab expansion, bracket auto-pairing and overtype.
    /// Longer text is inserted literally apart from tab expansion, with new
    /// lines indented like the cursor's line when `allow_auto_indent` is set.
    pub fn insert_text(&mut self, text: &str, allow_auto_indent: bool) -> bool {
        let text: Cow<'_, str> = if text.contains('\r') {
            Cow::Owned(text.replace('\r', ""))
        } else {
            Cow::Borrowed(text)
        };
        if text.is_empty() {
            return self.delete_selection();
        }

        self.begin();
        let mut chars = text.chars();
        let changed = match (chars.next(), chars.next()) {
            (Some(ch), None) => self.type_char(ch, allow_auto_indent),
            _ => self.insert_block(&text, allow_auto_indent),
        };
        self.finish(changed)
    }

    /// Insert one string per cursor (in cursor order), literally apart from
    /// tab expansion. Cursors without a matching entry only lose their
    /// selection.
    pub fn insert_per_cursor(&mut self, texts: &[String]) -> bool {
        self.begin();

        let mut changed = false;
        for idx in 0..self.cursors.len() {
            let text = texts.get(idx).map(String::as_str).unwrap_or("");
            let text = text.replace('\r', "");
            let column = self.cursors.as_slice()[idx].selection.start().column;
            let text = expand_tabs(&text, column, self.options.tab_width);
            changed |= self.replace_selection(idx, &text);
        }
        self.finish(changed)
    }

    /// Complete the word at each caret to `label`.
    ///
    /// The identifier run left of a caret is replaced when it is a
    /// case-insensitive prefix of `label`; other carets (and selections) get
    /// `label` inserted as is.
    pub fn complete_word(&mut self, label: &str) -> bool {
        self.begin();
        let lowered = label.to_lowercase();

        let mut changed = false;
        for idx in 0..self.cursors.len() {
            let cursor = self.cursors.as_slice()[idx];
            let (mut start, end) = (cursor.selection.start(), cursor.selection.end());
            if start == end {
                let chars: Vec<char> = self.buffer.line_or_empty(end.line).chars().collect();
                let mut column = end.column;
                while column > 0 && is_identifier_char(chars[column - 1]) {
                    column -= 1;
                }
                let typed: String = chars[column..end.column].iter().collect();
                if lowered.starts_with(&typed.to_lowercase()) {
                    start = Position::new(end.line, column);
                }
            }
            if self.buffer.slice(start, end) == label {
                continue;
            }
            let new_end = self.replace(idx, start, end, label);
            self.cursors.cursor_mut(idx).place(new_end);
            changed = true;
        }
        self.finish(changed)
    }

    fn type_char(&mut self, ch: char, allow_auto_indent: bool) -> bool {
        match ch {
            '\n' => return self.insert_newline(allow_auto_indent),
            '\t' => return self.insert_tab(),
            _ => {}
        }

        if self.options.auto_pair_brackets {
            if is_closing_bracket(ch) && self.all_cursors_before(ch) {
                for cursor in self.cursors.cursors_mut() {
                    let pos = cursor.position;
                    cursor.place(Position::new(pos.line, pos.column + 1));
                }
                tracing::trace!(%ch, "overtyped closing bracket");
                return false;
            }

            if let Some(close) = closing_bracket(ch) {
                let pair: String = [ch, close].iter().collect();
                for idx in 0..self.cursors.len() {
                    let start = self.cursors.as_slice()[idx].selection.start();
                    self.replace_selection(idx, &pair);
                    self.cursors
                        .cursor_mut(idx)
                        .place(Position::new(start.line, start.column + 1));
                }
                return true;
            }
        }

        let mut buf = [0u8; 4];
        let text = ch.encode_utf8(&mut buf);
        let mut changed = false;
        for idx in 0..self.cursors.len() {
            changed |= self.replace_selection(idx, text);
        }
        changed
    }

    /// Overtype applies only when every cursor is a caret directly in front
    /// of `ch`.
    fn all_cursors_before(&self, ch: char) -> bool {
        self.cursors
            .iter()
            .all(|c| !c.has_selection() && self.buffer.char_at(c.position) == Some(ch))
    }

    fn insert_tab(&mut self) -> bool {
        for idx in 0..self.cursors.len() {
            let column = self.cursors.as_slice()[idx].selection.start().column;
            let width = next_tab_stop(column, self.options.tab_width) - column;
            self.replace_selection(idx, &" ".repeat(width));
        }
        true
    }

    fn insert_newline(&mut self, allow_auto_indent: bool) -> bool {
        for idx in 0..self.cursors.len() {
            if !allow_auto_indent {
                self.replace_selection(idx, "\n");
                continue;
            }

            let cursor = self.cursors.as_slice()[idx];
            let (start, end) = (cursor.selection.start(), cursor.selection.end());
            let left: String = self
                .buffer
                .line_or_empty(start.line)
                .chars()
                .take(start.column)
                .collect();

            let indent = leading_whitespace(&left);
            let mut inner = indent.clone();
            if left.trim_end().chars().last().is_some_and(opens_indent) {
                inner.push_str(&self.options.indent_unit());
            }

            let between_pair = self.options.auto_pair_brackets
                && start == end
                && left
                    .chars()
                    .last()
                    .and_then(closing_bracket)
                    .is_some_and(|close| self.buffer.char_at(end) == Some(close));

            if between_pair {
                // Break the pair open: caret on an indented middle line, the
                // closer on its own line at the enclosing indent.
                let text = format!("\n{}\n{}", inner, indent);
                self.replace(idx, start, end, &text);
                let caret = Position::new(start.line + 1, inner.chars().count());
                self.cursors.cursor_mut(idx).place(caret);
            } else {
                self.replace_selection(idx, &format!("\n{}", inner));
            }
        }
        true
    }

    fn insert_block(&mut self, text: &str, allow_auto_indent: bool) -> bool {
        let mut changed = false;
        for idx in 0..self.cursors.len() {
            let start = self.cursors.as_slice()[idx].selection.start();
            let expanded = expand_tabs(text, start.column, self.options.tab_width);
            let text = if allow_auto_indent && expanded.contains('\n') {
                let left: String = self
                    .buffer
                    .line_or_empty(start.line)
                    .chars()
                    .take(start.column)
                    .collect();
                let indent = leading_whitespace(&left);
                Cow::Owned(expanded.replace('\n', &format!("\n{}", indent)))
            } else {
                expanded
            };
            changed |= self.replace_selection(idx, &text);
        }
        changed
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Delete every non-empty selection
    pub fn delete_selection(&mut self) -> bool {
        self.begin();
        let mut changed = false;
        for idx in 0..self.cursors.len() {
            if self.cursors.as_slice()[idx].has_selection() {
                changed |= self.replace_selection(idx, "");
            }
        }
        self.finish(changed)
    }

    /// Delete the selection, or the character before each caret (joining
    /// with the previous line at column 0)
    pub fn backspace(&mut self) -> bool {
        self.begin();
        let mut changed = false;
        for idx in 0..self.cursors.len() {
            let cursor = self.cursors.as_slice()[idx];
            if cursor.has_selection() {
                changed |= self.replace_selection(idx, "");
                continue;
            }
            let pos = cursor.position;
            let start = if pos.column > 0 {
                Position::new(pos.line, pos.column - 1)
            } else if pos.line > 0 {
                Position::new(pos.line - 1, self.buffer.line_length(pos.line - 1))
            } else {
                continue;
            };
            self.replace(idx, start, pos, "");
            self.cursors.cursor_mut(idx).place(start);
            changed = true;
        }
        self.finish(changed)
    }

    /// Delete the selection, or the character after each caret (joining
    /// with the next line at line end)
    pub fn delete(&mut self) -> bool {
        self.begin();
        let mut changed = false;
        for idx in 0..self.cursors.len() {
            let cursor = self.cursors.as_slice()[idx];
            if cursor.has_selection() {
                changed |= self.replace_selection(idx, "");
                continue;
            }
            let pos = cursor.position;
            let end = if pos.column < self.buffer.line_length(pos.line) {
                Position::new(pos.line, pos.column + 1)
            } else if pos.line + 1 < self.buffer.line_count() {
                Position::new(pos.line + 1, 0)
            } else {
                continue;
            };
            self.replace(idx, pos, end, "");
            self.cursors.cursor_mut(idx).place(pos);
            changed = true;
        }
        self.finish(changed)
    }

    pub fn delete_word_backward(&mut self) -> bool {
        self.delete_word(Direction::Backward)
    }

    pub fn delete_word_forward(&mut self) -> bool {
        self.delete_word(Direction::Forward)
    }

    fn delete_word(&mut self, direction: Direction) -> bool {
        self.begin();
        let mut changed = false;
        for idx in 0..self.cursors.len() {
            let cursor = self.cursors.as_slice()[idx];
            if cursor.has_selection() {
                changed |= self.replace_selection(idx, "");
                continue;
            }
            let pos = cursor.position;
            let target = word_boundary(self.buffer, pos, direction);
            if target == pos {
                continue;
            }
            let start = pos.min(target);
            self.replace(idx, start, pos.max(target), "");
            self.cursors.cursor_mut(idx).place(start);
            changed = true;
        }
        self.finish(changed)
    }

    // =========================================================================
    // Line operations
    // =========================================================================

    /// Lines touched by each cursor. A selection ending at column 0 of a
    /// later line does not include that line.
    fn cursor_lines(&self) -> Vec<(usize, usize)> {
        let mut blocks: Vec<(usize, usize)> = Vec::new();
        for cursor in self.cursors.iter() {
            let start = cursor.selection.start();
            let end = cursor.selection.end();
            let last = if end.line > start.line && end.column == 0 {
                end.line - 1
            } else {
                end.line
            };
            match blocks.last_mut() {
                Some((_, prev_last)) if start.line <= *prev_last => {
                    *prev_last = (*prev_last).max(last);
                }
                _ => blocks.push((start.line, last)),
            }
        }
        blocks
    }

    /// Delete every line holding a cursor
    pub fn delete_line(&mut self) -> bool {
        self.begin();
        // A lone empty line has nothing to remove
        let changed = self.buffer.line_count() > 1 || !self.buffer.is_empty();
        let lines: BTreeSet<usize> = self
            .cursor_lines()
            .into_iter()
            .flat_map(|(first, last)| first..=last)
            .collect();

        for &line in lines.iter().rev() {
            let count = self.buffer.line_count();
            let len = self.buffer.line_length(line);
            if line + 1 < count {
                self.buffer
                    .replace_range(Position::new(line, 0), Position::new(line + 1, 0), "");
            } else if line > 0 {
                let prev_len = self.buffer.line_length(line - 1);
                self.buffer
                    .replace_range(Position::new(line - 1, prev_len), Position::new(line, len), "");
            } else {
                self.buffer
                    .replace_range(Position::zero(), Position::new(0, len), "");
            }
        }

        let last_line = self.buffer.line_count() - 1;
        for cursor in self.cursors.cursors_mut() {
            let pos = cursor.position;
            let removed_above = lines.range(..pos.line).count();
            let line = (pos.line - removed_above).min(last_line);
            let column = pos.column.min(self.buffer.line_length(line));
            cursor.place(Position::new(line, column));
        }
        self.finish(changed)
    }

    /// Duplicate the lines under each cursor below themselves; cursors move
    /// onto the copy
    pub fn duplicate_line(&mut self) -> bool {
        self.begin();
        let blocks = self.cursor_lines();

        for &(first, last) in blocks.iter().rev() {
            let copy: Vec<&str> = (first..=last).map(|l| self.buffer.line_or_empty(l)).collect();
            let text = format!("\n{}", copy.join("\n"));
            let end = Position::new(last, self.buffer.line_length(last));
            self.buffer.replace_range(end, end, &text);
        }

        let mut offset = 0;
        let mut shifts = Vec::with_capacity(blocks.len());
        for &(first, last) in &blocks {
            let size = last - first + 1;
            shifts.push((first, last, offset + size));
            offset += size;
        }

        for cursor in self.cursors.cursors_mut() {
            let line = cursor.selection.start().line;
            let block = shifts.iter().find(|(f, l, _)| (*f..=*l).contains(&line));
            if let Some(&(_, _, shift)) = block {
                cursor.selection.anchor.line += shift;
                cursor.selection.active.line += shift;
                cursor.position = cursor.selection.active;
            }
        }
        self.finish(true)
    }

    /// Indent: with no selections behaves like a tab; otherwise prefixes
    /// every selected line with one indent level
    pub fn indent(&mut self) -> bool {
        self.begin();
        if !self.cursors.any_selection() {
            let changed = self.insert_tab();
            return self.finish(changed);
        }

        let unit = self.options.indent_unit();
        let width = unit.chars().count();
        let lines: BTreeSet<usize> = self
            .cursor_lines()
            .into_iter()
            .flat_map(|(first, last)| first..=last)
            .collect();
        for &line in &lines {
            let at = Position::new(line, 0);
            self.buffer.replace_range(at, at, &unit);
        }

        for cursor in self.cursors.cursors_mut() {
            for pos in [&mut cursor.selection.anchor, &mut cursor.selection.active] {
                if lines.contains(&pos.line) && pos.column > 0 {
                    pos.column += width;
                }
            }
            cursor.position = cursor.selection.active;
        }
        self.finish(true)
    }

    /// Remove up to one indent level (or one leading tab) from every line
    /// holding a cursor
    pub fn unindent(&mut self) -> bool {
        self.begin();
        let width = self.options.tab_width.max(1);
        let lines: BTreeSet<usize> = self
            .cursor_lines()
            .into_iter()
            .flat_map(|(first, last)| first..=last)
            .collect();

        let mut removed = Vec::new();
        for &line in &lines {
            let text = self.buffer.line_or_empty(line);
            let count = if text.starts_with('\t') {
                1
            } else {
                text.chars().take(width).take_while(|c| *c == ' ').count()
            };
            if count > 0 {
                self.buffer
                    .replace_range(Position::new(line, 0), Position::new(line, count), "");
                removed.push((line, count));
            }
        }

        for cursor in self.cursors.cursors_mut() {
            for pos in [&mut cursor.selection.anchor, &mut cursor.selection.active] {
                if let Some(&(_, count)) = removed.iter().find(|(l, _)| *l == pos.line) {
                    pos.column -= pos.column.min(count);
                }
            }
            cursor.position = cursor.selection.active;
        }
        let changed = !removed.is_empty();
        self.finish(changed)
    }
}
