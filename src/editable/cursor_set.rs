//! CursorSet - the ordered, self-merging collection of cursors.
//!
//! Every multi-cursor operation ends with [`CursorSet::merge_and_sort`], which
//! restores the invariant that cursors are sorted by position, no two share a
//! position and no two selections overlap.

use crate::util::{char_type, CharType};

use super::buffer::TextBuffer;
use super::cursor::{Cursor, Position};

/// Direction for word-wise movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Ordered set of cursors with a tracked primary cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
    primary: usize,
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSet {
    /// A single cursor at (0, 0)
    pub fn new() -> Self {
        Self {
            cursors: vec![Cursor::new(0, 0)],
            primary: 0,
        }
    }

    /// Build from explicit cursors. The first one becomes primary; the set is
    /// merged and sorted before returning. An empty list yields [`CursorSet::new`].
    pub fn from_cursors(cursors: Vec<Cursor>) -> Self {
        if cursors.is_empty() {
            return Self::new();
        }
        let mut set = Self {
            cursors,
            primary: 0,
        };
        set.merge_and_sort();
        set
    }

    /// Convenience: collapsed cursors at the given positions
    pub fn from_positions(positions: &[Position]) -> Self {
        Self::from_cursors(positions.iter().copied().map(Cursor::at_position).collect())
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// Never true; a set always holds at least one cursor.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    pub fn has_multiple(&self) -> bool {
        self.cursors.len() > 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cursor> {
        self.cursors.iter()
    }

    pub fn as_slice(&self) -> &[Cursor] {
        &self.cursors
    }

    pub fn get(&self, idx: usize) -> Option<&Cursor> {
        self.cursors.get(idx)
    }

    pub(crate) fn cursor_mut(&mut self, idx: usize) -> &mut Cursor {
        &mut self.cursors[idx]
    }

    pub(crate) fn cursors_mut(&mut self) -> &mut [Cursor] {
        &mut self.cursors
    }

    pub fn primary_index(&self) -> usize {
        self.primary
    }

    /// Get the primary cursor
    pub fn primary(&self) -> &Cursor {
        &self.cursors[self.primary]
    }

    pub fn primary_mut(&mut self) -> &mut Cursor {
        &mut self.cursors[self.primary]
    }

    /// Whether any cursor has a non-empty selection
    pub fn any_selection(&self) -> bool {
        self.cursors.iter().any(Cursor::has_selection)
    }

    /// Replace everything with one collapsed cursor
    pub fn set_single(&mut self, pos: Position) {
        self.cursors = vec![Cursor::at_position(pos)];
        self.primary = 0;
    }

    /// Replace everything with one cursor selecting `anchor..active`
    pub fn set_single_selection(&mut self, anchor: Position, active: Position) {
        self.cursors = vec![Cursor::with_selection(anchor, active)];
        self.primary = 0;
    }

    /// Add a collapsed cursor; it becomes the primary cursor.
    /// Returns false if it merged into an existing cursor.
    pub fn add_cursor(&mut self, pos: Position) -> bool {
        self.add_cursor_with_selection(pos, pos)
    }

    /// Add a cursor selecting `anchor..active`; it becomes the primary cursor.
    pub fn add_cursor_with_selection(&mut self, anchor: Position, active: Position) -> bool {
        let before = self.cursors.len();
        self.cursors.push(Cursor::with_selection(anchor, active));
        self.primary = self.cursors.len() - 1;
        self.merge_and_sort();
        self.cursors.len() > before
    }

    /// Collapse to the primary cursor only
    pub fn clear_extra(&mut self) {
        if self.cursors.len() > 1 {
            let primary = self.cursors[self.primary];
            self.cursors = vec![primary];
            self.primary = 0;
        }
    }

    /// Clamp every cursor into the buffer, then merge
    pub fn clamp_all(&mut self, buffer: &TextBuffer) {
        for cursor in &mut self.cursors {
            cursor.position = buffer.clamp(cursor.position);
            cursor.selection.anchor = buffer.clamp(cursor.selection.anchor);
            cursor.selection.active = cursor.position;
        }
        self.merge_and_sort();
    }

    /// Sort cursors by position and fuse any that share a position or whose
    /// selections overlap. The fused selection is the union of both and keeps
    /// the direction of the earlier cursor. The primary cursor survives the
    /// merge (as the cursor it was fused into).
    pub fn merge_and_sort(&mut self) {
        let primary = self.primary;
        let mut tagged: Vec<(bool, Cursor)> = self
            .cursors
            .drain(..)
            .enumerate()
            .map(|(i, c)| (i == primary, c))
            .collect();

        tagged.sort_by(|(_, a), (_, b)| {
            a.selection
                .start()
                .cmp(&b.selection.start())
                .then_with(|| a.position.cmp(&b.position))
        });

        let mut merged: Vec<(bool, Cursor)> = Vec::with_capacity(tagged.len());
        for (is_primary, cursor) in tagged {
            if let Some((last_primary, last)) = merged.last_mut() {
                if last.position == cursor.position || last.selection.overlaps(&cursor.selection) {
                    last.selection = last.selection.union(&cursor.selection);
                    last.position = last.selection.active;
                    *last_primary |= is_primary;
                    continue;
                }
            }
            merged.push((is_primary, cursor));
        }

        self.primary = merged.iter().position(|(p, _)| *p).unwrap_or(0);
        self.cursors = merged.into_iter().map(|(_, c)| c).collect();
        self.assert_invariants();
    }

    /// Assert cursor/selection invariants (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        debug_assert!(!self.cursors.is_empty(), "Must have at least one cursor");
        debug_assert!(self.primary < self.cursors.len(), "Primary index out of range");
        for (i, cursor) in self.cursors.iter().enumerate() {
            debug_assert_eq!(
                cursor.position, cursor.selection.active,
                "Cursor {} position must match selection active end",
                i
            );
        }
        for pair in self.cursors.windows(2) {
            debug_assert!(
                pair[0].position < pair[1].position,
                "Cursors must be sorted and distinct"
            );
            debug_assert!(
                !pair[0].selection.overlaps(&pair[1].selection),
                "Selections must not overlap"
            );
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}

// =============================================================================
// Movement (single cursor)
// =============================================================================

impl CursorSet {
    /// Move one cursor by whole lines and/or characters.
    ///
    /// Vertical movement records the current column as the goal on the first
    /// move and reuses it afterwards; horizontal movement clears it. Column
    /// movement wraps across line boundaries.
    pub fn move_by(
        &mut self,
        idx: usize,
        delta_lines: isize,
        delta_columns: isize,
        extend_selection: bool,
        buffer: &TextBuffer,
    ) {
        let cursor = &mut self.cursors[idx];

        if delta_lines != 0 {
            let last_line = buffer.line_count() - 1;
            let target = (cursor.position.line as isize)
                .saturating_add(delta_lines)
                .clamp(0, last_line as isize) as usize;
            if target != cursor.position.line {
                cursor.set_desired_column();
                let column = cursor.effective_column().min(buffer.line_length(target));
                cursor.move_to(Position::new(target, column), extend_selection);
            }
        }

        if delta_columns == 0 {
            return;
        }

        // Collapse selection instead of moving when not extending
        if !extend_selection && cursor.has_selection() {
            let edge = if delta_columns < 0 {
                cursor.selection.start()
            } else {
                cursor.selection.end()
            };
            cursor.place(edge);
            return;
        }

        let mut pos = buffer.clamp(cursor.position);
        for _ in 0..delta_columns.unsigned_abs() {
            let next = if delta_columns < 0 {
                step_back(buffer, pos)
            } else {
                step_forward(buffer, pos)
            };
            if next == pos {
                break;
            }
            pos = next;
        }
        cursor.move_to(pos, extend_selection);
        cursor.clear_desired_column();
    }

    /// Move one cursor to the previous/next word boundary (IntelliJ-style)
    pub fn move_word(
        &mut self,
        idx: usize,
        direction: Direction,
        extend_selection: bool,
        buffer: &TextBuffer,
    ) {
        let cursor = &mut self.cursors[idx];

        if !extend_selection && cursor.has_selection() {
            let edge = match direction {
                Direction::Backward => cursor.selection.start(),
                Direction::Forward => cursor.selection.end(),
            };
            cursor.place(edge);
            return;
        }

        let target = word_boundary(buffer, buffer.clamp(cursor.position), direction);
        cursor.move_to(target, extend_selection);
        cursor.clear_desired_column();
    }

    /// Smart line start: toggle between first non-whitespace and column 0
    pub fn move_to_line_start(&mut self, idx: usize, extend_selection: bool, buffer: &TextBuffer) {
        let cursor = &mut self.cursors[idx];
        let line = cursor.position.line;
        let first_non_ws = buffer.first_non_whitespace_column(line);
        let current_col = cursor.position.column;

        let column = if current_col == first_non_ws {
            0
        } else {
            first_non_ws
        };
        cursor.move_to(Position::new(line, column), extend_selection);
        cursor.clear_desired_column();
    }

    /// Move cursor to end of line
    pub fn move_to_line_end(&mut self, idx: usize, extend_selection: bool, buffer: &TextBuffer) {
        let cursor = &mut self.cursors[idx];
        let line = cursor.position.line;
        cursor.move_to(Position::new(line, buffer.line_length(line)), extend_selection);
        cursor.clear_desired_column();
    }

    /// Select the word (or run of whitespace/punctuation) under a cursor
    pub fn select_word(&mut self, idx: usize, buffer: &TextBuffer) {
        let cursor = &mut self.cursors[idx];
        let line = cursor.position.line;
        let chars: Vec<char> = buffer.line_or_empty(line).chars().collect();
        if chars.is_empty() {
            return;
        }

        let col = cursor.position.column.min(chars.len() - 1);
        let target_type = char_type(chars[col]);

        let mut start = col;
        while start > 0 && char_type(chars[start - 1]) == target_type {
            start -= 1;
        }
        let mut end = col;
        while end < chars.len() && char_type(chars[end]) == target_type {
            end += 1;
        }

        *cursor = Cursor::with_selection(Position::new(line, start), Position::new(line, end));
    }

    /// Select a whole line including its line break (last line: to its end)
    pub fn select_line(&mut self, idx: usize, buffer: &TextBuffer) {
        let cursor = &mut self.cursors[idx];
        let line = cursor.position.line;
        let end = if line + 1 < buffer.line_count() {
            Position::new(line + 1, 0)
        } else {
            Position::new(line, buffer.line_length(line))
        };
        *cursor = Cursor::with_selection(Position::new(line, 0), end);
    }
}

// =============================================================================
// Movement (every cursor)
// =============================================================================

impl CursorSet {
    pub fn move_all_by(
        &mut self,
        delta_lines: isize,
        delta_columns: isize,
        extend_selection: bool,
        buffer: &TextBuffer,
    ) {
        for idx in 0..self.cursors.len() {
            self.move_by(idx, delta_lines, delta_columns, extend_selection, buffer);
        }
        self.merge_and_sort();
    }

    pub fn move_all_word(
        &mut self,
        direction: Direction,
        extend_selection: bool,
        buffer: &TextBuffer,
    ) {
        for idx in 0..self.cursors.len() {
            self.move_word(idx, direction, extend_selection, buffer);
        }
        self.merge_and_sort();
    }

    pub fn move_all_to_line_start(&mut self, extend_selection: bool, buffer: &TextBuffer) {
        for idx in 0..self.cursors.len() {
            self.move_to_line_start(idx, extend_selection, buffer);
        }
        self.merge_and_sort();
    }

    pub fn move_all_to_line_end(&mut self, extend_selection: bool, buffer: &TextBuffer) {
        for idx in 0..self.cursors.len() {
            self.move_to_line_end(idx, extend_selection, buffer);
        }
        self.merge_and_sort();
    }

    /// Move to the start of the document (collapses to the primary cursor)
    pub fn move_to_document_start(&mut self, extend_selection: bool) {
        self.clear_extra();
        let cursor = &mut self.cursors[0];
        cursor.move_to(Position::zero(), extend_selection);
        cursor.clear_desired_column();
    }

    /// Move to the end of the document (collapses to the primary cursor)
    pub fn move_to_document_end(&mut self, extend_selection: bool, buffer: &TextBuffer) {
        self.clear_extra();
        let cursor = &mut self.cursors[0];
        cursor.move_to(buffer.end_position(), extend_selection);
        cursor.clear_desired_column();
    }

    /// Select the whole document with a single cursor
    pub fn select_all(&mut self, buffer: &TextBuffer) {
        self.set_single_selection(Position::zero(), buffer.end_position());
    }

    pub fn select_all_words(&mut self, buffer: &TextBuffer) {
        for idx in 0..self.cursors.len() {
            self.select_word(idx, buffer);
        }
        self.merge_and_sort();
    }

    pub fn select_all_lines(&mut self, buffer: &TextBuffer) {
        for idx in 0..self.cursors.len() {
            self.select_line(idx, buffer);
        }
        self.merge_and_sort();
    }

    /// Add a cursor one line above the topmost cursor, keeping its goal column.
    /// Returns false at the top of the document.
    pub fn add_cursor_above(&mut self, buffer: &TextBuffer) -> bool {
        let top = self.cursors[0];
        if top.position.line == 0 {
            return false;
        }
        self.add_vertical_neighbour(top, top.position.line - 1, buffer)
    }

    /// Add a cursor one line below the bottommost cursor, keeping its goal column.
    /// Returns false at the bottom of the document.
    pub fn add_cursor_below(&mut self, buffer: &TextBuffer) -> bool {
        let bottom = self.cursors[self.cursors.len() - 1];
        if bottom.position.line + 1 >= buffer.line_count() {
            return false;
        }
        self.add_vertical_neighbour(bottom, bottom.position.line + 1, buffer)
    }

    fn add_vertical_neighbour(&mut self, from: Cursor, line: usize, buffer: &TextBuffer) -> bool {
        let goal = from.effective_column();
        let before = self.cursors.len();
        let mut cursor = Cursor::new(line, goal.min(buffer.line_length(line)));
        cursor.desired_column = Some(goal);
        self.cursors.push(cursor);
        self.primary = self.cursors.len() - 1;
        self.merge_and_sort();
        self.cursors.len() > before
    }
}

fn step_back(buffer: &TextBuffer, pos: Position) -> Position {
    if pos.column > 0 {
        Position::new(pos.line, pos.column - 1)
    } else if pos.line > 0 {
        Position::new(pos.line - 1, buffer.line_length(pos.line - 1))
    } else {
        pos
    }
}

fn step_forward(buffer: &TextBuffer, pos: Position) -> Position {
    if pos.column < buffer.line_length(pos.line) {
        Position::new(pos.line, pos.column + 1)
    } else if pos.line + 1 < buffer.line_count() {
        Position::new(pos.line + 1, 0)
    } else {
        pos
    }
}

/// Word boundary in the given direction. At a line edge the boundary is the
/// adjacent line's edge.
pub(crate) fn word_boundary(buffer: &TextBuffer, pos: Position, direction: Direction) -> Position {
    let chars: Vec<char> = buffer.line_or_empty(pos.line).chars().collect();
    let line_len = chars.len();

    match direction {
        Direction::Backward => {
            if pos.column == 0 {
                return step_back(buffer, pos);
            }
            let mut col = pos.column.min(line_len);
            // Skip any whitespace/punctuation first (moving backwards)
            while col > 0 && char_type(chars[col - 1]) != CharType::WordChar {
                col -= 1;
            }
            // Then skip word characters
            while col > 0 && char_type(chars[col - 1]) == CharType::WordChar {
                col -= 1;
            }
            Position::new(pos.line, col)
        }
        Direction::Forward => {
            if pos.column >= line_len {
                return step_forward(buffer, pos);
            }
            let mut col = pos.column;
            let start_type = char_type(chars[col]);
            // Skip current word type
            while col < line_len && char_type(chars[col]) == start_type {
                col += 1;
            }
            // Skip any following whitespace
            while col < line_len && char_type(chars[col]) == CharType::Whitespace {
                col += 1;
            }
            Position::new(pos.line, col)
        }
    }
}
