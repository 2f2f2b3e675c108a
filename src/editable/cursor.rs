//! Cursor and position types.

use super::selection::Selection;

/// A position in the text buffer (line and column, both 0-indexed).
///
/// Columns count characters, not bytes. Ordering compares line first,
/// then column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }
}

/// A cursor: caret position, its selection, and the goal column for
/// vertical movement.
///
/// `position` always equals `selection.active`; every mutator here keeps
/// the two in sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub position: Position,
    pub selection: Selection,
    /// Desired column for vertical movement.
    /// When moving up/down through lines of varying length, this preserves
    /// the "intended" column position even when a shorter line is traversed.
    pub desired_column: Option<usize>,
}

impl Cursor {
    pub const fn new(line: usize, column: usize) -> Self {
        Self::at_position(Position::new(line, column))
    }

    pub const fn at_position(pos: Position) -> Self {
        Self {
            position: pos,
            selection: Selection::collapsed(pos),
            desired_column: None,
        }
    }

    /// Cursor with a selection from `anchor` to `active`
    pub const fn with_selection(anchor: Position, active: Position) -> Self {
        Self {
            position: active,
            selection: Selection::new(anchor, active),
            desired_column: None,
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Move the caret, either extending the selection or collapsing it.
    pub fn move_to(&mut self, pos: Position, extend_selection: bool) {
        self.position = pos;
        if extend_selection {
            self.selection.extend_to(pos);
        } else {
            self.selection = Selection::collapsed(pos);
        }
    }

    /// Place the caret and drop any selection and goal column.
    pub fn place(&mut self, pos: Position) {
        self.move_to(pos, false);
        self.desired_column = None;
    }

    /// Clear desired column (call after horizontal movement)
    pub fn clear_desired_column(&mut self) {
        self.desired_column = None;
    }

    /// Set desired column to current column (call before vertical movement)
    pub fn set_desired_column(&mut self) {
        if self.desired_column.is_none() {
            self.desired_column = Some(self.position.column);
        }
    }

    /// Get the effective column for positioning (uses desired_column if set)
    pub fn effective_column(&self) -> usize {
        self.desired_column.unwrap_or(self.position.column)
    }
}

impl From<Position> for Cursor {
    fn from(pos: Position) -> Self {
        Self::at_position(pos)
    }
}

impl From<Cursor> for Position {
    fn from(cursor: Cursor) -> Self {
        cursor.position
    }
}
