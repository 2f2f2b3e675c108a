//! Selection (range) type.

use super::cursor::Position;

/// A text selection with anchor (start point) and active end (caret).
/// The anchor stays fixed while the active end moves during extension.
/// As a range it is half-open: `[start(), end())`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub anchor: Position,
    /// Where the caret is (moving point)
    pub active: Position,
}

impl Selection {
    pub const fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// Create a collapsed selection (cursor with no selection)
    pub const fn collapsed(pos: Position) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    /// Check if selection is empty (anchor == active)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Get the start position (minimum of anchor and active)
    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    /// Get the end position (maximum of anchor and active)
    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    /// Check if selection is reversed (active before anchor)
    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }

    /// Extend selection to new active position
    pub fn extend_to(&mut self, pos: Position) {
        self.active = pos;
    }

    /// Check if a position is within this selection
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start() && pos < self.end()
    }

    /// Whether two selections share any text, or touch while one of them is
    /// empty (a caret sitting on another selection's boundary).
    pub fn overlaps(&self, other: &Selection) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.start() <= other.end()
                && other.start() <= self.end()
                && (self.start() == other.start()
                    || self.contains(other.start())
                    || other.contains(self.start()));
        }
        self.start() < other.end() && other.start() < self.end()
    }

    /// Smallest selection covering both, keeping this selection's direction.
    pub fn union(&self, other: &Selection) -> Selection {
        let start = self.start().min(other.start());
        let end = self.end().max(other.end());
        if self.is_reversed() {
            Selection::new(end, start)
        } else {
            Selection::new(start, end)
        }
    }
}
