//! Core editing model: buffer, cursors, edits and history.
//!
//! # Architecture
//!
//! - [`TextBuffer`]: line storage with a single mutator, `replace_range`
//! - [`CursorSet`]: ordered, self-merging carets and selections
//! - [`EditEngine`]: applies edits at every cursor and re-homes the rest
//! - [`UndoHistory`]: coalescing whole-document snapshots
//! - [`CharMetrics`]: screen/text coordinate mapping
//!
//! # Example
//!
//! ```
//! use token_core::editable::{CursorSet, EditEngine, EditOptions, Position, TextBuffer};
//!
//! let mut buffer = TextBuffer::from_text("ab");
//! let mut cursors = CursorSet::from_positions(&[Position::new(0, 0), Position::new(0, 1)]);
//! EditEngine::new(&mut buffer, &mut cursors, EditOptions::default()).insert_text("x", true);
//!
//! assert_eq!(buffer.text(), "xaxb");
//! ```

mod buffer;
mod cursor;
mod cursor_set;
mod engine;
mod history;
mod metrics;
mod selection;

pub use buffer::TextBuffer;
pub use cursor::{Cursor, Position};
pub use cursor_set::{CursorSet, Direction};
pub use engine::{closing_bracket, EditEngine, EditOptions};
pub use history::{
    Clock, EditorSnapshot, ManualClock, SystemClock, UndoHistory, UndoRecord,
    DEFAULT_COALESCE_WINDOW, DEFAULT_UNDO_LIMIT,
};
pub use metrics::CharMetrics;
pub use selection::Selection;
