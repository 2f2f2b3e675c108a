//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use token_core::config::EditorConfig;
use token_core::editable::{ManualClock, Position};
use token_core::TextEditor;

/// Create a test editor with given text and cursor position
pub fn test_editor(text: &str, line: usize, column: usize) -> TextEditor {
    test_editor_with_config(text, line, column, EditorConfig::default())
}

/// Create a test editor with a custom config
pub fn test_editor_with_config(
    text: &str,
    line: usize,
    column: usize,
    config: EditorConfig,
) -> TextEditor {
    let mut editor = TextEditor::with_config(config);
    editor.set_text(text);
    editor.set_cursor_position(line, column);
    editor
}

/// Create a test editor with auto-indent and auto-pairing switched off
pub fn plain_editor(text: &str, line: usize, column: usize) -> TextEditor {
    let config = EditorConfig {
        auto_indent: false,
        auto_pair_brackets: false,
        ..EditorConfig::default()
    };
    test_editor_with_config(text, line, column, config)
}

/// Create a test editor with a selection (anchor to active)
/// The caret will be at the active position
pub fn test_editor_with_selection(
    text: &str,
    anchor_line: usize,
    anchor_col: usize,
    active_line: usize,
    active_col: usize,
) -> TextEditor {
    let mut editor = test_editor(text, 0, 0);
    editor.set_selection(
        Position::new(anchor_line, anchor_col),
        Position::new(active_line, active_col),
    );
    editor
}

/// Create a test editor with carets at the given positions.
/// The last position becomes the primary cursor.
pub fn test_editor_multi_cursor(text: &str, positions: &[(usize, usize)]) -> TextEditor {
    assert!(
        !positions.is_empty(),
        "Must have at least one cursor position"
    );

    let (line, column) = positions[0];
    let mut editor = test_editor(text, line, column);
    for &(line, column) in &positions[1..] {
        editor.add_cursor(line, column);
    }
    assert_eq!(editor.cursors().len(), positions.len(), "positions must be distinct");
    editor
}

/// Create a test editor whose undo timestamps come from a manual clock
pub fn test_editor_with_clock(text: &str, line: usize, column: usize) -> (TextEditor, ManualClock) {
    let clock = ManualClock::new();
    let mut editor = TextEditor::new().with_clock(clock.clone());
    editor.set_text(text);
    editor.set_cursor_position(line, column);
    (editor, clock)
}

/// Caret positions of every cursor, in document order
pub fn cursor_positions(editor: &TextEditor) -> Vec<(usize, usize)> {
    editor
        .cursors()
        .iter()
        .map(|c| (c.position.line, c.position.column))
        .collect()
}

/// Primary caret as a tuple
pub fn cursor(editor: &TextEditor) -> (usize, usize) {
    let pos = editor.cursor_position();
    (pos.line, pos.column)
}
