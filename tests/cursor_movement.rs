//! Cursor movement and selection tests

mod common;

use common::{
    cursor, cursor_positions, test_editor, test_editor_multi_cursor, test_editor_with_selection,
};
use token_core::editable::CharMetrics;

// ========================================================================
// Character movement
// ========================================================================

#[test]
fn test_move_right_wraps_to_next_line() {
    let mut editor = test_editor("ab\ncd", 0, 2);
    editor.move_right(false);
    assert_eq!(cursor(&editor), (1, 0));
}

#[test]
fn test_move_left_wraps_to_previous_line() {
    let mut editor = test_editor("ab\ncd", 1, 0);
    editor.move_left(false);
    assert_eq!(cursor(&editor), (0, 2));
}

#[test]
fn test_move_left_at_document_start_stays() {
    let mut editor = test_editor("ab", 0, 0);
    editor.move_left(false);
    assert_eq!(cursor(&editor), (0, 0));
}

#[test]
fn test_move_right_at_document_end_stays() {
    let mut editor = test_editor("ab", 0, 2);
    editor.move_right(false);
    assert_eq!(cursor(&editor), (0, 2));
}

#[test]
fn test_move_left_collapses_selection_to_start() {
    let mut editor = test_editor_with_selection("hello", 0, 1, 0, 4);
    editor.move_left(false);

    assert_eq!(cursor(&editor), (0, 1));
    assert!(!editor.has_selection());
}

#[test]
fn test_move_right_collapses_selection_to_end() {
    let mut editor = test_editor_with_selection("hello", 0, 4, 0, 1);
    editor.move_right(false);

    assert_eq!(cursor(&editor), (0, 4));
    assert!(!editor.has_selection());
}

#[test]
fn test_shift_movement_extends_selection() {
    let mut editor = test_editor("abc", 0, 0);
    editor.move_right(true);
    editor.move_right(true);
    assert_eq!(editor.selected_text(), "ab");

    editor.move_left(true);
    assert_eq!(editor.selected_text(), "a");
}

// ========================================================================
// Vertical movement & goal column
// ========================================================================

#[test]
fn test_move_down_remembers_goal_column() {
    let mut editor = test_editor("abcdef\nab\nabcdef", 0, 5);
    editor.move_down(false);
    assert_eq!(cursor(&editor), (1, 2));

    editor.move_down(false);
    assert_eq!(cursor(&editor), (2, 5));
}

#[test]
fn test_move_up_remembers_goal_column() {
    let mut editor = test_editor("abcdef\nab\nabcdef", 2, 4);
    editor.move_up(false);
    editor.move_up(false);
    assert_eq!(cursor(&editor), (0, 4));
}

#[test]
fn test_horizontal_move_resets_goal_column() {
    let mut editor = test_editor("abcdef\nab\nabcdef", 0, 5);
    editor.move_down(false);
    editor.move_left(false);
    assert_eq!(cursor(&editor), (1, 1));

    editor.move_down(false);
    assert_eq!(cursor(&editor), (2, 1));
}

#[test]
fn test_move_up_on_first_line_stays() {
    let mut editor = test_editor("abc\ndef", 0, 2);
    editor.move_up(false);
    assert_eq!(cursor(&editor), (0, 2));
}

#[test]
fn test_move_page_clamps_to_last_line() {
    let mut editor = test_editor("a\nb\nc", 0, 0);
    editor.move_page(10, false);
    assert_eq!(cursor(&editor), (2, 0));
}

#[test]
fn test_move_page_by_extreme_amounts() {
    let mut editor = test_editor("ab\ncd\nef", 1, 1);
    editor.move_page(isize::MAX, false);
    assert_eq!(cursor(&editor), (2, 1));
    editor.move_page(isize::MIN, false);
    assert_eq!(cursor(&editor), (0, 1));
}

// ========================================================================
// Line & word movement
// ========================================================================

#[test]
fn test_smart_home_toggles() {
    let mut editor = test_editor("    foo", 0, 6);
    editor.move_line_start(false);
    assert_eq!(cursor(&editor), (0, 4));

    editor.move_line_start(false);
    assert_eq!(cursor(&editor), (0, 0));

    editor.move_line_start(false);
    assert_eq!(cursor(&editor), (0, 4));
}

#[test]
fn test_move_line_end() {
    let mut editor = test_editor("hello\nx", 0, 1);
    editor.move_line_end(false);
    assert_eq!(cursor(&editor), (0, 5));
}

#[test]
fn test_move_word_right() {
    let mut editor = test_editor("foo bar", 0, 0);
    editor.move_word_right(false);
    assert_eq!(cursor(&editor), (0, 4));

    editor.move_word_right(false);
    assert_eq!(cursor(&editor), (0, 7));

    editor.move_word_right(false);
    assert_eq!(cursor(&editor), (0, 7));
}

#[test]
fn test_move_word_left() {
    let mut editor = test_editor("foo bar", 0, 7);
    editor.move_word_left(false);
    assert_eq!(cursor(&editor), (0, 4));

    editor.move_word_left(false);
    assert_eq!(cursor(&editor), (0, 0));
}

#[test]
fn test_move_word_right_crosses_line() {
    let mut editor = test_editor("foo\nbar", 0, 3);
    editor.move_word_right(false);
    assert_eq!(cursor(&editor), (1, 0));
}

#[test]
fn test_move_word_stops_at_punctuation() {
    let mut editor = test_editor("foo.bar", 0, 0);
    editor.move_word_right(false);
    assert_eq!(cursor(&editor), (0, 3));
}

// ========================================================================
// Document movement & selection commands
// ========================================================================

#[test]
fn test_document_end_collapses_to_primary() {
    let mut editor = test_editor_multi_cursor("ab\ncd", &[(0, 1), (1, 1)]);
    editor.move_document_end(false);
    assert_eq!(cursor_positions(&editor), vec![(1, 2)]);
}

#[test]
fn test_document_start_with_selection() {
    let mut editor = test_editor("ab\ncd", 1, 1);
    editor.move_document_start(true);

    assert_eq!(cursor(&editor), (0, 0));
    assert_eq!(editor.selected_text(), "ab\nc");
}

#[test]
fn test_select_all() {
    let mut editor = test_editor("ab\ncd", 0, 1);
    editor.select_all();

    assert!(editor.has_selection());
    assert_eq!(editor.selected_text(), "ab\ncd");
    assert_eq!(cursor(&editor), (1, 2));
}

#[test]
fn test_select_word_under_cursor() {
    let mut editor = test_editor("foo bar", 0, 5);
    editor.select_word();
    assert_eq!(editor.selected_text(), "bar");
}

#[test]
fn test_select_line_includes_line_break() {
    let mut editor = test_editor("ab\ncd", 0, 1);
    editor.select_line();
    assert_eq!(editor.selected_text(), "ab\n");
}

#[test]
fn test_set_cursor_position_clamps() {
    let mut editor = test_editor("ab\ncd", 0, 0);
    editor.set_cursor_position(10, 10);
    assert_eq!(cursor(&editor), (1, 2));

    editor.set_cursor_position(0, 99);
    assert_eq!(cursor(&editor), (0, 2));
}

#[test]
fn test_set_cursor_position_clears_selection() {
    let mut editor = test_editor("abc", 0, 0);
    editor.select_all();
    editor.set_cursor_position(0, 1);
    assert!(!editor.has_selection());
}

// ========================================================================
// Screen coordinates
// ========================================================================

#[test]
fn test_point_to_position_and_back() {
    let mut editor = test_editor("abc\n\tx", 0, 0);
    let metrics = CharMetrics::new(10.0, 20.0);

    let pos = editor.position_at_point(&metrics, 14.0, 5.0);
    assert_eq!((pos.line, pos.column), (0, 1));

    let pos = editor.position_at_point(&metrics, 41.0, 25.0);
    assert_eq!((pos.line, pos.column), (1, 1));

    editor.set_cursor_position(1, 1);
    assert_eq!(editor.cursor_screen_position(&metrics), (40.0, 20.0));
}

#[test]
fn test_point_outside_document_clamps() {
    let editor = test_editor("abc\nde", 0, 0);
    let metrics = CharMetrics::new(10.0, 20.0);

    let pos = editor.position_at_point(&metrics, 500.0, 500.0);
    assert_eq!((pos.line, pos.column), (1, 2));

    let pos = editor.position_at_point(&metrics, -5.0, -5.0);
    assert_eq!((pos.line, pos.column), (0, 0));
}
