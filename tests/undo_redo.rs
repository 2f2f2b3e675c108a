//! Undo/redo tests - restoration, coalescing, sealing and the record cap

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use common::{cursor, test_editor, test_editor_with_clock, test_editor_with_config};
use token_core::config::EditorConfig;
use token_core::editable::ManualClock;
use token_core::TextEditor;

const PAUSE: Duration = Duration::from_millis(1000);
const QUICK: Duration = Duration::from_millis(100);

#[test]
fn test_newline_undo_redo_round_trip() {
    let config = EditorConfig {
        auto_indent: false,
        ..EditorConfig::default()
    };
    let mut editor = test_editor_with_config("abc\ndef", 0, 3, config);

    editor.insert_text("\n");
    assert_eq!(editor.text(), "abc\n\ndef");
    assert_eq!(cursor(&editor), (1, 0));

    assert!(editor.undo(1));
    assert_eq!(editor.text(), "abc\ndef");
    assert_eq!(cursor(&editor), (0, 3));

    assert!(editor.redo(1));
    assert_eq!(editor.text(), "abc\n\ndef");
    assert_eq!(cursor(&editor), (1, 0));
}

#[test]
fn test_undo_with_empty_history_is_noop() {
    let mut editor = test_editor("abc", 0, 0);
    assert!(!editor.can_undo());
    assert!(!editor.undo(1));
    assert!(!editor.redo(1));
    assert_eq!(editor.text(), "abc");
}

#[test]
fn test_undo_restores_selection() {
    let mut editor = test_editor("hello world", 0, 0);
    editor.select_all();
    editor.delete_selection();
    assert_eq!(editor.text(), "");

    editor.undo(1);
    assert_eq!(editor.text(), "hello world");
    assert_eq!(editor.selected_text(), "hello world");
}

// ========================================================================
// Coalescing
// ========================================================================

#[test]
fn test_typing_burst_is_one_step() {
    let (mut editor, clock) = test_editor_with_clock("", 0, 0);
    editor.insert_text("a");
    clock.advance(QUICK);
    editor.insert_text("b");
    clock.advance(QUICK);
    editor.insert_text("c");

    assert_eq!(editor.history().len(), 1);
    assert!(editor.history().records()[0].merged);

    editor.undo(1);
    assert_eq!(editor.text(), "");
    assert!(!editor.can_undo());
}

#[test]
fn test_coalescing_window_slides() {
    let (mut editor, clock) = test_editor_with_clock("", 0, 0);
    for _ in 0..5 {
        editor.insert_text("x");
        clock.advance(Duration::from_millis(250));
    }

    assert_eq!(editor.text(), "xxxxx");
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_continuous_typing_splits_into_bounded_steps() {
    let (mut editor, clock) = test_editor_with_clock("", 0, 0);
    for _ in 0..12 {
        editor.insert_text("x");
        clock.advance(Duration::from_millis(250));
    }

    // the first step spans 0..=1750ms; the edit at 2000ms opens a second one
    assert_eq!(editor.text(), "x".repeat(12));
    assert_eq!(editor.history().len(), 2);

    editor.undo(1);
    assert_eq!(editor.text(), "xxxxxxxx");
    editor.undo(1);
    assert_eq!(editor.text(), "");
}

#[test]
fn test_group_span_follows_config() {
    let config = EditorConfig {
        undo_group_max_ms: 500,
        ..EditorConfig::default()
    };
    let clock = ManualClock::new();
    let mut editor = TextEditor::with_config(config).with_clock(clock.clone());
    for _ in 0..4 {
        editor.insert_text("x");
        clock.advance(Duration::from_millis(200));
    }

    assert_eq!(editor.history().len(), 2);
    editor.undo(1);
    assert_eq!(editor.text(), "xxx");
}

#[test]
fn test_pause_starts_new_step() {
    let (mut editor, clock) = test_editor_with_clock("", 0, 0);
    editor.insert_text("a");
    clock.advance(Duration::from_millis(400));
    editor.insert_text("b");

    editor.undo(1);
    assert_eq!(editor.text(), "a");
    editor.undo(1);
    assert_eq!(editor.text(), "");
}

#[test]
fn test_backspace_burst_coalesces_with_typing() {
    let (mut editor, clock) = test_editor_with_clock("", 0, 0);
    editor.insert_text("a");
    clock.advance(QUICK);
    editor.insert_text("b");
    clock.advance(QUICK);
    editor.backspace();

    assert_eq!(editor.history().len(), 1);
    editor.undo(1);
    assert_eq!(editor.text(), "");
}

#[test]
fn test_cursor_move_seals_history() {
    let (mut editor, _clock) = test_editor_with_clock("", 0, 0);
    editor.insert_text("a");
    editor.move_left(false);
    editor.move_right(false);
    editor.insert_text("b");

    assert_eq!(editor.history().len(), 2);
    editor.undo(1);
    assert_eq!(editor.text(), "a");
}

#[test]
fn test_block_insert_is_its_own_step() {
    let (mut editor, _clock) = test_editor_with_clock("", 0, 0);
    editor.insert_text("a");
    editor.insert_text("xyz");
    editor.insert_text("b");

    assert_eq!(editor.history().len(), 3);
    editor.undo(1);
    assert_eq!(editor.text(), "axyz");
    editor.undo(1);
    assert_eq!(editor.text(), "a");
}

#[test]
fn test_edit_after_undo_starts_new_step() {
    let (mut editor, _clock) = test_editor_with_clock("", 0, 0);
    editor.insert_text("a");
    editor.undo(1);
    editor.insert_text("b");

    assert_eq!(editor.text(), "b");
    editor.undo(1);
    assert_eq!(editor.text(), "");
}

// ========================================================================
// Multi-step undo/redo & redo tail
// ========================================================================

#[test]
fn test_undo_multiple_steps() {
    let (mut editor, clock) = test_editor_with_clock("", 0, 0);
    for ch in ["a", "b", "c"] {
        editor.insert_text(ch);
        clock.advance(PAUSE);
    }

    assert!(editor.undo(2));
    assert_eq!(editor.text(), "a");

    assert!(editor.undo(10));
    assert_eq!(editor.text(), "");
    assert!(!editor.undo(1));

    assert!(editor.redo(10));
    assert_eq!(editor.text(), "abc");
    assert!(!editor.can_redo());
}

#[test]
fn test_new_edit_discards_redo() {
    let (mut editor, clock) = test_editor_with_clock("", 0, 0);
    editor.insert_text("a");
    clock.advance(PAUSE);
    editor.insert_text("b");
    clock.advance(PAUSE);

    editor.undo(1);
    assert!(editor.can_redo());

    editor.insert_text("c");
    assert_eq!(editor.text(), "ac");
    assert!(!editor.can_redo());
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn test_undo_limit_evicts_oldest() {
    let clock = ManualClock::new();
    let config = EditorConfig {
        undo_limit: 3,
        ..EditorConfig::default()
    };
    let mut editor = TextEditor::with_config(config).with_clock(clock.clone());
    for _ in 0..5 {
        editor.insert_text("a");
        clock.advance(PAUSE);
    }

    assert_eq!(editor.history().len(), 3);
    editor.undo(10);
    assert_eq!(editor.text(), "aa");
}

#[test]
fn test_set_text_clears_history() {
    let mut editor = test_editor("", 0, 0);
    editor.insert_text("a");
    editor.set_text("fresh");

    assert!(!editor.can_undo());
    assert!(editor.history().is_empty());
}

#[test]
fn test_undo_and_redo_fire_callback() {
    let count = Rc::new(RefCell::new(0));
    let (mut editor, _clock) = test_editor_with_clock("", 0, 0);
    editor.insert_text("a");

    let sink = Rc::clone(&count);
    editor.set_text_changed_callback(move |_| *sink.borrow_mut() += 1);
    editor.undo(1);
    editor.redo(1);
    editor.redo(1);

    assert_eq!(*count.borrow(), 2);
}
