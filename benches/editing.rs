//! Benchmarks for editing operations
//!
//! Run with: cargo bench --bench editing

use token_core::editable::{CursorSet, EditEngine, EditOptions, Position, TextBuffer};
use token_core::TextEditor;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn document(line_count: usize) -> String {
    "The quick brown fox jumps over the lazy dog.\n".repeat(line_count)
}

// ============================================================================
// Engine operations (no history, no retokenize)
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn engine_insert_char_middle(bencher: divan::Bencher, line_count: usize) {
    bencher
        .with_inputs(|| {
            let buffer = TextBuffer::from_text(&document(line_count));
            let cursors = CursorSet::from_positions(&[Position::new(line_count / 2, 10)]);
            (buffer, cursors)
        })
        .bench_local_values(|(mut buffer, mut cursors)| {
            let mut engine = EditEngine::new(&mut buffer, &mut cursors, EditOptions::default());
            engine.insert_text("x", false);
            divan::black_box(buffer);
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn engine_multi_cursor_insert(bencher: divan::Bencher, cursor_count: usize) {
    bencher
        .with_inputs(|| {
            let buffer = TextBuffer::from_text(&document(cursor_count));
            let positions: Vec<Position> = (0..cursor_count).map(|l| Position::new(l, 4)).collect();
            (buffer, CursorSet::from_positions(&positions))
        })
        .bench_local_values(|(mut buffer, mut cursors)| {
            let mut engine = EditEngine::new(&mut buffer, &mut cursors, EditOptions::default());
            engine.insert_text("x", false);
            divan::black_box(buffer);
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn engine_multi_cursor_backspace(bencher: divan::Bencher, cursor_count: usize) {
    bencher
        .with_inputs(|| {
            let buffer = TextBuffer::from_text(&document(cursor_count));
            let positions: Vec<Position> = (0..cursor_count).map(|l| Position::new(l, 4)).collect();
            (buffer, CursorSet::from_positions(&positions))
        })
        .bench_local_values(|(mut buffer, mut cursors)| {
            let mut engine = EditEngine::new(&mut buffer, &mut cursors, EditOptions::default());
            engine.backspace();
            divan::black_box(buffer);
        });
}

// ============================================================================
// Facade operations (history + retokenize + search refresh)
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn editor_type_burst(bencher: divan::Bencher, line_count: usize) {
    bencher
        .with_inputs(|| {
            let mut editor = TextEditor::new();
            editor.set_text(&document(line_count));
            editor.set_cursor_position(line_count / 2, 0);
            editor
        })
        .bench_local_values(|mut editor| {
            for ch in ["h", "e", "l", "l", "o"] {
                editor.insert_text(ch);
            }
            divan::black_box(editor);
        });
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn editor_undo_redo(bencher: divan::Bencher, line_count: usize) {
    bencher
        .with_inputs(|| {
            let mut editor = TextEditor::new();
            editor.set_text(&document(line_count));
            editor.insert_text("edit");
            editor
        })
        .bench_local_values(|mut editor| {
            editor.undo(1);
            editor.redo(1);
            divan::black_box(editor);
        });
}
