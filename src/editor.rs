//! TextEditor - the host-facing facade.
//!
//! Owns the buffer, cursors, history, tokens, search state and completion
//! session, and keeps the derived state (tokens, matches, completion items)
//! in step with every edit. All calls are synchronous and run to completion.

use std::fmt;
use std::path::Path;

use tracing::{debug, span, trace, Level};

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::completion::{word_prefix_at, CompletionProvider, CompletionSession};
use crate::config::EditorConfig;
use crate::editable::{
    CharMetrics, Clock, CursorSet, Direction, EditEngine, EditorSnapshot, Position, SystemClock,
    TextBuffer, UndoHistory,
};
use crate::search::SearchEngine;
use crate::syntax::{DocumentTokens, LanguageId, LineTokens, Tokenizer};
use crate::tracing::CursorSnapshot;

/// Called with the new revision after every completed text change
pub type TextChangedCallback = Box<dyn FnMut(u64)>;

/// How an edit interacts with undo coalescing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// Typing-like edits may fold into the previous record
    Coalesce,
    /// Always a separate undo step
    Isolated,
}

pub struct TextEditor {
    buffer: TextBuffer,
    cursors: CursorSet,
    history: UndoHistory,
    tokenizer: Tokenizer,
    tokens: DocumentTokens,
    search: SearchEngine,
    completion: CompletionProvider,
    completion_session: Option<CompletionSession>,
    clipboard: Box<dyn Clipboard>,
    clock: Box<dyn Clock>,
    config: EditorConfig,
    revision: u64,
    on_text_changed: Option<TextChangedCallback>,
}

impl fmt::Debug for TextEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEditor")
            .field("lines", &self.buffer.line_count())
            .field("cursors", &self.cursors)
            .field("history", &self.history)
            .field("language", &self.tokenizer.language())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEditor {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let buffer = TextBuffer::new();
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize(&buffer, 0);
        let history = UndoHistory::with_settings(config.undo_coalesce_window(), config.undo_limit)
            .with_max_group_span(config.undo_group_max_span());
        Self {
            buffer,
            cursors: CursorSet::new(),
            history,
            tokenizer,
            tokens,
            search: SearchEngine::new(config.search_case_sensitive),
            completion: CompletionProvider::new(config.completion_max_items),
            completion_session: None,
            clipboard: Box::new(MemoryClipboard::new()),
            clock: Box::new(SystemClock),
            config,
            revision: 0,
            on_text_changed: None,
        }
    }

    /// Replace the clipboard collaborator
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    /// Replace the clock used to timestamp undo records
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // =========================================================================
    // Document
    // =========================================================================

    /// Load a whole document. Clears history, resets the cursor to (0, 0)
    /// and does not fire the text-changed callback.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.cursors = CursorSet::new();
        self.history.clear();
        self.completion_session = None;
        self.revision += 1;
        self.refresh_derived();
        debug!(lines = self.buffer.line_count(), revision = self.revision, "document loaded");
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.buffer.line(line)
    }

    /// Incremented on every text change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_text_changed_callback(&mut self, callback: impl FnMut(u64) + 'static) {
        self.on_text_changed = Some(Box::new(callback));
    }

    pub fn clear_text_changed_callback(&mut self) {
        self.on_text_changed = None;
    }

    // =========================================================================
    // Language & tokens
    // =========================================================================

    pub fn language(&self) -> LanguageId {
        self.tokenizer.language()
    }

    pub fn set_language(&mut self, language: LanguageId) {
        self.tokenizer.set_language(language);
        self.tokens = self.tokenizer.tokenize(&self.buffer, self.revision);
    }

    pub fn set_language_from_path(&mut self, path: &Path) {
        self.set_language(LanguageId::from_path(path));
    }

    pub fn line_tokens(&self, line: usize) -> Option<&LineTokens> {
        self.tokens.get_line(line)
    }

    pub fn tokens(&self) -> &DocumentTokens {
        &self.tokens
    }

    // =========================================================================
    // Cursors & selection
    // =========================================================================

    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    /// Collapse to a single caret at the (clamped) position
    pub fn set_cursor_position(&mut self, line: usize, column: usize) {
        let pos = self.buffer.clamp(Position::new(line, column));
        self.move_cursors(|cursors, _| cursors.set_single(pos));
    }

    /// Primary caret position
    pub fn cursor_position(&self) -> Position {
        self.cursors.primary().position
    }

    /// Select from `anchor` to `active` with a single cursor
    pub fn set_selection(&mut self, anchor: Position, active: Position) {
        let anchor = self.buffer.clamp(anchor);
        let active = self.buffer.clamp(active);
        self.move_cursors(|cursors, _| cursors.set_single_selection(anchor, active));
    }

    pub fn select_all(&mut self) {
        self.move_cursors(|cursors, buffer| cursors.select_all(buffer));
    }

    pub fn select_word(&mut self) {
        self.move_cursors(|cursors, buffer| cursors.select_all_words(buffer));
    }

    pub fn select_line(&mut self) {
        self.move_cursors(|cursors, buffer| cursors.select_all_lines(buffer));
    }

    pub fn has_selection(&self) -> bool {
        self.cursors.any_selection()
    }

    /// Text of every non-empty selection, in cursor order, joined with `\n`
    pub fn selected_text(&self) -> String {
        self.cursors
            .iter()
            .filter(|c| c.has_selection())
            .map(|c| self.buffer.slice(c.selection.start(), c.selection.end()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn add_cursor(&mut self, line: usize, column: usize) -> bool {
        let pos = self.buffer.clamp(Position::new(line, column));
        let mut added = false;
        self.move_cursors(|cursors, _| added = cursors.add_cursor(pos));
        added
    }

    pub fn add_cursor_above(&mut self) -> bool {
        let mut added = false;
        self.move_cursors(|cursors, buffer| added = cursors.add_cursor_above(buffer));
        added
    }

    pub fn add_cursor_below(&mut self) -> bool {
        let mut added = false;
        self.move_cursors(|cursors, buffer| added = cursors.add_cursor_below(buffer));
        added
    }

    pub fn clear_extra_cursors(&mut self) {
        self.move_cursors(|cursors, _| cursors.clear_extra());
    }

    pub fn move_left(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| cursors.move_all_by(0, -1, extend, buffer));
    }

    pub fn move_right(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| cursors.move_all_by(0, 1, extend, buffer));
    }

    pub fn move_up(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| cursors.move_all_by(-1, 0, extend, buffer));
    }

    pub fn move_down(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| cursors.move_all_by(1, 0, extend, buffer));
    }

    /// Move by whole pages of `lines` lines
    pub fn move_page(&mut self, lines: isize, extend: bool) {
        self.move_cursors(|cursors, buffer| cursors.move_all_by(lines, 0, extend, buffer));
    }

    pub fn move_word_left(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| {
            cursors.move_all_word(Direction::Backward, extend, buffer)
        });
    }

    pub fn move_word_right(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| {
            cursors.move_all_word(Direction::Forward, extend, buffer)
        });
    }

    pub fn move_line_start(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| cursors.move_all_to_line_start(extend, buffer));
    }

    pub fn move_line_end(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| cursors.move_all_to_line_end(extend, buffer));
    }

    pub fn move_document_start(&mut self, extend: bool) {
        self.move_cursors(|cursors, _| cursors.move_to_document_start(extend));
    }

    pub fn move_document_end(&mut self, extend: bool) {
        self.move_cursors(|cursors, buffer| cursors.move_to_document_end(extend, buffer));
    }

    /// Caret position nearest to a point relative to the text origin
    pub fn position_at_point(&self, metrics: &CharMetrics, x: f32, y: f32) -> Position {
        metrics.screen_to_position(&self.buffer, x, y, self.config.tab_width)
    }

    /// Top-left of the primary caret's cell relative to the text origin
    pub fn cursor_screen_position(&self, metrics: &CharMetrics) -> (f32, f32) {
        metrics.position_to_screen(&self.buffer, self.cursor_position(), self.config.tab_width)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Insert text at every cursor, honoring the configured auto-indent
    pub fn insert_text(&mut self, text: &str) -> bool {
        let allow_auto_indent = self.config.auto_indent;
        self.insert_text_with(text, allow_auto_indent)
    }

    pub fn insert_text_with(&mut self, text: &str, allow_auto_indent: bool) -> bool {
        let grouping = if text.chars().count() == 1 {
            Grouping::Coalesce
        } else {
            Grouping::Isolated
        };
        self.edit("insert_text", grouping, |engine| {
            engine.insert_text(text, allow_auto_indent)
        })
    }

    pub fn delete_selection(&mut self) -> bool {
        self.edit("delete_selection", Grouping::Isolated, |engine| {
            engine.delete_selection()
        })
    }

    pub fn backspace(&mut self) -> bool {
        self.edit("backspace", Grouping::Coalesce, |engine| engine.backspace())
    }

    pub fn delete(&mut self) -> bool {
        self.edit("delete", Grouping::Coalesce, |engine| engine.delete())
    }

    pub fn delete_word_backward(&mut self) -> bool {
        self.edit("delete_word_backward", Grouping::Isolated, |engine| {
            engine.delete_word_backward()
        })
    }

    pub fn delete_word_forward(&mut self) -> bool {
        self.edit("delete_word_forward", Grouping::Isolated, |engine| {
            engine.delete_word_forward()
        })
    }

    pub fn delete_line(&mut self) -> bool {
        self.edit("delete_line", Grouping::Isolated, |engine| engine.delete_line())
    }

    pub fn duplicate_line(&mut self) -> bool {
        self.edit("duplicate_line", Grouping::Isolated, |engine| {
            engine.duplicate_line()
        })
    }

    pub fn indent(&mut self) -> bool {
        self.edit("indent", Grouping::Isolated, |engine| engine.indent())
    }

    pub fn unindent(&mut self) -> bool {
        self.edit("unindent", Grouping::Isolated, |engine| engine.unindent())
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    /// Copy the selected text. Nothing is copied when no cursor has a
    /// selection.
    pub fn copy(&mut self) -> bool {
        let text = self.selected_text();
        if text.is_empty() {
            return false;
        }
        self.clipboard.set_text(&text);
        debug!(chars = text.chars().count(), "copied");
        true
    }

    pub fn cut(&mut self) -> bool {
        if !self.copy() {
            return false;
        }
        self.delete_selection()
    }

    /// Paste clipboard text. With several cursors and exactly one clipboard
    /// line per cursor, each cursor receives its own line.
    pub fn paste(&mut self) -> bool {
        let Some(text) = self.clipboard.get_text() else {
            return false;
        };
        let text = text.replace('\r', "");
        if text.is_empty() {
            return false;
        }

        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        if self.cursors.has_multiple() && lines.len() == self.cursors.len() {
            self.edit("paste", Grouping::Isolated, |engine| {
                engine.insert_per_cursor(&lines)
            })
        } else {
            let texts = vec![text; self.cursors.len()];
            self.edit("paste", Grouping::Isolated, |engine| {
                engine.insert_per_cursor(&texts)
            })
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Undo up to `steps` records. Returns true if anything was undone.
    pub fn undo(&mut self, steps: usize) -> bool {
        let mut applied = 0;
        for _ in 0..steps {
            let current = self.snapshot();
            let Some(restored) = self.history.undo(current) else {
                break;
            };
            self.restore(restored);
            applied += 1;
        }
        if applied > 0 {
            debug!(steps = applied, "undo");
            self.after_text_change();
        }
        applied > 0
    }

    /// Redo up to `steps` records. Returns true if anything was redone.
    pub fn redo(&mut self, steps: usize) -> bool {
        let mut applied = 0;
        for _ in 0..steps {
            let Some(restored) = self.history.redo() else {
                break;
            };
            self.restore(restored);
            applied += 1;
        }
        if applied > 0 {
            debug!(steps = applied, "redo");
            self.after_text_change();
        }
        applied > 0
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn set_search_text(&mut self, needle: &str) {
        self.search.set_needle(needle, &self.buffer);
    }

    pub fn search_text(&self) -> &str {
        self.search.needle()
    }

    pub fn set_search_case_sensitive(&mut self, case_sensitive: bool) {
        self.search.set_case_sensitive(case_sensitive, &self.buffer);
    }

    pub fn search(&self) -> &SearchEngine {
        &self.search
    }

    pub fn search_match_count(&self) -> usize {
        self.search.match_count()
    }

    /// Index of the selected match, for an "n/m" counter
    pub fn current_match_index(&self) -> Option<usize> {
        self.search.current_match_index(&self.cursors)
    }

    pub fn find_next(&mut self) -> bool {
        let found = self.search.find_next(&mut self.cursors);
        if found {
            self.cursor_moved();
        }
        found
    }

    pub fn find_previous(&mut self) -> bool {
        let found = self.search.find_previous(&mut self.cursors);
        if found {
            self.cursor_moved();
        }
        found
    }

    pub fn select_all_occurrences(&mut self) -> bool {
        let found = self.search.select_all_occurrences(&mut self.cursors);
        if found {
            self.cursor_moved();
        }
        found
    }

    pub fn add_next_occurrence(&mut self) -> bool {
        let added = self.search.add_next_occurrence(&mut self.cursors);
        if added {
            self.cursor_moved();
        }
        added
    }

    /// Replace every match with `replacement` as one undo step and return
    /// the number of replacements. Leaves a single caret after the last one.
    pub fn replace_all(&mut self, replacement: &str) -> usize {
        let count = self.search.match_count();
        if count == 0 {
            return 0;
        }
        let before = self.snapshot();
        self.search.select_all_occurrences(&mut self.cursors);
        let texts = vec![replacement.to_string(); self.cursors.len()];

        let options = self.config.edit_options();
        let changed = EditEngine::new(&mut self.buffer, &mut self.cursors, options)
            .insert_per_cursor(&texts);
        let last = self.cursors.as_slice()[self.cursors.len() - 1].position;
        self.cursors.set_single(last);

        if changed {
            self.commit(before, Grouping::Isolated);
        }
        debug!(count, "replaced all");
        count
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Open (or refresh) completion for the word left of the primary caret.
    /// Returns false, closing any session, when there is nothing to offer.
    pub fn trigger_auto_complete(&mut self) -> bool {
        let (start_column, prefix) = word_prefix_at(&self.buffer, self.cursor_position());
        let items = self
            .completion
            .candidates(&prefix, self.tokenizer.language().profile(), &self.buffer);
        if items.is_empty() {
            self.completion_session = None;
            return false;
        }
        let selected_index = self
            .completion_session
            .as_ref()
            .map(|s| s.selected_index.min(items.len() - 1))
            .unwrap_or(0);
        self.completion_session = Some(CompletionSession {
            start_column,
            prefix,
            items,
            selected_index,
        });
        true
    }

    pub fn close_auto_complete(&mut self) {
        self.completion_session = None;
    }

    pub fn completion_session(&self) -> Option<&CompletionSession> {
        self.completion_session.as_ref()
    }

    pub fn select_next_completion(&mut self) {
        if let Some(session) = self.completion_session.as_mut() {
            session.select_next();
        }
    }

    pub fn select_previous_completion(&mut self) {
        if let Some(session) = self.completion_session.as_mut() {
            session.select_previous();
        }
    }

    /// Complete the word at every cursor to the selected item's label and
    /// close the session. The typed prefix is replaced, so the result keeps
    /// the label's casing.
    pub fn accept_completion(&mut self) -> bool {
        let Some(session) = self.completion_session.take() else {
            return false;
        };
        let Some(label) = session.selected().map(|item| item.label.clone()) else {
            return false;
        };
        self.edit("accept_completion", Grouping::Isolated, |engine| {
            engine.complete_word(&label)
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot::new(self.buffer.text(), self.cursors.clone())
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.buffer.set_text(&snapshot.text);
        self.cursors = snapshot.cursors;
        self.cursors.clamp_all(&self.buffer);
    }

    /// Run one engine operation, then record history and refresh derived
    /// state if the text changed
    fn edit<F>(&mut self, op: &'static str, grouping: Grouping, f: F) -> bool
    where
        F: FnOnce(&mut EditEngine<'_>) -> bool,
    {
        let _span = span!(Level::DEBUG, "edit", op).entered();
        let before = self.snapshot();
        let cursors_before = CursorSnapshot::from_cursors(&self.cursors);

        let options = self.config.edit_options();
        let changed = {
            let mut engine = EditEngine::new(&mut self.buffer, &mut self.cursors, options);
            f(&mut engine)
        };

        if let Some(diff) = cursors_before.diff(&CursorSnapshot::from_cursors(&self.cursors)) {
            trace!(target: "cursor", %diff, "state changed");
        }

        if changed {
            self.commit(before, grouping);
        }
        changed
    }

    fn commit(&mut self, before: EditorSnapshot, grouping: Grouping) {
        if grouping == Grouping::Isolated {
            self.history.seal();
        }
        let now = self.clock.now();
        self.history.record_before(before, now);
        self.history.record_after(self.snapshot());
        if grouping == Grouping::Isolated {
            self.history.seal();
        }
        self.after_text_change();
    }

    fn after_text_change(&mut self) {
        self.revision += 1;
        self.refresh_derived();
        if self.completion_session.is_some() {
            self.trigger_auto_complete();
        }
        if let Some(callback) = self.on_text_changed.as_mut() {
            callback(self.revision);
        }
    }

    fn refresh_derived(&mut self) {
        self.tokens = self.tokenizer.tokenize(&self.buffer, self.revision);
        self.search.recompute(&self.buffer);
    }

    /// Apply a pure cursor change. Movement ends any typing burst and closes
    /// the completion popup.
    fn move_cursors<F>(&mut self, f: F)
    where
        F: FnOnce(&mut CursorSet, &TextBuffer),
    {
        let before = CursorSnapshot::from_cursors(&self.cursors);
        f(&mut self.cursors, &self.buffer);
        if let Some(diff) = before.diff(&CursorSnapshot::from_cursors(&self.cursors)) {
            trace!(target: "cursor", %diff, "state changed");
        }
        self.cursor_moved();
    }

    fn cursor_moved(&mut self) {
        self.cursors.assert_invariants();
        self.history.seal();
        self.completion_session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_resets_state() {
        let mut editor = TextEditor::new();
        editor.set_text("abc");
        editor.set_cursor_position(0, 3);
        editor.insert_text("d");
        assert!(editor.can_undo());

        editor.set_text("x\r\ny");
        assert_eq!(editor.text(), "x\ny");
        assert_eq!(editor.cursor_position(), Position::zero());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_selected_text_multi_cursor() {
        let mut editor = TextEditor::new();
        editor.set_text("foo bar foo");
        editor.set_search_text("foo");
        editor.select_all_occurrences();
        assert_eq!(editor.selected_text(), "foo\nfoo");
    }

    #[test]
    fn test_tokens_follow_edits() {
        let mut editor = TextEditor::new();
        editor.set_language(LanguageId::Rust);
        editor.set_text("x");
        editor.select_all();
        editor.insert_text("fn");
        let tokens = editor.line_tokens(0).unwrap();
        assert_eq!(tokens.tokens[0].kind, crate::syntax::TokenKind::Keyword);
    }
}
