//! Undo/redo history built from whole-document snapshots.
//!
//! Each record holds the full text and cursor set before and after an edit.
//! Edits arriving within the coalescing window of the previous one are folded
//! into it, so a burst of keystrokes undoes as a single step. A record stops
//! absorbing edits once it spans the maximum group span, so continuous typing
//! still undoes in bounded chunks.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::cursor_set::CursorSet;

/// Default coalescing window
pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(300);

/// Default longest time a single record keeps absorbing edits
pub const DEFAULT_MAX_GROUP_SPAN: Duration = Duration::from_millis(2000);

/// Default maximum number of records
pub const DEFAULT_UNDO_LIMIT: usize = 1000;

/// Monotonic time source used to timestamp records
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same offset, so a
/// test can keep one handle and give another to the editor.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

/// Full editor state captured for undo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub text: String,
    pub cursors: CursorSet,
}

impl EditorSnapshot {
    pub fn new(text: String, cursors: CursorSet) -> Self {
        Self { text, cursors }
    }
}

/// One undoable step
#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub before_text: String,
    pub before_cursors: CursorSet,
    pub after_text: String,
    pub after_cursors: CursorSet,
    /// Time of the first edit in this record
    pub started: Instant,
    /// Time of the latest edit folded into this record
    pub timestamp: Instant,
    /// Set once a later edit has been coalesced into this record
    pub merged: bool,
}

/// Linear undo/redo stack with an index separating undo from redo records
pub struct UndoHistory {
    records: Vec<UndoRecord>,
    /// Number of records currently applied; `records[index..]` is the redo tail
    index: usize,
    coalesce_window: Duration,
    max_group_span: Duration,
    limit: usize,
    /// When set, the next edit always starts a new record
    sealed: bool,
}

impl fmt::Debug for UndoHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoHistory")
            .field("records", &self.records.len())
            .field("index", &self.index)
            .field("coalesce_window", &self.coalesce_window)
            .field("max_group_span", &self.max_group_span)
            .field("limit", &self.limit)
            .field("sealed", &self.sealed)
            .finish()
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_COALESCE_WINDOW, DEFAULT_UNDO_LIMIT)
    }

    pub fn with_settings(coalesce_window: Duration, limit: usize) -> Self {
        Self {
            records: Vec::new(),
            index: 0,
            coalesce_window,
            max_group_span: DEFAULT_MAX_GROUP_SPAN,
            limit: limit.max(1),
            sealed: true,
        }
    }

    pub fn with_max_group_span(mut self, max_group_span: Duration) -> Self {
        self.max_group_span = max_group_span;
        self
    }

    /// Capture the state before an edit.
    ///
    /// Drops any redo tail. If the previous record was touched less than the
    /// coalescing window ago, started less than the maximum group span ago,
    /// and nothing sealed the history since, the edit is folded into it: the
    /// record keeps its original "before" state and its timestamp moves to
    /// `now`.
    pub fn record_before(&mut self, before: EditorSnapshot, now: Instant) {
        if self.index < self.records.len() {
            self.records.truncate(self.index);
            self.sealed = true;
        }

        if !self.sealed {
            if let Some(last) = self.records.last_mut() {
                let idle = now.saturating_duration_since(last.timestamp);
                let span = now.saturating_duration_since(last.started);
                if idle < self.coalesce_window && span < self.max_group_span {
                    last.merged = true;
                    last.timestamp = now;
                    let records = self.records.len();
                    tracing::trace!(target: "history", records, "coalesced edit");
                    return;
                }
            }
        }

        self.records.push(UndoRecord {
            before_text: before.text,
            before_cursors: before.cursors,
            after_text: String::new(),
            after_cursors: CursorSet::new(),
            started: now,
            timestamp: now,
            merged: false,
        });

        if self.records.len() > self.limit {
            self.records.remove(0);
            tracing::debug!(target: "history", limit = self.limit, "evicted oldest undo record");
        }
        self.index = self.records.len();
    }

    /// Fill the "after" state of the most recent record
    pub fn record_after(&mut self, after: EditorSnapshot) {
        if let Some(last) = self.records.last_mut() {
            last.after_text = after.text;
            last.after_cursors = after.cursors;
            self.sealed = false;
        }
    }

    /// Start a new record on the next edit regardless of timing
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Step back one record. `current` is stored as the record's "after"
    /// state; the returned snapshot is the state to restore.
    pub fn undo(&mut self, current: EditorSnapshot) -> Option<EditorSnapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.sealed = true;

        let record = &mut self.records[self.index];
        record.after_text = current.text;
        record.after_cursors = current.cursors;
        tracing::debug!(target: "history", index = self.index, "undo");
        Some(EditorSnapshot::new(
            record.before_text.clone(),
            record.before_cursors.clone(),
        ))
    }

    /// Step forward one record, returning the state to restore
    pub fn redo(&mut self) -> Option<EditorSnapshot> {
        let record = self.records.get(self.index)?;
        let snapshot = EditorSnapshot::new(record.after_text.clone(), record.after_cursors.clone());
        self.index += 1;
        self.sealed = true;
        tracing::debug!(target: "history", index = self.index, "redo");
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.index = 0;
        self.sealed = true;
    }

    /// Total records (undo and redo)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.index
    }

    pub fn redo_count(&self) -> usize {
        self.records.len() - self.index
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }
}
