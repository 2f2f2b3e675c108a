//! Tracing setup and cursor-state diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! multi-cursor, selection, and history issues.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=cursor=trace,history=debug` - scoped filtering
//! - `RUST_LOG=token_core::editor=debug` - module-level filtering
//!
//! The library never installs a subscriber itself; hosts, benches and
//! ad-hoc tools call [`init`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::editable::CursorSet;

/// Initialize a console subscriber. Respects RUST_LOG, defaulting to `warn`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}

/// Lightweight snapshot of cursor/selection state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSnapshot {
    pub cursor_count: usize,
    pub primary_idx: usize,
    pub cursors: Vec<CursorInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorInfo {
    pub line: usize,
    pub column: usize,
    pub anchor: (usize, usize),
    pub selection_empty: bool,
}

impl CursorSnapshot {
    pub fn from_cursors(cursors: &CursorSet) -> Self {
        Self {
            cursor_count: cursors.len(),
            primary_idx: cursors.primary_index(),
            cursors: cursors
                .iter()
                .map(|c| CursorInfo {
                    line: c.position.line,
                    column: c.position.column,
                    anchor: (c.selection.anchor.line, c.selection.anchor.column),
                    selection_empty: c.selection.is_empty(),
                })
                .collect(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &CursorSnapshot) -> Option<String> {
        if self.cursor_count != other.cursor_count {
            return Some(format!(
                "cursor count: {} → {}",
                self.cursor_count, other.cursor_count
            ));
        }

        let mut changes = Vec::new();
        for (i, (before, after)) in self.cursors.iter().zip(&other.cursors).enumerate() {
            if before.line != after.line || before.column != after.column {
                changes.push(format!(
                    "#{}: ({},{}) → ({},{})",
                    i, before.line, before.column, after.line, after.column
                ));
            }
            if before.selection_empty != after.selection_empty {
                let status = if after.selection_empty {
                    "cleared"
                } else {
                    "active"
                };
                changes.push(format!("#{}: selection {}", i, status));
            }
        }
        if self.primary_idx != other.primary_idx {
            changes.push(format!("primary: {} → {}", self.primary_idx, other.primary_idx));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::Position;

    #[test]
    fn test_diff_reports_moves_and_count() {
        let a = CursorSnapshot::from_cursors(&CursorSet::from_positions(&[Position::new(0, 0)]));
        let b = CursorSnapshot::from_cursors(&CursorSet::from_positions(&[Position::new(1, 2)]));
        assert_eq!(a.diff(&b).as_deref(), Some("#0: (0,0) → (1,2)"));
        assert_eq!(a.diff(&a), None);

        let two = CursorSnapshot::from_cursors(&CursorSet::from_positions(&[
            Position::new(0, 0),
            Position::new(1, 0),
        ]));
        assert_eq!(a.diff(&two).as_deref(), Some("cursor count: 1 → 2"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
