//! Token Core - multi-cursor plain-text editing engine
//!
//! This crate provides the buffer, cursor, editing, history, search,
//! tokenizing and completion logic of a code editor, with no rendering or
//! windowing. A host drives it through [`TextEditor`] and draws whatever it
//! reads back.

pub mod clipboard;
pub mod completion;
pub mod config;
pub mod editable;
pub mod editor;
pub mod search;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use completion::{CompletionItem, CompletionKind, CompletionProvider, CompletionSession};
pub use config::EditorConfig;
pub use editable::{
    CharMetrics, Cursor, CursorSet, EditOptions, ManualClock, Position, Selection, TextBuffer,
    UndoHistory,
};
pub use editor::{TextChangedCallback, TextEditor};
pub use search::SearchEngine;
pub use syntax::{LanguageId, LineTokens, Token, TokenKind};
pub use theme::{Color, EditorTheme};
