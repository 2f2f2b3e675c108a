//! Prefix completion from language tables and document words.

use std::collections::BTreeSet;

use crate::editable::{Position, TextBuffer};
use crate::syntax::LanguageProfile;
use crate::util::is_identifier_char;

/// Default number of items offered
pub const DEFAULT_MAX_ITEMS: usize = 20;

/// Minimum length of a harvested document word
const MIN_WORD_LEN: usize = 3;

/// Where a candidate came from, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompletionKind {
    Keyword,
    Type,
    Builtin,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Identifier characters immediately left of `pos`, with the column where
/// they start
pub fn word_prefix_at(buffer: &TextBuffer, pos: Position) -> (usize, String) {
    let pos = buffer.clamp(pos);
    let chars: Vec<char> = buffer.line_or_empty(pos.line).chars().collect();
    let mut start = pos.column;
    while start > 0 && is_identifier_char(chars[start - 1]) {
        start -= 1;
    }
    (start, chars[start..pos.column].iter().collect())
}

/// Distinct identifier-like words in the buffer (not starting with a digit)
fn document_words(buffer: &TextBuffer) -> BTreeSet<String> {
    let mut words = BTreeSet::new();
    for line in buffer.lines() {
        for word in line.split(|c: char| !is_identifier_char(c)) {
            let starts_with_digit = word.chars().next().is_some_and(|c| c.is_ascii_digit());
            if !starts_with_digit && word.chars().count() >= MIN_WORD_LEN {
                words.insert(word.to_string());
            }
        }
    }
    words
}

/// Ranks candidates for a prefix
#[derive(Debug, Clone, Copy)]
pub struct CompletionProvider {
    max_items: usize,
}

impl Default for CompletionProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}

impl CompletionProvider {
    pub fn new(max_items: usize) -> Self {
        Self { max_items }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Candidates starting with `prefix` (case-insensitively).
    ///
    /// Sources in priority order: keywords, types, builtins, document words
    /// (excluding the prefix itself). A label offered by several sources
    /// keeps the highest-priority one. Case-exact prefix matches sort first,
    /// then lexicographically.
    pub fn candidates(
        &self,
        prefix: &str,
        profile: &LanguageProfile,
        buffer: &TextBuffer,
    ) -> Vec<CompletionItem> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let lower = prefix.to_lowercase();
        let matches = |label: &str| label.to_lowercase().starts_with(&lower);

        let words = document_words(buffer);
        let sources = [
            (CompletionKind::Keyword, profile.keywords.iter().copied().collect::<Vec<_>>()),
            (CompletionKind::Type, profile.types.iter().copied().collect()),
            (CompletionKind::Builtin, profile.builtins.iter().copied().collect()),
            (
                CompletionKind::Word,
                words.iter().map(String::as_str).filter(|w| *w != prefix).collect(),
            ),
        ];

        let mut seen = BTreeSet::new();
        let mut items = Vec::new();
        for (kind, labels) in sources {
            for label in labels {
                if matches(label) && seen.insert(label) {
                    items.push(CompletionItem::new(label, kind));
                }
            }
        }

        items.sort_by(|a, b| {
            let a_exact = !a.label.starts_with(prefix);
            let b_exact = !b.label.starts_with(prefix);
            a_exact.cmp(&b_exact).then_with(|| a.label.cmp(&b.label))
        });
        items.truncate(self.max_items);
        items
    }
}

/// An open completion popup
#[derive(Debug, Clone, Default)]
pub struct CompletionSession {
    /// Column where the completed word starts
    pub start_column: usize,
    pub prefix: String,
    pub items: Vec<CompletionItem>,
    pub selected_index: usize,
}

impl CompletionSession {
    pub fn selected(&self) -> Option<&CompletionItem> {
        self.items.get(self.selected_index)
    }

    pub fn select_next(&mut self) {
        let max_index = self.items.len().saturating_sub(1);
        self.selected_index = self.selected_index.saturating_add(1).min(max_index);
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Text after the typed prefix, for an inline preview. `None` when the
    /// selected label does not start with the prefix exactly (case differs).
    pub fn remainder(&self) -> Option<&str> {
        self.selected()?.label.strip_prefix(self.prefix.as_str())
    }
}
