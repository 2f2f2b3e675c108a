//! Find/replace match tracking.
//!
//! Matches are recomputed wholesale whenever the needle or the buffer
//! changes. A needle never matches across a line break.

use tracing::debug;

use crate::editable::{Cursor, CursorSet, Position, TextBuffer};

/// Fold a character for case-insensitive comparison without changing the
/// character count
fn fold(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

/// Needle, options and the current match list
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    needle: String,
    needle_chars: Vec<char>,
    case_sensitive: bool,
    /// Start of every match, in document order
    matches: Vec<Position>,
}

impl SearchEngine {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..Self::default()
        }
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Needle length in characters
    pub fn needle_len(&self) -> usize {
        self.needle_chars.len()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Set the needle and recompute matches
    pub fn set_needle(&mut self, needle: &str, buffer: &TextBuffer) {
        self.needle = needle.to_string();
        self.needle_chars = needle.chars().collect();
        self.recompute(buffer);
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool, buffer: &TextBuffer) {
        self.case_sensitive = case_sensitive;
        self.recompute(buffer);
    }

    /// Rescan the whole buffer for non-overlapping matches
    pub fn recompute(&mut self, buffer: &TextBuffer) {
        self.matches.clear();
        if self.needle_chars.is_empty() || self.needle_chars.contains(&'\n') {
            return;
        }

        let needle: Vec<char> = if self.case_sensitive {
            self.needle_chars.clone()
        } else {
            self.needle_chars.iter().copied().map(fold).collect()
        };

        for (line_idx, line) in buffer.lines().enumerate() {
            let hay: Vec<char> = if self.case_sensitive {
                line.chars().collect()
            } else {
                line.chars().map(fold).collect()
            };
            let mut col = 0;
            while col + needle.len() <= hay.len() {
                if hay[col..col + needle.len()] == needle[..] {
                    self.matches.push(Position::new(line_idx, col));
                    col += needle.len();
                } else {
                    col += 1;
                }
            }
        }
        debug!(target: "search", needle = %self.needle, matches = self.matches.len(), "recomputed");
    }

    pub fn matches(&self) -> &[Position] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    fn match_end(&self, start: Position) -> Position {
        Position::new(start.line, start.column + self.needle_len())
    }

    fn select_match(&self, start: Position, cursors: &mut CursorSet) {
        cursors.set_single_selection(start, self.match_end(start));
    }

    /// Select the first match starting at or after the end of the primary
    /// selection, wrapping to the first match. Returns false when there are
    /// no matches, leaving the cursors untouched.
    pub fn find_next(&self, cursors: &mut CursorSet) -> bool {
        let pivot = cursors.primary().selection.end();
        let Some(&target) = self
            .matches
            .iter()
            .find(|m| **m >= pivot)
            .or_else(|| self.matches.first())
        else {
            return false;
        };
        self.select_match(target, cursors);
        true
    }

    /// Select the last match starting before the start of the primary
    /// selection, wrapping to the last match.
    pub fn find_previous(&self, cursors: &mut CursorSet) -> bool {
        let pivot = cursors.primary().selection.start();
        let Some(&target) = self
            .matches
            .iter()
            .rev()
            .find(|m| **m < pivot)
            .or_else(|| self.matches.last())
        else {
            return false;
        };
        self.select_match(target, cursors);
        true
    }

    /// Replace the cursor set with one selection per match
    pub fn select_all_occurrences(&self, cursors: &mut CursorSet) -> bool {
        if self.matches.is_empty() {
            return false;
        }
        *cursors = CursorSet::from_cursors(
            self.matches
                .iter()
                .map(|&m| Cursor::with_selection(m, self.match_end(m)))
                .collect(),
        );
        true
    }

    /// Add a cursor selecting the next match after the last cursor that is
    /// not already selected. Returns false when every match is selected.
    pub fn add_next_occurrence(&self, cursors: &mut CursorSet) -> bool {
        let selected = |m: &Position| {
            cursors
                .iter()
                .any(|c| c.selection.start() == *m && c.selection.end() == self.match_end(*m))
        };

        // Nothing selected yet: behave like find-next
        if !cursors.iter().any(|c| selected(&c.selection.start())) {
            return self.find_next(cursors);
        }

        let pivot = cursors.primary().selection.end();
        let candidate = self
            .matches
            .iter()
            .filter(|m| !selected(*m))
            .find(|m| **m >= pivot)
            .or_else(|| self.matches.iter().find(|m| !selected(*m)))
            .copied();

        match candidate {
            Some(start) => cursors.add_cursor_with_selection(start, self.match_end(start)),
            None => false,
        }
    }

    /// Index of the match the primary cursor has selected, for an "n/m"
    /// counter
    pub fn current_match_index(&self, cursors: &CursorSet) -> Option<usize> {
        let sel = cursors.primary().selection;
        self.matches
            .iter()
            .position(|&m| sel.start() == m && sel.end() == self.match_end(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    fn engine(text: &str, needle: &str) -> (TextBuffer, SearchEngine) {
        let buffer = TextBuffer::from_text(text);
        let mut search = SearchEngine::new(false);
        search.set_needle(needle, &buffer);
        (buffer, search)
    }

    #[test]
    fn test_matches_case_insensitive() {
        let (_, search) = engine("Foo foo\nbar FOO", "foo");
        assert_eq!(search.matches(), &[p(0, 0), p(0, 4), p(1, 4)]);
    }

    #[test]
    fn test_case_sensitive() {
        let (buffer, mut search) = engine("Foo foo", "foo");
        search.set_case_sensitive(true, &buffer);
        assert_eq!(search.matches(), &[p(0, 4)]);
    }

    #[test]
    fn test_matches_do_not_overlap() {
        let (_, search) = engine("aaaa", "aa");
        assert_eq!(search.matches(), &[p(0, 0), p(0, 2)]);
    }

    #[test]
    fn test_find_next_advances_and_wraps() {
        let (_, search) = engine("foo x foo x foo", "foo");
        let mut cursors = CursorSet::new();

        assert!(search.find_next(&mut cursors));
        assert_eq!(cursors.primary().selection.start(), p(0, 0));
        assert!(search.find_next(&mut cursors));
        assert_eq!(cursors.primary().selection.start(), p(0, 6));
        assert!(search.find_next(&mut cursors));
        assert_eq!(cursors.primary().selection.start(), p(0, 12));
        assert!(search.find_next(&mut cursors));
        assert_eq!(cursors.primary().selection.start(), p(0, 0));
    }

    #[test]
    fn test_find_previous_wraps() {
        let (_, search) = engine("foo x foo", "foo");
        let mut cursors = CursorSet::new();
        assert!(search.find_previous(&mut cursors));
        assert_eq!(cursors.primary().selection.start(), p(0, 6));
        assert!(search.find_previous(&mut cursors));
        assert_eq!(cursors.primary().selection.start(), p(0, 0));
    }

    #[test]
    fn test_no_match_leaves_cursors() {
        let (_, search) = engine("abc", "zzz");
        let mut cursors = CursorSet::from_positions(&[p(0, 2)]);
        assert!(!search.find_next(&mut cursors));
        assert!(!search.select_all_occurrences(&mut cursors));
        assert_eq!(cursors.primary().position, p(0, 2));
    }

    #[test]
    fn test_select_all_and_counter() {
        let (_, search) = engine("ab ab\nab", "ab");
        let mut cursors = CursorSet::new();
        assert!(search.select_all_occurrences(&mut cursors));
        assert_eq!(cursors.len(), 3);
        assert!(cursors.iter().all(|c| c.has_selection()));
        assert_eq!(search.current_match_index(&cursors), Some(0));
    }

    #[test]
    fn test_add_next_occurrence() {
        let (_, search) = engine("ab ab ab", "ab");
        let mut cursors = CursorSet::new();
        assert!(search.add_next_occurrence(&mut cursors));
        assert_eq!(cursors.len(), 1);
        assert!(search.add_next_occurrence(&mut cursors));
        assert!(search.add_next_occurrence(&mut cursors));
        assert_eq!(cursors.len(), 3);
        assert!(!search.add_next_occurrence(&mut cursors));
    }

    #[test]
    fn test_empty_or_multiline_needle_has_no_matches() {
        let (buffer, mut search) = engine("a\nb", "");
        assert_eq!(search.match_count(), 0);
        search.set_needle("a\nb", &buffer);
        assert_eq!(search.match_count(), 0);
    }
}
