//! Character classification and column helpers shared by movement, search
//! and completion.

/// Check if a character is a punctuation/symbol boundary (not whitespace)
pub fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '/' | ':'
            | ','
            | '.'
            | '-'
            | '('
            | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | ';'
            | '"'
            | '\''
            | '<'
            | '>'
            | '='
            | '+'
            | '*'
            | '&'
            | '|'
            | '!'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '~'
            | '`'
            | '\\'
            | '?'
    )
}

/// Character type for word navigation (IntelliJ-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace characters
    Whitespace,
    /// Alphanumeric characters (word characters)
    WordChar,
    /// Punctuation and symbols
    Punctuation,
}

/// Get the character type for word navigation
pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_punctuation(ch) {
        CharType::Punctuation
    } else {
        CharType::WordChar
    }
}

/// Identifier-style word character (letters, digits, underscore).
///
/// Stricter than [`CharType::WordChar`]: completion prefixes and harvested
/// document words only ever contain these.
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Column of the next tab stop strictly after `column`.
pub fn next_tab_stop(column: usize, tab_width: usize) -> usize {
    let width = tab_width.max(1);
    (column / width + 1) * width
}

/// Convert a visual column (screen position) to character column.
/// Accounts for tab expansion when converting screen position to character index.
pub fn visual_col_to_char_col(text: &str, visual_col: usize, tab_width: usize) -> usize {
    let mut current_visual = 0;
    let mut char_col = 0;

    for ch in text.chars() {
        if current_visual >= visual_col {
            return char_col;
        }

        if ch == '\t' {
            current_visual = next_tab_stop(current_visual, tab_width);
        } else {
            current_visual += 1;
        }
        char_col += 1;
    }

    char_col
}

/// Convert a character column to visual column (screen position).
/// Accounts for tab expansion when converting character index to screen position.
pub fn char_col_to_visual_col(text: &str, char_col: usize, tab_width: usize) -> usize {
    let mut visual_col = 0;

    for (i, ch) in text.chars().enumerate() {
        if i >= char_col {
            break;
        }

        if ch == '\t' {
            visual_col = next_tab_stop(visual_col, tab_width);
        } else {
            visual_col += 1;
        }
    }

    visual_col
}

/// Byte index of the character at `char_col`, or the string length when the
/// column is at (or past) the end.
pub fn char_to_byte(text: &str, char_col: usize) -> usize {
    text.char_indices()
        .nth(char_col)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Leading whitespace of a line, as an owned string.
pub fn leading_whitespace(text: &str) -> String {
    text.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}
