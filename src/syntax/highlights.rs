//! Token data structures
//!
//! Defines token kinds, per-line token lists and document-level token state.

use serde::{Deserialize, Serialize};

use super::languages::LanguageId;

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    #[default]
    Default,
    Keyword,
    Type,
    Builtin,
    Function,
    Identifier,
    Number,
    String,
    CharLiteral,
    Comment,
    MultiLineComment,
    Preprocessor,
    Punctuation,
}

impl TokenKind {
    pub const ALL: [TokenKind; 13] = [
        TokenKind::Default,
        TokenKind::Keyword,
        TokenKind::Type,
        TokenKind::Builtin,
        TokenKind::Function,
        TokenKind::Identifier,
        TokenKind::Number,
        TokenKind::String,
        TokenKind::CharLiteral,
        TokenKind::Comment,
        TokenKind::MultiLineComment,
        TokenKind::Preprocessor,
        TokenKind::Punctuation,
    ];

    /// Stable name, as used in theme files
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Default => "default",
            TokenKind::Keyword => "keyword",
            TokenKind::Type => "type",
            TokenKind::Builtin => "builtin",
            TokenKind::Function => "function",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::CharLiteral => "char_literal",
            TokenKind::Comment => "comment",
            TokenKind::MultiLineComment => "multi_line_comment",
            TokenKind::Preprocessor => "preprocessor",
            TokenKind::Punctuation => "punctuation",
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::MultiLineComment)
    }
}

/// A classified span within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Start column (0-indexed, in characters)
    pub start: usize,
    /// Length in characters
    pub length: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(start: usize, length: usize, kind: TokenKind) -> Self {
        Self {
            start,
            length,
            kind,
        }
    }

    /// End column (exclusive)
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Tokens for a single line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTokens {
    /// Tokens sorted by start, non-overlapping
    pub tokens: Vec<Token>,
    /// The line finishes inside an unterminated block comment
    pub ends_in_block_comment: bool,
}

impl LineTokens {
    /// Token kind at a column, if any token covers it
    pub fn kind_at(&self, col: usize) -> Option<TokenKind> {
        for token in &self.tokens {
            if col >= token.start && col < token.end() {
                return Some(token.kind);
            }
            if token.start > col {
                break; // tokens are sorted, no need to continue
            }
        }
        None
    }
}

/// Token state for a whole document
#[derive(Debug, Clone, Default)]
pub struct DocumentTokens {
    /// One entry per buffer line
    pub lines: Vec<LineTokens>,
    /// Buffer revision this corresponds to
    pub revision: u64,
    pub language: LanguageId,
}

impl DocumentTokens {
    /// Get tokens for a specific line
    pub fn get_line(&self, line: usize) -> Option<&LineTokens> {
        self.lines.get(line)
    }

    /// Get tokens for a line, or empty slice if none
    pub fn get_line_tokens(&self, line: usize) -> &[Token] {
        self.lines
            .get(line)
            .map(|lt| lt.tokens.as_slice())
            .unwrap_or(&[])
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
