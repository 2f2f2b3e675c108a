//! Single-pass per-line lexical classifier.
//!
//! The only state carried between lines is whether the previous line ended
//! inside an unterminated block comment.

use tracing::debug;

use super::highlights::{DocumentTokens, LineTokens, Token, TokenKind};
use super::languages::{LanguageId, LanguageProfile};
use crate::editable::TextBuffer;

fn starts_with_at(chars: &[char], i: usize, pat: &str) -> bool {
    let mut idx = i;
    for p in pat.chars() {
        if chars.get(idx) != Some(&p) {
            return false;
        }
        idx += 1;
    }
    true
}

/// Index just past the first occurrence of `pat` at or after `from`
fn find_end_of(chars: &[char], from: usize, pat: &str) -> Option<usize> {
    let len = pat.chars().count();
    (from..chars.len()).find(|&i| starts_with_at(chars, i, pat)).map(|i| i + len)
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// End of a quoted literal starting at `start` (the opening quote), honoring
/// backslash escapes. Unterminated literals run to end of line.
fn scan_quoted(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == '\\' && i + 1 < chars.len() {
            i += 2;
        } else if chars[i] == quote {
            return i + 1;
        } else {
            i += 1;
        }
    }
    chars.len()
}

/// End of a character literal at `start`, or `None` when the quote does not
/// open one (e.g. a Rust lifetime)
fn scan_char_literal(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    match chars.get(i)? {
        '\\' => {
            i += 2;
            while i < chars.len() && chars[i] != '\'' && i - start <= 10 {
                i += 1;
            }
        }
        '\'' => return None,
        _ => i += 1,
    }
    (chars.get(i) == Some(&'\'')).then_some(i + 1)
}

fn scan_number(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() {
        let ch = chars[i];
        let prev = if i > start { Some(chars[i - 1]) } else { None };
        let accept = is_ident_continue(ch)
            || (ch == '.' && chars.get(i + 1) != Some(&'.') && prev != Some('.'))
            || (matches!(ch, '+' | '-')
                && matches!(prev, Some('e' | 'E'))
                && !starts_with_at(chars, start, "0x")
                && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()));
        if !accept {
            break;
        }
        i += 1;
    }
    i
}

/// Classify one line.
pub fn tokenize_line(line: &str, in_block_comment: bool, profile: &LanguageProfile) -> LineTokens {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut in_comment = in_block_comment;
    let mut i = 0;

    let block = profile.block_comment;

    // A preprocessor directive covers the line up to any comment on it
    if let Some(marker) = profile.preprocessor {
        let first = chars.iter().position(|c| !c.is_whitespace());
        if !in_comment && first.is_some_and(|f| chars[f] == marker) {
            let start = first.unwrap_or(0);
            let mut end = start;
            while end < chars.len()
                && !profile.line_comment.is_some_and(|lc| starts_with_at(&chars, end, lc))
                && !block.is_some_and(|(open, _)| starts_with_at(&chars, end, open))
            {
                end += 1;
            }
            tokens.push(Token::new(start, end - start, TokenKind::Preprocessor));
            i = end;
        }
    }

    while i < chars.len() {
        // Block comment continuation
        if in_comment {
            let start = i;
            let close = block.map(|(_, close)| close).unwrap_or("");
            match find_end_of(&chars, i, close) {
                Some(end) if !close.is_empty() => {
                    i = end;
                    in_comment = false;
                }
                _ => i = chars.len(),
            }
            tokens.push(Token::new(start, i - start, TokenKind::MultiLineComment));
            continue;
        }

        let ch = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        // Block comment start (checked before line comments: Lua's `--[[`)
        if let Some((open, close)) = block {
            if starts_with_at(&chars, i, open) {
                let start = i;
                match find_end_of(&chars, i + open.chars().count(), close) {
                    Some(end) => i = end,
                    None => {
                        i = chars.len();
                        in_comment = true;
                    }
                }
                tokens.push(Token::new(start, i - start, TokenKind::MultiLineComment));
                continue;
            }
        }

        // Line comment
        if profile.line_comment.is_some_and(|lc| starts_with_at(&chars, i, lc)) {
            tokens.push(Token::new(i, chars.len() - i, TokenKind::Comment));
            break;
        }

        // String literal
        if ch == '"' || (ch == '\'' && profile.single_quote_strings) {
            let end = scan_quoted(&chars, i, ch);
            tokens.push(Token::new(i, end - i, TokenKind::String));
            i = end;
            continue;
        }

        // Char literal
        if ch == '\'' {
            if let Some(end) = scan_char_literal(&chars, i) {
                tokens.push(Token::new(i, end - i, TokenKind::CharLiteral));
                i = end;
                continue;
            }
        }

        // Number
        if ch.is_ascii_digit()
            || (ch == '.'
                && (i == 0 || chars[i - 1] != '.')
                && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()))
        {
            let end = scan_number(&chars, i);
            tokens.push(Token::new(i, end - i, TokenKind::Number));
            i = end;
            continue;
        }

        // Identifier (keyword, type, builtin, function or plain)
        if is_ident_start(ch) {
            let start = i;
            while i < chars.len() && is_ident_continue(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let kind = profile.classify_word(&word).unwrap_or_else(|| {
                let next = chars[i..].iter().find(|c| !c.is_whitespace());
                if next == Some(&'(') {
                    TokenKind::Function
                } else {
                    TokenKind::Identifier
                }
            });
            tokens.push(Token::new(start, i - start, kind));
            continue;
        }

        tokens.push(Token::new(i, 1, TokenKind::Punctuation));
        i += 1;
    }

    LineTokens {
        tokens,
        ends_in_block_comment: in_comment,
    }
}

/// Whole-document tokenizer for one language
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    language: LanguageId,
}

impl Tokenizer {
    pub fn new(language: LanguageId) -> Self {
        Self { language }
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn set_language(&mut self, language: LanguageId) {
        if self.language != language {
            debug!(
                from = self.language.display_name(),
                to = language.display_name(),
                "language changed"
            );
            self.language = language;
        }
    }

    /// Classify every line, threading block-comment state forward.
    pub fn tokenize(&self, buffer: &TextBuffer, revision: u64) -> DocumentTokens {
        let profile = self.language.profile();
        let mut lines = Vec::with_capacity(buffer.line_count());
        let mut in_block_comment = false;

        for line in buffer.lines() {
            let tokens = if self.language.has_highlighting() {
                tokenize_line(line, in_block_comment, profile)
            } else {
                LineTokens::default()
            };
            in_block_comment = tokens.ends_in_block_comment;
            lines.push(tokens);
        }

        DocumentTokens {
            lines,
            revision,
            language: self.language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str, lang: LanguageId) -> Vec<(String, TokenKind)> {
        let chars: Vec<char> = line.chars().collect();
        tokenize_line(line, false, lang.profile())
            .tokens
            .iter()
            .map(|t| (chars[t.start..t.end()].iter().collect(), t.kind))
            .collect()
    }

    #[test]
    fn test_rust_function_line() {
        let toks = kinds("fn main() -> i32 {", LanguageId::Rust);
        assert_eq!(toks[0], ("fn".to_string(), TokenKind::Keyword));
        assert_eq!(toks[1], ("main".to_string(), TokenKind::Function));
        assert_eq!(toks[2], ("(".to_string(), TokenKind::Punctuation));
        assert!(toks.contains(&("i32".to_string(), TokenKind::Type)));
    }

    #[test]
    fn test_function_after_whitespace() {
        let toks = kinds("call  (x)", LanguageId::C);
        assert_eq!(toks[0], ("call".to_string(), TokenKind::Function));
        assert_eq!(toks[2], ("x".to_string(), TokenKind::Identifier));
    }

    #[test]
    fn test_strings_and_escapes() {
        let toks = kinds(r#"x = "a \" b"; y"#, LanguageId::JavaScript);
        assert_eq!(toks[2], (r#""a \" b""#.to_string(), TokenKind::String));
        assert_eq!(toks[4], ("y".to_string(), TokenKind::Identifier));
    }

    #[test]
    fn test_char_literal_vs_lifetime() {
        let toks = kinds("'a' &'b str", LanguageId::Rust);
        assert_eq!(toks[0], ("'a'".to_string(), TokenKind::CharLiteral));
        assert_eq!(toks[2], ("'".to_string(), TokenKind::Punctuation));
        assert_eq!(toks[3], ("b".to_string(), TokenKind::Identifier));
    }

    #[test]
    fn test_numbers() {
        let toks = kinds("0xFFu8 1.5e-3 0..10", LanguageId::Rust);
        assert_eq!(toks[0], ("0xFFu8".to_string(), TokenKind::Number));
        assert_eq!(toks[1], ("1.5e-3".to_string(), TokenKind::Number));
        assert_eq!(toks[2], ("0".to_string(), TokenKind::Number));
        assert_eq!(toks[5], ("10".to_string(), TokenKind::Number));
    }

    #[test]
    fn test_line_comment() {
        let toks = kinds("x // note", LanguageId::C);
        assert_eq!(toks[1], ("// note".to_string(), TokenKind::Comment));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let profile = LanguageId::C.profile();
        let first = tokenize_line("int x; /* start", false, profile);
        assert!(first.ends_in_block_comment);

        let middle = tokenize_line("still comment", true, profile);
        assert!(middle.ends_in_block_comment);
        assert_eq!(middle.tokens, vec![Token::new(0, 13, TokenKind::MultiLineComment)]);

        let last = tokenize_line("end */ y", true, profile);
        assert!(!last.ends_in_block_comment);
        assert_eq!(last.tokens[0], Token::new(0, 6, TokenKind::MultiLineComment));
        assert_eq!(last.tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_preprocessor() {
        let toks = kinds("  #include <stdio.h> // io", LanguageId::C);
        assert_eq!(toks[0].1, TokenKind::Preprocessor);
        assert_eq!(toks[1], ("// io".to_string(), TokenKind::Comment));
    }

    #[test]
    fn test_lua_comments() {
        let toks = kinds("local x = 1 -- one", LanguageId::Lua);
        assert_eq!(toks[0], ("local".to_string(), TokenKind::Keyword));
        assert_eq!(toks.last().unwrap().1, TokenKind::Comment);

        let block = tokenize_line("--[[ open", false, LanguageId::Lua.profile());
        assert!(block.ends_in_block_comment);
        assert_eq!(block.tokens[0].kind, TokenKind::MultiLineComment);
    }

    #[test]
    fn test_sql_case_insensitive_keywords() {
        let toks = kinds("SELECT name FROM users", LanguageId::Sql);
        assert_eq!(toks[0].1, TokenKind::Keyword);
        assert_eq!(toks[1].1, TokenKind::Identifier);
        assert_eq!(toks[2].1, TokenKind::Keyword);
    }

    #[test]
    fn test_document_threads_comment_state() {
        let buffer = TextBuffer::from_text("a /* b\nc\nd */ e");
        let doc = Tokenizer::new(LanguageId::C).tokenize(&buffer, 7);
        assert_eq!(doc.revision, 7);
        assert_eq!(doc.line_count(), 3);
        assert!(doc.lines[0].ends_in_block_comment);
        assert_eq!(doc.lines[1].tokens[0].kind, TokenKind::MultiLineComment);
        assert!(!doc.lines[2].ends_in_block_comment);
    }

    #[test]
    fn test_plain_text_has_no_tokens() {
        let buffer = TextBuffer::from_text("fn main() {}");
        let doc = Tokenizer::default().tokenize(&buffer, 0);
        assert!(doc.lines[0].tokens.is_empty());
    }
}
