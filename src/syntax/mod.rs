//! Syntax highlighting module
//!
//! Provides lexical (not grammar-based) highlighting with:
//! - Language detection from file extensions
//! - Static keyword/type/builtin profiles per language
//! - Whole-document re-tokenization after each edit
//!
//! ## Architecture
//!
//! ```text
//! Edit → TextEditor::refresh_derived → Tokenizer::tokenize
//!      → tokenize_line (per line, block-comment state threaded forward)
//!      → DocumentTokens (read by the host renderer)
//! ```

mod highlights;
mod languages;
mod tokenizer;

pub use highlights::{DocumentTokens, LineTokens, Token, TokenKind};
pub use languages::{LanguageId, LanguageProfile};
pub use tokenizer::{tokenize_line, Tokenizer};
