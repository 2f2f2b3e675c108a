//! Utility modules

pub mod text;

pub use text::{char_type, is_identifier_char, is_punctuation, CharType};
