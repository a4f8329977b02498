//! dmscript_scanner: Lexer for DreamMaker-style source code.
//!
//! Produces a pull-based token stream from one compile unit with support for:
//! - GCC-style linemarkers (`# 12 "code/mob.dm" 1`) that remap positions
//! - Tab indentation, surfaced as synthesized block begin/end tokens
//! - Nested block comments and line comments
//! - Double- and single-quoted strings with escapes
//! - Identifiers, optional keyword classification, and punctuation

mod char_codes;
mod directive;
mod error;
mod lexer;
mod token;

pub use directive::Linemarker;
pub use error::{LexError, LexErrorKind};
pub use lexer::{lex_unit, Lexer};
pub use token::{Token, TokenKind, KEYWORDS, PUNCTUATION};

pub use dmscript_options::LexerOptions;
