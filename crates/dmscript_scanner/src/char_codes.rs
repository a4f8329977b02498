//! Character constants used by the lexer.

pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const TAB: char = '\t';
pub const SPACE: char = ' ';
pub const HASH: char = '#';
pub const DOUBLE_QUOTE: char = '"';
pub const SINGLE_QUOTE: char = '\'';
pub const BACKSLASH: char = '\\';

/// Check if a character can be part of an identifier.
///
/// Digits are accepted anywhere, including the first character.
#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}
