//! Fatal lexical errors.

use dmscript_core::Position;
use dmscript_diagnostics::{messages, DiagnosticMessage};
use thiserror::Error;

/// What went wrong. Every kind is fatal for the unit being lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    /// A space while the line's leading indentation was still being read.
    BadIndentation,
    /// End of input inside a string literal.
    UnterminatedString,
    /// End of input inside a block comment.
    UnterminatedComment,
    /// A `#` line at column 1 that is not a linemarker.
    MalformedDirective,
    /// No token starts with the current character.
    UnexpectedCharacter,
}

impl LexErrorKind {
    /// The catalogue entry for this kind.
    pub fn message(self) -> &'static DiagnosticMessage {
        match self {
            LexErrorKind::BadIndentation => &messages::INDENTATION_MUST_USE_TABS,
            LexErrorKind::UnterminatedString => &messages::UNTERMINATED_STRING_LITERAL,
            LexErrorKind::UnterminatedComment => &messages::UNTERMINATED_BLOCK_COMMENT,
            LexErrorKind::MalformedDirective => &messages::MALFORMED_DIRECTIVE,
            LexErrorKind::UnexpectedCharacter => &messages::UNEXPECTED_CHARACTER,
        }
    }
}

/// A fatal lexical error with its resolved message and location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {message}")]
pub struct LexError {
    kind: LexErrorKind,
    message: String,
    position: Position,
}

impl LexError {
    pub fn new(kind: LexErrorKind, args: &[&str], position: Position) -> Self {
        Self {
            kind,
            message: kind.message().format(args),
            position,
        }
    }

    pub fn kind(&self) -> LexErrorKind {
        self.kind
    }

    /// The message text, without the position.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn code(&self) -> u32 {
        self.kind.message().code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LexError::new(
            LexErrorKind::UnexpectedCharacter,
            &["@"],
            Position::new("b.dm", 2, 1),
        );
        assert_eq!(err.message(), "Unexpected character '@'.");
        assert_eq!(err.to_string(), "b.dm:2:1: Unexpected character '@'.");
        assert_eq!(err.code(), 1005);
    }

    #[test]
    fn test_every_kind_is_an_error() {
        for kind in [
            LexErrorKind::BadIndentation,
            LexErrorKind::UnterminatedString,
            LexErrorKind::UnterminatedComment,
            LexErrorKind::MalformedDirective,
            LexErrorKind::UnexpectedCharacter,
        ] {
            assert_eq!(
                kind.message().category,
                dmscript_diagnostics::DiagnosticCategory::Error
            );
        }
    }
}
