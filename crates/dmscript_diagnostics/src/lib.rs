//! dmscript_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! The lexer never renders anything itself. It hands `(message, position)`
//! pairs to a [`DiagnosticSink`] supplied by whoever drives it, and the
//! catalogue in [`messages`] holds the text and code of every lexical error.

use dmscript_core::Position;
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1002).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

impl DiagnosticMessage {
    /// Resolve the template against `args`.
    pub fn format(&self, args: &[&str]) -> String {
        format_message(self.message, args)
    }
}

/// Receives lexical diagnostics as they happen.
///
/// Implementations decide how (and whether) to render them. The lexer calls
/// `report` exactly once before it gives up on a unit.
pub trait DiagnosticSink {
    fn report(&mut self, message: &str, position: &Position);
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Where the diagnostic occurred, if anywhere.
    pub position: Option<Position>,
    /// The resolved message text.
    pub message_text: String,
    /// The diagnostic code, when it came from the catalogue.
    pub code: Option<u32>,
    /// The category.
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            position: None,
            message_text: message.format(args),
            code: Some(message.code),
            category: message.category,
        }
    }

    /// Create a new diagnostic at a position.
    pub fn with_position(position: Position, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            position: Some(position),
            ..Self::new(message, args)
        }
    }

    /// An error reported through a [`DiagnosticSink`], which carries no code.
    pub fn reported(message: &str, position: &Position) -> Self {
        Self {
            position: Some(position.clone()),
            message_text: message.to_string(),
            code: None,
            category: DiagnosticCategory::Error,
        }
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref position) = self.position {
            write!(f, "{}: ", position)?;
        }
        write!(f, "{}", self.category)?;
        if let Some(code) = self.code {
            write!(f, " DM{}", code)?;
        }
        write!(f, ": {}", self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated while lexing.
///
/// This is also the simplest [`DiagnosticSink`]: it records every report.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn report(&mut self, message: &str, position: &Position) {
        self.add(Diagnostic::reported(message, position));
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Lexer errors (1000-1099)
    // ========================================================================
    pub const INDENTATION_MUST_USE_TABS: DiagnosticMessage = diag!(1001, Error, "Spaces are not allowed for indentation. Please use tabs.");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Reached end of input while scanning a string literal.");
    pub const UNTERMINATED_BLOCK_COMMENT: DiagnosticMessage = diag!(1003, Error, "Reached end of input while scanning a block comment; '*/' expected.");
    pub const MALFORMED_DIRECTIVE: DiagnosticMessage = diag!(1004, Error, "Malformed preprocessor directive '{0}'.");
    pub const UNEXPECTED_CHARACTER: DiagnosticMessage = diag!(1005, Error, "Unexpected character '{0}'.");

    // ========================================================================
    // Driver messages (2000-2099)
    // ========================================================================
    pub const UNIT_HAS_NO_TOKENS: DiagnosticMessage = diag!(2001, Warning, "Unit '{0}' produced no tokens.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("Unexpected character '{0}'.", &["@"]), "Unexpected character '@'.");
        assert_eq!(format_message("{0} and {1}", &["a", "b"]), "a and b");
        assert_eq!(format_message("no args", &[]), "no args");
    }

    #[test]
    fn test_diagnostic_display() {
        let pos = Position::new("foo.dm", 2, 1);
        let diag = Diagnostic::with_position(pos, &messages::UNEXPECTED_CHARACTER, &["$"]);
        assert_eq!(diag.to_string(), "foo.dm:2:1: error DM1005: Unexpected character '$'.");

        let diag = Diagnostic::new(&messages::UNIT_HAS_NO_TOKENS, &["empty.dm"]);
        assert!(!diag.is_error());
        assert_eq!(diag.to_string(), "warning DM2001: Unit 'empty.dm' produced no tokens.");
    }

    #[test]
    fn test_collection_as_sink() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());

        let sink: &mut dyn DiagnosticSink = &mut collection;
        sink.report("Unexpected character '$'.", &Position::new("a.dm", 1, 3));

        assert_eq!(collection.len(), 1);
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 1);
        let diag = &collection.diagnostics()[0];
        assert_eq!(diag.code, None);
        assert_eq!(diag.to_string(), "a.dm:1:3: error: Unexpected character '$'.");

        collection.add(Diagnostic::new(&messages::UNIT_HAS_NO_TOKENS, &["b.dm"]));
        assert_eq!(collection.error_count(), 1);
        collection.clear();
        assert!(collection.into_diagnostics().is_empty());
    }
}
