//! Terminal rendering of diagnostics.

use dmscript_core::Position;
use dmscript_diagnostics::{Diagnostic, DiagnosticSink};
use std::io::IsTerminal;

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Writes diagnostics to stderr as they are reported.
#[derive(Debug, Default)]
pub struct TerminalReporter {
    use_color: bool,
    errors: usize,
}

impl TerminalReporter {
    /// Color is used only when `pretty` is set and stderr is a terminal.
    pub fn new(pretty: bool) -> Self {
        Self {
            use_color: pretty && std::io::stderr().is_terminal(),
            errors: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Render a catalogued diagnostic, e.g. a warning raised by the driver.
    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        if diagnostic.is_error() {
            self.errors += 1;
        }
        eprintln!("{}", self.render_diagnostic(diagnostic));
    }

    /// Render a plain driver failure that has no position.
    pub fn error(&mut self, message: &str) {
        self.errors += 1;
        if self.use_color {
            eprintln!("{BOLD}{RED}error{RESET}: {message}");
        } else {
            eprintln!("error: {message}");
        }
    }

    pub fn summary(&self) -> Option<String> {
        if self.errors == 0 {
            return None;
        }
        let plural = if self.errors == 1 { "" } else { "s" };
        let text = format!("Found {} error{}.", self.errors, plural);
        Some(if self.use_color {
            format!("{RED}{text}{RESET}")
        } else {
            text
        })
    }

    fn render_lex_error(&self, message: &str, position: &Position) -> String {
        if self.use_color {
            format!("{BOLD}{RED}Lex error{RESET} at {CYAN}{position}{RESET}: {message}")
        } else {
            format!("Lex error at {position}: {message}")
        }
    }

    fn render_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        if !self.use_color {
            return diagnostic.to_string();
        }
        let color = if diagnostic.is_error() { RED } else { YELLOW };
        let mut out = String::new();
        if let Some(ref position) = diagnostic.position {
            out.push_str(&format!("{CYAN}{position}{RESET}: "));
        }
        out.push_str(&format!("{BOLD}{color}{}{RESET}", diagnostic.category));
        if let Some(code) = diagnostic.code {
            out.push_str(&format!(" {CYAN}DM{code}{RESET}"));
        }
        out.push_str(&format!(": {}", diagnostic.message_text));
        out
    }
}

impl DiagnosticSink for TerminalReporter {
    fn report(&mut self, message: &str, position: &Position) {
        self.errors += 1;
        eprintln!("{}", self.render_lex_error(message, position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmscript_diagnostics::messages;

    fn plain() -> TerminalReporter {
        TerminalReporter::default()
    }

    #[test]
    fn test_lex_error_line() {
        let reporter = plain();
        let position = Position::new("code/mob.dm", 4, 9);
        assert_eq!(
            reporter.render_lex_error("Unexpected character '@'.", &position),
            "Lex error at code/mob.dm:4:9: Unexpected character '@'."
        );
    }

    #[test]
    fn test_plain_diagnostic_uses_display() {
        let reporter = plain();
        let diagnostic = Diagnostic::new(&messages::UNIT_HAS_NO_TOKENS, &["empty.dm"]);
        assert_eq!(
            reporter.render_diagnostic(&diagnostic),
            "warning DM2001: Unit 'empty.dm' produced no tokens."
        );
    }

    #[test]
    fn test_error_counting() {
        let mut reporter = plain();
        assert_eq!(reporter.summary(), None);

        reporter.report("bad", &Position::new("a.dm", 1, 1));
        reporter.emit(&Diagnostic::new(&messages::UNIT_HAS_NO_TOKENS, &["b.dm"]));
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.summary().as_deref(), Some("Found 1 error."));

        reporter.error("cannot read c.dm");
        assert_eq!(reporter.summary().as_deref(), Some("Found 2 errors."));
    }
}
