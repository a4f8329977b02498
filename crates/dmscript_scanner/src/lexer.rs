//! The DreamMaker lexer.
//!
//! A pull-based state machine over one compile unit. Each call to
//! [`Lexer::next_token`] either drains the backlog or runs one scan step,
//! which consumes linemarkers, then leading whitespace and comments, then
//! one token. A scan step can queue more than one token: the first real
//! token of a line is preceded by however many block markers its
//! indentation implies.

use std::collections::VecDeque;

use dmscript_core::{Position, Span, UnitName};
use dmscript_diagnostics::DiagnosticSink;
use dmscript_options::LexerOptions;
use memchr::memchr;
use tracing::{debug, trace};

use crate::char_codes::*;
use crate::directive::Linemarker;
use crate::error::{LexError, LexErrorKind};
use crate::token::{Token, TokenKind, PUNCTUATION};

/// Converts the text of one compile unit into tokens.
pub struct Lexer<'src, 'diag> {
    /// The source text being scanned.
    text: &'src str,
    /// Byte offset of the next character.
    pos: usize,
    /// Logical position of the next character.
    next_point: Position,
    /// Tabs seen at the start of the current line, or `None` once the
    /// line's first token has resolved them.
    indent: Option<u32>,
    /// Currently open block depth.
    last_indent: u32,
    /// Tokens scanned but not yet handed out.
    backlog: VecDeque<Token>,
    /// Whether the last queued token was a NEWLINE.
    after_newline: bool,
    /// Set once end of input has been reported.
    finished: bool,
    /// The error that stopped this lexer, if any.
    failed: Option<LexError>,
    options: LexerOptions,
    diagnostics: &'diag mut dyn DiagnosticSink,
}

impl<'src, 'diag> Lexer<'src, 'diag> {
    /// Create a lexer with default options.
    pub fn new(
        unit: impl Into<UnitName>,
        text: &'src str,
        diagnostics: &'diag mut dyn DiagnosticSink,
    ) -> Self {
        Self::with_options(unit, text, LexerOptions::default(), diagnostics)
    }

    pub fn with_options(
        unit: impl Into<UnitName>,
        text: &'src str,
        options: LexerOptions,
        diagnostics: &'diag mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            text,
            pos: 0,
            next_point: Position::start_of(unit),
            indent: Some(0),
            last_indent: 0,
            backlog: VecDeque::new(),
            after_newline: false,
            finished: false,
            failed: None,
            options,
            diagnostics,
        }
    }

    /// Logical position of the next unread character.
    pub fn position(&self) -> &Position {
        &self.next_point
    }

    /// Currently open block depth.
    pub fn depth(&self) -> u32 {
        self.last_indent
    }

    /// Get the next token, or `None` at end of input.
    ///
    /// Errors are fatal: the sink has been told, and every later call
    /// returns the same error.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if let Some(ref err) = self.failed {
            return Err(err.clone());
        }
        loop {
            if let Some(token) = self.backlog.pop_front() {
                return Ok(Some(token));
            }
            if self.finished {
                return Ok(None);
            }
            if let Err(err) = self.scan() {
                self.diagnostics.report(err.message(), err.position());
                self.failed = Some(err.clone());
                return Err(err);
            }
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn at(&self, literal: &str) -> bool {
        self.text[self.pos..].starts_with(literal)
    }

    /// Consume one character, advancing the logical position.
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        self.next_point = self
            .next_point
            .advance_with_tab_width(ch, self.options.effective_tab_width());
        Some(ch)
    }

    /// Consume characters up to byte offset `end`.
    fn bump_to(&mut self, end: usize) {
        while self.pos < end && self.bump().is_some() {}
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.at(literal) {
            self.bump_to(self.pos + literal.len());
            true
        } else {
            false
        }
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.next_point.clone())
    }

    /// Run one scan step, queueing zero or more tokens.
    fn scan(&mut self) -> Result<(), LexError> {
        self.consume_linemarkers()?;

        while let Some(ch) = self.peek() {
            let start = self.next_point.clone();
            match ch {
                LINE_FEED => {
                    self.bump();
                    self.indent = Some(0);
                    self.queue_newline();
                    return Ok(());
                }
                '/' if self.at("/*") => {
                    let comment = self.scan_block_comment(start.clone())?;
                    self.emit(TokenKind::Comment, start, Some(comment.to_string()));
                    return Ok(());
                }
                '/' if self.at("//") => {
                    let comment = self.scan_line_comment();
                    self.emit(TokenKind::Comment, start, Some(comment.to_string()));
                    return Ok(());
                }
                SPACE => {
                    if self.indent.is_some() {
                        return Err(LexError::new(LexErrorKind::BadIndentation, &[], start));
                    }
                    self.bump();
                }
                TAB => {
                    self.bump();
                    if let Some(ref mut depth) = self.indent {
                        *depth += 1;
                    }
                }
                CARRIAGE_RETURN => {
                    self.bump();
                }
                _ => break,
            }
        }

        let Some(ch) = self.peek() else {
            self.finish();
            return Ok(());
        };
        let start = self.next_point.clone();

        if ch == DOUBLE_QUOTE || ch == SINGLE_QUOTE {
            let literal = self.scan_string(ch)?;
            let kind = if ch == DOUBLE_QUOTE {
                TokenKind::StringDq
            } else {
                TokenKind::StringSq
            };
            self.emit(kind, start, Some(literal));
            return Ok(());
        }

        if is_identifier_part(ch) {
            let ident = self.scan_identifier();
            let kind = if self.options.keywords {
                TokenKind::keyword(ident).unwrap_or(TokenKind::Ident)
            } else {
                TokenKind::Ident
            };
            self.emit(kind, start, Some(ident.to_string()));
            return Ok(());
        }

        for &(literal, kind) in PUNCTUATION {
            if self.eat(literal) {
                if kind == TokenKind::Newline {
                    self.queue_newline();
                } else {
                    self.emit(kind, start, None);
                }
                return Ok(());
            }
        }

        Err(LexError::new(
            LexErrorKind::UnexpectedCharacter,
            &[&ch.to_string()],
            start,
        ))
    }

    /// Strip linemarkers at the start of a line and move the logical
    /// position to wherever they point.
    fn consume_linemarkers(&mut self) -> Result<(), LexError> {
        let text = self.text;
        while self.next_point.is_line_start() && self.peek() == Some(HASH) {
            let line_end = memchr(b'\n', &text.as_bytes()[self.pos..])
                .map_or(text.len(), |offset| self.pos + offset);
            let directive = &text[self.pos..line_end];

            let Some(marker) = Linemarker::parse(directive) else {
                return Err(LexError::new(
                    LexErrorKind::MalformedDirective,
                    &[directive.trim_end()],
                    self.next_point.clone(),
                ));
            };
            debug!(
                from = %self.next_point,
                unit = %marker.unit,
                line = marker.line,
                flags = ?marker.flags,
                "linemarker"
            );

            let unit: UnitName = if *self.next_point.unit == *marker.unit {
                self.next_point.unit.clone()
            } else {
                marker.unit.into()
            };
            self.pos = (line_end + 1).min(text.len());
            self.next_point = Position::new(unit, marker.line, 1);
        }
        Ok(())
    }

    /// Scan a block comment starting at `/*`, returning its interior.
    /// Nested comments are kept verbatim in the interior.
    fn scan_block_comment(&mut self, start: Position) -> Result<&'src str, LexError> {
        let text = self.text;
        self.eat("/*");
        let interior_start = self.pos;
        let mut depth = 1u32;
        loop {
            if self.eat("/*") {
                depth += 1;
                continue;
            }
            let interior_end = self.pos;
            if self.eat("*/") {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[interior_start..interior_end]);
                }
                continue;
            }
            if self.bump().is_none() {
                return Err(LexError::new(LexErrorKind::UnterminatedComment, &[], start));
            }
        }
    }

    /// Scan a line comment starting at `//`, returning the rest of the
    /// line without its line feed.
    fn scan_line_comment(&mut self) -> &'src str {
        let text = self.text;
        self.eat("//");
        let interior_start = self.pos;
        let line_end = memchr(b'\n', &text.as_bytes()[interior_start..])
            .map_or(text.len(), |offset| interior_start + offset);
        self.bump_to(line_end);
        &text[interior_start..line_end]
    }

    /// Scan a string literal delimited by `quote`, resolving escapes.
    fn scan_string(&mut self, quote: char) -> Result<String, LexError> {
        self.bump(); // skip opening quote
        let mut literal = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(self.unterminated_string());
            };
            match ch {
                c if c == quote => return Ok(literal),
                BACKSLASH => match self.bump() {
                    Some('t') => literal.push('\t'),
                    Some('n') => literal.push('\n'),
                    Some(escaped) => literal.push(escaped),
                    None => return Err(self.unterminated_string()),
                },
                c => literal.push(c),
            }
        }
    }

    fn unterminated_string(&self) -> LexError {
        LexError::new(
            LexErrorKind::UnterminatedString,
            &[],
            self.next_point.clone(),
        )
    }

    fn scan_identifier(&mut self) -> &'src str {
        let text = self.text;
        let ident_start = self.pos;
        while self.peek().is_some_and(is_identifier_part) {
            self.bump();
        }
        &text[ident_start..self.pos]
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Queue a scanned token, preceded by the block markers its line's
    /// indentation calls for if it is the first token on the line.
    fn emit(&mut self, kind: TokenKind, start: Position, payload: Option<String>) {
        if let Some(depth) = self.indent.take() {
            self.synthesize_blocks(depth);
        }
        if kind == TokenKind::Comment && !self.options.emit_comments {
            return;
        }
        let span = self.span_from(start);
        let token = Token::new(kind).with_span(span);
        self.push(match payload {
            Some(payload) => token.with_payload(payload),
            None => token,
        });
    }

    fn synthesize_blocks(&mut self, depth: u32) {
        if depth != self.last_indent {
            trace!(from = self.last_indent, to = depth, at = %self.next_point, "block depth");
        }
        while self.last_indent < depth {
            self.push(Token::new(TokenKind::BlockBegin));
            self.last_indent += 1;
        }
        while self.last_indent > depth {
            self.push(Token::new(TokenKind::BlockEnd));
            self.last_indent -= 1;
        }
    }

    /// NEWLINE never touches the block depth and carries no span.
    fn queue_newline(&mut self) {
        if self.options.collapse_newlines && self.after_newline {
            return;
        }
        self.push(Token::new(TokenKind::Newline));
    }

    fn push(&mut self, token: Token) {
        self.after_newline = token.kind == TokenKind::Newline;
        self.backlog.push_back(token);
    }

    fn finish(&mut self) {
        if self.options.close_blocks_at_eof {
            self.synthesize_blocks(0);
        }
        self.finished = true;
        debug!(unit = %self.next_point.unit, end = %self.next_point, "end of input");
    }
}

impl Iterator for Lexer<'_, '_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed.is_some() {
            return None;
        }
        self.next_token().transpose()
    }
}

/// Lex a whole unit, stopping at the first error.
pub fn lex_unit(
    unit: &str,
    text: &str,
    options: &LexerOptions,
    diagnostics: &mut dyn DiagnosticSink,
) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::with_options(unit, text, options.clone(), diagnostics)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(unit, tokens = tokens.len(), "unit lexed");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmscript_diagnostics::DiagnosticCollection;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut sink = DiagnosticCollection::new();
        let tokens = lex_unit("test.dm", source, &LexerOptions::default(), &mut sink).unwrap();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source() {
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds(", . = ! ( ) << / { }"),
            vec![
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Equal,
                TokenKind::Exclamation,
                TokenKind::ParenL,
                TokenKind::ParenR,
                TokenKind::ShiftL,
                TokenKind::Slash,
                TokenKind::BlockBegin,
                TokenKind::BlockEnd,
            ]
        );
    }

    #[test]
    fn test_shift_not_split() {
        assert_eq!(kinds("a<<b"), vec![TokenKind::Ident, TokenKind::ShiftL, TokenKind::Ident]);
    }

    #[test]
    fn test_semicolon_is_newline_without_span() {
        let mut sink = DiagnosticCollection::new();
        let mut lexer = Lexer::new("test.dm", "a;b", &mut sink);
        assert_eq!(lexer.next_token().unwrap().unwrap().kind, TokenKind::Ident);
        let newline = lexer.next_token().unwrap().unwrap();
        assert_eq!(newline, Token::new(TokenKind::Newline));
        assert_eq!(lexer.next_token().unwrap().unwrap().payload(), Some("b"));
        assert_eq!(lexer.next_token().unwrap(), None);
        assert_eq!(lexer.next_token().unwrap(), None);
    }

    #[test]
    fn test_semicolon_keeps_line_indentation() {
        assert_eq!(
            kinds("a\n\tb;c\n\td"),
            vec![
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::BlockBegin,
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::BlockEnd,
            ]
        );
    }

    #[test]
    fn test_carriage_returns_discarded() {
        assert_eq!(
            kinds("a\r\nb\r\n"),
            vec![TokenKind::Ident, TokenKind::Newline, TokenKind::Ident, TokenKind::Newline]
        );
    }

    #[test]
    fn test_position_tracking() {
        let mut sink = DiagnosticCollection::new();
        let mut lexer = Lexer::new("test.dm", "ab\tcd", &mut sink);
        let first = lexer.next_token().unwrap().unwrap();
        let span = first.span.unwrap();
        assert_eq!(span.start, Position::new("test.dm", 1, 1));
        assert_eq!(span.end, Position::new("test.dm", 1, 3));
        let second = lexer.next_token().unwrap().unwrap();
        assert_eq!(second.span.unwrap().start, Position::new("test.dm", 1, 11));
        assert_eq!(lexer.position(), &Position::new("test.dm", 1, 13));
    }

    #[test]
    fn test_custom_tab_width() {
        let mut sink = DiagnosticCollection::new();
        let options = LexerOptions {
            tab_width: 4,
            ..LexerOptions::default()
        };
        let mut lexer = Lexer::with_options("test.dm", "a\tb", options, &mut sink);
        lexer.next_token().unwrap();
        let b = lexer.next_token().unwrap().unwrap();
        assert_eq!(b.span.unwrap().start.column, 6);
    }

    #[test]
    fn test_depth_follows_indentation() {
        let mut sink = DiagnosticCollection::new();
        let mut lexer = Lexer::new("test.dm", "a\n\t\tb", &mut sink);
        assert_eq!(lexer.depth(), 0);
        while let Some(token) = lexer.next_token().unwrap() {
            if token.payload() == Some("b") {
                assert_eq!(lexer.depth(), 2);
            }
        }
        assert_eq!(lexer.depth(), 0);
    }

    #[test]
    fn test_error_is_sticky_and_reported_once() {
        let mut sink = DiagnosticCollection::new();
        let mut lexer = Lexer::new("test.dm", "a $ b", &mut sink);
        assert!(lexer.next_token().unwrap().is_some());
        let first = lexer.next_token().unwrap_err();
        let second = lexer.next_token().unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first.kind(), LexErrorKind::UnexpectedCharacter);
        drop(lexer);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_iterator_fuses_after_error() {
        let mut sink = DiagnosticCollection::new();
        let mut lexer = Lexer::new("test.dm", "a @", &mut sink);
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }
}
