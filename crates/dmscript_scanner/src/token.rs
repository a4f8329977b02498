//! Tokens produced by the lexer.

use dmscript_core::Span;
use serde::Serialize;
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Indentation increase, or a literal `{`.
    BlockBegin,
    /// Indentation decrease, or a literal `}`.
    BlockEnd,
    Comma,
    Comment,
    Dot,
    Equal,
    Exclamation,
    Ident,
    /// A line break, or a literal `;`.
    Newline,
    ParenL,
    ParenR,
    ShiftL,
    Slash,
    /// `"string"`
    StringDq,
    /// `'string'`
    StringSq,

    KeywordAs,
    KeywordConst,
    KeywordDel,
    KeywordFor,
    KeywordIf,
    KeywordIn,
    KeywordNew,
    KeywordProc,
    KeywordReturn,
    KeywordSet,
    KeywordTmp,
    KeywordVar,
    KeywordVerb,
}

/// Literal punctuation, tried in order. A literal must come before any
/// literal that is a prefix of it.
pub const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("<<", TokenKind::ShiftL),
    ("{", TokenKind::BlockBegin),
    ("}", TokenKind::BlockEnd),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("=", TokenKind::Equal),
    ("!", TokenKind::Exclamation),
    (";", TokenKind::Newline),
    ("(", TokenKind::ParenL),
    (")", TokenKind::ParenR),
    ("/", TokenKind::Slash),
];

/// Reserved words, used when keyword classification is enabled.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("as", TokenKind::KeywordAs),
    ("const", TokenKind::KeywordConst),
    ("del", TokenKind::KeywordDel),
    ("for", TokenKind::KeywordFor),
    ("if", TokenKind::KeywordIf),
    ("in", TokenKind::KeywordIn),
    ("new", TokenKind::KeywordNew),
    ("proc", TokenKind::KeywordProc),
    ("return", TokenKind::KeywordReturn),
    ("set", TokenKind::KeywordSet),
    ("tmp", TokenKind::KeywordTmp),
    ("var", TokenKind::KeywordVar),
    ("verb", TokenKind::KeywordVerb),
];

impl TokenKind {
    /// Look up the keyword spelled `ident`, if any.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == ident)
            .map(|&(_, kind)| kind)
    }

    pub fn is_keyword(self) -> bool {
        KEYWORDS.iter().any(|&(_, kind)| kind == self)
    }

    /// Whether this is a block begin or end marker.
    pub fn is_block(self) -> bool {
        matches!(self, TokenKind::BlockBegin | TokenKind::BlockEnd)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::BlockBegin => "BLOCK_BEGIN",
            TokenKind::BlockEnd => "BLOCK_END",
            TokenKind::Comma => "COMMA",
            TokenKind::Comment => "COMMENT",
            TokenKind::Dot => "DOT",
            TokenKind::Equal => "EQUAL",
            TokenKind::Exclamation => "EXCLAMATION",
            TokenKind::Ident => "IDENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::ParenL => "PAREN_L",
            TokenKind::ParenR => "PAREN_R",
            TokenKind::ShiftL => "SHIFT_L",
            TokenKind::Slash => "SLASH",
            TokenKind::StringDq => "STRING_DQ",
            TokenKind::StringSq => "STRING_SQ",
            TokenKind::KeywordAs => "KEYWORD_AS",
            TokenKind::KeywordConst => "KEYWORD_CONST",
            TokenKind::KeywordDel => "KEYWORD_DEL",
            TokenKind::KeywordFor => "KEYWORD_FOR",
            TokenKind::KeywordIf => "KEYWORD_IF",
            TokenKind::KeywordIn => "KEYWORD_IN",
            TokenKind::KeywordNew => "KEYWORD_NEW",
            TokenKind::KeywordProc => "KEYWORD_PROC",
            TokenKind::KeywordReturn => "KEYWORD_RETURN",
            TokenKind::KeywordSet => "KEYWORD_SET",
            TokenKind::KeywordTmp => "KEYWORD_TMP",
            TokenKind::KeywordVar => "KEYWORD_VAR",
            TokenKind::KeywordVerb => "KEYWORD_VERB",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scanned token.
///
/// Synthesized block markers and NEWLINE tokens have no span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The text of the token (identifiers, string contents, comment bodies).
    pub payload: Option<String>,
    /// Where the token was read from.
    pub span: Option<Span>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            payload: None,
            span: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref payload) = self.payload {
            write!(f, "({:?})", payload)?;
        }
        Ok(())
    }
}
