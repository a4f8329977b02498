//! Position and span types for source location tracking.
//!
//! Positions are logical: a preprocessor linemarker can move the lexer to a
//! different unit and line without touching the raw offset it reads from, so
//! a position carries its own unit name instead of an offset into one buffer.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Name of a compile unit. Shared between every position stamped in it.
pub type UnitName = Arc<str>;

/// Number of columns a tab advances by default.
pub const DEFAULT_TAB_WIDTH: u32 = 8;

/// A logical location in a compile unit. Lines and columns are 1-based.
#[derive(Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Position {
    /// The compile unit this position belongs to.
    pub unit: UnitName,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, with tabs counted as `DEFAULT_TAB_WIDTH` columns.
    pub column: u32,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub fn new(unit: impl Into<UnitName>, line: u32, column: u32) -> Self {
        Self {
            unit: unit.into(),
            line,
            column,
        }
    }

    /// The first column of the first line of a unit.
    #[inline]
    pub fn start_of(unit: impl Into<UnitName>) -> Self {
        Self::new(unit, 1, 1)
    }

    /// The position following `ch`, if `ch` is consumed at this position.
    #[inline]
    pub fn advance(&self, ch: char) -> Self {
        self.advance_with_tab_width(ch, DEFAULT_TAB_WIDTH)
    }

    /// Like [`Position::advance`], with a custom tab width.
    pub fn advance_with_tab_width(&self, ch: char, tab_width: u32) -> Self {
        let (line, column) = match ch {
            '\n' => (self.line.saturating_add(1), 1),
            '\t' => (self.line, self.column.saturating_add(tab_width)),
            _ => (self.line, self.column.saturating_add(1)),
        };
        Self {
            unit: Arc::clone(&self.unit),
            line,
            column,
        }
    }

    /// Whether this position is at the first column of its line.
    #[inline]
    pub fn is_line_start(&self) -> bool {
        self.column == 1
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.unit, self.line, self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.unit, self.line, self.column)
    }
}

/// A half-open range `[start, end)` of positions covered by a token.
#[derive(Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Span {
    /// Position of the first character (inclusive).
    pub start: Position,
    /// Position following the last character (exclusive).
    pub end: Position,
}

impl Span {
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whether the span covers no characters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{}:{}", self.start, self.end.line, self.end.column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_plain_character() {
        let pos = Position::start_of("a.dm").advance('x');
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn test_advance_tab() {
        let pos = Position::new("a.dm", 3, 2).advance('\t');
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 10);

        let pos = Position::new("a.dm", 3, 2).advance_with_tab_width('\t', 4);
        assert_eq!(pos.column, 6);
    }

    #[test]
    fn test_advance_newline() {
        let pos = Position::new("a.dm", 3, 17).advance('\n');
        assert_eq!(pos.line, 4);
        assert_eq!(pos.column, 1);
        assert!(pos.is_line_start());
    }

    #[test]
    fn test_advance_saturates() {
        let pos = Position::new("a.dm", u32::MAX, 3).advance('\n');
        assert_eq!(pos.line, u32::MAX);
        assert_eq!(pos.column, 1);

        let pos = Position::new("a.dm", 1, 2).advance_with_tab_width('\t', u32::MAX);
        assert_eq!(pos.column, u32::MAX);
        assert_eq!(pos.advance('x').column, u32::MAX);
    }

    #[test]
    fn test_advance_keeps_unit() {
        let start = Position::start_of("code/world.dm");
        let next = start.advance('a').advance('\n');
        assert_eq!(&*next.unit, "code/world.dm");
        assert!(Arc::ptr_eq(&start.unit, &next.unit));
    }

    #[test]
    fn test_position_display() {
        let pos = Position::new("foo.dm", 5, 9);
        assert_eq!(pos.to_string(), "foo.dm:5:9");
    }

    #[test]
    fn test_span_display() {
        let start = Position::new("foo.dm", 1, 1);
        let end = Position::new("foo.dm", 1, 4);
        let span = Span::new(start.clone(), end);
        assert_eq!(span.to_string(), "[foo.dm:1:1, foo.dm:1:4)");
        assert!(!span.is_empty());
        assert!(Span::new(start.clone(), start).is_empty());
    }
}
