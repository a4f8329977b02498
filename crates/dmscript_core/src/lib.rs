//! dmscript_core: Core types shared by the dmscript lexer crates.
//!
//! Provides the source positions and spans that tokens and diagnostics
//! are stamped with.

pub mod text;

// Re-export commonly used types
pub use text::{Position, Span, UnitName, DEFAULT_TAB_WIDTH};
