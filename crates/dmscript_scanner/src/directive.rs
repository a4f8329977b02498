//! Preprocessor linemarkers.
//!
//! The lexer usually runs over the output of a C-style preprocessor, which
//! concatenates included files and marks each transition with a line like
//!
//! ```text
//! # 42 "code/mob.dm" 2
//! ```
//!
//! meaning "the next line is line 42 of code/mob.dm". The trailing integers
//! are GCC's flags (1 = entering a file, 2 = returning to one, 3 = system
//! header, 4 = implicit extern "C"); there may be none or several.

use regex::Regex;
use std::sync::OnceLock;

/// A parsed linemarker directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linemarker {
    /// Line number of the line following the directive.
    pub line: u32,
    /// Unit the following lines belong to.
    pub unit: String,
    /// Trailing flags, in source order.
    pub flags: Vec<u32>,
}

fn linemarker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^#[ \t]*(\d+)[ \t]+"([^"]+)"((?:[ \t]+\d+)*)[ \t]*\r?$"#)
            .expect("linemarker pattern is valid")
    })
}

impl Linemarker {
    /// Parse one directive line (without its line feed).
    ///
    /// Returns `None` when the line is not a linemarker or a number in it
    /// does not fit in a `u32`.
    pub fn parse(directive: &str) -> Option<Self> {
        let caps = linemarker_regex().captures(directive)?;
        let line = caps[1].parse().ok()?;
        let unit = caps[2].to_string();
        let flags = caps[3]
            .split_ascii_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<u32>, _>>()
            .ok()?;
        Some(Self { line, unit, flags })
    }
}
