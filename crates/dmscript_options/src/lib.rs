//! dmscript_options: dmlex.json parsing and lexer options.
//!
//! A project file looks like:
//!
//! ```json
//! {
//!   "lexerOptions": { "emitComments": false, "keywords": true },
//!   "files": ["code/world.dm"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default name of the project file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dmlex.json";

/// Largest accepted `tabWidth`.
pub const MAX_TAB_WIDTH: u32 = 64;

/// Options controlling what the lexer emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LexerOptions {
    /// Emit COMMENT tokens. When off, comments are dropped after they have
    /// resolved the indentation of their line.
    pub emit_comments: bool,
    /// Drop a NEWLINE that directly follows another NEWLINE.
    pub collapse_newlines: bool,
    /// Classify reserved words as keyword tokens instead of identifiers.
    pub keywords: bool,
    /// Columns a tab advances.
    pub tab_width: u32,
    /// Close every open indentation block at end of input.
    pub close_blocks_at_eof: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
            collapse_newlines: false,
            keywords: false,
            tab_width: 8,
            close_blocks_at_eof: true,
        }
    }
}

impl LexerOptions {
    /// The tab width the lexer actually uses, clamped to `1..=MAX_TAB_WIDTH`
    /// so a tab always moves off the first column.
    pub fn effective_tab_width(&self) -> u32 {
        self.tab_width.clamp(1, MAX_TAB_WIDTH)
    }
}

/// The dmlex.json file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub lexer_options: LexerOptions,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file")]
    Parse(#[from] serde_json::Error),
    #[error("tabWidth must be between 1 and {MAX_TAB_WIDTH}, got {0}")]
    TabWidthOutOfRange(u32),
}

impl ProjectConfig {
    /// Resolve `files` relative to the directory holding the project file.
    pub fn resolve_files(&self, config_path: &Path) -> Vec<PathBuf> {
        let root = config_path.parent().unwrap_or_else(|| Path::new("."));
        self.files.iter().map(|f| root.join(f)).collect()
    }
}

/// Parse a dmlex.json file from a string.
pub fn parse_config(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig = serde_json::from_str(content)?;
    let tab_width = config.lexer_options.tab_width;
    if !(1..=MAX_TAB_WIDTH).contains(&tab_width) {
        return Err(ConfigError::TabWidthOutOfRange(tab_width));
    }
    Ok(config)
}

/// Parse a dmlex.json file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<ProjectConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LexerOptions::default();
        assert!(options.emit_comments);
        assert!(!options.collapse_newlines);
        assert!(!options.keywords);
        assert_eq!(options.tab_width, 8);
        assert!(options.close_blocks_at_eof);
    }

    #[test]
    fn test_parse_empty_object() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.lexer_options, LexerOptions::default());
        assert!(config.files.is_empty());
    }

    #[test]
    fn test_parse_partial_options() {
        let config = parse_config(
            r#"{ "lexerOptions": { "emitComments": false, "tabWidth": 4 }, "files": ["a.dm", "b.dm"] }"#,
        )
        .unwrap();
        assert!(!config.lexer_options.emit_comments);
        assert_eq!(config.lexer_options.tab_width, 4);
        assert!(config.lexer_options.close_blocks_at_eof);
        assert_eq!(config.files, vec!["a.dm", "b.dm"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = parse_config(r#"{ "lexerOptions": { "emitComment": false } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_tab_width_bounds() {
        let err = parse_config(r#"{ "lexerOptions": { "tabWidth": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::TabWidthOutOfRange(0)));

        let err = parse_config(r#"{ "lexerOptions": { "tabWidth": 4294967295 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::TabWidthOutOfRange(u32::MAX)));

        let config = parse_config(r#"{ "lexerOptions": { "tabWidth": 64 } }"#).unwrap();
        assert_eq!(config.lexer_options.tab_width, MAX_TAB_WIDTH);
    }

    #[test]
    fn test_effective_tab_width_clamps() {
        let mut options = LexerOptions::default();
        assert_eq!(options.effective_tab_width(), 8);
        options.tab_width = 0;
        assert_eq!(options.effective_tab_width(), 1);
        options.tab_width = u32::MAX;
        assert_eq!(options.effective_tab_width(), MAX_TAB_WIDTH);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file("does/not/exist/dmlex.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist/dmlex.json"));
    }

    #[test]
    fn test_resolve_files() {
        let config = parse_config(r#"{ "files": ["code/world.dm"] }"#).unwrap();
        let files = config.resolve_files(Path::new("project/dmlex.json"));
        assert_eq!(files, vec![PathBuf::from("project/code/world.dm")]);
    }
}
