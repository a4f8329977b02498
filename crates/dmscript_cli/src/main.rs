//! dmlex: tokenize preprocessed DreamMaker sources.
//!
//! Usage:
//!   dmlex [options] [file...]
//!
//! Without file arguments the `files` list of `dmlex.json` (or the project
//! given with `-p`) is lexed. Tokens go to stdout, diagnostics to stderr.

mod logging;
mod reporter;

use clap::{Parser as ClapParser, ValueEnum};
use dmscript_diagnostics::{messages, Diagnostic};
use dmscript_options::{parse_config_file, LexerOptions, DEFAULT_CONFIG_FILE, MAX_TAB_WIDTH};
use dmscript_scanner::{lex_unit, Token};
use miette::{IntoDiagnostic, WrapErr};
use reporter::TerminalReporter;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

#[derive(ClapParser, Debug)]
#[command(name = "dmlex", about = "Tokenize preprocessed DreamMaker source files")]
struct Cli {
    /// Preprocessed .dm files to lex.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Path to a dmlex.json project file.
    #[arg(short = 'p', long = "project")]
    project: Option<String>,

    /// Token output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Drop comment tokens.
    #[arg(long = "no-comments")]
    no_comments: bool,

    /// Emit a single NEWLINE for a run of blank lines.
    #[arg(long = "collapse-newlines")]
    collapse_newlines: bool,

    /// Classify reserved words as keyword tokens.
    #[arg(long)]
    keywords: bool,

    /// Columns a tab advances.
    #[arg(long = "tab-width", value_parser = clap::value_parser!(u32).range(1..=MAX_TAB_WIDTH as i64))]
    tab_width: Option<u32>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    /// Disable colored diagnostics.
    #[arg(long = "no-color")]
    no_color: bool,

    /// Log lexer activity at debug level (overridden by RUST_LOG).
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Tokens of one successfully lexed unit.
#[derive(Debug, Serialize)]
struct UnitTokens {
    unit: String,
    tokens: Vec<Token>,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut reporter = TerminalReporter::new(!cli.no_color);
    let (files, options) = resolve_inputs(&cli)?;
    if files.is_empty() {
        reporter.error("No input files found.");
        process::exit(1);
    }
    debug!(files = files.len(), ?options, "lexing");

    let mut units = Vec::with_capacity(files.len());

    for path in &files {
        let text = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
        let unit = path.to_string_lossy().into_owned();

        match lex_unit(&unit, &text, &options, &mut reporter) {
            Ok(tokens) => {
                if tokens.is_empty() {
                    reporter.emit(&Diagnostic::new(&messages::UNIT_HAS_NO_TOKENS, &[&unit]));
                }
                units.push(UnitTokens { unit, tokens });
            }
            Err(err) => {
                // Already rendered by the reporter.
                debug!(kind = ?err.kind(), "unit '{}' failed", unit);
            }
        }
    }

    write_units(&units, cli.format, cli.pretty)?;

    if let Some(summary) = reporter.summary() {
        eprintln!("\n{summary}");
    }
    if reporter.error_count() > 0 {
        process::exit(2);
    }
    Ok(())
}

/// Work out which files to lex and with which options.
///
/// File arguments replace the project's `files` list; option flags override
/// the project's `lexerOptions`.
fn resolve_inputs(cli: &Cli) -> miette::Result<(Vec<PathBuf>, LexerOptions)> {
    let config_path = match cli.project {
        Some(ref project) => Some(PathBuf::from(project)),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            default.exists().then(|| default.to_path_buf())
        }
    };

    let (mut options, mut files) = match config_path {
        Some(ref path) => {
            let config = parse_config_file(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to load project '{}'", path.display()))?;
            let files = config.resolve_files(path);
            (config.lexer_options, files)
        }
        None => (LexerOptions::default(), Vec::new()),
    };

    if !cli.files.is_empty() {
        files = cli.files.iter().map(PathBuf::from).collect();
    }
    apply_overrides(cli, &mut options);

    Ok((files, options))
}

fn apply_overrides(cli: &Cli, options: &mut LexerOptions) {
    if cli.no_comments {
        options.emit_comments = false;
    }
    if cli.collapse_newlines {
        options.collapse_newlines = true;
    }
    if cli.keywords {
        options.keywords = true;
    }
    if let Some(tab_width) = cli.tab_width {
        options.tab_width = tab_width;
    }
}

fn write_units(units: &[UnitTokens], format: OutputFormat, pretty: bool) -> miette::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut out, units).into_diagnostic()?;
            } else {
                serde_json::to_writer(&mut out, units).into_diagnostic()?;
            }
            writeln!(out).into_diagnostic()?;
        }
        OutputFormat::Text => {
            for unit in units {
                for line in text_lines(unit) {
                    writeln!(out, "{line}").into_diagnostic()?;
                }
            }
        }
    }
    out.flush().into_diagnostic()
}

/// One `position<TAB>token` line per token. Synthesized tokens have no
/// position and print `-`.
fn text_lines(unit: &UnitTokens) -> impl Iterator<Item = String> + '_ {
    unit.tokens.iter().map(|token| match token.span {
        Some(ref span) => format!("{}\t{}", span.start, token),
        None => format!("-\t{}", token),
    })
}
