//! Packrat PEG parser for Serpent.
//!
//! Pulls tokens from a [`Tokenizer`] on demand and builds a flat
//! [`SstArena`]. Alternatives are tried in order with backtracking; the
//! results of the hot rules are memoized per token position.
//!
//! A parse runs in two passes. The first pass only knows the real grammar.
//! When it fails without having reported anything, the memo table is
//! dropped and the grammar runs again with the error alternatives enabled,
//! which exist only to produce specific diagnostics. If even those stay
//! silent the failure is reported at the furthest token read.
//!
//! # Layout
//!
//! - `cursor.rs`: token fetching, keyword promotion, lookahead
//! - `error.rs`: diagnostics and tokenizer failures
//! - `memo.rs`: the memo table
//! - `grammar/`: the rules, by area
//! - `interactive.rs`: the line-at-a-time driver

mod cursor;
mod error;
mod grammar;
pub mod interactive;
mod memo;
mod options;

#[cfg(test)]
mod tests;

pub use interactive::{parse_interactive, LineSupplier};
pub use options::{InputMode, ParseOptions};

use std::sync::Once;

use serpent_diagnostic::{ErrorCallback, ErrorKind};
use serpent_ir::{Name, NodeId, SourceRange, SstArena, Token};
use serpent_lexer::Tokenizer;
use serpent_lexer_core::{decode, EncodingError, Fallback, SourceBuffer};
use tracing::debug;

use memo::MemoTable;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set; safe to call more than once.
/// `RUST_LOG=serpent_parse=trace` shows every token fetch and memo hit.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

/// A finished parse.
#[derive(Debug)]
pub struct ParseOutput {
    pub arena: SstArena,
    /// `Module`, `Expression` or `Interactive` node; `None` when an error
    /// was reported.
    pub root: Option<NodeId>,
}

impl ParseOutput {
    pub fn is_ok(&self) -> bool {
        self.root.is_some()
    }

    fn failed() -> Self {
        ParseOutput {
            arena: SstArena::new(),
            root: None,
        }
    }
}

/// Result of parsing input that may still be growing.
#[derive(Debug)]
pub enum InlineOutcome {
    Complete(ParseOutput),
    /// Interactive input ended inside a construct on `line`.
    NeedsMoreInput { line: i32 },
}

impl InlineOutcome {
    /// The finished parse, or an [`ErrorKind::IncompleteSource`] error for
    /// a host that has no more input to offer.
    pub fn into_output(self, errors: &mut dyn ErrorCallback) -> ParseOutput {
        match self {
            InlineOutcome::Complete(output) => output,
            InlineOutcome::NeedsMoreInput { line } => {
                errors.on_error(
                    ErrorKind::IncompleteSource,
                    SourceRange::new(line, 0, line, 0),
                    "incomplete input",
                );
                ParseOutput::failed()
            }
        }
    }
}

/// Parse `source` to completion.
///
/// Incomplete-source reporting is turned off, so interactive input that
/// stops early is parsed as if it ended there.
pub fn parse(
    source: &SourceBuffer,
    options: ParseOptions,
    errors: &mut dyn ErrorCallback,
) -> ParseOutput {
    parse_inline(source, options.with_report_incomplete_source(false), errors).into_output(errors)
}

/// Decode raw source bytes, then [`parse`] them.
///
/// A source that cannot be decoded is reported as
/// [`ErrorKind::InvalidEncoding`]: at the offending byte when there is one,
/// at the start of the file for an unknown `coding:` declaration.
pub fn parse_bytes(
    bytes: &[u8],
    fallback: Fallback,
    options: ParseOptions,
    errors: &mut dyn ErrorCallback,
) -> ParseOutput {
    match decode(bytes, fallback) {
        Ok(decoded) => {
            debug!(encoding = decoded.encoding.name(), "decoded");
            parse(&decoded.buffer, options, errors)
        }
        Err(err) => {
            debug!(%err, "undecodable source");
            let range = encoding_error_range(bytes, &err);
            errors.on_error(ErrorKind::InvalidEncoding, range, &err.to_string());
            ParseOutput::failed()
        }
    }
}

fn encoding_error_range(bytes: &[u8], err: &EncodingError) -> SourceRange {
    let EncodingError::Malformed { position, .. } = *err else {
        return SourceRange::new(1, 0, 1, 0);
    };
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let before = &body[..position.min(body.len())];
    let line_start = before.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
    let line = i32::try_from(before.iter().filter(|&&b| b == b'\n').count() + 1).unwrap_or(i32::MAX);
    let column = i32::try_from(before.len() - line_start).unwrap_or(i32::MAX - 1);
    SourceRange::new(line, column, line, column + 1)
}

/// Parse `source`, answering [`InlineOutcome::NeedsMoreInput`] when
/// interactive input ends inside a construct.
pub fn parse_inline(
    source: &SourceBuffer,
    options: ParseOptions,
    errors: &mut dyn ErrorCallback,
) -> InlineOutcome {
    debug!(
        mode = ?options.mode,
        interactive = options.interactive,
        len = source.len(),
        "parse"
    );
    let arena = SstArena::with_capacity(source.len());
    let mut parser = Parser::new(source, options, errors, arena);
    let root = parser.run();
    if let Some(line) = parser.incomplete {
        debug!(line, "needs more input");
        return InlineOutcome::NeedsMoreInput { line };
    }
    InlineOutcome::Complete(ParseOutput {
        arena: parser.arena,
        root,
    })
}

/// `# type: ignore` marker seen by the tokenizer.
#[derive(Copy, Clone, Debug)]
struct TypeIgnore {
    line: i32,
    tag: Name,
    range: SourceRange,
}

/// What the parser remembers about a token besides the token itself.
#[derive(Copy, Clone, Debug)]
struct TokenMeta {
    /// Interned text of a `NAME` token.
    name: Option<Name>,
    /// Bracket depth right after the token.
    level: u32,
}

/// Parser state for one parse (or one f-string replacement field).
pub(crate) struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    tokens: Vec<Token>,
    /// Side data of each token, parallel to `tokens`.
    meta: Vec<TokenMeta>,
    pos: usize,
    arena: SstArena,
    memo: MemoTable,
    mode: InputMode,
    /// Second pass: error alternatives are live.
    call_invalid_rules: bool,
    /// Set by the first reported error; every rule fails from then on.
    error_indicator: bool,
    /// Single input: a token other than `ENDMARKER` was read.
    parsing_started: bool,
    /// Interactive input ran out on this line.
    incomplete: Option<i32>,
    type_ignores: Vec<TypeIgnore>,
}

impl<'a> Parser<'a> {
    fn new(
        source: &'a SourceBuffer,
        options: ParseOptions,
        errors: &'a mut dyn ErrorCallback,
        arena: SstArena,
    ) -> Self {
        let mut tokenizer = Tokenizer::new(source, options.tokenizer_flags(), errors);
        tokenizer.set_report_incomplete_source(options.report_incomplete_source);
        Parser::with_tokenizer(tokenizer, options.mode, arena, source.len() / 3 + 4)
    }

    /// Parser over an already configured tokenizer, adding to `arena`.
    fn with_tokenizer(
        tokenizer: Tokenizer<'a>,
        mode: InputMode,
        arena: SstArena,
        capacity: usize,
    ) -> Self {
        Parser {
            tokenizer,
            tokens: Vec::with_capacity(capacity),
            meta: Vec::with_capacity(capacity),
            pos: 0,
            arena,
            memo: MemoTable::default(),
            mode,
            call_invalid_rules: false,
            error_indicator: false,
            parsing_started: false,
            incomplete: None,
            type_ignores: Vec::new(),
        }
    }

    /// Both passes. `None` when an error was reported or more input is
    /// needed.
    fn run(&mut self) -> Option<NodeId> {
        let root = self.start_rule();
        if self.incomplete.is_some() {
            return None;
        }
        if root.is_none() {
            if !self.error_indicator {
                debug!(fill = self.tokens.len(), "first pass failed, retrying with error rules");
                self.reset_for_error_pass();
                let _ = self.start_rule();
                if self.incomplete.is_none() && !self.error_indicator {
                    self.report_failure();
                }
            }
            return None;
        }
        if self.mode == InputMode::Single && self.tokenizer.is_bad_single_statement() {
            self.raise_syntax_error::<()>("multiple statements found while compiling a single statement");
            return None;
        }
        if self.error_indicator {
            return None;
        }
        root
    }

    fn reset_for_error_pass(&mut self) {
        self.error_indicator = false;
        self.call_invalid_rules = true;
        self.memo.clear();
        // A replacement-field parser shares the arena of the enclosing parse.
        if self.mode != InputMode::FString {
            self.arena.clear();
        }
        self.pos = 0;
        self.tokenizer.set_report_incomplete_source(false);
    }
}
