//! Line-at-a-time parsing for a prompt.
//!
//! A REPL does not know in advance how many lines a statement spans. The
//! driver here pulls one line at a time and re-parses the text gathered so
//! far until the parser stops asking for more, or the lines run out.

use serpent_diagnostic::{DiagnosticConfig, DiagnosticQueue, ErrorCallback, Severity};
use serpent_lexer_core::SourceBuffer;
use tracing::debug;

use crate::{parse, parse_inline, InlineOutcome, ParseOptions, ParseOutput};

/// Source of input lines.
pub trait LineSupplier {
    /// The next line, or `None` once input is exhausted. A missing trailing
    /// newline is added by the driver.
    fn next_line(&mut self) -> Option<String>;
}

impl<F> LineSupplier for F
where
    F: FnMut() -> Option<String>,
{
    fn next_line(&mut self) -> Option<String> {
        self()
    }
}

/// Parse one interactive statement, reading lines from `supplier` for as
/// long as the statement is unfinished.
///
/// Diagnostics of attempts that end in "needs more input" are dropped. When
/// the supplier runs dry the text so far is parsed one final time with
/// incomplete-source reporting off, so an unfinished statement becomes a
/// syntax error.
pub fn parse_interactive(
    supplier: &mut dyn LineSupplier,
    options: ParseOptions,
    errors: &mut dyn ErrorCallback,
) -> ParseOutput {
    let options = options
        .with_interactive(true)
        .with_report_incomplete_source(true);
    let mut source = SourceBuffer::default();
    let mut lines = 0_u32;
    loop {
        let Some(mut line) = supplier.next_line() else {
            debug!(lines, "input exhausted, final pass");
            return parse(&source, options, errors);
        };
        if !line.ends_with('\n') {
            line.push('\n');
        }
        source.push_str(&line);
        lines += 1;

        let mut attempt = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        match parse_inline(&source, options, &mut attempt) {
            InlineOutcome::NeedsMoreInput { line } => {
                debug!(line, lines, "statement continues");
            }
            InlineOutcome::Complete(output) => {
                for diag in attempt.diagnostics() {
                    match diag.severity {
                        Severity::Error => errors.on_error(diag.kind, diag.range, &diag.message),
                        Severity::Warning => errors.on_warning(diag.kind, diag.range, &diag.message),
                    }
                }
                return output;
            }
        }
    }
}
