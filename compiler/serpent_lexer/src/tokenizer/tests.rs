#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serpent_diagnostic::{DiagnosticConfig, DiagnosticQueue, ErrorKind};

const EXEC: TokenizerFlags = TokenizerFlags::EXEC_INPUT;

/// Render every token up to the end (or a request for more input) and
/// collect the diagnostics.
fn lex_with(
    src: &str,
    flags: TokenizerFlags,
    setup: impl FnOnce(&mut Tokenizer<'_>),
) -> (Vec<String>, Vec<Diagnostic>) {
    let buffer = SourceBuffer::new(src);
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let rendered = {
        let mut tokenizer = Tokenizer::new(&buffer, flags, &mut queue);
        setup(&mut tokenizer);
        let mut out = Vec::new();
        for _ in 0..1000 {
            match tokenizer.next() {
                Step::Token(token) => {
                    out.push(tokenizer.render(&token));
                    if matches!(token.kind, TokenKind::EndMarker | TokenKind::ErrorToken) {
                        break;
                    }
                }
                Step::NeedsMoreInput { line } => {
                    out.push(format!("NeedsMoreInput {line}"));
                    break;
                }
            }
        }
        out
    };
    (rendered, queue.flush())
}

fn lex(src: &str, flags: TokenizerFlags) -> (Vec<String>, Vec<Diagnostic>) {
    lex_with(src, flags, |_| {})
}

fn kinds(src: &str, flags: TokenizerFlags) -> Vec<TokenKind> {
    let buffer = SourceBuffer::new(src);
    tokenize(&buffer, flags, &mut serpent_diagnostic::Discard)
        .iter()
        .map(|t| t.kind)
        .collect()
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

/// Run `src` to the first `ERRORTOKEN` and report the tokenizer's verdict.
fn failure(src: &str, flags: TokenizerFlags) -> (Status, Option<LexError>) {
    let buffer = SourceBuffer::new(src);
    let mut errors = serpent_diagnostic::Discard;
    let mut tokenizer = Tokenizer::new(&buffer, flags, &mut errors);
    loop {
        match tokenizer.next() {
            Step::Token(token) if token.kind == TokenKind::ErrorToken => {
                return (tokenizer.status(), tokenizer.error().cloned());
            }
            Step::Token(token) if token.kind == TokenKind::EndMarker => {
                return (tokenizer.status(), None);
            }
            Step::Token(_) => {}
            Step::NeedsMoreInput { .. } => panic!("unexpected request for input"),
        }
    }
}

// === Basic streams ===

#[test]
fn two_assignments() {
    let (tokens, diagnostics) = lex("a = 1\nb = 2", EXEC);
    assert_eq!(
        tokens,
        vec![
            "Token NAME [0, 1] (1, 0) (1, 1) 'a'",
            "Token EQUAL [2, 3] (1, 2) (1, 3) '='",
            "Token NUMBER [4, 5] (1, 4) (1, 5) '1'",
            "Token NEWLINE [5, 6] (1, 5) (1, 6) '\n'",
            "Token NAME [6, 7] (2, 0) (2, 1) 'b'",
            "Token EQUAL [8, 9] (2, 2) (2, 3) '='",
            "Token NUMBER [10, 11] (2, 4) (2, 5) '2'",
            "Token NEWLINE [11, 12] (2, 5) (2, 6) ''",
            "Token ENDMARKER [12, 12] (2, -1) (2, -1) ''",
        ]
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn single_name() {
    let (tokens, _) = lex("a", EXEC);
    assert_eq!(
        tokens,
        vec![
            "Token NAME [0, 1] (1, 0) (1, 1) 'a'",
            "Token NEWLINE [1, 2] (1, 1) (1, 2) ''",
            "Token ENDMARKER [2, 2] (1, -1) (1, -1) ''",
        ]
    );
}

#[test]
fn no_final_newline_without_exec_input() {
    assert_eq!(
        kinds("a", TokenizerFlags::empty()),
        vec![TokenKind::Name, TokenKind::EndMarker]
    );
}

#[test]
fn empty_input() {
    assert_eq!(kinds("", EXEC), vec![TokenKind::EndMarker]);
}

#[test]
fn async_and_await_are_always_keywords() {
    assert_eq!(
        kinds("async await asyncx", EXEC),
        vec![
            TokenKind::Async,
            TokenKind::Await,
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::EndMarker
        ]
    );
}

#[test]
fn keywords_leave_as_names() {
    assert_eq!(kinds("if", TokenizerFlags::empty())[0], TokenKind::Name);
}

#[test]
fn carriage_returns_are_newlines() {
    assert_eq!(
        kinds("a\r\nb\rc", EXEC),
        vec![
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::EndMarker
        ]
    );
}

#[test]
fn token_text_normalises_carriage_returns() {
    let buffer = SourceBuffer::new("'''a\r\nb'''");
    let tokens = tokenize(&buffer, EXEC, &mut serpent_diagnostic::Discard);
    let mut errors = serpent_diagnostic::Discard;
    let tokenizer = Tokenizer::new(&buffer, EXEC, &mut errors);
    assert_eq!(tokenizer.token_text(&tokens[0]), "'''a\nb'''");
}

// === Operators ===

#[test]
fn operators_match_greedily() {
    assert_eq!(
        kinds("-> := **= //= >>= <<= ... <> !=", TokenizerFlags::empty()),
        vec![
            TokenKind::RArrow,
            TokenKind::ColonEqual,
            TokenKind::DoubleStarEqual,
            TokenKind::DoubleSlashEqual,
            TokenKind::RightShiftEqual,
            TokenKind::LeftShiftEqual,
            TokenKind::Ellipsis,
            TokenKind::NotEqual,
            TokenKind::NotEqual,
            TokenKind::EndMarker
        ]
    );
}

#[test]
fn dots() {
    assert_eq!(
        kinds("a.b .. .5", TokenizerFlags::empty()),
        vec![
            TokenKind::Name,
            TokenKind::Dot,
            TokenKind::Name,
            TokenKind::Dot,
            TokenKind::Dot,
            TokenKind::Number,
            TokenKind::EndMarker
        ]
    );
}

#[test]
fn unknown_character_is_op() {
    assert_eq!(kinds("$", TokenizerFlags::empty())[0], TokenKind::Op);
}

// === Identifiers ===

#[test]
fn unicode_identifier() {
    assert_eq!(
        kinds("größe = 1", TokenizerFlags::empty())[0],
        TokenKind::Name
    );
}

#[test]
fn euro_sign_is_invalid() {
    let (tokens, diagnostics) = lex("€", EXEC);
    assert_eq!(tokens, vec!["Token ERRORTOKEN [0, 1] (1, 0) (1, 1) '€'"]);
    assert_eq!(messages(&diagnostics), vec!["invalid character '€' (U+20ac)"]);
    assert_eq!(diagnostics[0].kind, ErrorKind::Syntax);
}

#[test]
fn invalid_continue_character() {
    let (_, diagnostics) = lex("a€", EXEC);
    assert_eq!(messages(&diagnostics), vec!["invalid character '€' (U+20ac)"]);
}

// === Numbers ===

#[test]
fn valid_numbers() {
    for src in [
        "0", "00", "0_0", "1_000", "0x_ff", "0o17", "0b1_0", "1.5", "1.", ".5", "1e5", "1E-5",
        "1.5e+3", "1j", "1.5J", "0.0", "0e0", "0j", "1_0.0_1",
    ] {
        let (tokens, diagnostics) = lex(src, TokenizerFlags::empty());
        assert!(
            tokens[0].starts_with("Token NUMBER"),
            "{src}: {tokens:?}"
        );
        assert!(tokens[0].ends_with(&format!("'{src}'")), "{src}: {tokens:?}");
        assert!(diagnostics.is_empty(), "{src}: {diagnostics:?}");
    }
}

#[test]
fn malformed_numbers_are_error_tokens() {
    for src in ["0_", "1_.4", "1._4", "1e_1", "0x___"] {
        let (tokens, diagnostics) = lex(src, EXEC);
        assert!(
            tokens.last().unwrap().starts_with("Token ERRORTOKEN"),
            "{src}: {tokens:?}"
        );
        assert_eq!(diagnostics.len(), 1, "{src}");
    }
}

#[test]
fn number_error_messages() {
    let cases = [
        ("0x", "invalid hexadecimal literal"),
        ("0o8", "invalid digit '8' in octal literal"),
        ("0o", "invalid octal literal"),
        ("0o18", "invalid digit '8' in octal literal"),
        ("0b2", "invalid digit '2' in binary literal"),
        ("0b", "invalid binary literal"),
        ("1_", "invalid decimal literal"),
        ("1x", "invalid decimal literal"),
        ("1e+", "invalid decimal literal"),
        ("1jx", "invalid imaginary literal"),
        (
            "012",
            "leading zeros in decimal integer literals are not permitted; use an 0o prefix for octal integers",
        ),
    ];
    for (src, message) in cases {
        let (_, diagnostics) = lex(src, EXEC);
        assert_eq!(messages(&diagnostics), vec![message], "{src}");
    }
}

#[test]
fn leading_zeros_range_stops_after_first_nonzero() {
    let (tokens, _) = lex("0012", EXEC);
    assert_eq!(tokens, vec!["Token ERRORTOKEN [0, 3] (1, 0) (1, 3) '001'"]);
}

#[test]
fn keyword_after_number_warns() {
    let (tokens, diagnostics) = lex("1if x else 2", EXEC);
    assert_eq!(tokens[0], "Token NUMBER [0, 1] (1, 0) (1, 1) '1'");
    assert_eq!(tokens[1], "Token NAME [1, 3] (1, 1) (1, 3) 'if'");
    assert_eq!(messages(&diagnostics), vec!["invalid decimal literal"]);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[test]
fn keyword_before_final_newline_warns() {
    let (tokens, diagnostics) = lex("1or\n", TokenizerFlags::empty());
    assert_eq!(tokens[0], "Token NUMBER [0, 1] (1, 0) (1, 1) '1'");
    assert_eq!(tokens[1], "Token NAME [1, 3] (1, 1) (1, 3) 'or'");
    assert_eq!(messages(&diagnostics), vec!["invalid decimal literal"]);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[test]
fn exponent_letter_before_else() {
    let (tokens, diagnostics) = lex("1else 2", EXEC);
    assert_eq!(tokens[0], "Token NUMBER [0, 1] (1, 0) (1, 1) '1'");
    assert_eq!(messages(&diagnostics), vec!["invalid decimal literal"]);
}

#[test]
fn hex_before_keyword() {
    let (tokens, diagnostics) = lex("0x1for x", EXEC);
    assert_eq!(tokens[0], "Token NUMBER [0, 4] (1, 0) (1, 4) '0x1f'");
    assert_eq!(messages(&diagnostics), vec!["invalid hexadecimal literal"]);
}

// === Strings ===

#[test]
fn string_forms() {
    for src in [
        "''", "\"\"", "'a'", "'''a'''", "\"\"\"a\nb\"\"\"", "b'x'", "rb'x'", "Rb'x'", "br'x'",
        "f'x'", "rf'x'", "fR'x'", "u'x'", "'a\\'b'",
    ] {
        let (tokens, diagnostics) = lex(src, TokenizerFlags::empty());
        assert!(tokens[0].starts_with("Token STRING"), "{src}: {tokens:?}");
        assert!(diagnostics.is_empty(), "{src}: {diagnostics:?}");
    }
}

#[test]
fn rejected_prefixes_are_names() {
    for src in ["ub'x'", "bu'x'", "ur'x'", "fb'x'", "bf'x'"] {
        let kinds = kinds(src, TokenizerFlags::empty());
        assert_eq!(kinds[0], TokenKind::Name, "{src}");
        assert_eq!(kinds[1], TokenKind::String, "{src}");
    }
}

#[test]
fn multi_line_string_range_starts_on_first_line() {
    let (tokens, _) = lex("x = '''a\nb'''", EXEC);
    assert_eq!(tokens[2], "Token STRING [4, 13] (1, 4) (2, 4) ''''a\nb''''");
}

#[test]
fn unterminated_string() {
    let (tokens, diagnostics) = lex("'abc\n", EXEC);
    assert_eq!(tokens, vec!["Token ERRORTOKEN [0, 1] (1, 0) (1, 1) '''"]);
    assert_eq!(
        messages(&diagnostics),
        vec!["unterminated string literal (detected at line 1)"]
    );
}

#[test]
fn unterminated_triple_quoted_string() {
    let (tokens, diagnostics) = lex("x\n'''abc\ndef", EXEC);
    assert_eq!(tokens.last().unwrap(), "Token ERRORTOKEN [2, 3] (2, 0) (2, 1) '''");
    assert_eq!(
        messages(&diagnostics),
        vec!["unterminated triple-quoted string literal (detected at line 3)"]
    );
}

#[test]
fn invalid_escape_warns_once() {
    let (tokens, diagnostics) = lex("'\\d\\q'", EXEC);
    assert!(tokens[0].starts_with("Token STRING"));
    assert_eq!(messages(&diagnostics), vec!["invalid escape sequence '\\d'"]);
    assert_eq!(diagnostics[0].kind, ErrorKind::Deprecation);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[test]
fn invalid_octal_escape_warns() {
    let (_, diagnostics) = lex("'\\777'", EXEC);
    assert_eq!(
        messages(&diagnostics),
        vec!["invalid octal escape sequence '\\777'"]
    );
}

#[test]
fn raw_strings_do_not_warn() {
    let (_, diagnostics) = lex("r'\\d' '\\n\\x41\\N{DASH}\\101'", EXEC);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn unicode_escapes_are_invalid_in_bytes() {
    let (_, diagnostics) = lex("b'\\N'", EXEC);
    assert_eq!(messages(&diagnostics), vec!["invalid escape sequence '\\N'"]);
}

// === Indentation ===

#[test]
fn indent_and_dedent() {
    assert_eq!(
        kinds("if x:\n    y\nz\n", EXEC),
        vec![
            TokenKind::Name,
            TokenKind::Name,
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::Dedent,
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::EndMarker
        ]
    );
}

#[test]
fn indent_tokens_use_sentinel_columns() {
    let (tokens, _) = lex("if x:\n    y\n", EXEC);
    assert_eq!(tokens[4], "Token INDENT [10, 10] (2, -1) (2, -1) ''");
}

#[test]
fn blank_and_comment_lines_do_not_indent() {
    assert_eq!(
        kinds("x\n\n   \n  # c\ny\n", EXEC),
        vec![
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::EndMarker
        ]
    );
}

#[test]
fn dedent_to_unknown_column() {
    let (status, error) = failure("if x:\n    y\n  z\n", EXEC);
    assert_eq!(status, Status::DedentInvalid);
    assert_eq!(error, Some(LexError::DedentInvalid));
}

#[test]
fn status_failures_are_not_reported_by_the_tokenizer() {
    let (tokens, diagnostics) = lex("if x:\n    y\n  z\n", EXEC);
    assert!(tokens.last().unwrap().starts_with("Token ERRORTOKEN"));
    assert!(diagnostics.is_empty());
}

#[test]
fn tabs_and_spaces_disagree() {
    let (status, error) = failure("if x:\n\ty\n        z\n", EXEC);
    assert_eq!(status, Status::TabsSpacesInconsistent);
    assert_eq!(error, Some(LexError::InconsistentTabs));
}

#[test]
fn tab_indent_matches_tab_indent() {
    assert!(!kinds("if x:\n\ty\n\tz\n", EXEC).contains(&TokenKind::ErrorToken));
}

#[test]
fn too_deep_indentation() {
    let mut src = String::new();
    for depth in 0..101 {
        src.push_str(&" ".repeat(depth));
        src.push_str("if x:\n");
    }
    src.push_str(&" ".repeat(101));
    src.push_str("pass\n");
    let (status, _) = failure(&src, EXEC);
    assert_eq!(status, Status::TooDeepIndentation);
}

#[test]
fn brackets_suspend_indentation() {
    assert_eq!(
        kinds("x = (1,\n        2)\n", EXEC),
        vec![
            TokenKind::Name,
            TokenKind::Equal,
            TokenKind::LPar,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::RPar,
            TokenKind::Newline,
            TokenKind::EndMarker
        ]
    );
}

// === Line continuation ===

#[test]
fn backslash_joins_lines() {
    assert_eq!(
        kinds("x = \\\n  1\n", EXEC),
        vec![
            TokenKind::Name,
            TokenKind::Equal,
            TokenKind::Number,
            TokenKind::Newline,
            TokenKind::EndMarker
        ]
    );
}

#[test]
fn backslash_followed_by_text() {
    let (status, error) = failure("x \\ y\n", EXEC);
    assert_eq!(status, Status::LineContinuationError);
    assert_eq!(error, Some(LexError::LineContinuation));
}

#[test]
fn backslash_at_end_of_input() {
    let (status, error) = failure("x = \\", EXEC);
    assert_eq!(status, Status::Eof);
    assert_eq!(error, Some(LexError::UnexpectedEof));
}

// === Brackets ===

#[test]
fn mismatched_brackets() {
    let (_, diagnostics) = lex("(]", EXEC);
    assert_eq!(
        messages(&diagnostics),
        vec!["closing parenthesis ']' does not match opening parenthesis '('"]
    );
    let (_, diagnostics) = lex("(\n]", EXEC);
    assert_eq!(
        messages(&diagnostics),
        vec!["closing parenthesis ']' does not match opening parenthesis '(' on line 1"]
    );
}

#[test]
fn unmatched_close() {
    let (tokens, diagnostics) = lex("x)", EXEC);
    assert_eq!(tokens[1], "Token ERRORTOKEN [1, 2] (1, 1) (1, 2) ')'");
    assert_eq!(messages(&diagnostics), vec!["unmatched ')'"]);
}

#[test]
fn too_many_nested_parens() {
    let (_, diagnostics) = lex(&"(".repeat(201), EXEC);
    assert_eq!(messages(&diagnostics), vec!["too many nested parentheses"]);
}

#[test]
fn open_bracket_at_end_of_input() {
    let buffer = SourceBuffer::new("x = [1,\n  2");
    let mut errors = serpent_diagnostic::Discard;
    let mut tokenizer = Tokenizer::new(&buffer, EXEC, &mut errors);
    let last = loop {
        if let Step::Token(token) = tokenizer.next() {
            if matches!(token.kind, TokenKind::ErrorToken | TokenKind::EndMarker) {
                break token;
            }
        }
    };
    assert_eq!(last.kind, TokenKind::ErrorToken);
    assert_eq!(tokenizer.status(), Status::Eof);
    assert_eq!(tokenizer.error(), Some(&LexError::NeverClosed { open: '[' }));
    assert_eq!(
        tokenizer.innermost_paren(),
        Some(('[', SourceRange::new(1, 4, 1, -1)))
    );
}

// === Comments ===

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("x # c\n", EXEC),
        vec![TokenKind::Name, TokenKind::Newline, TokenKind::EndMarker]
    );
}

#[test]
fn extra_tokens_mode() {
    let (tokens, _) = lex("# c\nx = (\n1)\n", EXEC | TokenizerFlags::EXTRA_TOKENS);
    assert_eq!(
        tokens,
        vec![
            "Token COMMENT [0, 3] (1, 0) (1, 3) '# c'",
            "Token NL [3, 4] (1, 3) (1, 4) '\n'",
            "Token NAME [4, 5] (2, 0) (2, 1) 'x'",
            "Token EQUAL [6, 7] (2, 2) (2, 3) '='",
            "Token LPAR [8, 9] (2, 4) (2, 5) '('",
            "Token NL [9, 10] (2, 5) (2, 6) '\n'",
            "Token NUMBER [10, 11] (3, 0) (3, 1) '1'",
            "Token RPAR [11, 12] (3, 1) (3, 2) ')'",
            "Token NEWLINE [12, 13] (3, 2) (3, 3) '\n'",
            "Token ENDMARKER [13, 13] (3, -1) (3, -1) ''",
        ]
    );
}

#[test]
fn type_comment() {
    let (tokens, _) = lex("x = 1  # type: int\n", EXEC | TokenizerFlags::TYPE_COMMENT);
    assert_eq!(tokens[3], "Token TYPE_COMMENT [15, 18] (1, 15) (1, 18) 'int'");
    assert!(tokens[4].starts_with("Token NEWLINE"));
}

#[test]
fn type_ignore_carries_its_tag() {
    let (tokens, _) = lex(
        "import x  # type: ignore[attr]\n",
        EXEC | TokenizerFlags::TYPE_COMMENT,
    );
    assert_eq!(
        tokens[2],
        "Token TYPE_IGNORE [24, 30] (1, 24) (1, 30) '[attr]'"
    );
}

#[test]
fn type_ignore_needs_a_word_boundary() {
    let kinds = kinds("x  # type: ignorex\n", EXEC | TokenizerFlags::TYPE_COMMENT);
    assert_eq!(kinds[1], TokenKind::TypeComment);
}

#[test]
fn type_comments_off_by_default() {
    assert_eq!(
        kinds("x  # type: int\n", EXEC),
        vec![TokenKind::Name, TokenKind::Newline, TokenKind::EndMarker]
    );
}

// === Interactive input ===

#[test]
fn open_block_needs_more_input() {
    let (tokens, _) = lex("class A:\n", TokenizerFlags::INTERACTIVE);
    assert_eq!(tokens.last().unwrap(), "NeedsMoreInput 1");
    assert!(tokens[tokens.len() - 2].starts_with("Token NEWLINE"));
}

#[test]
fn open_triple_quote_needs_more_input() {
    let (tokens, diagnostics) = lex("\"\"\"abc\ndef\n", TokenizerFlags::INTERACTIVE);
    assert_eq!(tokens, vec!["NeedsMoreInput 2"]);
    assert!(diagnostics.is_empty());
}

#[test]
fn open_bracket_needs_more_input() {
    let (tokens, _) = lex("(1,\n", TokenizerFlags::INTERACTIVE);
    assert_eq!(tokens.last().unwrap(), "NeedsMoreInput 1");
}

#[test]
fn reporting_off_stops_cleanly() {
    let (tokens, _) = lex_with("class A:\n", TokenizerFlags::INTERACTIVE, |t| {
        t.set_report_incomplete_source(false);
    });
    assert_eq!(tokens.last().unwrap(), "Token ENDMARKER [9, 9] (1, -1) (1, -1) ''");
}

#[test]
fn reporting_off_after_a_request_stops() {
    let buffer = SourceBuffer::new("class A:\n");
    let mut errors = serpent_diagnostic::Discard;
    let mut tokenizer = Tokenizer::new(&buffer, TokenizerFlags::INTERACTIVE, &mut errors);
    let mut step = tokenizer.next();
    while let Step::Token(_) = step {
        step = tokenizer.next();
    }
    assert!(matches!(step, Step::NeedsMoreInput { line: 1 }));

    tokenizer.set_report_incomplete_source(false);
    let Step::Token(token) = tokenizer.next() else {
        panic!("still asking for input");
    };
    assert_eq!(
        tokenizer.render(&token),
        "Token ENDMARKER [9, 9] (1, -1) (1, -1) ''"
    );
    assert_eq!(tokenizer.status(), Status::InteractiveStop);
}

#[test]
fn empty_line_closes_blocks_at_the_prompt() {
    let kinds = kinds("if x:\n  y\n\n", TokenizerFlags::INTERACTIVE);
    assert!(kinds.contains(&TokenKind::Dedent), "{kinds:?}");
}

// === Offsets and helpers ===

#[test]
fn offsets_shift_ranges() {
    let buffer = SourceBuffer::new("a + b");
    let mut errors = serpent_diagnostic::Discard;
    let mut tokenizer = Tokenizer::new(&buffer, TokenizerFlags::empty(), &mut errors)
        .with_offset(2, 5);
    let Step::Token(first) = tokenizer.next() else {
        panic!("expected a token");
    };
    assert_eq!(first.range, SourceRange::new(3, 5, 3, 6));
}

#[test]
fn pending_dedents() {
    let buffer = SourceBuffer::new("if x:\n  y\n");
    let mut errors = serpent_diagnostic::Discard;
    let mut tokenizer = Tokenizer::new(&buffer, EXEC, &mut errors);
    for _ in 0..6 {
        tokenizer.next();
    }
    assert_eq!(tokenizer.indent_depth(), 1);
    tokenizer.set_pending_dedents();
    assert_eq!(tokenizer.indent_depth(), 0);
    let Step::Token(token) = tokenizer.next() else {
        panic!("expected a token");
    };
    assert_eq!(token.kind, TokenKind::Dedent);
}

#[test]
fn bad_single_statement() {
    for (src, bad) in [
        ("x = 1\ny = 2\n", true),
        ("x = 1\n# c\n\n", false),
        ("x = 1\n", false),
    ] {
        let buffer = SourceBuffer::new(src);
        let mut errors = serpent_diagnostic::Discard;
        let mut tokenizer = Tokenizer::new(&buffer, EXEC, &mut errors);
        while let Step::Token(token) = tokenizer.next() {
            if token.kind == TokenKind::Newline {
                break;
            }
        }
        assert_eq!(tokenizer.is_bad_single_statement(), bad, "{src:?}");
    }
}

#[test]
fn extend_to_current_position() {
    let buffer = SourceBuffer::new("abc def");
    let mut errors = serpent_diagnostic::Discard;
    let mut tokenizer = Tokenizer::new(&buffer, TokenizerFlags::empty(), &mut errors);
    let Step::Token(first) = tokenizer.next() else {
        panic!("expected a token");
    };
    tokenizer.next();
    assert_eq!(
        tokenizer.extend_to_current(first.range),
        SourceRange::new(1, 0, 1, 7)
    );
}

// === Properties ===

fn source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "a", "bc", "_x", "1", "0x1f", "1.5", "1e3", "0_", " ", "  ", "\t", "\n", "(", ")",
            "[", "]", "{", "}", ":", ",", "=", "+", "-", "**", "->", "...", ".", "'s'", "\"t\"",
            "'''u\nv'''", "'", "#c", "\\\n", "\\", "if", "é", "€", "$", "@", "!=",
        ]),
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn retokenizing_is_deterministic(src in source_strategy()) {
        let buffer = SourceBuffer::new(&src);
        let first = tokenize(&buffer, EXEC, &mut serpent_diagnostic::Discard);
        let second = tokenize(&buffer, EXEC, &mut serpent_diagnostic::Discard);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn token_text_is_the_buffer_slice(src in source_strategy()) {
        let buffer = SourceBuffer::new(&src);
        let chars: Vec<char> = src.chars().collect();
        let tokens = tokenize(&buffer, EXEC, &mut serpent_diagnostic::Discard);
        let mut errors = serpent_diagnostic::Discard;
        let tokenizer = Tokenizer::new(&buffer, EXEC, &mut errors);
        for token in &tokens {
            let end = (token.end as usize).min(chars.len());
            let start = (token.start as usize).min(end);
            let slice: String = chars[start..end].iter().collect();
            prop_assert_eq!(tokenizer.token_text(token), slice);
        }
    }

    #[test]
    fn tokens_make_progress(src in source_strategy()) {
        let buffer = SourceBuffer::new(&src);
        let tokens = tokenize(&buffer, EXEC, &mut serpent_diagnostic::Discard);
        let len = u32::try_from(src.chars().count()).unwrap();
        prop_assert!(tokens.len() <= 4 * (len as usize) + 4);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
        }
        for token in &tokens {
            prop_assert!(token.start <= token.end);
            prop_assert!(token.end <= len + 1);
        }
        let last = tokens.last().unwrap().kind;
        prop_assert!(matches!(last, TokenKind::EndMarker | TokenKind::ErrorToken));
    }
}
