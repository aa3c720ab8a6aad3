//! What to parse and how.

use serpent_lexer::TokenizerFlags;

/// Start rule of a parse.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum InputMode {
    /// A module: statements up to the end of input.
    #[default]
    File,
    /// A single expression.
    Eval,
    /// One interactive statement.
    Single,
    /// The expression of an f-string replacement field.
    FString,
}

/// Parser configuration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseOptions {
    pub mode: InputMode,
    /// Input is typed at a prompt and may continue on later lines.
    pub interactive: bool,
    /// Keep `# type:` comments and collect `# type: ignore` markers.
    pub type_comments: bool,
    /// Answer "needs more input" instead of failing when interactive input
    /// ends inside a construct.
    pub report_incomplete_source: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            mode: InputMode::File,
            interactive: false,
            type_comments: false,
            report_incomplete_source: true,
        }
    }
}

impl ParseOptions {
    pub fn new(mode: InputMode) -> Self {
        ParseOptions {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_interactive(mut self, yes: bool) -> Self {
        self.interactive = yes;
        self
    }

    #[must_use]
    pub fn with_type_comments(mut self, yes: bool) -> Self {
        self.type_comments = yes;
        self
    }

    #[must_use]
    pub fn with_report_incomplete_source(mut self, yes: bool) -> Self {
        self.report_incomplete_source = yes;
        self
    }

    /// Tokenizer modes for these options.
    pub(crate) fn tokenizer_flags(self) -> TokenizerFlags {
        let mut flags = TokenizerFlags::empty();
        match self.mode {
            InputMode::File => flags |= TokenizerFlags::EXEC_INPUT,
            InputMode::Single if self.interactive => flags |= TokenizerFlags::INTERACTIVE,
            InputMode::Single | InputMode::Eval | InputMode::FString => {}
        }
        if self.type_comments {
            flags |= TokenizerFlags::TYPE_COMMENT;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_input_reads_a_final_newline() {
        let flags = ParseOptions::new(InputMode::File).tokenizer_flags();
        assert_eq!(flags, TokenizerFlags::EXEC_INPUT);
    }

    #[test]
    fn only_single_input_is_interactive() {
        let single = ParseOptions::new(InputMode::Single).with_interactive(true);
        assert!(single.tokenizer_flags().contains(TokenizerFlags::INTERACTIVE));
        let eval = ParseOptions::new(InputMode::Eval).with_interactive(true);
        assert!(!eval.tokenizer_flags().contains(TokenizerFlags::INTERACTIVE));
    }

    #[test]
    fn type_comments_flag() {
        let flags = ParseOptions::default()
            .with_type_comments(true)
            .tokenizer_flags();
        assert!(flags.contains(TokenizerFlags::TYPE_COMMENT));
    }
}
