use bitflags::bitflags;

bitflags! {
    /// Tokenizer modes.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TokenizerFlags: u8 {
        /// File input: read a newline at the end if the text lacks one.
        const EXEC_INPUT = 1 << 0;
        /// Interactive input that may continue on a later line.
        const INTERACTIVE = 1 << 1;
        /// Produce `TYPE_COMMENT` and `TYPE_IGNORE` tokens.
        const TYPE_COMMENT = 1 << 2;
        /// Produce `COMMENT` and `NL` tokens.
        const EXTRA_TOKENS = 1 << 3;
    }
}
