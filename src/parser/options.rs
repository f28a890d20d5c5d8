//! Extraction options and configuration.

/// Options for layout extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for per-page failures
    pub error_mode: ErrorMode,

    /// Minimum number of alphanumeric characters for a line to be kept
    pub min_line_chars: usize,

    /// Whether to NFKC-normalize extracted text
    pub normalize_text: bool,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the whole document on any per-page parse error.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Skip unparseable pages and continue (the default).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the minimum alphanumeric character count per line.
    pub fn with_min_line_chars(mut self, chars: usize) -> Self {
        self.min_line_chars = chars;
        self
    }

    /// Enable or disable NFKC text normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            min_line_chars: 3,
            normalize_text: true,
        }
    }
}

/// Error handling mode for per-page extraction failures.
///
/// A page that parses but yields no text is never an error in either mode; it
/// contributes an empty line sequence and a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any page parse error
    Strict,
    /// Skip broken pages and continue
    #[default]
    Lenient,
}
