//! Error types for source parsing

/// Errors while parsing source or generated text
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyntaxError {
    /// No dialect for the file extension
    #[error("unsupported file type: {0}")]
    UnsupportedDialect(String),

    /// Grammar could not be loaded into the parser
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// Parser produced no tree
    #[error("parse failed")]
    ParseFailed,

    /// Text is not syntactically valid
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Parser description of the problem
        message: String,
    },

    /// Generated text parsed, but not as a function body
    #[error("generated code does not form a function body: {0}")]
    NotABody(String),
}

impl SyntaxError {
    /// Create syntax error at a 1-based position
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}
