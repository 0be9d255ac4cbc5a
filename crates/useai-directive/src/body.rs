//! Syntax-neutral function body model
//!
//! The host source model lowers each block body into these types so the
//! detection and splicing logic never depends on a concrete parser.

/// A single statement inside a function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Grammar kind reported by the parser (e.g. `return_statement`)
    pub kind: String,
    /// Exact source text of the statement
    pub text: String,
}

impl Statement {
    /// Create statement from kind and text
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }

    /// Whether this is a `return` statement
    #[inline]
    #[must_use]
    pub fn is_return(&self) -> bool {
        self.kind == "return_statement"
    }
}

/// A comment, stored without its delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment content (`// x` and `/* x */` both yield `x`)
    pub text: String,
}

impl Comment {
    /// Strip comment delimiters from raw comment source
    ///
    /// Block comments also lose the leading `*` that JSDoc-style lines carry.
    #[must_use]
    pub fn from_source(raw: &str) -> Self {
        let raw = raw.trim();
        let text = if let Some(line) = raw.strip_prefix("//") {
            line.trim().to_string()
        } else if let Some(block) = raw.strip_prefix("/*") {
            let block = block.strip_suffix("*/").unwrap_or(block);
            block
                .lines()
                .map(|l| {
                    let l = l.trim();
                    l.strip_prefix('*').map_or(l, str::trim)
                })
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            raw.to_string()
        };
        Self { text }
    }

    /// Non-empty content lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// A directive-prologue entry: a leading string-literal statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// String value between the quotes, unescaped characters kept verbatim
    pub value: String,
    /// Comment on the same line, after the directive
    pub trailing_comment: Option<Comment>,
}

impl Directive {
    /// Create directive without trailing comment
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            trailing_comment: None,
        }
    }

    /// Attach trailing comment
    #[inline]
    #[must_use]
    pub fn with_trailing_comment(mut self, comment: Comment) -> Self {
        self.trailing_comment = Some(comment);
        self
    }
}

/// Block body of a function-like construct
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionBody {
    /// Directive prologue, in source order
    pub directives: Vec<Directive>,
    /// Comments between the prologue and the first real statement
    pub hint_comments: Vec<Comment>,
    /// Statements after the prologue
    pub statements: Vec<Statement>,
}

impl FunctionBody {
    /// Create empty body
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No statements and no directives
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.directives.is_empty()
    }

    /// Replace statements, leaving the prologue as is
    #[inline]
    pub fn replace_statements(&mut self, statements: Vec<Statement>) {
        self.statements = statements;
    }

    /// Drop the directive prologue and the hint comments that belonged to it
    #[inline]
    pub fn clear_directives(&mut self) {
        self.directives.clear();
        self.hint_comments.clear();
    }
}
