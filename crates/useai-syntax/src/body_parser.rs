//! Parsing generated text into body statements

use crate::tree::{self, named_children, text_of};
use crate::{Dialect, SyntaxError};
use tracing::trace;
use useai_directive::Statement;

/// Turns generated code into a statement list
///
/// Implementations must be all-or-nothing: either the whole text parses as a
/// function body, or an error is returned and nothing is produced.
pub trait BodyParser: Send + Sync {
    /// Parse `code` as the statements of a function body
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError`] when the text is not a valid body.
    fn parse_body(&self, code: &str) -> Result<Vec<Statement>, SyntaxError>;
}

/// [`BodyParser`] backed by the tree-sitter grammar of a dialect
///
/// The text is wrapped as `(function () { ... })` so `return` and nested
/// declarations parse the way they would in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterBodyParser {
    dialect: Dialect,
}

impl TreeSitterBodyParser {
    /// Create parser for a dialect
    #[inline]
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Dialect in use
    #[inline]
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl BodyParser for TreeSitterBodyParser {
    fn parse_body(&self, code: &str) -> Result<Vec<Statement>, SyntaxError> {
        let wrapped = format!("(function () {{\n{code}\n}})");
        let tree = tree::parse(&wrapped, self.dialect, 1)?;
        let root = tree.root_node();

        // Text that closes the wrapper early yields extra top-level nodes
        let top: Vec<_> = named_children(root)
            .into_iter()
            .filter(|n| n.kind() != "comment")
            .collect();
        let [statement] = top.as_slice() else {
            return Err(SyntaxError::NotABody(format!(
                "{} top-level nodes",
                top.len()
            )));
        };

        let function = statement
            .named_child(0)
            .filter(|n| n.kind() == "parenthesized_expression")
            .and_then(|n| n.named_child(0))
            .filter(|n| matches!(n.kind(), "function_expression" | "function"))
            .ok_or_else(|| SyntaxError::NotABody(statement.kind().to_string()))?;

        // The wrapper's own body must span exactly to the closing brace
        let block = function
            .child_by_field_name("body")
            .filter(|b| b.end_byte() + 1 == wrapped.len())
            .ok_or_else(|| SyntaxError::NotABody("unbalanced braces".to_string()))?;

        let statements: Vec<Statement> = named_children(block)
            .into_iter()
            .filter(|n| n.kind() != "comment")
            .map(|n| Statement::new(n.kind(), text_of(n, &wrapped)))
            .collect();
        trace!(count = statements.len(), "parsed generated body");
        Ok(statements)
    }
}
