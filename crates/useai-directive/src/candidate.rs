//! Function-like candidate capability
//!
//! The host traversal offers every function-like construct through this
//! trait. The pipeline is written once against it; per-kind differences
//! (declarations, expressions, arrows, methods) stay in the host adapter.

use crate::body::{FunctionBody, Statement};

/// Capability set of a function-like syntax node
pub trait FunctionCandidate {
    /// Block body, `None` for expression-bodied arrows and bodiless overloads
    fn body(&self) -> Option<&FunctionBody>;

    /// Whether the construct has a block body
    #[inline]
    fn has_body(&self) -> bool {
        self.body().is_some()
    }

    /// Declared or bound name, if any
    fn name(&self) -> Option<&str>;

    /// Name used in logs and errors
    #[inline]
    fn display_name(&self) -> &str {
        self.name().unwrap_or("anonymous")
    }

    /// Source text from the opening keyword or binding through the signature
    fn signature_text(&self) -> &str;

    /// Full original source text of the construct
    fn source_text(&self) -> &str;

    /// Replace the body's statement list
    fn replace_body(&mut self, statements: Vec<Statement>);

    /// Remove the directive prologue so the node is never claimed again
    fn clear_directive_prologue(&mut self);
}
