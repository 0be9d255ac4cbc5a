//! Splicing generated code into function nodes
//!
//! Parsing happens before any mutation, so a node is either fully rewritten
//! or left exactly as it was.

use crate::error::SpliceError;
use tracing::debug;
use useai_directive::{FunctionCandidate, Statement};
use useai_syntax::BodyParser;

/// Parse generated text into body statements
///
/// # Errors
///
/// Returns [`SpliceError::InvalidCode`] when the text is not a valid body.
pub fn prepare(parser: &dyn BodyParser, text: &str) -> Result<Vec<Statement>, SpliceError> {
    Ok(parser.parse_body(text)?)
}

/// Replace the node's body and drop its directive prologue
pub fn apply<C>(node: &mut C, statements: Vec<Statement>)
where
    C: FunctionCandidate + ?Sized,
{
    debug!(function = node.display_name(), count = statements.len(), "splicing body");
    node.replace_body(statements);
    node.clear_directive_prologue();
}

/// Parse `text` and splice it into `node`; the node is untouched on error
///
/// # Errors
///
/// Returns [`SpliceError::InvalidCode`] when the text is not a valid body.
pub fn splice_body<C>(node: &mut C, text: &str, parser: &dyn BodyParser) -> Result<(), SpliceError>
where
    C: FunctionCandidate + ?Sized,
{
    let statements = prepare(parser, text)?;
    apply(node, statements);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use useai_syntax::{Dialect, SourceFile, TreeSitterBodyParser};

    const SRC: &str = "function add(a, b) {\n  'use ai'\n  throw new Error('x')\n}\n";

    #[test]
    fn splice_rewrites_and_clears_marker() {
        let mut file = SourceFile::parse(SRC, Dialect::TypeScript).unwrap();
        let parser = TreeSitterBodyParser::new(Dialect::TypeScript);
        splice_body(&mut file.functions_mut()[0], "return a + b;", &parser).unwrap();

        let node = &file.functions()[0];
        let body = node.body().unwrap();
        assert!(body.directives.is_empty());
        assert_eq!(body.statements.len(), 1);
        assert_eq!(file.render(), "function add(a, b) {\n  return a + b;\n}\n");
    }

    #[test]
    fn failed_parse_leaves_node_untouched() {
        let mut file = SourceFile::parse(SRC, Dialect::TypeScript).unwrap();
        let before = file.functions()[0].body().cloned();
        let parser = TreeSitterBodyParser::new(Dialect::TypeScript);

        let err = splice_body(&mut file.functions_mut()[0], "return (", &parser).unwrap_err();
        assert!(matches!(err, SpliceError::InvalidCode(_)));
        assert_eq!(file.functions()[0].body().cloned(), before);
        assert!(!file.functions()[0].is_rewritten());
        assert_eq!(file.render(), SRC);
    }
}
