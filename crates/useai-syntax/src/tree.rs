//! tree-sitter helpers shared by the source model and the body parser

use crate::{Dialect, SyntaxError};
use tree_sitter::{Node, Parser, Tree};

/// Parse text, rejecting trees that contain error or missing nodes
///
/// `line_offset` is subtracted from reported lines, for text wrapped in a
/// synthetic prefix.
pub(crate) fn parse(text: &str, dialect: Dialect, line_offset: usize) -> Result<Tree, SyntaxError> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.tree_sitter_language())
        .map_err(|e| SyntaxError::ParserInit(e.to_string()))?;

    let tree = parser.parse(text, None).ok_or(SyntaxError::ParseFailed)?;
    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error(root).unwrap_or(root);
        let pos = bad.start_position();
        let message = if bad.is_missing() {
            format!("missing `{}`", bad.kind())
        } else {
            let snippet = text_of(bad, text);
            let snippet: String = snippet.chars().take(20).collect();
            format!("unexpected `{}`", snippet.trim())
        };
        return Err(SyntaxError::syntax(
            (pos.row + 1).saturating_sub(line_offset).max(1),
            pos.column + 1,
            message,
        ));
    }
    Ok(tree)
}

/// Find the first error or missing node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Source text of a node
#[inline]
pub(crate) fn text_of<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Named children of a node, in order
pub(crate) fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All children of a node, in order
pub(crate) fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Leading whitespace of the line containing `offset`
pub(crate) fn line_indent(source: &str, offset: usize) -> String {
    let line_start = source
        .get(..offset)
        .and_then(|s| s.rfind('\n'))
        .map_or(0, |i| i + 1);
    source
        .get(line_start..)
        .unwrap_or_default()
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_source_parses() {
        assert!(parse("const x: number = 1;", Dialect::TypeScript, 0).is_ok());
    }

    #[test]
    fn invalid_source_reports_position() {
        let err = parse("let a = 1;\nfunction (", Dialect::TypeScript, 0).unwrap_err();
        match err {
            SyntaxError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn line_indent_of_offset() {
        let src = "a\n    b = 1\n";
        let offset = src.find('b').unwrap();
        assert_eq!(line_indent(src, offset), "    ");
        assert_eq!(line_indent(src, 0), "");
    }
}
