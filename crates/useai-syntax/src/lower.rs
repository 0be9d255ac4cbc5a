//! Lowering of `statement_block` nodes into [`FunctionBody`]

use crate::tree::{named_children, text_of};
use tree_sitter::Node;
use useai_directive::{Comment, Directive, FunctionBody, Statement};

/// Lower a block body
///
/// The prologue is the run of leading string-literal expression statements.
/// A comment on the same line as a directive becomes its trailing comment;
/// other comments after the first directive and before the first real
/// statement become hint comments.
pub(crate) fn lower_block(block: Node<'_>, source: &str) -> FunctionBody {
    let mut body = FunctionBody::new();
    let mut in_prologue = true;
    let mut last_directive_row: Option<usize> = None;

    for child in named_children(block) {
        if child.kind() == "comment" {
            if !in_prologue {
                continue;
            }
            let comment = Comment::from_source(text_of(child, source));
            match (last_directive_row, body.directives.last_mut()) {
                (Some(row), Some(directive))
                    if row == child.start_position().row
                        && directive.trailing_comment.is_none()
                        && body.hint_comments.is_empty() =>
                {
                    directive.trailing_comment = Some(comment);
                }
                (Some(_), _) => body.hint_comments.push(comment),
                (None, _) => {}
            }
            continue;
        }

        if in_prologue {
            if let Some(value) = directive_value(child, source) {
                let mut directive = Directive::new(value);
                // A comment before an inserted semicolon nests inside the statement
                let row = child.start_position().row;
                let mut nested = named_children(child).into_iter().filter(|n| n.kind() == "comment");
                if let Some(inner) = nested.find(|n| n.start_position().row == row) {
                    directive.trailing_comment = Some(Comment::from_source(text_of(inner, source)));
                }
                body.hint_comments
                    .extend(nested.map(|n| Comment::from_source(text_of(n, source))));
                body.directives.push(directive);
                last_directive_row = Some(row);
                continue;
            }
            in_prologue = false;
        }

        body.statements
            .push(Statement::new(child.kind(), text_of(child, source)));
    }
    body
}

/// Value of a directive statement: `'text'`, `"text"` or `'text' as const`
fn directive_value(statement: Node<'_>, source: &str) -> Option<String> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    let mut expr = statement.named_child(0)?;
    if expr.kind() == "as_expression" {
        expr = expr.named_child(0)?;
    }
    if expr.kind() != "string" {
        return None;
    }
    let raw = text_of(expr, source);
    let inner = raw
        .strip_prefix(['\'', '"'])
        .and_then(|s| s.strip_suffix(['\'', '"']))?;
    Some(inner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tree, Dialect};
    use pretty_assertions::assert_eq;

    fn lower_first_function(src: &str) -> FunctionBody {
        let tree = tree::parse(src, Dialect::TypeScript, 0).unwrap();
        let func = tree.root_node().named_child(0).unwrap();
        let block = func.child_by_field_name("body").unwrap();
        lower_block(block, src)
    }

    #[test]
    fn prologue_and_statements() {
        let body = lower_first_function(
            "function f() {\n  'use strict';\n  \"use ai\"\n  return 1;\n  'not a directive';\n}",
        );
        let values: Vec<_> = body.directives.iter().map(|d| d.value.as_str()).collect();
        assert_eq!(values, vec!["use strict", "use ai"]);
        assert_eq!(body.statements.len(), 2);
        assert!(body.statements[0].is_return());
    }

    #[test]
    fn trailing_comment_attached_to_directive() {
        let body = lower_first_function(
            "function f() {\n  'use ai' // temperature=0.5, seed=42\n  throw new Error('x')\n}",
        );
        let trailing = body.directives[0].trailing_comment.as_ref().unwrap();
        assert_eq!(trailing.text, "temperature=0.5, seed=42");
        assert!(body.hint_comments.is_empty());
    }

    #[test]
    fn comments_below_prologue_are_hints() {
        let body = lower_first_function(
            "function f() {\n  'use ai'\n  // temperature=0.2\n  // seed=7\n  return 0\n  // after\n}",
        );
        assert!(body.directives[0].trailing_comment.is_none());
        let hints: Vec<_> = body.hint_comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(hints, vec!["temperature=0.2", "seed=7"]);
    }

    #[test]
    fn comment_before_prologue_ignored() {
        let body = lower_first_function("function f() {\n  // lead\n  'use ai'\n}");
        assert!(body.hint_comments.is_empty());
        assert_eq!(body.directives.len(), 1);
    }

    #[test]
    fn as_const_directive() {
        let body = lower_first_function("function f() {\n  'use ai' as const;\n}");
        assert_eq!(body.directives[0].value, "use ai");
    }

    #[test]
    fn parenthesized_string_is_not_a_directive() {
        let body = lower_first_function("function f() {\n  ('use ai');\n}");
        assert!(body.directives.is_empty());
        assert_eq!(body.statements.len(), 1);
    }
}
