//! Parsed source file and rendering

use crate::function::{FunctionKind, FunctionNode};
use crate::lower::lower_block;
use crate::tree::{self, children, line_indent, named_children, text_of};
use crate::{Dialect, SyntaxError};
use tracing::{debug, instrument};
use tree_sitter::Node;

/// A parsed source file and the function-like constructs it contains
///
/// Functions are listed in pre-order (outer before inner, then by position).
/// Body edits made through [`FunctionNode`] are written back by [`render`].
///
/// [`render`]: SourceFile::render
#[derive(Debug, Clone)]
pub struct SourceFile {
    source: String,
    dialect: Dialect,
    functions: Vec<FunctionNode>,
}

impl SourceFile {
    /// Parse source text
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError`] when the text does not parse cleanly.
    #[instrument(skip_all, fields(dialect = %dialect))]
    pub fn parse(source: impl AsRef<str>, dialect: Dialect) -> Result<Self, SyntaxError> {
        let source = source.as_ref().to_string();
        let tree = tree::parse(&source, dialect, 0)?;

        let mut functions = Vec::new();
        collect(tree.root_node(), &source, &mut functions);
        debug!(count = functions.len(), "collected function-like constructs");

        Ok(Self {
            source,
            dialect,
            functions,
        })
    }

    /// Original source text
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Dialect the file was parsed as
    #[inline]
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Function-like constructs, pre-order
    #[inline]
    #[must_use]
    pub fn functions(&self) -> &[FunctionNode] {
        &self.functions
    }

    /// Mutable access to function-like constructs
    #[inline]
    pub fn functions_mut(&mut self) -> &mut [FunctionNode] {
        &mut self.functions
    }

    /// Number of rewritten bodies
    #[must_use]
    pub fn rewritten_count(&self) -> usize {
        self.functions.iter().filter(|f| f.is_rewritten()).count()
    }

    /// Render the source with every rewritten body written back
    ///
    /// A rewritten body nested inside another rewritten body is dropped with
    /// the outer one. Text outside rewritten bodies is kept byte for byte.
    #[must_use]
    pub fn render(&self) -> String {
        let mut edits: Vec<(std::ops::Range<usize>, String)> = self
            .functions
            .iter()
            .filter(|f| f.is_rewritten())
            .filter_map(|f| f.body_range().map(|r| (r, f.render_body())))
            .collect();
        edits.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (range, text) in edits {
            if range.start < cursor {
                continue;
            }
            out.push_str(self.source.get(cursor..range.start).unwrap_or_default());
            out.push_str(&text);
            cursor = range.end;
        }
        out.push_str(self.source.get(cursor..).unwrap_or_default());
        out
    }
}

/// Pre-order walk collecting function-like nodes
fn collect(node: Node<'_>, source: &str, out: &mut Vec<FunctionNode>) {
    if let Some(kind) = FunctionKind::from_node_kind(node.kind()) {
        out.push(build(node, kind, source));
    }
    for child in children(node) {
        collect(child, source, out);
    }
}

fn build(node: Node<'_>, kind: FunctionKind, source: &str) -> FunctionNode {
    let start = binding_start(node);
    let block = node
        .child_by_field_name("body")
        .filter(|b| b.kind() == "statement_block");

    let signature_end = block.map_or(node.end_byte(), |b| b.start_byte());
    let signature = source
        .get(start.start_byte()..signature_end)
        .unwrap_or_default()
        .trim()
        .to_string();

    let outer_indent = line_indent(source, start.start_byte());
    let inner_indent = block
        .and_then(|b| body_indent(b, source))
        .unwrap_or_else(|| format!("{outer_indent}  "));

    FunctionNode {
        kind,
        name: function_name(node, source),
        signature,
        source: source
            .get(start.start_byte()..node.end_byte())
            .unwrap_or_default()
            .to_string(),
        range: start.start_byte()..node.end_byte(),
        body_range: block.map(|b| b.byte_range()),
        body: block.map(|b| lower_block(b, source)),
        outer_indent,
        inner_indent,
        rewritten: false,
    }
}

/// Node where the signature text begins
///
/// Expressions bound by a declaration, property or assignment start at the
/// binding, so `const add = (a, b) => {` is the signature of the arrow.
fn binding_start(node: Node<'_>) -> Node<'_> {
    let Some(parent) = node.parent() else {
        return node;
    };
    match parent.kind() {
        "variable_declarator" => {
            let is_value = parent
                .child_by_field_name("value")
                .is_some_and(|v| v.id() == node.id());
            if !is_value {
                return node;
            }
            match parent.parent() {
                Some(decl)
                    if matches!(decl.kind(), "lexical_declaration" | "variable_declaration")
                        && named_children(decl)
                            .iter()
                            .filter(|c| c.kind() == "variable_declarator")
                            .count()
                            == 1 =>
                {
                    decl
                }
                _ => parent,
            }
        }
        "pair" | "assignment_expression" | "public_field_definition" => parent,
        _ => node,
    }
}

/// Declared name, or the name of the binding the function is assigned to
fn function_name(node: Node<'_>, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(text_of(name, source).to_string());
    }
    let parent = node.parent()?;
    let field = match parent.kind() {
        "variable_declarator" | "public_field_definition" => "name",
        "pair" => "key",
        "assignment_expression" => "left",
        _ => return None,
    };
    parent
        .child_by_field_name(field)
        .map(|n| text_of(n, source).to_string())
}

/// Indentation of the first body line, when it sits on its own line
fn body_indent(block: Node<'_>, source: &str) -> Option<String> {
    let first = named_children(block).into_iter().next()?;
    (first.start_position().row > block.start_position().row)
        .then(|| line_indent(source, first.start_byte()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use useai_directive::{FunctionCandidate, Statement};

    #[test]
    fn collects_every_function_form() {
        let src = r"
function a() { return 1; }
const b = function () { return 2; };
const c = () => { return 3; };
const d = () => 4;
class K { m() { return 5; } }
function* g() { yield 6; }
";
        let file = SourceFile::parse(src, Dialect::TypeScript).unwrap();
        let kinds: Vec<_> = file.functions().iter().map(FunctionNode::kind).collect();
        assert_eq!(
            kinds,
            vec![
                FunctionKind::Declaration,
                FunctionKind::Expression,
                FunctionKind::Arrow,
                FunctionKind::Arrow,
                FunctionKind::Method,
                FunctionKind::Generator,
            ]
        );
        let names: Vec<_> = file.functions().iter().map(|f| f.display_name()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "m", "g"]);
        assert!(!file.functions()[3].has_body());
    }

    #[test]
    fn signature_of_bound_arrow_starts_at_declaration() {
        let src = "export const add = (a: number, b: number): number => {\n  'use ai'\n  throw 1\n}\n";
        let file = SourceFile::parse(src, Dialect::TypeScript).unwrap();
        let f = &file.functions()[0];
        assert_eq!(f.signature_text(), "const add = (a: number, b: number): number =>");
        assert!(f.source_text().starts_with("const add"));
    }

    #[test]
    fn signature_of_declaration() {
        let src = "async function fetchUser(id: string): Promise<User> {\n  return db(id)\n}";
        let file = SourceFile::parse(src, Dialect::TypeScript).unwrap();
        assert_eq!(
            file.functions()[0].signature_text(),
            "async function fetchUser(id: string): Promise<User>"
        );
    }

    #[test]
    fn object_method_and_pair_names() {
        let src = "const o = { k: function () { return 1 }, m() { return 2 } };";
        let file = SourceFile::parse(src, Dialect::TypeScript).unwrap();
        let names: Vec<_> = file.functions().iter().map(|f| f.display_name()).collect();
        assert_eq!(names, vec!["k", "m"]);
        assert_eq!(file.functions()[0].signature_text(), "k: function ()");
    }

    #[test]
    fn render_without_edits_is_identity() {
        let src = "function f() {\n  'use ai'\n  throw new Error('x')\n}\n// trailing\n";
        let file = SourceFile::parse(src, Dialect::TypeScript).unwrap();
        assert_eq!(file.render(), src);
    }

    #[test]
    fn render_rewritten_body() {
        let src = "class C {\n  add(a, b) {\n    'use ai'\n    throw new Error('x')\n  }\n}\n";
        let mut file = SourceFile::parse(src, Dialect::TypeScript).unwrap();
        let f = &mut file.functions_mut()[0];
        f.replace_body(vec![Statement::new("return_statement", "return a + b;")]);
        f.clear_directive_prologue();

        assert_eq!(
            file.render(),
            "class C {\n  add(a, b) {\n    return a + b;\n  }\n}\n"
        );
        assert_eq!(file.rewritten_count(), 1);
    }

    #[test]
    fn nested_rewrite_inside_rewritten_outer_is_dropped() {
        let src = "function outer() {\n  function inner() {\n    return 1\n  }\n}\n";
        let mut file = SourceFile::parse(src, Dialect::TypeScript).unwrap();
        file.functions_mut()[1].replace_body(vec![Statement::new("return_statement", "return 2;")]);
        file.functions_mut()[0].replace_body(vec![Statement::new("return_statement", "return 3;")]);

        assert_eq!(file.render(), "function outer() {\n  return 3;\n}\n");
    }

    #[test]
    fn tsx_dialect_accepts_jsx() {
        let src = "const View = () => {\n  return <div>hi</div>;\n};";
        let file = SourceFile::parse(src, Dialect::Tsx).unwrap();
        assert_eq!(file.functions()[0].display_name(), "View");
    }

    #[test]
    fn syntax_error_rejected() {
        let err = SourceFile::parse("function (", Dialect::TypeScript).unwrap_err();
        assert!(matches!(err, SyntaxError::Syntax { .. }));
    }
}
