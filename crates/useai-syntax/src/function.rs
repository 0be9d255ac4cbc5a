//! Function-like constructs found in a source file

use std::ops::Range;
use useai_directive::{FunctionBody, FunctionCandidate, Statement};

/// Syntactic form of a function-like construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// `function name() {}`
    Declaration,
    /// `function () {}` in expression position
    Expression,
    /// `() => {}` with a block body
    Arrow,
    /// Class or object-literal method
    Method,
    /// `function* name() {}` or `function* () {}`
    Generator,
}

impl FunctionKind {
    /// Map a tree-sitter node kind
    #[must_use]
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "function_declaration" => Some(Self::Declaration),
            "function_expression" | "function" => Some(Self::Expression),
            "arrow_function" => Some(Self::Arrow),
            "method_definition" => Some(Self::Method),
            "generator_function_declaration" | "generator_function" => Some(Self::Generator),
            _ => None,
        }
    }
}

/// One function-like construct and its (possibly rewritten) body
#[derive(Debug, Clone)]
pub struct FunctionNode {
    pub(crate) kind: FunctionKind,
    pub(crate) name: Option<String>,
    pub(crate) signature: String,
    pub(crate) source: String,
    pub(crate) range: Range<usize>,
    pub(crate) body_range: Option<Range<usize>>,
    pub(crate) body: Option<FunctionBody>,
    pub(crate) outer_indent: String,
    pub(crate) inner_indent: String,
    pub(crate) rewritten: bool,
}

impl FunctionNode {
    /// Syntactic form
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Byte range of the whole construct, from the start of its signature
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Byte range of the block body, braces included
    #[inline]
    #[must_use]
    pub fn body_range(&self) -> Option<Range<usize>> {
        self.body_range.clone()
    }

    /// Whether the body was changed since parsing
    #[inline]
    #[must_use]
    pub fn is_rewritten(&self) -> bool {
        self.rewritten
    }

    /// Render the current body as block source, braces included
    #[must_use]
    pub fn render_body(&self) -> String {
        let Some(body) = &self.body else {
            return "{}".to_string();
        };

        let mut out = String::from("{\n");
        for directive in &body.directives {
            out.push_str(&self.inner_indent);
            let quote = if directive.value.contains('\'') { '"' } else { '\'' };
            out.push_str(&format!("{quote}{}{quote};", directive.value));
            if let Some(comment) = &directive.trailing_comment {
                out.push_str(&format!(" // {}", comment.text.replace('\n', " ")));
            }
            out.push('\n');
        }
        for comment in &body.hint_comments {
            for line in comment.lines() {
                out.push_str(&format!("{}// {line}\n", self.inner_indent));
            }
        }
        for statement in &body.statements {
            push_statement(&mut out, statement, &self.inner_indent);
        }
        out.push_str(&self.outer_indent);
        out.push('}');
        out
    }
}

/// Append a statement, indenting each of its lines
///
/// Lines that begin inside a template literal are copied verbatim so the
/// literal's content is not altered.
fn push_statement(out: &mut String, statement: &Statement, indent: &str) {
    let mut in_template = false;
    for line in statement.text.lines() {
        let starts_inside = in_template;
        in_template = template_open_after(line, in_template);
        if !starts_inside && !line.trim().is_empty() {
            out.push_str(indent);
        }
        out.push_str(if in_template { line } else { line.trim_end() });
        out.push('\n');
    }
}

/// Whether a template literal is still open at the end of `line`
///
/// Backticks inside quoted strings and escaped backticks do not count.
/// Substitutions (`${...}`) are not tracked.
fn template_open_after(line: &str, mut open: bool) -> bool {
    let mut quote = None;
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '`' if quote.is_none() => open = !open,
            '\'' | '"' if !open => {
                quote = match quote {
                    None => Some(c),
                    Some(q) if q == c => None,
                    other => other,
                };
            }
            _ => {}
        }
    }
    open
}

impl FunctionCandidate for FunctionNode {
    fn body(&self) -> Option<&FunctionBody> {
        self.body.as_ref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn signature_text(&self) -> &str {
        &self.signature
    }

    fn source_text(&self) -> &str {
        &self.source
    }

    fn replace_body(&mut self, statements: Vec<Statement>) {
        if let Some(body) = self.body.as_mut() {
            body.replace_statements(statements);
            self.rewritten = true;
        }
    }

    fn clear_directive_prologue(&mut self) {
        if let Some(body) = self.body.as_mut() {
            body.clear_directives();
            self.rewritten = true;
        }
    }
}
