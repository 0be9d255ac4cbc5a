//! Directive detection and metadata extraction

use crate::body::FunctionBody;
use crate::candidate::FunctionCandidate;
use crate::hints;
use crate::metadata::Metadata;

/// Directive value marking a stub for generation
///
/// Matched exactly: case and whitespace sensitive.
pub const MARKER: &str = "use ai";

/// Whether the body's first statement is the marker directive
#[inline]
#[must_use]
pub fn is_target(body: &FunctionBody) -> bool {
    body.directives.first().is_some_and(|d| d.value == MARKER)
}

/// Read the generation hints attached to a marked body
///
/// The trailing comment on the directive line is parsed first; the comment
/// lines ahead of the first real statement override it key by key. Only the
/// keys present in the source appear in the result.
#[must_use]
pub fn extract_metadata(body: &FunctionBody) -> Metadata {
    let Some(directive) = body.directives.iter().find(|d| d.value == MARKER) else {
        return Metadata::new();
    };

    let trailing = directive
        .trailing_comment
        .as_ref()
        .map(|c| hints::parse_block(c.lines()))
        .unwrap_or_default();

    let leading = hints::parse_block(body.hint_comments.iter().flat_map(|c| c.lines()));

    trailing.overlay(leading)
}

/// Claim a candidate: `Some(metadata)` when it is a generation target
///
/// Bodies without statements or directives are rejected before any other
/// inspection.
#[must_use]
pub fn extract<C>(candidate: &C) -> Option<Metadata>
where
    C: FunctionCandidate + ?Sized,
{
    let body = candidate.body()?;
    if body.is_empty() || !is_target(body) {
        return None;
    }
    Some(extract_metadata(body))
}
