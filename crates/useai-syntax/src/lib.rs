//! use-ai source model
//!
//! tree-sitter based host for the generation pipeline:
//!
//! - [`SourceFile`]: parses a TypeScript/TSX/JavaScript file and exposes each
//!   function-like construct as a [`FunctionNode`]
//! - [`FunctionNode`]: implements [`FunctionCandidate`](useai_directive::FunctionCandidate)
//! - [`BodyParser`]: turns generated text back into statements
//!
//! # Architecture
//!
//! ```text
//! source text → tree-sitter → FunctionNode* → (pipeline rewrites bodies) → render → source text'
//! ```

#![warn(unreachable_pub)]

mod body_parser;
mod dialect;
mod error;
mod function;
mod lower;
mod source;
mod tree;

pub use body_parser::{BodyParser, TreeSitterBodyParser};
pub use dialect::Dialect;
pub use error::SyntaxError;
pub use function::{FunctionKind, FunctionNode};
pub use source::SourceFile;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
