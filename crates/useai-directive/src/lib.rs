//! use-ai directive layer
//!
//! Decides whether a function-like construct is a generation target and
//! extracts the inline generation hints that travel with it.
//!
//! # Core Concepts
//!
//! - [`FunctionBody`]: syntax-neutral view of a block body (directive
//!   prologue, hint comments, statements)
//! - [`FunctionCandidate`]: capability every host node exposes to the pipeline
//! - [`Metadata`]: flat, optional generation options parsed from hint comments
//! - [`detect`]: marker detection and metadata extraction
//!
//! # Example
//!
//! ```rust,ignore
//! use useai_directive::{detect, FunctionCandidate};
//!
//! if let Some(metadata) = detect::extract(&node) {
//!     println!("target with model {:?}", metadata.model);
//! }
//! ```

#![warn(unreachable_pub)]

pub mod body;
pub mod candidate;
pub mod detect;
pub mod hints;
pub mod metadata;

pub use body::{Comment, Directive, FunctionBody, Statement};
pub use candidate::FunctionCandidate;
pub use detect::{is_target, MARKER};
pub use metadata::{HintValue, Metadata};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
