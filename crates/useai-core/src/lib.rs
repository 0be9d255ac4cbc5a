//! use-ai core
//!
//! Turns functions marked with the `"use ai"` directive into implemented
//! functions:
//! - Resolves plugin configuration once at setup
//! - Claims marked functions and merges their inline hints over defaults
//! - Builds deterministic prompts
//! - Serves generated bodies from the cache or the generation service
//! - Splices parsed bodies into the source, all-or-nothing per function
//!
//! # Example
//!
//! ```rust,ignore
//! use useai_core::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PluginConfig::resolve(PluginOptions::new())?;
//! let generator = Generator::from_config(config)?;
//!
//! let output = generator
//!     .transform_source("function add(a: number, b: number) { 'use ai' }", Dialect::TypeScript)
//!     .await?;
//! println!("{}", output.code);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod splice;

pub use config::{FingerprintMode, PluginConfig, PluginOptions, Scheduling, API_KEY_ENV, CONFIG_FILE};
pub use error::{ConfigError, GenerateError, SpliceError, TransformError};
pub use pipeline::{scan, GenerationRequest, Generator, Target, Transform, TransformOutput};
pub use prompt::{build_prompt, UNINFERABLE_MESSAGE};
pub use splice::splice_body;

pub use useai_syntax::Dialect;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with use-ai
    pub use crate::{
        Dialect, Generator, PluginConfig, PluginOptions, Scheduling, TransformError,
        TransformOutput,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
