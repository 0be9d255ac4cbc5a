//! use-ai generation client
//!
//! [`GenerationClient`] is the only way the pipeline reaches the generation
//! service. [`OpenRouterClient`] speaks the OpenRouter chat-completions
//! protocol; tests substitute their own implementations.

#![warn(unreachable_pub)]

mod client;
mod error;
mod fence;
mod openrouter;
mod wire;

pub use client::GenerationClient;
pub use error::ClientError;
pub use fence::strip_fences;
pub use openrouter::{ClientSettings, OpenRouterClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use wire::{ChatMessage, ChatRequest};

/// Model used when neither hints nor configuration name one
pub const DEFAULT_MODEL: &str = "openai/gpt-4-turbo";

/// Temperature used when neither hints nor configuration set one
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
