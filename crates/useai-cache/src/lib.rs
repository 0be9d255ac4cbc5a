//! use-ai generation cache
//!
//! Persistent key-value store mapping a deterministic fingerprint of
//! `{signature, metadata}` to a previously generated function body. It is the
//! sole gate on whether the generation service gets called.
//!
//! # Durability
//!
//! The JSON file **is** the cache. A missing or corrupt file starts an empty
//! cache; a failed write is logged and swallowed. Builds stay correct with a
//! read-only or broken cache file and only lose the reuse.
//!
//! # Example
//!
//! ```rust,ignore
//! use useai_cache::GenerationCache;
//! use useai_directive::Metadata;
//!
//! let cache = GenerationCache::open(".ai-cache.json");
//! let metadata = Metadata::new().with_temperature(0.7);
//!
//! if cache.get("function add(a, b)", &metadata).is_none() {
//!     cache.set("function add(a, b)", &metadata, "return a + b;");
//! }
//! ```

#![warn(unreachable_pub)]

mod entry;
mod error;
mod key;
mod store;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use key::{CacheKey, KeyError};
pub use store::{GenerationCache, DEFAULT_CACHE_FILE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
