//! Testing utilities for the use-ai workspace
//!
//! Stub generation clients and source fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use useai_client::{ClientError, GenerationClient};
use useai_directive::Metadata;

/// Marked `add` stub
pub const ADD_STUB: &str = "function add(a, b) {\n  'use ai'\n  throw new Error('x')\n}\n";

/// Marked stub with hints on the directive line and below it
pub const HINTED_STUB: &str = "\
export const formatPrice = (amount: number, currency: string): string => {
  'use ai'
  // temperature=0.2
  // seed=42
  // instructions=Support USD, EUR, and GBP.
  throw new Error('not implemented')
}
";

/// Two marked functions and one ordinary function
pub const MIXED_SOURCE: &str = "\
function add(a: number, b: number): number {
  'use ai'
  throw new Error('x')
}

function keep(x: number): number {
  return x * 2;
}

class Calculator {
  multiply(a: number, b: number): number {
    'use ai' // temperature=0.1
    throw new Error('x')
  }
}
";

/// Client answering every prompt with the same text
#[derive(Debug, Default)]
pub struct StubClient {
    response: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    metadata: Mutex<Vec<Metadata>>,
}

impl StubClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn metadata(&self) -> Vec<Metadata> {
        self.metadata.lock().clone()
    }
}

#[async_trait]
impl GenerationClient for StubClient {
    async fn generate(&self, prompt: &str, metadata: &Metadata) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        self.metadata.lock().push(metadata.clone());
        Ok(useai_client::strip_fences(&self.response))
    }
}

/// Client choosing its answer by a substring of the prompt
#[derive(Debug, Default)]
pub struct ScriptedClient {
    rules: Vec<(String, String)>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `response` to prompts containing `needle`
    #[must_use]
    pub fn when(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules.push((needle.into(), response.into()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, prompt: &str, _metadata: &Metadata) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| ClientError::InvalidResponse {
                payload: "no scripted response".to_string(),
            })
    }
}

/// Client failing every request
#[derive(Debug, Default)]
pub struct FailingClient {
    calls: AtomicUsize,
}

impl FailingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationClient for FailingClient {
    async fn generate(&self, _prompt: &str, _metadata: &Metadata) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ClientError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

/// Temporary directory with a cache file path inside it
pub fn temp_cache() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".ai-cache.json");
    (dir, path)
}
