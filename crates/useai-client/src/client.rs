//! Generation client trait

use crate::ClientError;
use async_trait::async_trait;
use useai_directive::Metadata;

/// Sends a prompt to a generation service and returns the produced code
///
/// Returned text is already cleaned: trimmed, with markdown fences removed.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate code for `prompt` using the merged `metadata`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status, or a
    /// response without usable content.
    async fn generate(&self, prompt: &str, metadata: &Metadata) -> Result<String, ClientError>;
}
