//! Cache entry record

use serde::{Deserialize, Serialize};
use useai_directive::Metadata;

/// One stored generation
///
/// Unknown fields in a stored entry are ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Fingerprint text the key was derived from
    pub signature: String,
    /// Merged metadata the key was derived from
    pub metadata: Metadata,
    /// Generated function body
    pub generated_code: String,
    /// Creation time, Unix milliseconds
    pub timestamp: i64,
}

impl CacheEntry {
    /// Create entry stamped with the current time
    #[must_use]
    pub fn new(
        signature: impl Into<String>,
        metadata: Metadata,
        generated_code: impl Into<String>,
    ) -> Self {
        Self {
            signature: signature.into(),
            metadata,
            generated_code: generated_code.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let entry = CacheEntry::new("function f()", Metadata::new(), "return 1;");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["generatedCode"], "return 1;");
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn extra_fields_ignored() {
        let raw = r#"{
            "signature": "function f()",
            "metadata": {"model": "m"},
            "generatedCode": "return 1;",
            "timestamp": 1700000000000,
            "generator": "someone-else"
        }"#;
        let entry: CacheEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.generated_code, "return 1;");
        assert_eq!(entry.metadata.model.as_deref(), Some("m"));
    }
}
