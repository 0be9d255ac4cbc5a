//! Cache keys
//!
//! [`CacheKey`] is the SHA-256 digest of the canonical JSON serialization of
//! `{signature, metadata}`. Equal text and equal metadata give equal keys;
//! any differing metadata field gives a different key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use useai_directive::Metadata;

/// Serialized key material; field order is part of the key format
#[derive(Serialize)]
struct KeyMaterial<'a> {
    signature: &'a str,
    metadata: &'a Metadata,
}

/// A 32-byte SHA-256 cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Create key from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create key from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// SHA-256 of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Key for a `{signature, metadata}` pair
    #[must_use]
    pub fn for_pair(signature: &str, metadata: &Metadata) -> Self {
        let material = KeyMaterial {
            signature,
            metadata,
        };
        // strings and finite numbers only; serialization cannot fail
        let json = serde_json::to_vec(&material).unwrap_or_default();
        Self::compute(&json)
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for CacheKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for CacheKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CacheKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors when decoding a cache key
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Invalid key length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected hex length
        expected: usize,
        /// Length of the given text
        actual: usize,
    },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_digest() {
        // sha256("abc")
        assert_eq!(
            CacheKey::compute(b"abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn pair_key_is_deterministic() {
        let m = Metadata::new().with_model("m").with_temperature(0.7);
        assert_eq!(
            CacheKey::for_pair("function f()", &m),
            CacheKey::for_pair("function f()", &m.clone())
        );
    }

    #[test]
    fn every_metadata_field_changes_the_key() {
        let base = Metadata::new()
            .with_model("m")
            .with_temperature(0.7)
            .with_seed(1_i64)
            .with_instructions("x");
        let k = CacheKey::for_pair("function f()", &base);

        let variants = [
            base.clone().with_model("n"),
            base.clone().with_temperature(0.8),
            base.clone().with_seed(2_i64),
            base.clone().with_instructions("y"),
            Metadata {
                seed: None,
                ..base.clone()
            },
        ];
        for variant in &variants {
            assert_ne!(k, CacheKey::for_pair("function f()", variant));
        }
        assert_ne!(k, CacheKey::for_pair("function g()", &base));
    }

    #[test]
    fn display_and_parse() {
        let key = CacheKey::compute(b"test");
        let parsed: CacheKey = key.to_string().parse().unwrap();
        assert_eq!(key, parsed);
        assert!(key.to_string().starts_with(&key.short()));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(matches!(
            "abcd".parse::<CacheKey>(),
            Err(KeyError::InvalidLength { expected: 32, actual: 2 })
        ));
        assert!(matches!("zz".parse::<CacheKey>(), Err(KeyError::HexDecode(_))));
    }

    #[test]
    fn serde_as_hex_string() {
        let key = CacheKey::compute(b"test");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{key}\""));
        let decoded: CacheKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, decoded);
    }

    proptest! {
        #[test]
        fn fingerprint_stable(sig in ".{0,64}", model in "[a-z/-]{1,20}", t in 0.0f64..2.0) {
            let m = Metadata::new().with_model(model).with_temperature(t);
            prop_assert_eq!(CacheKey::for_pair(&sig, &m), CacheKey::for_pair(&sig, &m));
        }

        #[test]
        fn fingerprint_sensitive_to_temperature(sig in ".{0,64}", a in 0.0f64..2.0, b in 0.0f64..2.0) {
            prop_assume!(a != b);
            let ka = CacheKey::for_pair(&sig, &Metadata::new().with_temperature(a));
            let kb = CacheKey::for_pair(&sig, &Metadata::new().with_temperature(b));
            prop_assert_ne!(ka, kb);
        }
    }
}
