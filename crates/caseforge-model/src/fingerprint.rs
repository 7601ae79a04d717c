//! Context fingerprinting primitives
//!
//! Provides [`Fingerprint`], a strongly-typed 32-byte SHA-256 digest used
//! as the staleness signal for generated artifacts.

use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::canon::to_canonical_json;

/// A 32-byte SHA-256 fingerprint
///
/// Computed over canonical JSON so that two logically identical payloads
/// always produce the same digest. Immutable and cheap to clone (Copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Create a new Fingerprint from raw bytes
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

    /// Convert to byte array (consumes self)
    #[inline]
    #[must_use]
    pub const fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Create fingerprint from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FingerprintError> {
        if bytes.len() != 32 {
            return Err(FingerprintError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Compute SHA-256 of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self::new(digest.into())
    }

    /// Compute SHA-256 of a UTF-8 text
    #[inline]
    #[must_use]
    pub fn compute_text(text: &str) -> Self {
        Self::compute(text.as_bytes())
    }

    /// Compute SHA-256 of a JSON value in canonical form
    ///
    /// Canonical form sorts object keys and uses compact separators, so the
    /// digest does not depend on map insertion order.
    #[inline]
    #[must_use]
    pub fn compute_json(value: &serde_json::Value) -> Self {
        Self::compute_text(&to_canonical_json(value))
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }

    /// Check if fingerprint is all zeros (placeholder/uninitialized)
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8; 32]> for Fingerprint {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self([0; 32])
    }
}

// Serde implementations: hex string in human-readable formats
impl serde::Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FingerprintVisitor;

        impl<'de> serde::de::Visitor<'de> for FingerprintVisitor {
            type Value = Fingerprint;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 32-byte fingerprint as hex string or byte array")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Fingerprint::from_slice(value).map_err(serde::de::Error::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut arr = [0u8; 32];
                for (i, byte) in arr.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &"32 bytes"))?;
                }
                Ok(Fingerprint::new(arr))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(FingerprintVisitor)
        } else {
            deserializer.deserialize_bytes(FingerprintVisitor)
        }
    }
}

/// Errors that can occur when working with fingerprints
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    /// Invalid fingerprint length
    #[error("invalid fingerprint length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fingerprint_new_and_access() {
        let bytes = [7u8; 32];
        let fp = Fingerprint::new(bytes);
        assert_eq!(fp.as_bytes(), &bytes);
        assert_eq!(fp.into_bytes(), bytes);
    }

    #[test]
    fn fingerprint_from_slice_invalid_length() {
        let bytes = vec![1u8; 31];
        let result = Fingerprint::from_slice(&bytes);
        assert!(matches!(
            result,
            Err(FingerprintError::InvalidLength { expected: 32, actual: 31 })
        ));
    }

    #[test]
    fn fingerprint_compute_deterministic() {
        let h1 = Fingerprint::compute(b"case context");
        let h2 = Fingerprint::compute(b"case context");
        assert_eq!(h1, h2);
    }

    #[test]
    fn fingerprint_compute_known_vector() {
        // SHA-256 of the empty input
        let fp = Fingerprint::compute(b"");
        assert_eq!(
            fp.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_json_ignores_key_order() {
        let a = json!({"title": "Portal", "status": "draft"});
        let b = json!({"status": "draft", "title": "Portal"});
        assert_eq!(Fingerprint::compute_json(&a), Fingerprint::compute_json(&b));
    }

    #[test]
    fn fingerprint_json_sensitive_to_values() {
        let a = json!({"title": "Portal"});
        let b = json!({"title": "Portal v2"});
        assert_ne!(Fingerprint::compute_json(&a), Fingerprint::compute_json(&b));
    }

    #[test]
    fn fingerprint_display_and_parse() {
        let fp = Fingerprint::compute(b"roundtrip");
        let parsed: Fingerprint = fp.to_string().parse().unwrap();
        assert_eq!(fp, parsed);
    }

    #[test]
    fn fingerprint_short() {
        let fp = Fingerprint::compute(b"short");
        assert_eq!(fp.short().len(), 16); // 8 bytes = 16 hex chars
        assert!(fp.to_string().starts_with(&fp.short()));
    }

    #[test]
    fn fingerprint_is_zero() {
        assert!(Fingerprint::default().is_zero());
        assert!(!Fingerprint::compute(b"x").is_zero());
    }

    #[test]
    fn fingerprint_serde_human_readable_hex() {
        let fp = Fingerprint::compute(b"serde");
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, format!("\"{fp}\""));
        let decoded: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, decoded);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hex_roundtrip_any_bytes(bytes in any::<[u8; 32]>()) {
                let fp = Fingerprint::new(bytes);
                let parsed: Fingerprint = fp.to_string().parse().unwrap();
                prop_assert_eq!(fp, parsed);
            }

            #[test]
            fn compute_never_collides_with_zero(data in proptest::collection::vec(any::<u8>(), 0..256)) {
                prop_assert!(!Fingerprint::compute(&data).is_zero());
            }
        }
    }
}
