//! PlantUML URL encoding
//!
//! Implements the encoding scheme public PlantUML servers expect in their
//! URLs: raw DEFLATE at best compression, then a 6-bit mapping over a
//! PlantUML-specific 64-symbol alphabet. The scheme must match the server
//! byte for byte, otherwise links render as garbage.

use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

/// The 64-symbol alphabet used by PlantUML short URLs
pub const ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Default public rendering server
pub const DEFAULT_SERVER: &str = "https://www.plantuml.com/plantuml";

/// Failed to compress the diagram source
#[derive(Debug, thiserror::Error)]
#[error("deflate error: {0}")]
pub struct EncodeError(#[from] std::io::Error);

/// Encode diagram source text into a PlantUML URL path segment
///
/// Identical source always yields an identical segment, which is what
/// allows the result to be cached as a plain string.
///
/// # Errors
/// Returns an error if the DEFLATE stream fails to write; with an
/// in-memory sink this does not happen in practice.
pub fn encode(source: &str) -> Result<String, EncodeError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(source.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(encode_bytes(&compressed))
}

/// Map raw bytes through the PlantUML alphabet (3 bytes -> 4 chars)
///
/// Missing trailing bytes of the final group are treated as zero, the
/// same as the reference encoder.
#[must_use]
pub fn encode_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b1 = chunk[0];
        let b2 = chunk.get(1).copied().unwrap_or(0);
        let b3 = chunk.get(2).copied().unwrap_or(0);
        append_3_bytes(&mut out, b1, b2, b3);
    }
    out
}

fn append_3_bytes(out: &mut String, b1: u8, b2: u8, b3: u8) {
    let c1 = b1 >> 2;
    let c2 = ((b1 & 0x3) << 4) | (b2 >> 4);
    let c3 = ((b2 & 0xF) << 2) | (b3 >> 6);
    let c4 = b3 & 0x3F;
    for c in [c1, c2, c3, c4] {
        out.push(ALPHABET[usize::from(c & 0x3F)] as char);
    }
}

/// Link builder for an external PlantUML rendering server
///
/// Only ever constructs URLs; fetching and parsing the rendered image is
/// the caller's concern.
#[derive(Debug, Clone)]
pub struct DiagramServer {
    base: String,
}

impl DiagramServer {
    /// Server rooted at `base` (trailing slashes are trimmed)
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    #[inline]
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Direct PNG link for a diagram source
    ///
    /// # Errors
    /// Propagates [`EncodeError`] from the encoder.
    pub fn png_url(&self, source: &str) -> Result<String, EncodeError> {
        Ok(format!("{}/png/{}", self.base, encode(source)?))
    }
}

impl Default for DiagramServer {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_byte_group_packs_to_known_chars() {
        // c1 = 0x41>>2 = 16 'G', c2 = ((0x41&3)<<4)|(0x42>>4) = 0x14 'K',
        // c3 = ((0x42&0xF)<<2)|(0x43>>6) = 0x09 '9', c4 = 0x43&0x3F = 3 '3'
        assert_eq!(encode_bytes(&[0x41, 0x42, 0x43]), "GK93");
    }

    #[test]
    fn partial_group_pads_with_zero() {
        assert_eq!(encode_bytes(&[0xFF]), "_m00");
        assert_eq!(encode_bytes(&[]), "");
    }

    #[test]
    fn encode_is_deterministic() {
        let source = "@startuml\nA->B\n@enduml";
        let a = encode(source).unwrap();
        let b = encode(source).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn encode_empty_source_is_non_empty() {
        // DEFLATE of zero input still emits a final block
        let segment = encode("").unwrap();
        assert!(!segment.is_empty());
        assert_eq!(segment, encode("").unwrap());
    }

    #[test]
    fn different_sources_differ() {
        let a = encode("@startuml\nA->B\n@enduml").unwrap();
        let b = encode("@startuml\nA->C\n@enduml").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn png_url_joins_base_and_segment() {
        let server = DiagramServer::new("https://uml.example.com/render/");
        let url = server.png_url("@startuml\nA->B\n@enduml").unwrap();
        assert!(url.starts_with("https://uml.example.com/render/png/"));
        assert!(!url.ends_with('/'));
    }

    #[test]
    fn default_server_is_public_plantuml() {
        assert_eq!(DiagramServer::default().base(), DEFAULT_SERVER);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_stays_inside_alphabet(data in proptest::collection::vec(any::<u8>(), 0..512)) {
                let encoded = encode_bytes(&data);
                prop_assert!(encoded.bytes().all(|b| ALPHABET.contains(&b)));
            }

            #[test]
            fn output_length_is_four_per_group(data in proptest::collection::vec(any::<u8>(), 0..512)) {
                let encoded = encode_bytes(&data);
                prop_assert_eq!(encoded.len(), data.len().div_ceil(3) * 4);
            }

            #[test]
            fn encode_any_text_deterministic(source in ".{0,200}") {
                prop_assert_eq!(encode(&source).unwrap(), encode(&source).unwrap());
            }
        }
    }
}
