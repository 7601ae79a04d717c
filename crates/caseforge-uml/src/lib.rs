//! CaseForge PlantUML support
//!
//! Everything the pipeline needs to turn diagram source text into a
//! rendered image link and to clean up model-produced source.
//!
//! # Core Concepts
//!
//! - [`encode`]: DEFLATE + 64-symbol alphabet URL encoding
//! - [`DiagramServer`]: builds `{base}/png/{segment}` rendering links
//! - [`fix_known_syntax`] / [`strip_disallowed`] / [`ensure_markers`]:
//!   normalization passes over generated diagram source

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod encode;
mod normalize;

pub use encode::{
    encode, encode_bytes, DiagramServer, EncodeError, ALPHABET, DEFAULT_SERVER,
};
pub use normalize::{
    ensure_markers, extract_fenced, fenced, fix_known_syntax, has_markers, strip_disallowed,
    DISALLOWED_PREFIXES, EMPTY_DIAGRAM,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
