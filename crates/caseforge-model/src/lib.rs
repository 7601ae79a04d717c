//! CaseForge domain model
//!
//! Core types shared by every crate in the workspace.
//!
//! # Core Concepts
//!
//! - [`Case`]: upstream intake unit artifacts are derived from
//! - [`Artifact`]: one derived output per (case, kind) pair
//! - [`ArtifactVersion`]: immutable snapshot of an artifact's state
//! - [`ContextSnapshot`]: canonical payload plus its staleness fingerprint
//! - [`Fingerprint`]: strongly-typed 32-byte SHA-256 digest
//!
//! # Example
//!
//! ```rust,ignore
//! use caseforge_model::{Case, ContextSnapshot};
//!
//! let case = Case::new("Request portal");
//! let snapshot = ContextSnapshot::build(&case);
//!
//! // The fingerprint is the staleness signal for generated artifacts
//! println!("Context: {}", snapshot.fingerprint());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod artifact;
mod canon;
mod case;
mod context;
mod fingerprint;
mod ids;
mod version;

// Re-exports
pub use artifact::{
    Artifact, ArtifactKind, GenerationOutcome, GenerationStatus, KindParseError, ReviewStatus,
};
pub use canon::to_canonical_json;
pub use case::{Case, CaseStatus, ClarificationItem};
pub use context::ContextSnapshot;
pub use fingerprint::{Fingerprint, FingerprintError};
pub use ids::{ArtifactId, CaseId};
pub use version::{ArtifactVersion, VersionReason};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
