//! Artifact lifecycle model
//!
//! One artifact exists per (case, kind) pair. Every state transition goes
//! through the methods here so the ready/structured invariant holds at all
//! call sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::fingerprint::Fingerprint;
use crate::ids::{ArtifactId, CaseId};

/// Closed set of artifact kinds the pipeline can derive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Vision document (narrative)
    #[serde(rename = "vision")]
    Vision,
    /// Scope document (narrative)
    #[serde(rename = "scope")]
    Scope,
    /// BPMN process diagram
    #[serde(rename = "bpmn")]
    Bpmn,
    /// System context diagram
    #[serde(rename = "context_diagram")]
    ContextDiagram,
    /// UML use-case diagram
    #[serde(rename = "uml_use_case_diagram")]
    UseCaseDiagram,
}

impl ArtifactKind {
    /// Every kind, in stable enum order
    pub const ALL: [Self; 5] = [
        Self::Vision,
        Self::Scope,
        Self::Bpmn,
        Self::ContextDiagram,
        Self::UseCaseDiagram,
    ];

    /// Stable string form (persisted and used in payloads)
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::Scope => "scope",
            Self::Bpmn => "bpmn",
            Self::ContextDiagram => "context_diagram",
            Self::UseCaseDiagram => "uml_use_case_diagram",
        }
    }

    /// Whether this kind renders as a diagram rather than narrative text
    #[inline]
    #[must_use]
    pub const fn is_diagram(self) -> bool {
        matches!(self, Self::Bpmn | Self::ContextDiagram | Self::UseCaseDiagram)
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vision" => Ok(Self::Vision),
            "scope" => Ok(Self::Scope),
            "bpmn" => Ok(Self::Bpmn),
            "context_diagram" => Ok(Self::ContextDiagram),
            "uml_use_case_diagram" => Ok(Self::UseCaseDiagram),
            other => Err(KindParseError(other.to_string())),
        }
    }
}

/// Error parsing an artifact kind from its string form
#[derive(Debug, thiserror::Error)]
#[error("unknown artifact kind: {0}")]
pub struct KindParseError(pub String);

/// Human review state, independent of generation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Not yet reviewed (or sent back after regeneration)
    #[default]
    Draft,
    /// Accepted by the reviewer
    Approved,
    /// Sent back for rework
    Rejected,
}

impl ReviewStatus {
    /// Stable string form
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl Display for ReviewStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derivation lifecycle of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Never attempted
    #[default]
    New,
    /// A generation attempt is in flight
    Generating,
    /// Structured data is present and schema-valid
    Ready,
    /// The last attempt failed; `error` carries the message
    Failed,
}

impl GenerationStatus {
    /// Stable string form
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl Display for GenerationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a successful generation writes back onto an artifact
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Title produced by the kind's renderer
    pub title: String,
    /// Rendered textual content
    pub content: String,
    /// Validated, normalized structured data
    pub structured: Value,
    /// Backend model that produced the output
    pub model_id: String,
    /// Prompt revision tag of the kind that generated this
    pub prompt_version: String,
    /// Digest of the exact system+user prompt pair used
    pub prompt_fingerprint: Fingerprint,
}

/// One derived output for a (case, kind) pair
///
/// # Invariants
/// - `generation == Ready` implies `structured` is present and `error` is empty
/// - `context_fingerprint` reflects the case context of the last attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub case_id: CaseId,
    pub kind: ArtifactKind,
    pub title: String,
    pub content: String,
    /// Canonical typed payload the kind's validator produced
    pub structured: Option<Value>,
    pub review: ReviewStatus,
    pub generation: GenerationStatus,
    /// Message of the last failed attempt
    pub error: Option<String>,
    pub model_id: Option<String>,
    pub prompt_version: Option<String>,
    pub prompt_fingerprint: Option<Fingerprint>,
    /// Context fingerprint at the time of the last attempt (staleness marker)
    pub context_fingerprint: Option<Fingerprint>,
    /// Cached rendering link for diagram kinds
    pub diagram_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Artifact {
    /// Blank artifact awaiting its first generation attempt
    #[must_use]
    pub fn new(case_id: CaseId, kind: ArtifactKind) -> Self {
        let now = Utc::now();
        Self {
            id: ArtifactId::new(),
            case_id,
            kind,
            title: String::new(),
            content: String::new(),
            structured: None,
            review: ReviewStatus::Draft,
            generation: GenerationStatus::New,
            error: None,
            model_id: None,
            prompt_version: None,
            prompt_fingerprint: None,
            context_fingerprint: None,
            diagram_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reset state for a (re)generation attempt
    ///
    /// Review goes back to draft and prior output is cleared. Prompt and
    /// model metadata stay untouched until the attempt succeeds, so a
    /// failed retry still shows what produced the last good output.
    pub fn begin_generation(&mut self, case_title: &str, context_fingerprint: Fingerprint) {
        self.generation = GenerationStatus::Generating;
        self.review = ReviewStatus::Draft;
        self.error = None;
        self.title = format!("{}: {case_title}", self.kind);
        self.content = String::new();
        self.structured = None;
        self.context_fingerprint = Some(context_fingerprint);
        self.touch();
    }

    /// Persist a successful generation outcome and mark the artifact ready
    pub fn finish_generation(&mut self, outcome: GenerationOutcome) {
        self.title = outcome.title;
        self.content = outcome.content;
        self.structured = Some(outcome.structured);
        self.model_id = Some(outcome.model_id);
        self.prompt_version = Some(outcome.prompt_version);
        self.prompt_fingerprint = Some(outcome.prompt_fingerprint);
        self.generation = GenerationStatus::Ready;
        self.error = None;
        self.touch();
    }

    /// Record a failed attempt
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.generation = GenerationStatus::Failed;
        self.error = Some(message.into());
        self.touch();
    }

    /// Whether the artifact can be served as-is for the given context
    ///
    /// True when structured data is present and the stored context
    /// fingerprint matches the current one. This is the sole cache-hit
    /// test used by the generation engine.
    #[inline]
    #[must_use]
    pub fn is_fresh(&self, current: Fingerprint) -> bool {
        self.structured.is_some() && self.context_fingerprint == Some(current)
    }

    /// Update the review state
    pub fn set_review(&mut self, status: ReviewStatus) {
        self.review = status;
        self.touch();
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
