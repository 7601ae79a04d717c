//! Testing utilities for the CaseForge workspace
//!
//! Shared fakes and fixtures: a scripted chat backend plus ready-made
//! cases and reply payloads.

#![allow(missing_docs)]

use std::collections::VecDeque;

use async_trait::async_trait;
use caseforge_backend::{
    BackendError, ChatBackend, ChatReply, ChatRequest, DocumentExporter, ExportError,
};
use caseforge_model::{Artifact, ArtifactKind, Case, CaseStatus, ClarificationItem};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// Chat backend that serves queued replies in order.
///
/// Each call pops the queue front; a call against an empty queue fails
/// with [`BackendError::MissingContent`]. The reply echoes the requested
/// model id, like the production backend.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<Value, BackendError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON reply.
    pub fn push_value(&self, value: Value) {
        self.replies.lock().push_back(Ok(value));
    }

    /// Queue a failing call.
    pub fn push_error(&self, error: BackendError) {
        self.replies.lock().push_back(Err(error));
    }

    /// Number of chat calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests seen so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat_json(&self, request: ChatRequest) -> Result<ChatReply, BackendError> {
        self.requests.lock().push(request.clone());
        let scripted = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or(Err(BackendError::MissingContent));
        scripted.map(|value| ChatReply {
            value,
            model: request.model,
        })
    }
}

/// Exporter that renders any artifact as `kind: title` bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubExporter;

#[async_trait]
impl DocumentExporter for StubExporter {
    async fn export(&self, artifact: &Artifact) -> Result<Vec<u8>, ExportError> {
        Ok(format!("{}: {}", artifact.kind, artifact.title).into_bytes())
    }
}

/// A case ready for generation: intake answers, a selected kind pair and
/// one answered clarification.
#[must_use]
pub fn sample_case() -> Case {
    Case::new("Client request portal")
        .with_status(CaseStatus::ReadyForArtifacts)
        .with_selected_kinds([ArtifactKind::Vision, ArtifactKind::Scope])
        .with_intake_answers(json!({
            "idea": "Let corporate clients file and track service requests online",
            "user_actions": "Submit a request, attach documents, track progress",
        }))
        .with_clarification(
            ClarificationItem::new(1, "channels", "Which channels must be supported?")
                .with_answer("Web and mobile web"),
        )
}

/// A schema-valid vision reply.
#[must_use]
pub fn vision_reply() -> Value {
    json!({
        "title": "Client request portal",
        "problem_statement": "Clients file requests by phone and email, losing time and context.",
        "business_goals": ["Cut request handling time", "Reduce manual triage"],
        "target_users": ["Corporate clients", "Support operators"],
        "expected_outcomes": ["Requests filed online end to end"],
        "success_criteria": ["80% of requests arrive through the portal"],
        "risks_and_limitations": ["Adoption depends on client onboarding"],
    })
}

/// A schema-valid scope reply.
#[must_use]
pub fn scope_reply() -> Value {
    json!({
        "summary": "Build the request portal for corporate clients.",
        "in_scope": ["Request intake form", "Status tracking"],
        "out_of_scope": ["Billing changes"],
        "business_processes_in_scope": ["Request intake", "Request triage"],
        "systems_in_scope": ["CRM", "Notification gateway"],
        "assumptions": ["CRM API is available"],
        "constraints": ["Launch within two quarters"],
    })
}

/// A schema-valid diagram reply.
#[must_use]
pub fn diagram_reply() -> Value {
    json!({
        "plantuml": "@startuml\nstart\n:File request;\n:Triage request;\nstop\n@enduml",
        "notes": ["Happy path only"],
    })
}
