//! Context snapshot builder
//!
//! Normalizes a case's inputs into one canonical payload whose fingerprint
//! is the staleness signal for the whole pipeline. Built once per batch and
//! shared by every kind, so all artifacts written together carry the same
//! fingerprint.

use serde_json::{json, Value};

use crate::canon::to_canonical_json;
use crate::case::Case;
use crate::fingerprint::Fingerprint;
use crate::ids::CaseId;

/// Canonical view of a case's generation-relevant inputs
#[derive(Debug, Clone)]
pub struct ContextSnapshot {
    case_id: CaseId,
    case_title: String,
    payload: Value,
    fingerprint: Fingerprint,
}

impl ContextSnapshot {
    /// Build the canonical payload for a case and fingerprint it
    ///
    /// The payload combines the case header, raw intake answers, selected
    /// kinds and all answered clarifications in intake order. Unanswered
    /// clarifications are excluded so a pending question does not churn
    /// the fingerprint.
    #[must_use]
    pub fn build(case: &Case) -> Self {
        let clarifications: Vec<Value> = case
            .answered_clarifications()
            .into_iter()
            .map(|item| {
                json!({
                    "order_index": item.order_index,
                    "code": item.code,
                    "text": item.text,
                    "answer": item.answer,
                    "target_kinds": item.target_kinds,
                })
            })
            .collect();

        let payload = json!({
            "case": {
                "id": case.id,
                "title": case.title,
                "status": case.status,
                "intake_answers": case.intake_answers,
                "selected_kinds": case.selected_kinds,
                "workspace_key": case.workspace_key,
                "workspace_name": case.workspace_name,
            },
            "clarifications": clarifications,
        });
        let fingerprint = Fingerprint::compute_json(&payload);

        Self {
            case_id: case.id,
            case_title: case.title.clone(),
            payload,
            fingerprint,
        }
    }

    #[inline]
    #[must_use]
    pub fn case_id(&self) -> CaseId {
        self.case_id
    }

    #[inline]
    #[must_use]
    pub fn case_title(&self) -> &str {
        &self.case_title
    }

    /// The full payload as built (kept for embedding into prompts)
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Canonical serialized payload (exactly what the fingerprint hashes)
    #[must_use]
    pub fn canonical_payload(&self) -> String {
        to_canonical_json(&self.payload)
    }

    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// One raw intake answer from the payload, trimmed, if non-empty
    #[must_use]
    pub fn intake_answer(&self, code: &str) -> Option<&str> {
        self.payload
            .get("case")
            .and_then(|c| c.get("intake_answers"))
            .and_then(|answers| answers.get(code))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
