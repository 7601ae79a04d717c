//! Case intake model
//!
//! A case is the upstream unit of work artifacts are derived from. The
//! intake flow that creates and answers cases lives outside this workspace;
//! the pipeline reads cases and advances only their status field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

use crate::artifact::ArtifactKind;
use crate::ids::CaseId;

/// Lifecycle state of a case as driven by the intake flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Draft,
    InProgress,
    ReadyForArtifacts,
    ArtifactsGenerated,
    Approved,
}

impl CaseStatus {
    /// Stable string form used in payloads
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::ReadyForArtifacts => "ready_for_artifacts",
            Self::ArtifactsGenerated => "artifacts_generated",
            Self::Approved => "approved",
        }
    }
}

impl Display for CaseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One follow-up question raised during intake, possibly answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationItem {
    /// Position in the intake conversation
    pub order_index: u32,
    /// Stable question code
    pub code: String,
    /// Question text shown to the requester
    pub text: String,
    pub answer: Option<String>,
    /// Kinds this clarification was raised for (empty = all)
    pub target_kinds: Vec<ArtifactKind>,
    pub answered: bool,
}

impl ClarificationItem {
    /// Pending question without an answer
    #[must_use]
    pub fn new(order_index: u32, code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            order_index,
            code: code.into(),
            text: text.into(),
            answer: None,
            target_kinds: Vec::new(),
            answered: false,
        }
    }

    /// Record the requester's answer and mark the item answered
    #[must_use]
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self.answered = true;
        self
    }

    /// Restrict the clarification to specific artifact kinds
    #[must_use]
    pub fn with_target_kinds(mut self, kinds: impl IntoIterator<Item = ArtifactKind>) -> Self {
        self.target_kinds = kinds.into_iter().collect();
        self
    }
}

/// A case as seen by the artifact pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub title: String,
    pub status: CaseStatus,
    /// Raw intake answers keyed by question code
    pub intake_answers: Value,
    /// Artifact kinds the intake flow selected for generation
    pub selected_kinds: Vec<ArtifactKind>,
    /// Key of the downstream wiki space, when publishing is configured
    pub workspace_key: Option<String>,
    pub workspace_name: Option<String>,
    pub clarifications: Vec<ClarificationItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Create a draft case with empty intake data
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CaseId::new(),
            title: title.into(),
            status: CaseStatus::Draft,
            intake_answers: Value::Object(serde_json::Map::new()),
            selected_kinds: Vec::new(),
            workspace_key: None,
            workspace_name: None,
            clarifications: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the lifecycle status
    #[must_use]
    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the raw intake answers object
    #[must_use]
    pub fn with_intake_answers(mut self, answers: Value) -> Self {
        self.intake_answers = answers;
        self
    }

    /// Select artifact kinds for generation
    #[must_use]
    pub fn with_selected_kinds(mut self, kinds: impl IntoIterator<Item = ArtifactKind>) -> Self {
        self.selected_kinds = kinds.into_iter().collect();
        self
    }

    /// Attach the downstream wiki space
    #[must_use]
    pub fn with_workspace(mut self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.workspace_key = Some(key.into());
        self.workspace_name = Some(name.into());
        self
    }

    /// Append one clarification item
    #[must_use]
    pub fn with_clarification(mut self, item: ClarificationItem) -> Self {
        self.clarifications.push(item);
        self
    }

    /// Answered clarifications in intake order
    #[must_use]
    pub fn answered_clarifications(&self) -> Vec<&ClarificationItem> {
        let mut items: Vec<&ClarificationItem> =
            self.clarifications.iter().filter(|c| c.answered).collect();
        items.sort_by_key(|c| c.order_index);
        items
    }

    /// One raw intake answer by question code, trimmed, if non-empty
    #[must_use]
    pub fn intake_answer(&self, code: &str) -> Option<&str> {
        self.intake_answers
            .get(code)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_case_is_draft_and_empty() {
        let case = Case::new("Portal");
        assert_eq!(case.status, CaseStatus::Draft);
        assert!(case.selected_kinds.is_empty());
        assert!(case.clarifications.is_empty());
        assert_eq!(case.intake_answers, json!({}));
    }

    #[test]
    fn builders_compose() {
        let case = Case::new("Portal")
            .with_status(CaseStatus::ReadyForArtifacts)
            .with_selected_kinds([ArtifactKind::Vision, ArtifactKind::Bpmn])
            .with_workspace("REQ", "Requests");

        assert_eq!(case.status, CaseStatus::ReadyForArtifacts);
        assert_eq!(
            case.selected_kinds,
            vec![ArtifactKind::Vision, ArtifactKind::Bpmn]
        );
        assert_eq!(case.workspace_key.as_deref(), Some("REQ"));
        assert_eq!(case.workspace_name.as_deref(), Some("Requests"));
    }

    #[test]
    fn answered_clarifications_filter_and_sort() {
        let case = Case::new("Portal")
            .with_clarification(
                ClarificationItem::new(2, "q2", "Which systems?").with_answer("CRM and billing"),
            )
            .with_clarification(ClarificationItem::new(3, "q3", "Deadline?"))
            .with_clarification(
                ClarificationItem::new(1, "q1", "Who approves?").with_answer("The BA team"),
            );

        let answered = case.answered_clarifications();
        let codes: Vec<&str> = answered.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["q1", "q2"]);
    }

    #[test]
    fn intake_answer_trims_and_skips_blank() {
        let case = Case::new("Portal").with_intake_answers(json!({
            "idea": "  automate approvals  ",
            "user_actions": "   ",
            "count": 7,
        }));

        assert_eq!(case.intake_answer("idea"), Some("automate approvals"));
        assert_eq!(case.intake_answer("user_actions"), None);
        assert_eq!(case.intake_answer("count"), None);
        assert_eq!(case.intake_answer("missing"), None);
    }

    #[test]
    fn case_status_string_forms() {
        assert_eq!(CaseStatus::ReadyForArtifacts.as_str(), "ready_for_artifacts");
        assert_eq!(
            serde_json::to_string(&CaseStatus::ArtifactsGenerated).unwrap(),
            "\"artifacts_generated\""
        );
    }
}
