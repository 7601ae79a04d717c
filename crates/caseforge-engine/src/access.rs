//! Caller access predicate
//!
//! The engine never derives roles or ownership itself; mutating entry
//! points take the caller's already-made access decision as an opaque
//! predicate and refuse before touching any lock or state.

use caseforge_model::CaseId;

/// Opaque "requester can modify this case" decision
pub trait CaseAccess: Send + Sync {
    /// Whether the caller may mutate artifacts of this case
    fn can_modify(&self, case_id: CaseId) -> bool;
}

/// Predicate that admits every caller
///
/// The default for embedders that enforce access upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl CaseAccess for AllowAll {
    fn can_modify(&self, _case_id: CaseId) -> bool {
        true
    }
}

/// Predicate that rejects every caller
///
/// Useful for read-only embeddings and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl CaseAccess for DenyAll {
    fn can_modify(&self, _case_id: CaseId) -> bool {
        false
    }
}

impl<F> CaseAccess for F
where
    F: Fn(CaseId) -> bool + Send + Sync,
{
    fn can_modify(&self, case_id: CaseId) -> bool {
        self(case_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_all_admits() {
        assert!(AllowAll.can_modify(CaseId::new()));
    }

    #[test]
    fn deny_all_rejects() {
        assert!(!DenyAll.can_modify(CaseId::new()));
    }

    #[test]
    fn closures_are_predicates() {
        let owned = CaseId::new();
        let predicate = move |case_id: CaseId| case_id == owned;
        assert!(predicate.can_modify(owned));
        assert!(!predicate.can_modify(CaseId::new()));
    }
}
