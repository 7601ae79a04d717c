//! Artifact generation engine
//!
//! The orchestrator every caller goes through. One [`ArtifactEngine`]
//! owns the artifact rows, the version history and the per-case locks;
//! callers hand it a case plus an access decision and get back
//! schema-valid, versioned artifacts.
//!
//! # Core Concepts
//!
//! - **Ensure, not generate**: [`ArtifactEngine::ensure`] brings a case's
//!   artifact batch up to date. Fresh artifacts are served as-is; only
//!   missing or stale kinds cost a backend call.
//! - **Content-addressed staleness**: an artifact stays fresh while its
//!   stored context fingerprint matches the current case snapshot.
//! - **Per-kind fault isolation**: a kind that fails is recorded on its
//!   own row and in the report while sibling kinds still generate.
//! - **Lock-free reads**: lookups and listings never wait on a case
//!   lock; they see the latest committed row.

use std::collections::BTreeMap;
use std::sync::Arc;

use caseforge_backend::{ChatBackend, ChatRequest, DocumentExporter};
use caseforge_model::{
    Artifact, ArtifactKind, ArtifactVersion, Case, CaseId, CaseStatus, ContextSnapshot,
    GenerationOutcome, GenerationStatus, ReviewStatus, VersionReason,
};
use caseforge_schema::{diagram_source, placeholder_diagram};
use caseforge_uml::{extract_fenced, DiagramServer};
use parking_lot::Mutex;

use crate::access::CaseAccess;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::lock::CaseLocks;
use crate::registry::{prompt_fingerprint, ArtifactBlueprint, Registry};
use crate::store::ArtifactStore;
use crate::versions::VersionStore;

/// Counters accumulated over the engine's lifetime
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Ensure passes that made it past the access check
    pub ensure_calls: usize,
    /// Chat backend calls made for generation
    pub generator_calls: usize,
    /// Generation attempts that ended in a failed artifact
    pub generation_failures: usize,
    /// Narrative and diagram edits accepted
    pub edits_applied: usize,
    /// Version restores applied
    pub restores: usize,
}

/// Result of one ensure pass over a case
#[derive(Debug, Clone)]
pub struct EnsureReport {
    /// Current artifacts of the case, ordered by kind
    pub artifacts: Vec<Artifact>,
    /// Failure message per kind whose generation failed this pass
    pub errors: BTreeMap<ArtifactKind, String>,
    /// Whether any kind was (re)generated rather than served fresh
    pub generated_any: bool,
}

/// The artifact generation engine
///
/// Generic over the chat backend so tests can inject fakes; everything
/// else (registry, stores, locks) is owned.
pub struct ArtifactEngine<B: ChatBackend> {
    pub(crate) backend: Arc<B>,
    pub(crate) registry: Registry,
    pub(crate) config: EngineConfig,
    pub(crate) server: DiagramServer,
    pub(crate) store: ArtifactStore,
    pub(crate) versions: VersionStore,
    pub(crate) locks: CaseLocks,
    pub(crate) stats: Mutex<EngineStats>,
}

impl<B: ChatBackend> ArtifactEngine<B> {
    /// Engine over the given backend with the built-in kind registry
    #[must_use]
    pub fn new(backend: Arc<B>, config: EngineConfig) -> Self {
        let server = DiagramServer::new(&config.plantuml_server);
        Self {
            backend,
            registry: Registry::with_defaults(),
            config,
            server,
            store: ArtifactStore::new(),
            versions: VersionStore::new(),
            locks: CaseLocks::new(),
            stats: Mutex::new(EngineStats::default()),
        }
    }

    /// Replace the kind registry, to add or substitute blueprints
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Bring the case's artifact batch up to date
    ///
    /// Kinds are taken from `requested`, falling back to the case's
    /// selection and then to the configured default batch. Fresh
    /// artifacts are returned as-is; stale or missing ones are
    /// regenerated under the case lock. A kind that fails is reported in
    /// [`EnsureReport::errors`] and left as a failed row without
    /// blocking its siblings. After a pass that generated anything, a
    /// case in `ReadyForArtifacts` advances to `ArtifactsGenerated`.
    ///
    /// # Errors
    /// [`EngineError::AccessDenied`] when the predicate rejects the
    /// caller, [`EngineError::UnsupportedKind`] when any requested kind
    /// has no blueprint; in both cases nothing is generated.
    pub async fn ensure(
        &self,
        case: &mut Case,
        requested: &[ArtifactKind],
        access: &dyn CaseAccess,
    ) -> Result<EnsureReport, EngineError> {
        if !access.can_modify(case.id) {
            return Err(EngineError::AccessDenied(case.id));
        }

        let kinds = self.effective_kinds(case, requested);
        // Resolve the whole batch up front: one unknown kind fails the
        // call before anything is locked or generated.
        let blueprints = self.resolve_batch(&kinds)?;

        self.stats.lock().ensure_calls += 1;
        let _guard = self.locks.acquire(case.id).await;

        let snapshot = ContextSnapshot::build(case);
        tracing::debug!(case_id = %case.id, kinds = ?kinds, "ensuring artifacts");

        let mut errors = BTreeMap::new();
        let mut generated_any = false;

        for blueprint in &blueprints {
            let kind = blueprint.kind();
            if let Some(existing) = self.store.get(case.id, kind) {
                if existing.is_fresh(snapshot.fingerprint()) {
                    tracing::debug!(case_id = %case.id, kind = %kind, "artifact fresh, serving as-is");
                    continue;
                }
            }

            generated_any = true;
            if let Err(error) = self.generate_one(case, blueprint.as_ref(), &snapshot).await {
                tracing::warn!(case_id = %case.id, kind = %kind, %error, "artifact generation failed");
                self.stats.lock().generation_failures += 1;
                if let Some(mut artifact) = self.store.get(case.id, kind) {
                    artifact.mark_failed(error.to_string());
                    self.store.upsert(artifact);
                }
                errors.insert(kind, error.to_string());
            }
        }

        if generated_any && case.status == CaseStatus::ReadyForArtifacts {
            case.status = CaseStatus::ArtifactsGenerated;
        }

        Ok(EnsureReport {
            artifacts: self.store.list(case.id),
            errors,
            generated_any,
        })
    }

    /// Current artifacts of a case, ordered by kind
    #[must_use]
    pub fn list(&self, case_id: CaseId) -> Vec<Artifact> {
        self.store.list(case_id)
    }

    /// One artifact by (case, kind)
    ///
    /// # Errors
    /// [`EngineError::ArtifactNotFound`] when no row exists.
    pub fn get(&self, case_id: CaseId, kind: ArtifactKind) -> Result<Artifact, EngineError> {
        self.store
            .get(case_id, kind)
            .ok_or(EngineError::ArtifactNotFound { case_id, kind })
    }

    /// Update the review status of one artifact
    ///
    /// Review state rides on the current row without taking the case
    /// lock and without recording a version.
    ///
    /// # Errors
    /// [`EngineError::AccessDenied`] or [`EngineError::ArtifactNotFound`].
    pub fn review(
        &self,
        case_id: CaseId,
        kind: ArtifactKind,
        status: ReviewStatus,
        access: &dyn CaseAccess,
    ) -> Result<Artifact, EngineError> {
        if !access.can_modify(case_id) {
            return Err(EngineError::AccessDenied(case_id));
        }
        self.store
            .set_review(case_id, kind, status)
            .ok_or(EngineError::ArtifactNotFound { case_id, kind })
    }

    /// Whether the case has artifacts and every one is approved
    #[must_use]
    pub fn all_approved(&self, case_id: CaseId) -> bool {
        self.store.all_approved(case_id)
    }

    /// Version history of one artifact, newest first
    ///
    /// # Errors
    /// [`EngineError::ArtifactNotFound`] when no row exists.
    pub fn versions(
        &self,
        case_id: CaseId,
        kind: ArtifactKind,
    ) -> Result<Vec<ArtifactVersion>, EngineError> {
        let artifact = self.get(case_id, kind)?;
        Ok(self.versions.versions(artifact.id))
    }

    /// One numbered version snapshot
    ///
    /// # Errors
    /// [`EngineError::ArtifactNotFound`] or [`EngineError::VersionNotFound`].
    pub fn version(
        &self,
        case_id: CaseId,
        kind: ArtifactKind,
        number: u32,
    ) -> Result<ArtifactVersion, EngineError> {
        let artifact = self.get(case_id, kind)?;
        self.versions
            .get(artifact.id, number)
            .ok_or(EngineError::VersionNotFound {
                artifact_id: artifact.id,
                number,
            })
    }

    /// Export one ready artifact through the given exporter
    ///
    /// # Errors
    /// [`EngineError::NotReady`] unless the artifact generated
    /// successfully with structured data; exporter failures surface as
    /// [`EngineError::Export`].
    pub async fn export(
        &self,
        case_id: CaseId,
        kind: ArtifactKind,
        exporter: &dyn DocumentExporter,
    ) -> Result<Vec<u8>, EngineError> {
        let artifact = self.get(case_id, kind)?;
        if artifact.generation != GenerationStatus::Ready || artifact.structured.is_none() {
            return Err(EngineError::NotReady(kind));
        }
        Ok(exporter.export(&artifact).await?)
    }

    /// Snapshot of the lifetime counters
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.stats.lock().clone()
    }

    /// The engine's configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The batch to ensure: explicit request, else the case's selection,
    /// else the configured default. Deduplicated and in kind order.
    fn effective_kinds(&self, case: &Case, requested: &[ArtifactKind]) -> Vec<ArtifactKind> {
        let mut kinds: Vec<ArtifactKind> = if requested.is_empty() {
            if case.selected_kinds.is_empty() {
                self.config.default_kinds.clone()
            } else {
                case.selected_kinds.clone()
            }
        } else {
            requested.to_vec()
        };
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }

    fn resolve_batch(
        &self,
        kinds: &[ArtifactKind],
    ) -> Result<Vec<Arc<dyn ArtifactBlueprint>>, EngineError> {
        kinds
            .iter()
            .map(|&kind| self.registry.resolve(kind))
            .collect()
    }

    /// One generation attempt for one kind, committing a `Generating`
    /// placeholder up front and the final row on success. Failures leave
    /// the placeholder for the caller to mark failed.
    async fn generate_one(
        &self,
        case: &Case,
        blueprint: &dyn ArtifactBlueprint,
        snapshot: &ContextSnapshot,
    ) -> Result<(), EngineError> {
        let kind = blueprint.kind();
        let mut artifact = self
            .store
            .get(case.id, kind)
            .unwrap_or_else(|| Artifact::new(case.id, kind));
        artifact.begin_generation(&case.title, snapshot.fingerprint());
        self.store.upsert(artifact.clone());

        let prompts = blueprint.build_prompt(snapshot);
        let fingerprint = prompt_fingerprint(&prompts.system, &prompts.user);

        let (raw, model) = match blueprint.derive(snapshot) {
            Some(raw) => (raw, blueprint.model(&self.config).to_string()),
            None => {
                self.stats.lock().generator_calls += 1;
                let request =
                    ChatRequest::new(prompts.system, prompts.user, blueprint.model(&self.config))
                        .with_temperature(self.config.temperature);
                let reply = self.backend.chat_json(request).await?;
                (reply.value, reply.model)
            }
        };

        let structured = blueprint.validate(&raw)?;
        let rendered = blueprint.render(&structured, &case.title);
        artifact.finish_generation(GenerationOutcome {
            title: rendered.title,
            content: rendered.content,
            structured,
            model_id: model,
            prompt_version: blueprint.prompt_version().to_string(),
            prompt_fingerprint: fingerprint,
        });

        if kind.is_diagram() {
            artifact.diagram_url = self.derive_diagram_url(&artifact);
        }

        self.versions
            .snapshot(&artifact, Some(VersionReason::Initial));
        self.store.upsert(artifact);
        Ok(())
    }

    /// PNG rendering link for a diagram artifact's current source
    ///
    /// Best-effort: an encoder failure logs a warning and leaves the
    /// link empty instead of failing the operation.
    pub(crate) fn derive_diagram_url(&self, artifact: &Artifact) -> Option<String> {
        let from_structured = artifact
            .structured
            .as_ref()
            .map(diagram_source)
            .map(str::trim)
            .filter(|source| !source.is_empty())
            .map(str::to_string);
        let source = from_structured
            .or_else(|| extract_fenced(&artifact.content).map(str::to_string))
            .unwrap_or_else(placeholder_diagram);

        match self.server.png_url(&source) {
            Ok(url) => Some(url),
            Err(error) => {
                tracing::warn!(artifact_id = %artifact.id, %error, "diagram url derivation failed");
                None
            }
        }
    }
}

impl<B: ChatBackend> std::fmt::Debug for ArtifactEngine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactEngine")
            .field("registry", &self.registry)
            .field("server", &self.server.base())
            .field("artifacts", &self.store.len())
            .finish_non_exhaustive()
    }
}
