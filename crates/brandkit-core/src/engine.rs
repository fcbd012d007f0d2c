//! The brand-brain engine — orchestration of the aggregate's lifecycle over
//! a [`BrandStore`] and a [`BrandAnalyzer`].

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  analyzer::{AnalyzerError, BrandAnalyzer},
  brain::{BrainPatch, BrandAnalysis, BrandBrain, SectionKey},
  evidence::Evidence,
  onboarding::{self, Step},
  store::{BrandStore, EvidenceQuery},
  workspace::BrandWorkspace,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
  /// `run_analysis` requires at least one complete evidence item.
  #[error("no complete evidence to analyze")]
  NoCompleteEvidence,

  /// Another analysis run already holds the in-progress claim.
  #[error("analysis already in progress")]
  AnalysisInProgress,

  #[error("unknown brain section: {0:?}")]
  UnknownSection(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
  fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// The three explicitly distinct results of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOutcome {
  /// The analyzer answered on-contract; its result was persisted.
  Completed,
  /// The analyzer answered off-contract; the fixed placeholder was
  /// persisted instead and the run still counts as ready.
  Degraded,
  /// Transport failure or timeout; the brain is `failed` at step 2 and can
  /// be retried via reset.
  Failed,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Owns brain get/patch/refine/analyze/activate semantics. Cheap to clone.
pub struct BrandBrainEngine<S, A> {
  store:    Arc<S>,
  analyzer: Arc<A>,
}

impl<S, A> Clone for BrandBrainEngine<S, A> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), analyzer: self.analyzer.clone() }
  }
}

impl<S, A> BrandBrainEngine<S, A>
where
  S: BrandStore,
  A: BrandAnalyzer,
{
  pub fn new(store: Arc<S>, analyzer: Arc<A>) -> Self {
    Self { store, analyzer }
  }

  /// `None` is a valid, non-error result — the brain simply has not been
  /// created yet. Callers must not conflate it with workspace not-found.
  pub async fn get_brain(
    &self,
    workspace: &BrandWorkspace,
  ) -> Result<Option<BrandBrain>, EngineError> {
    self
      .store
      .get_brain(workspace.workspace_id)
      .await
      .map_err(EngineError::store)
  }

  /// Lazily create the (empty) aggregate — used the first time onboarding
  /// state is read.
  pub async fn ensure_brain(
    &self,
    workspace: &BrandWorkspace,
  ) -> Result<BrandBrain, EngineError> {
    self
      .store
      .upsert_brain(workspace.workspace_id, &workspace.slug, BrainPatch::default())
      .await
      .map_err(EngineError::store)
  }

  /// Upsert semantics: creates the aggregate if absent, applies the partial
  /// update, stamps `updated_at`.
  pub async fn patch_sections(
    &self,
    workspace: &BrandWorkspace,
    patch: BrainPatch,
  ) -> Result<BrandBrain, EngineError> {
    self
      .store
      .upsert_brain(workspace.workspace_id, &workspace.slug, patch)
      .await
      .map_err(EngineError::store)
  }

  /// Refine one named section. List-typed sections split `content` on
  /// newlines and drop blank lines; scalar sections store it verbatim.
  pub async fn refine_section(
    &self,
    workspace: &BrandWorkspace,
    section: &str,
    content: &str,
  ) -> Result<BrandBrain, EngineError> {
    let key = SectionKey::parse(section)
      .map_err(|_| EngineError::UnknownSection(section.to_string()))?;
    self
      .patch_sections(workspace, BrainPatch::for_section(key, content))
      .await
  }

  /// Run the full evidence-to-brain analysis. See [`AnalysisOutcome`] for
  /// the three result paths.
  pub async fn run_analysis(
    &self,
    workspace: &BrandWorkspace,
  ) -> Result<(AnalysisOutcome, BrandBrain), EngineError> {
    let ws_id = workspace.workspace_id;

    let evidence = self
      .store
      .list_evidence(ws_id, &EvidenceQuery::complete())
      .await
      .map_err(EngineError::store)?;
    if evidence.is_empty() {
      return Err(EngineError::NoCompleteEvidence);
    }

    // The brain must exist before the conditional claim can match a row.
    self.ensure_brain(workspace).await?;

    if !self.store.claim_analysis(ws_id).await.map_err(EngineError::store)? {
      return Err(EngineError::AnalysisInProgress);
    }

    self
      .store
      .set_workspace_state(
        &workspace.slug,
        Step::ANALYZING,
        onboarding::derive_status(Step::ANALYZING),
      )
      .await
      .map_err(EngineError::store)?;

    let input = evidence_text(&evidence);

    let (outcome, brain) =
      match self.analyzer.analyze(&workspace.name, &input).await {
        Ok(analysis) if analysis.conforms() => {
          let brain = self
            .store
            .finish_analysis(ws_id, &analysis, "ai")
            .await
            .map_err(EngineError::store)?;
          tracing::info!(slug = %workspace.slug, "analysis completed");
          (AnalysisOutcome::Completed, brain)
        }
        Ok(_) | Err(AnalyzerError::Malformed(_)) => {
          let placeholder = BrandAnalysis::placeholder(&workspace.name);
          let brain = self
            .store
            .finish_analysis(ws_id, &placeholder, "placeholder")
            .await
            .map_err(EngineError::store)?;
          tracing::warn!(slug = %workspace.slug, "analysis degraded to placeholder");
          (AnalysisOutcome::Degraded, brain)
        }
        Err(err) => {
          let brain = self
            .store
            .fail_analysis(ws_id, &err.to_string())
            .await
            .map_err(EngineError::store)?;
          tracing::error!(slug = %workspace.slug, error = %err, "analysis failed");
          (AnalysisOutcome::Failed, brain)
        }
      };

    let (step, status) = match outcome {
      AnalysisOutcome::Failed => (
        Step::COLLECTING_EVIDENCE,
        onboarding::derive_status(Step::COLLECTING_EVIDENCE),
      ),
      _ => (
        Step::REVIEWING_BRAND_BRAIN,
        onboarding::derive_status(Step::REVIEWING_BRAND_BRAIN),
      ),
    };
    self
      .store
      .set_workspace_state(&workspace.slug, step, status)
      .await
      .map_err(EngineError::store)?;

    Ok((outcome, brain))
  }

  /// Force `(step 3, not_started)` so the user can retry a failed analysis.
  pub async fn reset_analysis(
    &self,
    workspace: &BrandWorkspace,
  ) -> Result<(), EngineError> {
    self.ensure_brain(workspace).await?;
    self
      .store
      .reset_analysis(workspace.workspace_id)
      .await
      .map_err(EngineError::store)?;
    let (step, status) = onboarding::reset_state();
    self
      .store
      .set_workspace_state(&workspace.slug, step, status)
      .await
      .map_err(EngineError::store)
  }

  /// Activate the brain: `is_activated = true`, ready, step 5. Idempotent.
  pub async fn activate(
    &self,
    workspace: &BrandWorkspace,
  ) -> Result<BrandBrain, EngineError> {
    self.ensure_brain(workspace).await?;
    let brain = self
      .store
      .activate_brain(workspace.workspace_id)
      .await
      .map_err(EngineError::store)?;
    self
      .store
      .set_workspace_state(
        &workspace.slug,
        Step::REVIEWING_BRAND_BRAIN,
        onboarding::derive_status(Step::REVIEWING_BRAND_BRAIN),
      )
      .await
      .map_err(EngineError::store)?;
    Ok(brain)
  }

  /// State-endpoint write path: set brain step + status and mirror the
  /// workspace row, via the one canonical mapping.
  pub async fn set_state(
    &self,
    workspace: &BrandWorkspace,
    target: Step,
  ) -> Result<BrandBrain, EngineError> {
    self.ensure_brain(workspace).await?;
    let (step, status) = onboarding::advance(workspace.onboarding_step, target);
    let brain = self
      .store
      .set_brain_state(workspace.workspace_id, step, status.into())
      .await
      .map_err(EngineError::store)?;
    self
      .store
      .set_workspace_state(&workspace.slug, step, status)
      .await
      .map_err(EngineError::store)?;
    Ok(brain)
  }

  pub fn store(&self) -> &Arc<S> { &self.store }
}

// ─── Analysis input assembly ─────────────────────────────────────────────────

/// Concatenate evidence into the single labelled text block handed to the
/// analyzer: `Evidence N [KIND]: <content>`. Processed text is preferred
/// over the raw value. Callers guarantee every item passed in is complete.
pub fn evidence_text(items: &[Evidence]) -> String {
  items
    .iter()
    .enumerate()
    .map(|(i, ev)| {
      let content = ev.analyzed_content.as_deref().unwrap_or(&ev.value);
      format!(
        "Evidence {} [{}]: {}",
        i + 1,
        ev.kind.as_str().to_uppercase(),
        content
      )
    })
    .collect::<Vec<_>>()
    .join("\n\n")
}
