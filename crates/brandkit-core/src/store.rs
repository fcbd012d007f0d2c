//! The `BrandStore` and `SessionStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `brandkit-store-sqlite`). Higher layers (`brandkit-api`) depend on these
//! abstractions, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  brain::{BrainPatch, BrainStatus, BrandAnalysis, BrandBrain},
  evidence::{Evidence, EvidenceKind, EvidenceStatus, NewEvidence},
  onboarding::Step,
  user::{NewUser, User, UserCredentials},
  workspace::{BrandWorkspace, NewWorkspace, WorkspaceStatus},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`BrandStore::list_evidence`].
#[derive(Debug, Clone, Default)]
pub struct EvidenceQuery {
  pub status: Option<EvidenceStatus>,
  pub kind:   Option<EvidenceKind>,
  /// Defaults to 50 when unset.
  pub limit:  Option<usize>,
}

impl EvidenceQuery {
  /// All complete evidence, no row cap — the analysis input query.
  pub fn complete() -> Self {
    Self { status: Some(EvidenceStatus::Complete), kind: None, limit: Some(usize::MAX) }
  }
}

// ─── Session type ────────────────────────────────────────────────────────────

/// A server-side session row, keyed by the token digest.
#[derive(Debug, Clone)]
pub struct Session {
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

// ─── BrandStore ──────────────────────────────────────────────────────────────

/// Abstraction over the persistence backend for users, workspaces, brains,
/// and evidence.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BrandStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Classify a backend error as a uniqueness conflict so the API layer can
  /// answer 409 instead of 500. Backends that can tell the difference
  /// override this.
  fn is_conflict(err: &Self::Error) -> bool {
    let _ = err;
    false
  }

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. The email must already be lowercased; a duplicate
  /// email surfaces as a conflict error (see [`Self::is_conflict`]).
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Fetch the password hash for a login attempt. `None` if the email is
  /// unknown.
  fn find_credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + 'a;

  fn set_onboarding_completed(
    &self,
    user_id: Uuid,
    completed: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Workspaces ────────────────────────────────────────────────────────

  /// Persist a workspace with the caller-chosen slug. A slug collision
  /// surfaces as a conflict error.
  fn create_workspace(
    &self,
    input: NewWorkspace,
  ) -> impl Future<Output = Result<BrandWorkspace, Self::Error>> + Send + '_;

  /// The universal ownership check: returns the workspace only when both
  /// the slug and the owner match.
  fn get_workspace<'a>(
    &'a self,
    slug: &'a str,
    owner_user_id: Uuid,
  ) -> impl Future<Output = Result<Option<BrandWorkspace>, Self::Error>> + Send + 'a;

  fn slug_exists<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// All workspaces owned by a user, in creation order.
  fn list_workspaces(
    &self,
    owner_user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<BrandWorkspace>, Self::Error>> + Send + '_;

  /// Stamp `last_active_at`; called on every nested-resource mutation.
  fn touch_workspace<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Mirror onboarding state onto the workspace row.
  fn set_workspace_state<'a>(
    &'a self,
    slug: &'a str,
    step: Step,
    status: WorkspaceStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete a workspace and cascade over its brain and evidence in one
  /// transaction. Returns `false` when the slug/owner pair does not match.
  fn delete_workspace<'a>(
    &'a self,
    slug: &'a str,
    owner_user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Brains ────────────────────────────────────────────────────────────

  fn get_brain(
    &self,
    workspace_id: Uuid,
  ) -> impl Future<Output = Result<Option<BrandBrain>, Self::Error>> + Send + '_;

  /// Create-or-patch in a single atomic statement. Creates the aggregate if
  /// absent, applies the non-`None` patch fields, stamps `updated_at`.
  fn upsert_brain<'a>(
    &'a self,
    workspace_id: Uuid,
    brand_slug: &'a str,
    patch: BrainPatch,
  ) -> impl Future<Output = Result<BrandBrain, Self::Error>> + Send + 'a;

  /// Atomically claim an analysis run: set `in_progress`/step 4 only if the
  /// brain is not already there. Returns `false` when another run holds the
  /// claim — the conditional-update fix for the check-then-act race.
  fn claim_analysis(
    &self,
    workspace_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Persist an analysis result: all sections, `ready`/step 5,
  /// `last_analyzed_at`, the method label, and a cleared `last_error`.
  fn finish_analysis<'a>(
    &'a self,
    workspace_id: Uuid,
    analysis: &'a BrandAnalysis,
    method: &'a str,
  ) -> impl Future<Output = Result<BrandBrain, Self::Error>> + Send + 'a;

  /// Record a failed run: status `failed`, step back to 2, `last_error`.
  fn fail_analysis<'a>(
    &'a self,
    workspace_id: Uuid,
    error: &'a str,
  ) -> impl Future<Output = Result<BrandBrain, Self::Error>> + Send + 'a;

  /// Force `(step 3, not_started)` and clear analysis stamps so a failed
  /// run can be retried.
  fn reset_analysis(
    &self,
    workspace_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set `is_activated`, `ready`, step 5. Idempotent.
  fn activate_brain(
    &self,
    workspace_id: Uuid,
  ) -> impl Future<Output = Result<BrandBrain, Self::Error>> + Send + '_;

  /// State-endpoint write path: set step and status directly.
  fn set_brain_state(
    &self,
    workspace_id: Uuid,
    step: Step,
    status: BrainStatus,
  ) -> impl Future<Output = Result<BrandBrain, Self::Error>> + Send + '_;

  // ── Evidence ──────────────────────────────────────────────────────────

  /// Append one evidence item with initial status `pending`.
  fn add_evidence(
    &self,
    input: NewEvidence,
  ) -> impl Future<Output = Result<Evidence, Self::Error>> + Send + '_;

  /// Evidence for a workspace, newest first, filtered per the query.
  fn list_evidence<'a>(
    &'a self,
    workspace_id: Uuid,
    query: &'a EvidenceQuery,
  ) -> impl Future<Output = Result<Vec<Evidence>, Self::Error>> + Send + 'a;

  /// Scoped deletion: both the id and the workspace must match, preventing
  /// cross-tenant deletion. Returns `false` when nothing matched.
  fn delete_evidence(
    &self,
    evidence_id: Uuid,
    workspace_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Bulk status transition; returns the number of rows changed.
  fn mark_evidence_status<'a>(
    &'a self,
    evidence_ids: &'a [Uuid],
    status: EvidenceStatus,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Mark one item `complete` and store its processed text.
  fn complete_evidence<'a>(
    &'a self,
    evidence_id: Uuid,
    analyzed_content: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── SessionStore ────────────────────────────────────────────────────────────

/// Server-side session persistence, keyed by a token digest — the raw token
/// never reaches the store.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn create_session<'a>(
    &'a self,
    token_digest: &'a str,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// `None` for unknown or expired digests.
  fn get_session<'a>(
    &'a self,
    token_digest: &'a str,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  fn delete_session<'a>(
    &'a self,
    token_digest: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
