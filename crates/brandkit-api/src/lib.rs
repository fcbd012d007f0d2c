//! JSON REST API for Brandkit.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`brandkit_core::store::BrandStore`] and
//! [`brandkit_core::store::SessionStore`], plus any
//! [`brandkit_core::analyzer::BrandAnalyzer`]. TLS and transport concerns are
//! the caller's responsibility.

pub mod analyze;
pub mod auth;
pub mod brain;
pub mod cache;
pub mod chat;
pub mod error;
pub mod evidence;
pub mod session;
pub mod state;
pub mod workspaces;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};

use brandkit_core::{
  analyzer::BrandAnalyzer,
  engine::BrandBrainEngine,
  store::{BrandStore, SessionStore},
  user::User,
  workspace::BrandWorkspace,
};

pub use cache::WorkspaceCache;
pub use error::ApiError;
pub use session::SessionKeys;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, A> {
  pub engine: BrandBrainEngine<S, A>,
  pub keys:   Arc<SessionKeys>,
  pub cache:  Arc<WorkspaceCache>,
}

impl<S, A> Clone for AppState<S, A> {
  fn clone(&self) -> Self {
    Self {
      engine: self.engine.clone(),
      keys:   self.keys.clone(),
      cache:  self.cache.clone(),
    }
  }
}

impl<S, A> AppState<S, A>
where
  S: BrandStore,
  A: BrandAnalyzer,
{
  pub fn new(store: Arc<S>, analyzer: Arc<A>, keys: SessionKeys) -> Self {
    Self {
      engine: BrandBrainEngine::new(store, analyzer),
      keys:   Arc::new(keys),
      cache:  Arc::new(WorkspaceCache::default()),
    }
  }

  pub fn store(&self) -> &S {
    self.engine.store()
  }
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// The universal ownership check behind every `/brands/{slug}/…` route.
///
/// Cache hits still verify the owner; wrong owner and absent slug both
/// answer NotFound so slugs never leak across tenants. A cache miss always
/// consults the store.
pub(crate) async fn load_workspace<S, A>(
  state: &AppState<S, A>,
  user:  &User,
  slug:  &str,
) -> Result<BrandWorkspace, ApiError>
where
  S: BrandStore,
  A: BrandAnalyzer,
{
  if let Some(ws) = state.cache.get(slug) {
    if ws.owner_user_id == user.user_id {
      return Ok(ws);
    }
    return Err(not_found(slug));
  }

  let ws = state
    .store()
    .get_workspace(slug, user.user_id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| not_found(slug))?;
  state.cache.set(ws.clone());
  Ok(ws)
}

fn not_found(slug: &str) -> ApiError {
  ApiError::NotFound(format!("workspace {slug:?} not found"))
}

/// Post-mutation bookkeeping: stamp `last_active_at` and drop the cache
/// entry so the next read sees the new state.
pub(crate) async fn touch<S, A>(
  state: &AppState<S, A>,
  slug:  &str,
) -> Result<(), ApiError>
where
  S: BrandStore,
  A: BrandAnalyzer,
{
  state
    .store()
    .touch_workspace(slug)
    .await
    .map_err(ApiError::internal)?;
  state.cache.invalidate(slug);
  Ok(())
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S, A>(state: AppState<S, A>) -> Router
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  Router::new()
    // Auth
    .route("/auth/register", post(auth::register::<S, A>))
    .route("/auth/login", post(auth::login::<S, A>))
    .route("/auth/logout", post(auth::logout::<S, A>))
    .route("/auth/me", get(auth::me::<S, A>))
    // Workspaces
    .route("/brand-workspaces/create", post(workspaces::create::<S, A>))
    .route("/brand-workspaces", get(workspaces::list::<S, A>))
    .route(
      "/brand-workspaces/{slug}",
      get(workspaces::get_one::<S, A>).delete(workspaces::delete_one::<S, A>),
    )
    // Onboarding — numeric steps
    .route(
      "/brands/{slug}/onboarding",
      get(state::get_numeric::<S, A>).patch(state::patch_numeric::<S, A>),
    )
    // Onboarding — brain
    .route(
      "/brands/{slug}/onboarding/brain",
      get(brain::get_brain::<S, A>)
        .post(brain::upsert::<S, A>)
        .patch(brain::refine::<S, A>)
        .put(brain::complete::<S, A>),
    )
    // Onboarding — analysis
    .route(
      "/brands/{slug}/onboarding/analyze",
      post(analyze::trigger::<S, A>).get(analyze::poll::<S, A>),
    )
    // Onboarding — named steps
    .route(
      "/brands/{slug}/onboarding/state",
      get(state::get_named::<S, A>).patch(state::patch_named::<S, A>),
    )
    // Onboarding — evidence
    .route(
      "/brands/{slug}/onboarding/evidence",
      get(evidence::list::<S, A>)
        .post(evidence::create::<S, A>)
        .delete(evidence::delete_one::<S, A>),
    )
    // Onboarding — chat
    .route("/brands/{slug}/onboarding/chat", post(chat::handler::<S, A>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
