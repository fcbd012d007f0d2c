//! Handlers for `/brand-workspaces` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/brand-workspaces/create` | Slug chosen server-side |
//! | `GET`    | `/brand-workspaces` | Creation order |
//! | `GET`    | `/brand-workspaces/{slug}` | 404 covers wrong owner |
//! | `DELETE` | `/brand-workspaces/{slug}` | Cascades brain + evidence |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;

use brandkit_core::{
  analyzer::BrandAnalyzer,
  store::{BrandStore, SessionStore},
  workspace::{self, NewWorkspace},
};

use crate::{
  AppState, load_workspace,
  error::{ApiError, success},
  session::CurrentUser,
};

/// Numeric suffixes tried before falling back to a timestamp suffix.
const MAX_SLUG_ATTEMPTS: u32 = 10;

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /brand-workspaces/create`
pub async fn create<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  workspace::validate_name(&body.name)
    .map_err(|e| ApiError::Validation(e.to_string()))?;
  let name = body.name.trim().to_string();
  let base = workspace::slugify(&name);

  let mut created = None;
  for attempt in 0..=MAX_SLUG_ATTEMPTS {
    let slug = workspace::candidate_slug(&base, attempt);
    if state.store().slug_exists(&slug).await.map_err(ApiError::internal)? {
      continue;
    }
    match state
      .store()
      .create_workspace(NewWorkspace {
        owner_user_id: current.user.user_id,
        name:          name.clone(),
        slug,
      })
      .await
    {
      Ok(ws) => {
        created = Some(ws);
        break;
      }
      // Lost the slug to a concurrent create; try the next suffix.
      Err(e) if S::is_conflict(&e) => continue,
      Err(e) => return Err(ApiError::internal(e)),
    }
  }

  let ws = match created {
    Some(ws) => ws,
    None => {
      let slug = workspace::fallback_slug(&base, Utc::now());
      state
        .store()
        .create_workspace(NewWorkspace {
          owner_user_id: current.user.user_id,
          name:          name.clone(),
          slug,
        })
        .await
        .map_err(ApiError::from_store::<S>)?
    }
  };

  // Eager brain creation; roll the workspace back if it fails so a retry
  // does not hit a slug collision against a half-created workspace.
  if let Err(e) = state.engine.ensure_brain(&ws).await {
    if let Err(cleanup) = state
      .store()
      .delete_workspace(&ws.slug, current.user.user_id)
      .await
    {
      tracing::warn!(slug = %ws.slug, error = %cleanup, "rollback after brain-create failure also failed");
    }
    return Err(e.into());
  }

  tracing::info!(slug = %ws.slug, "workspace created");
  Ok((StatusCode::CREATED, success(&ws)))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /brand-workspaces`
pub async fn list<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let workspaces = state
    .store()
    .list_workspaces(current.user.user_id)
    .await
    .map_err(ApiError::internal)?;
  Ok(success(&workspaces))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /brand-workspaces/{slug}`
pub async fn get_one<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  Ok(success(&ws))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /brand-workspaces/{slug}`
pub async fn delete_one<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let deleted = state
    .store()
    .delete_workspace(&slug, current.user.user_id)
    .await
    .map_err(ApiError::internal)?;
  state.cache.invalidate(&slug);

  if !deleted {
    return Err(ApiError::NotFound(format!("workspace {slug:?} not found")));
  }
  tracing::info!(slug = %slug, "workspace deleted");
  Ok(success(serde_json::json!({ "deleted": true })))
}
