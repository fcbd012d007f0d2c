//! Handlers for `/brands/{slug}/onboarding/brain`.
//!
//! | Method  | Notes |
//! |---------|-------|
//! | `GET`   | `data` is the brain or `null` if none exists yet |
//! | `POST`  | Create-or-patch with a partial body |
//! | `PATCH` | Refine one named section |
//! | `PUT`   | Complete onboarding: activate + flag the user |

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use serde::Deserialize;

use brandkit_core::{
  analyzer::BrandAnalyzer,
  brain::BrainPatch,
  store::{BrandStore, SessionStore},
};

use crate::{
  AppState, load_workspace, touch,
  error::{ApiError, success},
  session::CurrentUser,
};

/// `GET /brands/{slug}/onboarding/brain`
pub async fn get_brain<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state.engine.get_brain(&ws).await?;
  Ok(success(&brain))
}

/// `POST /brands/{slug}/onboarding/brain` — body: partial brain fields.
pub async fn upsert<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Json(patch): Json<BrainPatch>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state.engine.patch_sections(&ws, patch).await?;
  touch(&state, &slug).await?;
  Ok(success(&brain))
}

#[derive(Debug, Deserialize)]
pub struct RefineBody {
  pub section: String,
  pub content: String,
}

/// `PATCH /brands/{slug}/onboarding/brain` — body:
/// `{"section":"pillars","content":"A\nB"}`
pub async fn refine<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Json(body): Json<RefineBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state
    .engine
    .refine_section(&ws, &body.section, &body.content)
    .await?;
  touch(&state, &slug).await?;
  Ok(success(&brain))
}

/// `PUT /brands/{slug}/onboarding/brain` — activate the brain and mark the
/// owner's onboarding completed. Idempotent.
pub async fn complete<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state.engine.activate(&ws).await?;

  BrandStore::set_onboarding_completed(state.store(), current.user.user_id, true)
    .await
    .map_err(ApiError::internal)?;

  touch(&state, &slug).await?;
  tracing::info!(slug = %slug, "brain activated");
  Ok(success(&brain))
}
