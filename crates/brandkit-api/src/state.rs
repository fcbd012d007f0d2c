//! Handlers for the two onboarding-state endpoint families.
//!
//! `/brands/{slug}/onboarding/state` speaks named steps,
//! `/brands/{slug}/onboarding` speaks numeric steps. Both delegate to the
//! one state machine in `brandkit_core::onboarding`; neither re-derives the
//! mapping.

use axum::{
  Json,
  extract::{Path, State},
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use brandkit_core::{
  analyzer::BrandAnalyzer,
  brain::BrandBrain,
  onboarding::{Step, StepName},
  store::{BrandStore, SessionStore},
};

use crate::{
  AppState, load_workspace, touch,
  error::{ApiError, success},
  session::CurrentUser,
};

fn named_view(brain: &BrandBrain) -> serde_json::Value {
  json!({
    "step":         StepName::canonical(brain.onboarding_step),
    "status":       brain.status,
    "is_activated": brain.is_activated,
  })
}

fn numeric_view(brain: &BrandBrain) -> serde_json::Value {
  json!({
    "step":         brain.onboarding_step,
    "status":       brain.status,
    "is_activated": brain.is_activated,
  })
}

// ─── Named family ────────────────────────────────────────────────────────────

/// `GET /brands/{slug}/onboarding/state`
pub async fn get_named<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state.engine.ensure_brain(&ws).await?;
  Ok(success(named_view(&brain)))
}

#[derive(Debug, Deserialize)]
pub struct NamedBody {
  pub step: StepName,
}

/// `PATCH /brands/{slug}/onboarding/state` — body: `{"step":"analyzing"}`.
/// `complete` is accepted as an alias of step 5.
pub async fn patch_named<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Json(body): Json<NamedBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state.engine.set_state(&ws, body.step.step()).await?;
  touch(&state, &slug).await?;
  Ok(success(named_view(&brain)))
}

// ─── Numeric family ──────────────────────────────────────────────────────────

/// `GET /brands/{slug}/onboarding`
pub async fn get_numeric<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state.engine.ensure_brain(&ws).await?;
  Ok(success(numeric_view(&brain)))
}

#[derive(Debug, Deserialize)]
pub struct NumericBody {
  pub step: u8,
}

/// `PATCH /brands/{slug}/onboarding` — body: `{"step":4}`. Out-of-range
/// steps are a validation error, not a deserialization failure.
pub async fn patch_numeric<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  Json(body): Json<NumericBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let target = Step::new(body.step)
    .map_err(|e| ApiError::Validation(e.to_string()))?;
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain = state.engine.set_state(&ws, target).await?;
  touch(&state, &slug).await?;
  Ok(success(numeric_view(&brain)))
}
