//! Handlers for `/brands/{slug}/onboarding/analyze`.
//!
//! `POST` triggers a run (or, with `{"reset":true}`, resets a failed one);
//! `GET` polls the current analysis state.

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
  store::{BrandStore, SessionStore},
};

use crate::{
  AppState, load_workspace, touch,
  error::{ApiError, success},
  session::CurrentUser,
};

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeBody {
  #[serde(default)]
  pub reset: bool,
}

/// `POST /brands/{slug}/onboarding/analyze` — body optional; `{"reset":true}`
/// performs reset-analysis instead of a run.
pub async fn trigger<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
  body: Option<Json<AnalyzeBody>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let body = body.map(|Json(b)| b).unwrap_or_default();

  if body.reset {
    state.engine.reset_analysis(&ws).await?;
    touch(&state, &slug).await?;
    let brain = state.engine.ensure_brain(&ws).await?;
    return Ok(success(json!({ "reset": true, "brain": brain })));
  }

  let (outcome, brain) = state.engine.run_analysis(&ws).await?;
  touch(&state, &slug).await?;
  Ok(success(json!({ "outcome": outcome, "brain": brain })))
}

/// `GET /brands/{slug}/onboarding/analyze` — poll the run state.
pub async fn poll<S, A>(
  State(state): State<AppState<S, A>>,
  current: CurrentUser,
  Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BrandStore + SessionStore + 'static,
  A: BrandAnalyzer + 'static,
{
  let ws = load_workspace(&state, &current.user, &slug).await?;
  let brain: BrandBrain = state.engine.ensure_brain(&ws).await?;
  Ok(success(json!({
    "status":              brain.status,
    "onboarding_step":     brain.onboarding_step,
    "analysis_method":     brain.analysis_method,
    "analysis_started_at": brain.analysis_started_at,
    "last_analyzed_at":    brain.last_analyzed_at,
    "last_error":          brain.last_error,
  })))
}
